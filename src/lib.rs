//! Lifecon - Present value engine for life-contingent cash flows
//!
//! This library provides:
//! - Single and joint (two-life) survivorship models with fractional-age
//!   interpolation
//! - Commutation functions (l, D, N, C, M) over a life + discount source
//! - Lazy insurance and annuity cash-flow streams
//! - Actuarial present values, net premiums and prospective reserves
//!
//! Mortality tables and yield curves are consumed through the narrow
//! [`DecrementTable`] and [`DiscountSource`] interfaces; loading and
//! calibrating them is a caller concern.

pub mod contingency;
pub mod error;
pub mod interest;
pub mod life;
pub mod mortality;
pub mod premium;
pub mod product;

// Re-export commonly used types
pub use contingency::LifeContingency;
pub use error::{Error, Result};
pub use interest::{ConstantYield, DiscountSource, SpotCurve};
pub use life::{Contingency, FractionalAssumption, JointAssumption, JointLife, Life, SingleLife};
pub use mortality::{DecrementTable, UltimateMortality};
pub use product::{Annuity, Insurance, PaymentTiming};
