//! Life contingencies: a life bound to a discount source
//!
//! [`LifeContingency`] exposes the composite survival-times-discount query
//! ([`apv`](LifeContingency::apv)) and the classical commutation functions
//! `l`, `D`, `N`, `C`, `M` used by the premium and reserve solvers. All
//! durations are measured from contract start and bounded by the contingency
//! horizon: the lesser of the life's and the discount source's omega.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::interest::DiscountSource;
use crate::life::Life;

/// A life (single or joint) paired with a discount source.
#[derive(Clone)]
pub struct LifeContingency {
    pub life: Life,
    pub interest: Arc<dyn DiscountSource>,
}

impl fmt::Debug for LifeContingency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifeContingency")
            .field("life", &self.life)
            .field("omega", &self.omega())
            .finish_non_exhaustive()
    }
}

impl LifeContingency {
    pub fn new(life: impl Into<Life>, interest: impl DiscountSource + 'static) -> Self {
        Self {
            life: life.into(),
            interest: Arc::new(interest),
        }
    }

    /// Horizon of the contingency: last whole-year duration at which both
    /// the life's survivorship and the discount source are defined.
    pub fn omega(&self) -> u32 {
        match self.interest.omega() {
            Some(int_omega) => self.life.omega().min(int_omega.floor() as u32),
            None => self.life.omega(),
        }
    }

    fn check_time(&self, t: f64) -> Result<()> {
        let omega = self.omega() as f64;
        if t < 0.0 || t > omega || t.is_nan() {
            return Err(Error::OutOfRange { time: t, omega });
        }
        Ok(())
    }

    /// Probability of survival from contract start to duration `t`
    pub fn survival(&self, t: f64) -> Result<f64> {
        self.check_time(t)?;
        Ok(self.life.survival_at(t))
    }

    /// Probability of the decrement occurring by duration `t`
    pub fn decrement(&self, t: f64) -> Result<f64> {
        Ok(1.0 - self.survival(t)?)
    }

    /// Conditional survival from `from` to `to`, given survival to `from`
    pub fn survival_between(&self, from: f64, to: f64) -> Result<f64> {
        if from > to {
            return Err(Error::InvalidTimeOrder { from, to });
        }
        let s_from = self.survival(from)?;
        if s_from == 0.0 {
            return Err(Error::UndefinedConditional { time: from });
        }
        Ok(self.survival(to)? / s_from)
    }

    /// Conditional decrement probability in `(from, to]`, given survival to
    /// `from`
    pub fn decrement_between(&self, from: f64, to: f64) -> Result<f64> {
        Ok(1.0 - self.survival_between(from, to)?)
    }

    /// Discount factor to duration `t`
    pub fn discount(&self, t: f64) -> Result<f64> {
        self.check_time(t)?;
        Ok(self.interest.discount(t))
    }

    /// Single-payment actuarial present value factor at duration `t`:
    /// survival times discount.
    pub fn apv(&self, t: f64) -> Result<f64> {
        Ok(self.survival(t)? * self.interest.discount(t))
    }

    // ========================================================================
    // COMMUTATION FUNCTIONS
    //
    // Classical symbols retained (hence the non-snake-case names). Durations
    // are whole years from issue; prospective sums run to the end of the
    // horizon, with the empty sum at x = omega being exactly zero.
    // ========================================================================

    /// `l_x`: survivorship to duration `x` on a unitary basis
    pub fn l(&self, x: u32) -> Result<f64> {
        self.l_with_basis(x, 1.0)
    }

    /// `l_x` scaled by a radix (1000 and 100_000 are common in the
    /// literature)
    pub fn l_with_basis(&self, x: u32, basis: f64) -> Result<f64> {
        Ok(basis * self.survival(x as f64)?)
    }

    /// `D_x = l_x * v^x`
    #[allow(non_snake_case)]
    pub fn D(&self, x: u32) -> Result<f64> {
        Ok(self.l(x)? * self.interest.discount(x as f64))
    }

    /// `N_x = sum of D_k for k in x..omega`, the prospective annuity sum.
    /// `N(omega)` is zero.
    #[allow(non_snake_case)]
    pub fn N(&self, x: u32) -> Result<f64> {
        self.check_time(x as f64)?;
        let mut total = 0.0;
        for k in x..self.omega() {
            total += self.D(k)?;
        }
        Ok(total)
    }

    /// `C_x = v^(x+1) * (l_x - l_(x+1))`, the discounted death count in the
    /// year `(x, x+1]`
    #[allow(non_snake_case)]
    pub fn C(&self, x: u32) -> Result<f64> {
        self.check_time((x + 1) as f64)?;
        let deaths = self.l(x)? - self.l(x + 1)?;
        Ok(self.interest.discount((x + 1) as f64) * deaths)
    }

    /// `M_x = sum of C_k for k in x..omega`, the prospective insurance sum.
    /// `M(omega)` is zero.
    #[allow(non_snake_case)]
    pub fn M(&self, x: u32) -> Result<f64> {
        self.check_time(x as f64)?;
        let mut total = 0.0;
        for k in x..self.omega() {
            total += self.C(k)?;
        }
        Ok(total)
    }

    /// Survival weight at `t`; domain must already be validated.
    pub(crate) fn survival_at(&self, t: f64) -> f64 {
        self.life.survival_at(t)
    }

    /// Discount factor at `t`; domain must already be validated.
    pub(crate) fn discount_at(&self, t: f64) -> f64 {
        self.interest.discount(t)
    }
}
