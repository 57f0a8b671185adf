//! Discount sources for time-value-of-money
//!
//! Supports:
//! - Flat annual effective yield ([`ConstantYield`])
//! - Annual spot rate curves with interpolation at fractional durations
//!   ([`SpotCurve`])
//!
//! Curve construction/calibration from market data is a collaborator concern;
//! the engine only queries discount factors through [`DiscountSource`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A per-duration source of discount factors.
pub trait DiscountSource: Send + Sync {
    /// Discount factor in `(0, 1]` to the given duration (years, possibly
    /// fractional). `discount(0.0)` is 1.
    fn discount(&self, time: f64) -> f64;

    /// Last duration for which the source is defined; `None` = unbounded.
    fn omega(&self) -> Option<f64>;
}

/// Flat annual effective rate: `v^t = (1 + i)^-t`, defined for all durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantYield {
    pub rate: f64,
}

impl ConstantYield {
    /// Annual effective rate; must exceed -100% so every discount factor
    /// stays positive and finite.
    pub fn new(rate: f64) -> Result<Self> {
        if !(rate > -1.0) {
            return Err(Error::InvalidConfiguration(format!(
                "interest rate must exceed -1.0, got {rate}"
            )));
        }
        Ok(Self { rate })
    }
}

impl DiscountSource for ConstantYield {
    fn discount(&self, time: f64) -> f64 {
        (1.0 + self.rate).powf(-time)
    }

    fn omega(&self) -> Option<f64> {
        None
    }
}

/// Annual spot rate curve.
///
/// `rates[k]` is the annual effective spot rate for maturity `k + 1` years.
/// Rates at fractional durations are linearly interpolated between the
/// bounding maturities; durations inside the first year use the one-year
/// spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotCurve {
    rates: Vec<f64>,
}

impl SpotCurve {
    /// Annual effective spot rates; every rate must exceed -100%.
    pub fn new(rates: Vec<f64>) -> Result<Self> {
        if let Some(bad) = rates.iter().find(|r| !(**r > -1.0)) {
            return Err(Error::InvalidConfiguration(format!(
                "spot rates must exceed -1.0, got {bad}"
            )));
        }
        Ok(Self { rates })
    }

    /// Interpolated annual spot rate for the given duration
    fn spot(&self, time: f64) -> f64 {
        if time <= 1.0 {
            return self.rates[0];
        }
        let lo = (time.floor() as usize - 1).min(self.rates.len() - 1);
        let hi = (lo + 1).min(self.rates.len() - 1);
        let frac = time.fract();
        self.rates[lo] + (self.rates[hi] - self.rates[lo]) * frac
    }
}

impl DiscountSource for SpotCurve {
    fn discount(&self, time: f64) -> f64 {
        if time == 0.0 || self.rates.is_empty() {
            return 1.0;
        }
        (1.0 + self.spot(time)).powf(-time)
    }

    fn omega(&self) -> Option<f64> {
        Some(self.rates.len() as f64)
    }
}
