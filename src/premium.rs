//! Net premiums and prospective reserves
//!
//! The equivalence principle sets the level annual premium so that the
//! actuarial present value of premiums equals the actuarial present value of
//! benefits at issue. Reserves are the prospective difference between the two
//! at a later valuation time, valued given survival to that time.

use crate::contingency::LifeContingency;
use crate::error::{Error, Result};

impl LifeContingency {
    /// Net level annual premium for whole life insurance of 1, death benefit
    /// payable at the end of the year of death, premiums payable at the
    /// start of each year while alive: `M(0) / N(0)`.
    pub fn premium_net(&self) -> Result<f64> {
        self.premium_net_term(self.omega())
    }

    /// Net level annual premium funding only an `to_time`-year term benefit:
    /// `(M(0) - M(n)) / (N(0) - N(n))`. At `to_time = omega` this is the
    /// whole-life premium.
    pub fn premium_net_term(&self, to_time: u32) -> Result<f64> {
        let benefits = self.M(0)? - self.M(to_time)?;
        let annuity = self.N(0)? - self.N(to_time)?;
        if annuity == 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "no premium-paying periods in [0, {to_time}]"
            )));
        }
        Ok(benefits / annuity)
    }

    /// Prospective net premium reserve at the end of year `time`, given
    /// survival to `time`: APV of future benefits minus APV of future net
    /// premiums, re-based by dividing through `D(time)`.
    ///
    /// Zero at issue under the equivalence-principle premium.
    pub fn reserve_premium_net(&self, time: u32) -> Result<f64> {
        let premium = self.premium_net()?;
        let d = self.D(time)?;
        if d == 0.0 {
            return Err(Error::UndefinedConditional { time: time as f64 });
        }
        Ok((self.M(time)? - premium * self.N(time)?) / d)
    }
}
