//! Single and joint life survivorship models
//!
//! A [`SingleLife`] binds a decrement source to an issue age and a
//! fractional-age interpolation rule. A [`JointLife`] combines two single
//! lives under a dependence assumption and a contingency trigger. Both are
//! evaluated on a shared time axis: elapsed duration since contract start,
//! not each life's own age axis.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mortality::DecrementTable;

/// Interpolation rule for survival at non-integer durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractionalAssumption {
    /// Uniform distribution of deaths: the decrement is linear within the
    /// year, `S(n + s) = S(n) * (1 - s * q_n)`.
    Uniform,
    /// Constant force of mortality within the year,
    /// `S(n + s) = S(n) * (1 - q_n)^s`.
    ConstantForce,
}

impl Default for FractionalAssumption {
    fn default() -> Self {
        FractionalAssumption::Uniform
    }
}

/// The life-status event that triggers benefit payment on a joint risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contingency {
    /// Benefits are contingent on at least one of the two lives surviving;
    /// payment triggers upon the second death.
    LastSurvivor,
}

impl Default for Contingency {
    fn default() -> Self {
        Contingency::LastSurvivor
    }
}

/// Statistical dependence model combining two lives' survival curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointAssumption {
    /// Independent lives: joint survivorship is the product of the
    /// single-life survivorships.
    Frasier,
}

impl Default for JointAssumption {
    fn default() -> Self {
        JointAssumption::Frasier
    }
}

/// A single insured life: decrement source, issue age, alive flag, and
/// fractional-age rule.
#[derive(Clone)]
pub struct SingleLife {
    /// Decrement source indexed by attained age
    pub mortality: Arc<dyn DecrementTable>,
    /// Age at contract start; survivorship durations are measured from here
    pub issue_age: u32,
    /// False flags a life already deceased, zeroing its survivorship.
    /// Useful for joint risks where one life has died.
    pub alive: bool,
    pub fractional_assumption: FractionalAssumption,
}

impl fmt::Debug for SingleLife {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleLife")
            .field("issue_age", &self.issue_age)
            .field("alive", &self.alive)
            .field("fractional_assumption", &self.fractional_assumption)
            .finish_non_exhaustive()
    }
}

impl SingleLife {
    /// Rejects an issue age the table does not cover: a table starting above
    /// `issue_age` has no survivorship defined for the early years, so the
    /// combination is a configuration error rather than a zero.
    pub fn new(mortality: impl DecrementTable + 'static, issue_age: u32) -> Result<Self> {
        let mortality: Arc<dyn DecrementTable> = Arc::new(mortality);
        if mortality.omega() > issue_age && mortality.rate(issue_age).is_none() {
            return Err(Error::InvalidConfiguration(format!(
                "mortality table has no rate at issue age {issue_age}"
            )));
        }
        Ok(Self {
            mortality,
            issue_age,
            alive: true,
            fractional_assumption: FractionalAssumption::default(),
        })
    }

    pub fn with_alive(mut self, alive: bool) -> Self {
        self.alive = alive;
        self
    }

    pub fn with_fractional_assumption(mut self, assumption: FractionalAssumption) -> Self {
        self.fractional_assumption = assumption;
        self
    }

    /// Last duration for which survival is defined: whole years of mortality
    /// rates remaining past the issue age.
    pub fn omega(&self) -> u32 {
        self.mortality.omega().saturating_sub(self.issue_age)
    }

    /// Probability of surviving from contract start to duration `t`
    pub fn survival(&self, t: f64) -> Result<f64> {
        check_time(t, self.omega())?;
        Ok(self.survival_at(t))
    }

    /// Probability of the decrement occurring by duration `t`
    pub fn decrement(&self, t: f64) -> Result<f64> {
        Ok(1.0 - self.survival(t)?)
    }

    /// Survival weight at `t`; domain must already be validated.
    pub(crate) fn survival_at(&self, t: f64) -> f64 {
        if !self.alive {
            return if t > 0.0 { 0.0 } else { 1.0 };
        }

        let whole = t.floor() as u32;
        let frac = t.fract();

        // Rates are contiguous from the issue age through omega (checked at
        // construction), so these lookups cannot miss for validated t.
        let mut surv = 1.0;
        for k in 0..whole {
            let q = self.mortality.rate(self.issue_age + k).unwrap_or(1.0);
            surv *= 1.0 - q;
        }

        if frac > 0.0 {
            let q = self.mortality.rate(self.issue_age + whole).unwrap_or(1.0);
            surv *= match self.fractional_assumption {
                FractionalAssumption::Uniform => 1.0 - frac * q,
                FractionalAssumption::ConstantForce => (1.0 - q).powf(frac),
            };
        }

        surv
    }
}

/// Two lives combined under a dependence assumption and contingency trigger.
///
/// Issue ages of the two lives may differ; survivorship is always evaluated
/// against elapsed duration since contract start.
#[derive(Debug, Clone)]
pub struct JointLife {
    pub lives: [SingleLife; 2],
    pub contingency: Contingency,
    pub joint_assumption: JointAssumption,
}

impl JointLife {
    pub fn new(life1: SingleLife, life2: SingleLife) -> Self {
        Self {
            lives: [life1, life2],
            contingency: Contingency::default(),
            joint_assumption: JointAssumption::default(),
        }
    }

    pub fn with_contingency(mut self, contingency: Contingency) -> Self {
        self.contingency = contingency;
        self
    }

    pub fn with_joint_assumption(mut self, assumption: JointAssumption) -> Self {
        self.joint_assumption = assumption;
        self
    }

    pub fn omega(&self) -> u32 {
        self.lives[0].omega().min(self.lives[1].omega())
    }

    pub fn survival(&self, t: f64) -> Result<f64> {
        check_time(t, self.omega())?;
        Ok(self.survival_at(t))
    }

    pub fn decrement(&self, t: f64) -> Result<f64> {
        Ok(1.0 - self.survival(t)?)
    }

    /// Combination formula keyed on the (assumption, contingency) pair.
    /// New dependence models or triggers add an arm here.
    pub(crate) fn survival_at(&self, t: f64) -> f64 {
        let s1 = self.lives[0].survival_at(t);
        let s2 = self.lives[1].survival_at(t);
        match (self.joint_assumption, self.contingency) {
            (JointAssumption::Frasier, Contingency::LastSurvivor) => {
                1.0 - (1.0 - s1) * (1.0 - s2)
            }
        }
    }
}

/// A single or joint insured risk.
#[derive(Debug, Clone)]
pub enum Life {
    Single(SingleLife),
    Joint(JointLife),
}

impl From<SingleLife> for Life {
    fn from(life: SingleLife) -> Self {
        Life::Single(life)
    }
}

impl From<JointLife> for Life {
    fn from(life: JointLife) -> Self {
        Life::Joint(life)
    }
}

impl Life {
    /// Last duration for which survival is defined
    pub fn omega(&self) -> u32 {
        match self {
            Life::Single(l) => l.omega(),
            Life::Joint(l) => l.omega(),
        }
    }

    /// Probability of surviving from contract start to duration `t`
    pub fn survival(&self, t: f64) -> Result<f64> {
        check_time(t, self.omega())?;
        Ok(self.survival_at(t))
    }

    /// Probability of the decrement occurring by duration `t`
    pub fn decrement(&self, t: f64) -> Result<f64> {
        Ok(1.0 - self.survival(t)?)
    }

    /// Conditional probability of surviving from `from` to `to`, given
    /// survival to `from`
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

    /// Conditional probability of the decrement occurring in `(from, to]`,
    /// given survival to `from`
    pub fn decrement_between(&self, from: f64, to: f64) -> Result<f64> {
        Ok(1.0 - self.survival_between(from, to)?)
    }

    pub(crate) fn survival_at(&self, t: f64) -> f64 {
        match self {
            Life::Single(l) => l.survival_at(t),
            Life::Joint(l) => l.survival_at(t),
        }
    }
}

fn check_time(t: f64, omega: u32) -> Result<()> {
    let omega = omega as f64;
    if t < 0.0 || t > omega || t.is_nan() {
        return Err(Error::OutOfRange { time: t, omega });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mortality::UltimateMortality;
    use approx::assert_abs_diff_eq;

    fn sample_life() -> SingleLife {
        SingleLife::new(UltimateMortality::new(vec![0.1, 0.2, 0.3, 0.4]), 0).unwrap()
    }

    #[test]
    fn test_survival_and_decrement() {
        let l: Life = sample_life().into();

        assert_abs_diff_eq!(l.survival(1.0).unwrap(), 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(l.decrement(1.0).unwrap(), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(l.survival_between(1.0, 2.0).unwrap(), 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(l.survival_between(1.0, 3.0).unwrap(), 0.56, epsilon = 1e-12);
        assert_abs_diff_eq!(l.decrement_between(1.0, 3.0).unwrap(), 0.44, epsilon = 1e-12);
    }

    #[test]
    fn test_survival_chain_rule() {
        let l: Life = sample_life().into();
        let omega = l.omega();
        assert_eq!(omega, 4);

        for t1 in 0..=omega {
            for t2 in t1..=omega {
                let lhs = l.survival(t2 as f64).unwrap();
                let rhs = l.survival(t1 as f64).unwrap()
                    * l.survival_between(t1 as f64, t2 as f64).unwrap();
                assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-12);
            }
        }

        // The identity must also hold at fractional split points, where the
        // interpolated tail enters on both sides of the ratio
        for &(t1, t2) in &[(0.25, 0.75), (0.5, 2.5), (1.25, 2.5), (1.5, 4.0)] {
            let lhs = l.survival(t2).unwrap();
            let rhs = l.survival(t1).unwrap() * l.survival_between(t1, t2).unwrap();
            assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fractional_uniform() {
        let l = sample_life();
        // Deaths uniform in the first year: S(0.5) = 1 - 0.5 * 0.1
        assert_abs_diff_eq!(l.survival(0.5).unwrap(), 0.95, epsilon = 1e-12);
        // S(1.5) = 0.9 * (1 - 0.5 * 0.2)
        assert_abs_diff_eq!(l.survival(1.5).unwrap(), 0.9 * 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_fractional_constant_force() {
        let l = sample_life().with_fractional_assumption(FractionalAssumption::ConstantForce);
        assert_abs_diff_eq!(l.survival(0.5).unwrap(), 0.9_f64.powf(0.5), epsilon = 1e-12);
        assert_abs_diff_eq!(
            l.survival(1.5).unwrap(),
            0.9 * 0.8_f64.powf(0.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_issue_age_offsets_table() {
        let table = UltimateMortality::new(vec![0.1, 0.2, 0.3, 0.4]);
        let l = SingleLife::new(table, 2).unwrap();
        assert_eq!(l.omega(), 2);
        // First year decrement is q at attained age 2
        assert_abs_diff_eq!(l.survival(1.0).unwrap(), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_issue_age_below_table_start_rejected() {
        // A table starting at 60 defines nothing for a 30-year-old's early
        // years; the combination must fail loudly, not survive as zeros
        let table = UltimateMortality::with_first_age(vec![0.01, 0.01], 60);
        let result = SingleLife::new(table, 30);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_issue_age_past_table_end() {
        // Past the table end there is simply no horizon left; that is a
        // valid life with omega zero, not a configuration error
        let table = UltimateMortality::with_first_age(vec![0.01, 0.01], 60);
        let l = SingleLife::new(table, 70).unwrap();
        assert_eq!(l.omega(), 0);
        assert!(l.survival(1.0).is_err());
    }

    #[test]
    fn test_dead_life() {
        let l = sample_life().with_alive(false);
        assert_abs_diff_eq!(l.survival(0.0).unwrap(), 1.0);
        assert_abs_diff_eq!(l.survival(1.0).unwrap(), 0.0);
        assert_abs_diff_eq!(l.survival(3.0).unwrap(), 0.0);
    }

    #[test]
    fn test_joint_frasier_last_survivor() {
        let l1 = sample_life();
        let l2 = SingleLife::new(UltimateMortality::new(vec![0.2, 0.2, 0.2, 0.2]), 0).unwrap();
        let joint = JointLife::new(l1.clone(), l2.clone());

        for t in 0..=joint.omega() {
            let t = t as f64;
            let s1 = l1.survival(t).unwrap();
            let s2 = l2.survival(t).unwrap();
            let expected = 1.0 - (1.0 - s1) * (1.0 - s2);
            assert_abs_diff_eq!(joint.survival(t).unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_joint_with_dead_life_degrades_to_survivor() {
        let l1 = sample_life().with_alive(false);
        let l2 = sample_life();
        let joint = JointLife::new(l1, l2.clone());

        for t in 1..=joint.omega() {
            let t = t as f64;
            assert_abs_diff_eq!(
                joint.survival(t).unwrap(),
                l2.survival(t).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_joint_omega_uses_shorter_life() {
        let l1 = sample_life(); // omega 4
        let l2 = SingleLife::new(UltimateMortality::new(vec![0.5, 0.5]), 0).unwrap(); // omega 2
        let joint = JointLife::new(l1, l2);
        assert_eq!(joint.omega(), 2);
    }

    #[test]
    fn test_out_of_range() {
        let l: Life = sample_life().into();
        assert!(matches!(
            l.survival(5.0),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(l.survival(-1.0), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_invalid_time_order() {
        let l: Life = sample_life().into();
        assert_eq!(
            l.survival_between(2.0, 1.0),
            Err(Error::InvalidTimeOrder { from: 2.0, to: 1.0 })
        );
    }

    #[test]
    fn test_undefined_conditional() {
        let l: Life = sample_life().with_alive(false).into();
        assert_eq!(
            l.survival_between(1.0, 2.0),
            Err(Error::UndefinedConditional { time: 1.0 })
        );
    }
}
