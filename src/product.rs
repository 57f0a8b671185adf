//! Life-contingent cash-flow products
//!
//! [`Insurance`] pays a unit death benefit at the end of the year of death;
//! [`Annuity`] pays a level stream of `1/frequency` per period, due or
//! immediate, with optional deferral and a certain (guaranteed) period.
//!
//! Each product exposes aligned sequences over its payment/decrement grid:
//! `timepoints`, `survival`, `benefit`, `probability`, `discount` and
//! `cashflows`. The sequences are lazy and restartable: every call returns a
//! fresh iterator recomputed from the immutable product definition, and
//! nothing is cached.

use serde::{Deserialize, Serialize};

use crate::contingency::LifeContingency;
use crate::error::{Error, Result};

/// Life insurance: unit benefit paid at the end of the year of death.
///
/// `term = None` is whole life; either way the decrement grid truncates at
/// the contingency horizon.
#[derive(Debug, Clone)]
pub struct Insurance {
    pub contingency: LifeContingency,
    term: Option<u32>,
}

impl Insurance {
    /// Term insurance through `term` years (`None` = whole life)
    pub fn new(contingency: LifeContingency, term: Option<u32>) -> Self {
        Self { contingency, term }
    }

    /// Whole life insurance
    pub fn whole_life(contingency: LifeContingency) -> Self {
        Self::new(contingency, None)
    }

    pub fn term(&self) -> Option<u32> {
        self.term
    }

    /// Last covered year of death
    fn final_time(&self) -> u32 {
        let omega = self.contingency.omega();
        match self.term {
            Some(n) => n.min(omega),
            None => omega,
        }
    }

    /// End-of-year payment times `1, 2, ..., min(term, omega)`
    pub fn timepoints(&self) -> impl Iterator<Item = f64> + '_ {
        (1..=self.final_time()).map(|t| t as f64)
    }

    /// Survival probability to each timepoint
    pub fn survival(&self) -> impl Iterator<Item = f64> + '_ {
        self.timepoints().map(|t| self.contingency.survival_at(t))
    }

    /// Unit benefit at each timepoint
    pub fn benefit(&self) -> impl Iterator<Item = f64> + '_ {
        self.timepoints().map(|_| 1.0)
    }

    /// Probability the benefit is paid at each timepoint: the unconditional
    /// probability of death in the year ending there
    pub fn probability(&self) -> impl Iterator<Item = f64> + '_ {
        self.timepoints()
            .map(|t| self.contingency.survival_at(t - 1.0) - self.contingency.survival_at(t))
    }

    /// Discount factor to each timepoint
    pub fn discount(&self) -> impl Iterator<Item = f64> + '_ {
        self.timepoints().map(|t| self.contingency.discount_at(t))
    }

    /// Expected decremented cash flow at each timepoint
    pub fn cashflows(&self) -> impl Iterator<Item = f64> + '_ {
        self.benefit()
            .zip(self.probability())
            .map(|(b, p)| b * p)
    }

    /// Actuarial present value of the benefits
    pub fn present_value(&self) -> f64 {
        self.cashflows()
            .zip(self.discount())
            .map(|(cf, v)| cf * v)
            .sum()
    }

    /// Present value as seen from `valuation_time`: only timepoints strictly
    /// after it contribute, re-based to that time's discount factor. Still
    /// conditional on survival to time zero; divide by
    /// [`survival_to`](Self::survival_to) for a given-alive value.
    pub fn present_value_at(&self, valuation_time: f64) -> Result<f64> {
        let v_t = self.contingency.discount(valuation_time)?;
        Ok(self
            .timepoints()
            .zip(self.cashflows().zip(self.discount()))
            .filter(|(t, _)| *t > valuation_time)
            .map(|(_, (cf, v))| cf * v / v_t)
            .sum())
    }

    /// Survivorship from time zero to `t`, fractional ages interpolated
    pub fn survival_to(&self, t: f64) -> Result<f64> {
        self.contingency.survival(t)
    }

    /// Discount factor from time zero to `t`
    pub fn discount_to(&self, t: f64) -> Result<f64> {
        self.contingency.discount(t)
    }
}

/// Payment timing within each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTiming {
    /// Payments at the start of each period
    Due,
    /// Payments at the end of each period
    Immediate,
}

/// Life annuity: level payments of `1/frequency`, contingent on survival
/// outside the certain period.
#[derive(Debug, Clone)]
pub struct Annuity {
    pub contingency: LifeContingency,
    term: Option<u32>,
    start_time: f64,
    certain: Option<u32>,
    frequency: u32,
    timing: PaymentTiming,
}

impl Annuity {
    /// Annuity due: payments at the start of each period, beginning at
    /// `start_time` (`term = None` = whole life)
    pub fn due(contingency: LifeContingency, term: Option<u32>) -> Self {
        Self {
            contingency,
            term,
            start_time: 0.0,
            certain: None,
            frequency: 1,
            timing: PaymentTiming::Due,
        }
    }

    /// Annuity immediate: payments at the end of each period
    pub fn immediate(contingency: LifeContingency, term: Option<u32>) -> Self {
        Self {
            timing: PaymentTiming::Immediate,
            ..Self::due(contingency, term)
        }
    }

    /// Defer the benefit period to begin at `start_time`
    pub fn with_start(mut self, start_time: f64) -> Result<Self> {
        if start_time < 0.0 || start_time.is_nan() {
            return Err(Error::InvalidConfiguration(format!(
                "start_time must be non-negative, got {start_time}"
            )));
        }
        self.start_time = start_time;
        Ok(self)
    }

    /// Guarantee the first `certain` years of payments regardless of
    /// survival
    pub fn with_certain(mut self, certain: u32) -> Result<Self> {
        if let Some(term) = self.term {
            if certain > term {
                return Err(Error::InvalidConfiguration(format!(
                    "certain period {certain} exceeds term {term}"
                )));
            }
        }
        self.certain = Some(certain);
        Ok(self)
    }

    /// Payments per year, each of amount `1/frequency`
    pub fn with_frequency(mut self, frequency: u32) -> Result<Self> {
        if frequency == 0 {
            return Err(Error::InvalidConfiguration(
                "frequency must be a positive integer".to_string(),
            ));
        }
        self.frequency = frequency;
        Ok(self)
    }

    pub fn term(&self) -> Option<u32> {
        self.term
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn certain(&self) -> Option<u32> {
        self.certain
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn timing(&self) -> PaymentTiming {
        self.timing
    }

    /// Number of guaranteed payments at the head of the grid
    fn certain_payments(&self) -> u64 {
        self.certain.unwrap_or(0) as u64 * self.frequency as u64
    }

    /// Payment times: `start + k/f` for due, shifted one period for
    /// immediate; a finite term caps the count, the horizon truncates the
    /// grid either way.
    pub fn timepoints(&self) -> impl Iterator<Item = f64> + '_ {
        let step = 1.0 / self.frequency as f64;
        let offset = match self.timing {
            PaymentTiming::Due => 0.0,
            PaymentTiming::Immediate => step,
        };
        let start = self.start_time;
        let omega = self.contingency.omega() as f64;
        let timing = self.timing;
        let count = self
            .term
            .map(|n| n as u64 * self.frequency as u64)
            .unwrap_or(u64::MAX);

        (0u64..count)
            .map(move |k| start + offset + k as f64 * step)
            .take_while(move |&t| match timing {
                PaymentTiming::Due => t < omega,
                PaymentTiming::Immediate => t <= omega,
            })
    }

    /// Survival probability to each payment time
    pub fn survival(&self) -> impl Iterator<Item = f64> + '_ {
        self.timepoints().map(|t| self.contingency.survival_at(t))
    }

    /// Payment amount at each timepoint
    pub fn benefit(&self) -> impl Iterator<Item = f64> + '_ {
        let amount = 1.0 / self.frequency as f64;
        self.timepoints().map(move |_| amount)
    }

    /// Probability each payment is made: 1 within the certain period,
    /// survival to the payment time after it
    pub fn probability(&self) -> impl Iterator<Item = f64> + '_ {
        let certain = self.certain_payments();
        self.timepoints().enumerate().map(move |(k, t)| {
            if (k as u64) < certain {
                1.0
            } else {
                self.contingency.survival_at(t)
            }
        })
    }

    /// Discount factor to each payment time
    pub fn discount(&self) -> impl Iterator<Item = f64> + '_ {
        self.timepoints().map(|t| self.contingency.discount_at(t))
    }

    /// Expected decremented cash flow at each payment time
    pub fn cashflows(&self) -> impl Iterator<Item = f64> + '_ {
        self.benefit()
            .zip(self.probability())
            .map(|(b, p)| b * p)
    }

    /// Actuarial present value of the payment stream
    pub fn present_value(&self) -> f64 {
        self.cashflows()
            .zip(self.discount())
            .map(|(cf, v)| cf * v)
            .sum()
    }

    /// Present value as seen from `valuation_time`; see
    /// [`Insurance::present_value_at`]
    pub fn present_value_at(&self, valuation_time: f64) -> Result<f64> {
        let v_t = self.contingency.discount(valuation_time)?;
        Ok(self
            .timepoints()
            .zip(self.cashflows().zip(self.discount()))
            .filter(|(t, _)| *t > valuation_time)
            .map(|(_, (cf, v))| cf * v / v_t)
            .sum())
    }

    /// Survivorship from time zero to `t`, fractional ages interpolated
    pub fn survival_to(&self, t: f64) -> Result<f64> {
        self.contingency.survival(t)
    }

    /// Discount factor from time zero to `t`
    pub fn discount_to(&self, t: f64) -> Result<f64> {
        self.contingency.discount(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interest::ConstantYield;
    use crate::life::SingleLife;
    use crate::mortality::UltimateMortality;
    use approx::assert_abs_diff_eq;

    fn lc(q: Vec<f64>, rate: f64) -> LifeContingency {
        LifeContingency::new(
            SingleLife::new(UltimateMortality::new(q), 0).unwrap(),
            ConstantYield::new(rate).unwrap(),
        )
    }

    #[test]
    fn test_one_year_term_insurance() {
        let ins = Insurance::new(lc(vec![0.5, 0.5], 0.05), Some(1));

        assert_eq!(ins.timepoints().collect::<Vec<_>>(), vec![1.0]);
        let cashflows: Vec<f64> = ins.cashflows().collect();
        assert_eq!(cashflows.len(), 1);
        assert_abs_diff_eq!(cashflows[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(ins.present_value(), 0.5 / 1.05, epsilon = 1e-12);
    }

    #[test]
    fn test_insurance_round_trip() {
        let ins = Insurance::whole_life(lc(vec![0.1, 0.2, 0.3, 0.4], 0.05));
        let direct: f64 = ins
            .cashflows()
            .zip(ins.discount())
            .map(|(cf, v)| cf * v)
            .sum();
        assert_abs_diff_eq!(ins.present_value(), direct, epsilon = 1e-12);
    }

    #[test]
    fn test_whole_life_matches_commutation() {
        let lc = lc(vec![0.1, 0.2, 0.3, 0.4], 0.05);
        let ins = Insurance::whole_life(lc.clone());
        // A = M(0) / D(0) with D(0) = 1
        assert_abs_diff_eq!(ins.present_value(), lc.M(0).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_annuity_due_matches_commutation() {
        let lc = lc(vec![0.1, 0.2, 0.3, 0.4], 0.05);
        let ann = Annuity::due(lc.clone(), None);
        assert_abs_diff_eq!(ann.present_value(), lc.N(0).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_joint_whole_life_matches_commutation() {
        use crate::life::JointLife;

        let l1 = SingleLife::new(UltimateMortality::new(vec![0.1, 0.2, 0.3, 0.4]), 0).unwrap();
        let l2 = SingleLife::new(UltimateMortality::new(vec![0.05, 0.1, 0.15, 0.2]), 0).unwrap();
        let lc = LifeContingency::new(JointLife::new(l1, l2), ConstantYield::new(0.05).unwrap());

        let ins = Insurance::whole_life(lc.clone());
        assert_abs_diff_eq!(ins.present_value(), lc.M(0).unwrap(), epsilon = 1e-12);

        let ann = Annuity::due(lc.clone(), None);
        assert_abs_diff_eq!(ann.present_value(), lc.N(0).unwrap(), epsilon = 1e-12);

        // Last-survivor cover is cheaper than insuring the first life alone
        let single = LifeContingency::new(
            SingleLife::new(UltimateMortality::new(vec![0.1, 0.2, 0.3, 0.4]), 0).unwrap(),
            ConstantYield::new(0.05).unwrap(),
        );
        assert!(ins.present_value() < Insurance::whole_life(single).present_value());
    }

    #[test]
    fn test_insurance_term_truncates_at_omega() {
        let ins = Insurance::new(lc(vec![0.1, 0.2], 0.05), Some(10));
        assert_eq!(ins.timepoints().count(), 2);
    }

    #[test]
    fn test_streams_are_restartable() {
        let ins = Insurance::whole_life(lc(vec![0.1, 0.2, 0.3, 0.4], 0.05));
        let first: Vec<f64> = ins.cashflows().collect();
        let second: Vec<f64> = ins.cashflows().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_annuity_due_vs_immediate_grid() {
        let lc = lc(vec![0.1, 0.2, 0.3, 0.4], 0.05);
        let due = Annuity::due(lc.clone(), Some(3));
        let imm = Annuity::immediate(lc, Some(3));

        assert_eq!(due.timepoints().collect::<Vec<_>>(), vec![0.0, 1.0, 2.0]);
        assert_eq!(imm.timepoints().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_annuity_frequency() {
        let lc = lc(vec![0.1, 0.2, 0.3, 0.4], 0.05);
        let ann = Annuity::due(lc.clone(), Some(1)).with_frequency(2).unwrap();

        assert_eq!(ann.timepoints().collect::<Vec<_>>(), vec![0.0, 0.5]);
        let benefits: Vec<f64> = ann.benefit().collect();
        assert_eq!(benefits, vec![0.5, 0.5]);

        let expected = 0.5 + 0.5 * lc.survival(0.5).unwrap() * lc.discount(0.5).unwrap();
        assert_abs_diff_eq!(ann.present_value(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_annuity_deferral() {
        let lc = lc(vec![0.1, 0.2, 0.3, 0.4], 0.05);
        let ann = Annuity::due(lc.clone(), Some(2)).with_start(1.0).unwrap();

        assert_eq!(ann.timepoints().collect::<Vec<_>>(), vec![1.0, 2.0]);
        let expected = lc.apv(1.0).unwrap() + lc.apv(2.0).unwrap();
        assert_abs_diff_eq!(ann.present_value(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_certain_period_unconditional() {
        let lc = lc(vec![0.1, 0.2, 0.3, 0.4], 0.05);
        let ann = Annuity::due(lc.clone(), Some(3)).with_certain(2).unwrap();

        let probs: Vec<f64> = ann.probability().collect();
        assert_eq!(probs[0], 1.0);
        assert_eq!(probs[1], 1.0);
        assert_abs_diff_eq!(probs[2], lc.survival(2.0).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_certain_exceeding_term_rejected() {
        let lc = lc(vec![0.1, 0.2, 0.3, 0.4], 0.05);
        let result = Annuity::due(lc, Some(2)).with_certain(5);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let lc = lc(vec![0.1, 0.2], 0.05);
        let result = Annuity::due(lc, None).with_frequency(0);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_negative_start_rejected() {
        let lc = lc(vec![0.1, 0.2], 0.05);
        let result = Annuity::due(lc, None).with_start(-1.0);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_present_value_at() {
        let lc = lc(vec![0.1, 0.2, 0.3, 0.4], 0.05);
        let ins = Insurance::whole_life(lc.clone());

        // Standing at time 2, only the year-3 and year-4 death benefits
        // remain, discounted from their payment times back to time 2.
        let v = |t: f64| 1.05_f64.powf(-t);
        let expected = (lc.survival(2.0).unwrap() - lc.survival(3.0).unwrap()) * v(1.0)
            + (lc.survival(3.0).unwrap() - lc.survival(4.0).unwrap()) * v(2.0);
        assert_abs_diff_eq!(ins.present_value_at(2.0).unwrap(), expected, epsilon = 1e-12);

        // Valuing from time zero is the plain present value
        assert_abs_diff_eq!(
            ins.present_value_at(0.0).unwrap(),
            ins.present_value(),
            epsilon = 1e-12
        );

        // A mid-year valuation date keeps the same remaining benefits as the
        // next payment date, rolled forward half a year of interest
        assert_abs_diff_eq!(
            ins.present_value_at(1.5).unwrap(),
            (lc.survival(1.0).unwrap() - lc.survival(2.0).unwrap()) * v(0.5)
                + (lc.survival(2.0).unwrap() - lc.survival(3.0).unwrap()) * v(1.5)
                + (lc.survival(3.0).unwrap() - lc.survival(4.0).unwrap()) * v(2.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_present_value_at_given_alive() {
        let lc = lc(vec![0.1, 0.2, 0.3, 0.4], 0.05);
        let ins = Insurance::whole_life(lc);

        // Un-decremented value at t: divide by survivorship to t
        let conditional = ins.present_value_at(2.0).unwrap() / ins.survival_to(2.0).unwrap();
        assert!(conditional > ins.present_value_at(2.0).unwrap());
    }
}
