//! Decrement (mortality) sources consumed by the life model
//!
//! The engine never parses table file formats itself; it queries any type
//! implementing [`DecrementTable`]. [`UltimateMortality`] is the standard
//! vector-backed implementation: one annual rate per attained age, no select
//! period.

/// A per-age source of one-year decrement probabilities.
///
/// `rate(age)` is the probability of the decrement occurring during the year
/// of age `[age, age + 1)`. A table with rates for ages `a..a+n` defines
/// survivorship through age `a + n`, which is what [`omega`](Self::omega)
/// reports.
pub trait DecrementTable: Send + Sync {
    /// One-year decrement probability for the given attained age, or `None`
    /// beyond the end of the table.
    fn rate(&self, age: u32) -> Option<f64>;

    /// The age through which survival is defined. The last stored rate covers
    /// the year `[omega() - 1, omega())`.
    fn omega(&self) -> u32;
}

/// Ultimate (aggregate) mortality: a flat vector of annual rates by attained
/// age, starting at `first_age`.
#[derive(Debug, Clone, PartialEq)]
pub struct UltimateMortality {
    rates: Vec<f64>,
    first_age: u32,
}

impl UltimateMortality {
    /// Table whose first rate applies at age 0
    pub fn new(rates: Vec<f64>) -> Self {
        Self::with_first_age(rates, 0)
    }

    /// Table whose first rate applies at `first_age`
    pub fn with_first_age(rates: Vec<f64>, first_age: u32) -> Self {
        Self { rates, first_age }
    }

    /// Number of annual rates in the table
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl From<Vec<f64>> for UltimateMortality {
    fn from(rates: Vec<f64>) -> Self {
        Self::new(rates)
    }
}

impl DecrementTable for UltimateMortality {
    fn rate(&self, age: u32) -> Option<f64> {
        if age < self.first_age {
            return None;
        }
        self.rates.get((age - self.first_age) as usize).copied()
    }

    fn omega(&self) -> u32 {
        self.first_age + self.rates.len() as u32
    }
}
