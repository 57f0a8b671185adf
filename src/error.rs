//! Typed failures for contingency and present-value queries
//!
//! None of these are used for control flow: a returned error always means the
//! caller asked for something outside the model (beyond the horizon, reversed
//! time interval, conditioning on an extinct cohort, or an inconsistent
//! product configuration).

use thiserror::Error;

/// Errors produced by survivorship, commutation and pricing queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Query time lies outside `[0, omega]` for the life, discount source,
    /// or contingency. Signals a modeling-horizon mismatch rather than a
    /// quantity that is legitimately zero.
    #[error("time {time} is outside the defined horizon [0, {omega}]")]
    OutOfRange { time: f64, omega: f64 },

    /// `from_time > to_time` in a conditional survival/decrement query
    #[error("from_time {from} is after to_time {to}")]
    InvalidTimeOrder { from: f64, to: f64 },

    /// Conditioning on survival to a time where survival is already zero
    #[error("survival to time {time} is zero; conditional probability undefined")]
    UndefinedConditional { time: f64 },

    /// Inconsistent product or model configuration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
