//! Target entity: one weighted destination of a short link.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Relative weight of a target.
///
/// Freshly allocated targets keep the exact JSON number the client sent, so a
/// weight of `1` is echoed back as `1` and `0.5` as `0.5`. Rows written by
/// other tooling may carry the weight as a decimal string (`"70.25"`), which
/// is accepted on read. Both forms are normalised through [`Weight::as_f64`]
/// before any arithmetic happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    Number(Number),
    Decimal(String),
}

impl Weight {
    /// Returns the weight as a finite `f64`, or `None` if it cannot be read as one.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Weight::Number(n) => n.as_f64()?,
            Weight::Decimal(s) => s.trim().parse::<f64>().ok()?,
        };

        value.is_finite().then_some(value)
    }

    /// Returns true if the weight is a finite number strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.as_f64().is_some_and(|w| w > 0.0)
    }
}

impl From<Number> for Weight {
    fn from(n: Number) -> Self {
        Weight::Number(n)
    }
}

impl From<u64> for Weight {
    fn from(n: u64) -> Self {
        Weight::Number(n.into())
    }
}

/// A destination URL with its selection weight.
///
/// `visits` is part of the stored shape and always starts at zero; nothing in
/// this service increments it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub url: String,
    pub weight: Weight,
    #[serde(default)]
    pub visits: u64,
}

impl Target {
    /// Creates a target with zero visits.
    pub fn new(url: impl Into<String>, weight: impl Into<Weight>) -> Self {
        Self {
            url: url.into(),
            weight: weight.into(),
            visits: 0,
        }
    }
}
