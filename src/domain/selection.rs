//! Weighted random choice among a record's targets.
//!
//! A target with weight `w_i` is chosen with probability `w_i / Σw`. The draw
//! is a single sample from [`WeightedIndex`], which binary-searches the
//! cumulative weights, rather than one trial per target.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

/// A target URL with its weight already normalised to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedUrl {
    pub url: String,
    pub weight: f64,
}

/// Invariant violations detected while selecting a target.
///
/// Weights are validated as positive at allocation time, so none of these are
/// expected for records written by this service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("record has no targets")]
    NoTargets,

    #[error("target {index} has a weight that is not a finite number")]
    UnreadableWeight { index: usize },

    #[error("target weights cannot be sampled: {0}")]
    InvalidWeights(String),
}

/// Picks one URL from `candidates` in proportion to its weight.
///
/// # Errors
///
/// Returns [`SelectionError::NoTargets`] for an empty slice and
/// [`SelectionError::InvalidWeights`] when the weights are negative or sum to zero.
pub fn pick_url<'a, R: Rng + ?Sized>(
    candidates: &'a [WeightedUrl],
    rng: &mut R,
) -> Result<&'a str, SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::NoTargets);
    }

    let index = WeightedIndex::<f64>::new(candidates.iter().map(|c| c.weight))
        .map_err(|e| SelectionError::InvalidWeights(e.to_string()))?;

    Ok(&candidates[index.sample(rng)].url)
}
