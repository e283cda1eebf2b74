//! Record entity: a short code and the targets it fans out to.

use serde::{Deserialize, Serialize};

use super::target::Target;
use crate::domain::selection::{SelectionError, WeightedUrl};

/// A stored short link.
///
/// Records are written once by the allocator and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub short_code: String,
    pub targets: Vec<Target>,
}

impl Record {
    /// Creates a new Record instance.
    pub fn new(short_code: impl Into<String>, targets: Vec<Target>) -> Self {
        Self {
            short_code: short_code.into(),
            targets,
        }
    }

    /// Converts the targets into the `(url, f64)` pairs used for selection.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoTargets`] for an empty record and
    /// [`SelectionError::UnreadableWeight`] when a stored weight is not a
    /// finite number.
    pub fn weighted_urls(&self) -> Result<Vec<WeightedUrl>, SelectionError> {
        if self.targets.is_empty() {
            return Err(SelectionError::NoTargets);
        }

        self.targets
            .iter()
            .enumerate()
            .map(|(index, target)| {
                let weight = target
                    .weight
                    .as_f64()
                    .ok_or(SelectionError::UnreadableWeight { index })?;

                Ok(WeightedUrl {
                    url: target.url.clone(),
                    weight,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Weight;

    #[test]
    fn test_record_creation() {
        let record = Record::new("abc12", vec![Target::new("https://example.com", 1u64)]);

        assert_eq!(record.short_code, "abc12");
        assert_eq!(record.targets.len(), 1);
        assert_eq!(record.targets[0].visits, 0);
    }

    #[test]
    fn test_weighted_urls_normalizes_mixed_weights() {
        let record = Record::new(
            "abc12",
            vec![
                Target::new("https://a.com", 70u64),
                Target::new("https://b.com", Weight::Decimal("29.5".to_string())),
            ],
        );

        let urls = record.weighted_urls().unwrap();
        assert_eq!(
            urls,
            vec![
                WeightedUrl {
                    url: "https://a.com".to_string(),
                    weight: 70.0
                },
                WeightedUrl {
                    url: "https://b.com".to_string(),
                    weight: 29.5
                },
            ]
        );
    }

    #[test]
    fn test_weighted_urls_rejects_unreadable_weight() {
        let record = Record::new(
            "abc12",
            vec![
                Target::new("https://a.com", 1u64),
                Target::new("https://b.com", Weight::Decimal("lots".to_string())),
            ],
        );

        assert_eq!(
            record.weighted_urls(),
            Err(SelectionError::UnreadableWeight { index: 1 })
        );
    }

    #[test]
    fn test_weighted_urls_rejects_empty_record() {
        let record = Record::new("abc12", vec![]);
        assert_eq!(record.weighted_urls(), Err(SelectionError::NoTargets));
    }
}
