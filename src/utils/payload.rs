//! Validation and target construction for shorten request bodies.
//!
//! The body is validated as raw JSON rather than through a derived
//! deserializer so that every failure can name the offending entry index and
//! field, and so the first violation in entry order is the one reported.

use serde_json::{Number, Value};

use crate::domain::entities::{Target, Weight};

/// One validated `{original_url, weight}` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub original_url: String,
    pub weight: Number,
}

/// Validates a shorten request body.
///
/// # Rules
///
/// Checked in order, first failure wins:
///
/// 1. `urls` is present
/// 2. `urls` is a non-empty list
/// 3. for each entry: `original_url` is present (and a string), `weight` is
///    present, `weight` is a number strictly greater than zero
///
/// # Errors
///
/// Returns a message naming the field and, for entry failures, the zero-based
/// entry index.
///
/// # Examples
///
/// ```ignore
/// let body = json!({ "urls": [{ "original_url": "https://a.com", "weight": 1 }] });
/// assert!(validate_body(&body).is_ok());
///
/// let body = json!({ "urls": [{ "weight": 1 }] });
/// assert_eq!(validate_body(&body).unwrap_err(), "Entry 0 is missing 'original_url'");
/// ```
pub fn validate_body(body: &Value) -> Result<Vec<UrlEntry>, String> {
    let Some(urls) = body.get("urls") else {
        return Err("Missing required field: urls".to_string());
    };

    let entries = match urls.as_array() {
        Some(entries) if !entries.is_empty() => entries,
        _ => return Err("Field 'urls' must be a non-empty list".to_string()),
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| validate_entry(i, entry))
        .collect()
}

fn validate_entry(i: usize, entry: &Value) -> Result<UrlEntry, String> {
    let Some(original_url) = entry.get("original_url") else {
        return Err(format!("Entry {i} is missing 'original_url'"));
    };

    let Some(original_url) = original_url.as_str() else {
        return Err(format!("Entry {i} has an invalid 'original_url' (must be a string)"));
    };

    let Some(weight) = entry.get("weight") else {
        return Err(format!("Entry {i} is missing 'weight'"));
    };

    match weight {
        Value::Number(n) if Weight::from(n.clone()).is_positive() => Ok(UrlEntry {
            original_url: original_url.to_string(),
            weight: n.clone(),
        }),
        _ => Err(format!(
            "Entry {i} has an invalid weight (must be a positive number)"
        )),
    }
}

/// Maps validated entries to targets, preserving order and the numeric type of
/// each weight. Every target starts with zero visits.
pub fn build_targets(entries: Vec<UrlEntry>) -> Vec<Target> {
    entries
        .into_iter()
        .map(|entry| Target::new(entry.original_url, Weight::Number(entry.weight)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn targets_for(body: Value) -> Vec<Target> {
        build_targets(validate_body(&body).unwrap())
    }

    #[test]
    fn test_valid_single_url() {
        let body = json!({ "urls": [{ "original_url": "https://example.com", "weight": 1 }] });
        assert!(validate_body(&body).is_ok());
    }

    #[test]
    fn test_valid_multiple_urls() {
        let body = json!({
            "urls": [
                { "original_url": "https://a.com", "weight": 1 },
                { "original_url": "https://b.com", "weight": 2 }
            ]
        });
        assert_eq!(validate_body(&body).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_urls_key() {
        let err = validate_body(&json!({})).unwrap_err();
        assert!(err.contains("urls"));
    }

    #[test]
    fn test_non_object_body_is_missing_urls() {
        let err = validate_body(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, "Missing required field: urls");
    }

    #[test]
    fn test_urls_is_string_not_list() {
        let err = validate_body(&json!({ "urls": "https://example.com" })).unwrap_err();
        assert_eq!(err, "Field 'urls' must be a non-empty list");
    }

    #[test]
    fn test_urls_is_empty_list() {
        let err = validate_body(&json!({ "urls": [] })).unwrap_err();
        assert!(err.contains("urls"));
    }

    #[test]
    fn test_entry_missing_original_url_reports_index() {
        let err = validate_body(&json!({ "urls": [{ "weight": 1 }] })).unwrap_err();
        assert_eq!(err, "Entry 0 is missing 'original_url'");
    }

    #[test]
    fn test_entry_missing_weight_reports_index() {
        let err = validate_body(&json!({ "urls": [{ "original_url": "https://example.com" }] }))
            .unwrap_err();
        assert_eq!(err, "Entry 0 is missing 'weight'");
    }

    #[test]
    fn test_original_url_checked_before_weight() {
        let err = validate_body(&json!({ "urls": [{}] })).unwrap_err();
        assert!(err.contains("original_url"));
    }

    #[test]
    fn test_non_object_entry_is_missing_original_url() {
        let err = validate_body(&json!({ "urls": ["https://example.com"] })).unwrap_err();
        assert_eq!(err, "Entry 0 is missing 'original_url'");
    }

    #[test]
    fn test_non_string_original_url_is_rejected() {
        let err = validate_body(&json!({ "urls": [{ "original_url": 42, "weight": 1 }] }))
            .unwrap_err();
        assert!(err.contains("Entry 0"));
        assert!(err.contains("original_url"));
    }

    #[test]
    fn test_weight_zero_is_invalid() {
        let body = json!({ "urls": [{ "original_url": "https://example.com", "weight": 0 }] });
        assert!(validate_body(&body).is_err());
    }

    #[test]
    fn test_weight_negative_is_invalid() {
        let body = json!({ "urls": [{ "original_url": "https://example.com", "weight": -1 }] });
        assert!(validate_body(&body).is_err());
    }

    #[test]
    fn test_weight_string_is_invalid() {
        let body = json!({ "urls": [{ "original_url": "https://example.com", "weight": "high" }] });
        let err = validate_body(&body).unwrap_err();
        assert_eq!(
            err,
            "Entry 0 has an invalid weight (must be a positive number)"
        );
    }

    #[test]
    fn test_weight_bool_is_invalid() {
        let body = json!({ "urls": [{ "original_url": "https://example.com", "weight": true }] });
        assert!(validate_body(&body).is_err());
    }

    #[test]
    fn test_weight_positive_float_is_valid() {
        let body = json!({ "urls": [{ "original_url": "https://example.com", "weight": 0.5 }] });
        assert!(validate_body(&body).is_ok());
    }

    #[test]
    fn test_second_entry_invalid_reports_index_one() {
        let body = json!({
            "urls": [
                { "original_url": "https://a.com", "weight": 1 },
                { "original_url": "https://b.com", "weight": -5 }
            ]
        });
        let err = validate_body(&body).unwrap_err();
        assert!(err.starts_with("Entry 1"));
    }

    #[test]
    fn test_first_failing_entry_wins() {
        let body = json!({
            "urls": [
                { "original_url": "https://a.com", "weight": 1 },
                { "original_url": "https://b.com" },
                { "weight": 3 }
            ]
        });
        assert_eq!(validate_body(&body).unwrap_err(), "Entry 1 is missing 'weight'");
    }

    #[test]
    fn test_build_targets_maps_url_and_adds_visits() {
        let targets = targets_for(json!({
            "urls": [{ "original_url": "https://example.com", "weight": 1 }]
        }));

        assert_eq!(targets[0].url, "https://example.com");
        assert_eq!(targets[0].visits, 0);
        assert_eq!(
            serde_json::to_value(&targets[0]).unwrap(),
            json!({ "url": "https://example.com", "weight": 1, "visits": 0 })
        );
    }

    #[test]
    fn test_build_targets_preserves_order() {
        let targets = targets_for(json!({
            "urls": [
                { "original_url": "https://a.com", "weight": 1 },
                { "original_url": "https://b.com", "weight": 3 },
                { "original_url": "https://c.com", "weight": 2 }
            ]
        }));

        let urls: Vec<&str> = targets.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, ["https://a.com", "https://b.com", "https://c.com"]);
        assert!(targets.iter().all(|t| t.visits == 0));
    }

    #[test]
    fn test_build_targets_preserves_float_weight() {
        let targets = targets_for(json!({
            "urls": [{ "original_url": "https://example.com", "weight": 0.5 }]
        }));

        assert_eq!(serde_json::to_value(&targets[0].weight).unwrap(), json!(0.5));
    }

    #[test]
    fn test_build_targets_drops_original_url_key() {
        let targets = targets_for(json!({
            "urls": [{ "original_url": "https://example.com", "weight": 1 }]
        }));

        let value = serde_json::to_value(&targets[0]).unwrap();
        assert!(value.get("original_url").is_none());
    }
}
