//! (De)serialization between a content-block document and its single stored
//! text column, plus the comma-joined category-set codec.

use std::collections::BTreeSet;

use tracing::warn;

use crate::domain::blocks::ContentBlock;
use crate::domain::error::DomainError;

/// Encode a document as JSON text. Succeeds for any structurally valid
/// document; no semantic validation happens here.
pub fn serialize_document(document: &[ContentBlock]) -> Result<String, DomainError> {
    serde_json::to_string(document)
        .map_err(|err| DomainError::invariant(format!("document failed to serialize: {err}")))
}

/// Decode a stored document, failing soft: malformed text yields the empty
/// document so one corrupted row cannot take down a whole listing page. The
/// failure is logged and counted, never surfaced.
pub fn deserialize_document(raw: &str) -> Vec<ContentBlock> {
    match serde_json::from_str(raw) {
        Ok(document) => document,
        Err(err) => {
            metrics::counter!("stanza_document_parse_failure_total").increment(1);
            warn!(
                target = "stanza::domain::document",
                error = %err,
                "stored document is malformed, treating as empty"
            );
            Vec::new()
        }
    }
}

/// Split a comma-joined category column into a set. Empty segments are
/// discarded; `None` and empty input yield the empty set.
pub fn parse_categories(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Inverse of [`parse_categories`]: `None` when the set is empty. Category
/// slugs are `[a-z0-9-]+` by construction, so the comma delimiter is safe.
pub fn join_categories(categories: &BTreeSet<String>) -> Option<String> {
    if categories.is_empty() {
        None
    } else {
        Some(categories.iter().cloned().collect::<Vec<_>>().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blocks::{BlockKind, ListStyle};

    #[test]
    fn document_round_trips() {
        let document = vec![
            ContentBlock::new(
                "b1",
                BlockKind::Heading {
                    level: 2,
                    content: "Setup".to_string(),
                },
            ),
            ContentBlock::new(
                "b2",
                BlockKind::List {
                    style: ListStyle::Unordered,
                    items: vec!["clone".to_string(), "build".to_string()],
                },
            ),
            ContentBlock::new("b3", BlockKind::Divider),
        ];

        let stored = serialize_document(&document).expect("serialize");
        assert_eq!(deserialize_document(&stored), document);
    }

    #[test]
    fn malformed_text_deserializes_to_empty_document() {
        assert!(deserialize_document("{not valid json").is_empty());
        assert!(deserialize_document("").is_empty());
        assert!(deserialize_document("[{\"id\":\"x\",\"type\":\"nosuch\"}]").is_empty());
    }

    #[test]
    fn parse_categories_drops_empty_segments() {
        let parsed = parse_categories(Some("tutorial,guides,"));
        let expected: BTreeSet<String> =
            ["tutorial".to_string(), "guides".to_string()].into_iter().collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_categories_handles_missing_input() {
        assert!(parse_categories(None).is_empty());
        assert!(parse_categories(Some("")).is_empty());
        assert!(parse_categories(Some(",,,")).is_empty());
    }

    #[test]
    fn join_categories_is_the_inverse_encoding() {
        let set: BTreeSet<String> =
            ["rust".to_string(), "tutorial".to_string()].into_iter().collect();
        let joined = join_categories(&set).expect("non-empty");
        assert_eq!(parse_categories(Some(&joined)), set);
        assert_eq!(join_categories(&BTreeSet::new()), None);
    }
}
