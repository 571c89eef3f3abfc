//! Input document handling: validation, subject extraction, context lists.

use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Context URI for the engine's own vocabulary.
pub const CONTEXT_CORE: &str = "https://veristamp.dev/ns/v1";

/// Context URI for data-integrity proof terms.
pub const CONTEXT_DATA_INTEGRITY: &str = "https://w3id.org/security/data-integrity/v2";

/// Context URI for anchor receipt terms.
pub const CONTEXT_ANCHOR: &str = "https://veristamp.dev/ns/anchor/v1";

/// Check that a caller-supplied document is suitable for fingerprinting.
///
/// The document must be a JSON object with at least one member. The content
/// itself is opaque; it is hashed, never interpreted.
pub fn validate_document(document: &Value) -> Result<&Map<String, Value>> {
    let map = document
        .as_object()
        .ok_or_else(|| CoreError::InvalidDocument("expected a JSON object".to_string()))?;
    if map.is_empty() {
        return Err(CoreError::InvalidDocument(
            "document has no members".to_string(),
        ));
    }
    Ok(map)
}

/// Extract the document's own identifier for correlation.
///
/// Prefers `@id`, falls back to `id`; only non-empty string members count.
pub fn subject_reference(document: &Value) -> Option<String> {
    let map = document.as_object()?;
    for key in ["@id", "id"] {
        if let Some(Value::String(s)) = map.get(key) {
            if !s.is_empty() {
                return Some(s.clone());
            }
        }
    }
    None
}

/// An ordered, de-duplicating list of `@context` entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextList(Vec<Value>);

impl ContextList {
    /// An empty context list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read back a rendered `@context` value (bare entry or array).
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => {
                let mut list = Self::new();
                for item in items {
                    list.push(item.clone());
                }
                list
            }
            other => Self(vec![other.clone()]),
        }
    }

    /// Append an entry unless an equal one is already present.
    pub fn push(&mut self, entry: Value) {
        if !self.0.contains(&entry) {
            self.0.push(entry);
        }
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, entry: impl Into<Value>) -> Self {
        self.push(entry.into());
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no entries are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as an `@context` value: a bare entry when there is exactly
    /// one, an array otherwise.
    pub fn to_value(&self) -> Value {
        match self.0.as_slice() {
            [single] => single.clone(),
            entries => Value::Array(entries.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_rejects_non_objects() {
        assert!(validate_document(&json!("a string")).is_err());
        assert!(validate_document(&json!(42)).is_err());
        assert!(validate_document(&json!([1, 2])).is_err());
        assert!(validate_document(&json!(null)).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_object() {
        assert!(validate_document(&json!({})).is_err());
    }

    #[test]
    fn test_validate_accepts_object() {
        let doc = json!({"type": "Person", "name": "John Smith"});
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_subject_reference_prefers_at_id() {
        let doc = json!({"@id": "urn:a", "id": "urn:b"});
        assert_eq!(subject_reference(&doc), Some("urn:a".to_string()));
    }

    #[test]
    fn test_subject_reference_falls_back_to_id() {
        let doc = json!({"id": "123", "name": "x"});
        assert_eq!(subject_reference(&doc), Some("123".to_string()));
    }

    #[test]
    fn test_subject_reference_ignores_non_strings() {
        assert_eq!(subject_reference(&json!({"id": 7})), None);
        assert_eq!(subject_reference(&json!({"id": ""})), None);
        assert_eq!(subject_reference(&json!({"name": "x"})), None);
    }

    #[test]
    fn test_context_list_deduplicates_preserving_order() {
        let list = ContextList::new()
            .with(CONTEXT_CORE)
            .with(CONTEXT_DATA_INTEGRITY)
            .with(CONTEXT_CORE);
        assert_eq!(list.to_value(), json!([CONTEXT_CORE, CONTEXT_DATA_INTEGRITY]));
    }

    #[test]
    fn test_context_list_single_entry_stays_bare() {
        let list = ContextList::new().with(CONTEXT_CORE);
        assert_eq!(list.to_value(), json!(CONTEXT_CORE));
    }

    #[test]
    fn test_context_list_from_value_roundtrip() {
        let rendered = json!([CONTEXT_CORE, CONTEXT_ANCHOR]);
        let list = ContextList::from_value(&rendered);
        assert_eq!(list.len(), 2);
        assert_eq!(list.to_value(), rendered);

        let bare = json!(CONTEXT_CORE);
        assert_eq!(ContextList::from_value(&bare).to_value(), bare);
    }
}
