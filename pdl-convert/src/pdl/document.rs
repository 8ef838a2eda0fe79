//! Validated view of a PDL document.

use serde_yaml::Value;

use super::validator::{validate_document, SchemaViolation};

/// A PDL document that has passed structural validation.
///
/// The only way to obtain one is [`PdlDocument::from_value`], which runs the
/// validator first. Downstream code (the mapper in particular) can therefore
/// rely on the structure rules by type instead of re-checking them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdlDocument {
    source: String,
    scenario_id: String,
    entity_ids: Vec<String>,
    event_ids: Vec<String>,
}

impl PdlDocument {
    /// Validate `value` and build the typed view.
    ///
    /// `source` identifies where the document came from (a file path, or any
    /// caller-chosen label for in-memory documents); it is carried verbatim
    /// into the generated experiment configuration.
    pub fn from_value(source: impl Into<String>, value: &Value) -> Result<Self, Vec<SchemaViolation>> {
        let violations = validate_document(value);
        if !violations.is_empty() {
            return Err(violations);
        }

        // Safe to index freely now; the validator guaranteed the shape.
        let scenario_id = value
            .get("scenario")
            .and_then(|s| s.get("id"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(PdlDocument {
            source: source.into(),
            scenario_id,
            entity_ids: record_ids(value.get("entities")),
            event_ids: record_ids(value.get("events")),
        })
    }

    /// Parse YAML text and validate it in one step.
    pub fn from_str(source: impl Into<String>, text: &str) -> Result<Self, Vec<SchemaViolation>> {
        let value: Value = match serde_yaml::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                return Err(vec![SchemaViolation {
                    path: "$".to_string(),
                    message: format!("not valid YAML: {err}"),
                }])
            }
        };
        Self::from_value(source, &value)
    }

    /// Where this document came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The scenario identifier (`scenario.id`).
    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    /// Entity ids, in document order.
    pub fn entity_ids(&self) -> &[String] {
        &self.entity_ids
    }

    /// Event ids, in document order. Empty when the document has no `events`.
    pub fn event_ids(&self) -> &[String] {
        &self.event_ids
    }
}

fn record_ids(records: Option<&Value>) -> Vec<String> {
    records
        .and_then(Value::as_sequence)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("id"))
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document_exposes_ids_in_order() {
        let doc = PdlDocument::from_str(
            "grid.pdl.yaml",
            "scenario: {id: grid}\n\
             entities: [{id: plant}, {id: substation}]\n\
             events: [{id: storm}]\n",
        )
        .expect("document should validate");

        assert_eq!(doc.source(), "grid.pdl.yaml");
        assert_eq!(doc.scenario_id(), "grid");
        assert_eq!(doc.entity_ids(), ["plant", "substation"]);
        assert_eq!(doc.event_ids(), ["storm"]);
    }

    #[test]
    fn test_missing_events_yield_empty_ids() {
        let doc = PdlDocument::from_str("x", "scenario: {id: s}\nentities: [{id: e1}]\n")
            .expect("document should validate");
        assert!(doc.event_ids().is_empty());
    }

    #[test]
    fn test_invalid_document_is_rejected_with_violations() {
        let err = PdlDocument::from_str("x", "scenario: {}\nentities: [{id: e1}]\n")
            .expect_err("missing scenario.id should fail");
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].path, "scenario.id");
    }

    #[test]
    fn test_unparseable_yaml_is_a_violation_not_a_panic() {
        let err = PdlDocument::from_str("x", "scenario: {id: [unclosed\n")
            .expect_err("bad YAML should fail");
        assert_eq!(err[0].path, "$");
        assert!(err[0].message.contains("not valid YAML"));
    }
}
