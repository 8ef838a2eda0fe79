//! Structural validation of raw PDL documents.
//!
//! The validator works on an untyped `serde_yaml::Value` and makes no
//! assumption that the input resembles a PDL document at all. Every check
//! runs; violations accumulate instead of short-circuiting, so a single pass
//! reports every structural problem in the file. Each violation names the
//! offending path (e.g. `entities[2].id`).

use serde_yaml::Value;
use std::collections::HashSet;
use std::fmt;

/// A single structural violation found in a PDL document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Path to the offending value, e.g. `entities[2].id`.
    pub path: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl SchemaViolation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaViolation {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl std::error::Error for SchemaViolation {}

/// Validate a raw document against the PDL structure rules.
///
/// Returns every violation found, in document order. An empty vector means
/// the document is structurally valid. A root that is not a mapping is
/// reported as a single violation rather than a panic.
pub fn validate_document(document: &Value) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();

    if !document.is_mapping() {
        violations.push(SchemaViolation::new("$", "document root must be a mapping"));
        return violations;
    }

    check_scenario(document, &mut violations);
    check_id_sequence(document, "entities", "entity", true, &mut violations);
    check_id_sequence(document, "events", "event", false, &mut violations);

    violations
}

fn check_scenario(root: &Value, violations: &mut Vec<SchemaViolation>) {
    let scenario = match root.get("scenario") {
        Some(value) if value.is_mapping() => value,
        _ => {
            violations.push(SchemaViolation::new("scenario", "missing or not a mapping"));
            return;
        }
    };

    match scenario.get("id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => {}
        _ => violations.push(SchemaViolation::new(
            "scenario.id",
            "must be a non-empty string",
        )),
    }
}

/// Check a sequence of `{id: ...}` records under `key`.
///
/// `required` distinguishes `entities` (must be present) from `events`
/// (optional; absent or explicit null is fine, anything else must be a
/// sequence). `noun` is the singular form used in duplicate-id messages.
/// Duplicate ids within the sequence are reported per occurrence.
fn check_id_sequence(
    root: &Value,
    key: &str,
    noun: &str,
    required: bool,
    violations: &mut Vec<SchemaViolation>,
) {
    let items = match root.get(key) {
        Some(Value::Sequence(items)) => items,
        Some(Value::Null) | None if !required => return,
        Some(_) if !required => {
            violations.push(SchemaViolation::new(key, "must be a sequence when present"));
            return;
        }
        _ => {
            violations.push(SchemaViolation::new(key, "missing or not a sequence"));
            return;
        }
    };

    let mut seen = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        if !item.is_mapping() {
            violations.push(SchemaViolation::new(
                format!("{key}[{index}]"),
                "must be a mapping",
            ));
            continue;
        }

        let id = match item.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                violations.push(SchemaViolation::new(
                    format!("{key}[{index}].id"),
                    "must be a non-empty string",
                ));
                continue;
            }
        };

        if !seen.insert(id.to_string()) {
            violations.push(SchemaViolation::new(
                format!("{key}[{index}].id"),
                format!("duplicate {noun} id '{id}'"),
            ));
        }
    }
}
