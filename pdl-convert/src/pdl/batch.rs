//! Batch conversion: one outcome per input, failures isolated.

use serde_yaml::Value;

use super::document::PdlDocument;
use super::experiment::ExperimentDocument;
use super::mapper::{convert, ConvertError};
use super::options::ConvertOptions;
use super::validator::SchemaViolation;

/// Result of converting one input in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Conversion succeeded; the document is ready to serialize.
    Converted(ExperimentDocument),
    /// The input failed structural validation.
    Invalid(Vec<SchemaViolation>),
    /// The input validated but conversion failed (profile/parameter).
    Failed(ConvertError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Converted(_))
    }
}

/// Convert every input, in input order.
///
/// Returns exactly one `(identifier, Outcome)` pair per input; a bad input is
/// recorded and skipped, never aborting the rest of the batch. Process-level
/// success or failure is the caller's call, derived from the outcomes.
pub fn convert_all<I>(inputs: I, options: &ConvertOptions) -> Vec<(String, Outcome)>
where
    I: IntoIterator<Item = (String, Value)>,
{
    inputs
        .into_iter()
        .map(|(identifier, raw)| {
            let outcome = match PdlDocument::from_value(identifier.clone(), &raw) {
                Err(violations) => Outcome::Invalid(violations),
                Ok(document) => match convert(&document, options) {
                    Ok(experiment) => Outcome::Converted(experiment),
                    Err(err) => Outcome::Failed(err),
                },
            };
            (identifier, outcome)
        })
        .collect()
}
