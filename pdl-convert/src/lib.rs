//! Validation and conversion core for PDL scenario documents.
//!
//! A PDL document describes a provider-grid scenario (entities, events). This
//! crate validates the raw YAML structure and maps a validated document into
//! an experiment run configuration understood by the downstream adversarial-RL
//! orchestration platform. File discovery and (de)serialization helpers live
//! at the edges; the conversion itself is a pure function.

pub mod pdl;

pub use pdl::batch::{convert_all, Outcome};
pub use pdl::document::PdlDocument;
pub use pdl::experiment::ExperimentDocument;
pub use pdl::loader::{discover_pdl_files, load_pdl_file, scenario_name, LoaderError};
pub use pdl::mapper::{convert, ConvertError};
pub use pdl::options::ConvertOptions;
pub use pdl::profiles::{known_profiles, resolve_profile, InvalidProfile, ProfileComponents};
pub use pdl::validator::{validate_document, SchemaViolation};
