//! PDL scenario conversion pipeline.
//!
//! The pipeline runs in three stages:
//!
//! 1. [`validator`] checks a raw `serde_yaml::Value` against the PDL
//!    structure rules, accumulating every violation it finds.
//! 2. [`document::PdlDocument`] is the validated view; it can only be
//!    constructed through validation, so later stages take conformance
//!    for granted by type.
//! 3. [`mapper::convert`] maps a validated document plus
//!    [`options::ConvertOptions`] into an [`experiment::ExperimentDocument`].
//!
//! [`batch`] drives the pipeline over many inputs, isolating failures per
//! input. [`loader`] holds the file-boundary helpers (YAML reading, scenario
//! naming, directory scans); nothing inside `mapper` touches the filesystem.

pub mod batch;
pub mod document;
pub mod experiment;
pub mod loader;
pub mod mapper;
pub mod options;
pub mod profiles;
pub mod validator;
