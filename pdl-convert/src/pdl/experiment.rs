//! Typed model of the generated experiment document.
//!
//! Mirrors the run-configuration schema of the downstream orchestration
//! platform. Field order matters for downstream diffing, so param blocks use
//! `serde_yaml::Mapping` (insertion-ordered) rather than sorted maps, and
//! struct fields serialize in declaration order.

use serde::Serialize;
use serde_yaml::Mapping;

/// Schema version of the target platform's run configuration.
pub const SCHEMA_VERSION: &str = "3.4.1";

/// A named component with an opaque parameter block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRef {
    pub name: String,
    pub params: Mapping,
}

impl ComponentRef {
    /// Reference with an empty parameter block.
    pub fn bare(name: impl Into<String>) -> Self {
        ComponentRef {
            name: name.into(),
            params: Mapping::new(),
        }
    }
}

/// The simulation environment entry, keyed by its uid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentRef {
    pub name: String,
    pub uid: String,
    pub params: Mapping,
}

/// Environment plus the reward component evaluated against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentBinding {
    pub environment: EnvironmentRef,
    pub reward: ComponentRef,
}

/// One agent: control components plus its sensor/actuator wiring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSpec {
    pub name: String,
    pub brain: ComponentRef,
    pub muscle: ComponentRef,
    pub objective: ComponentRef,
    pub sensors: Vec<String>,
    pub actuators: Vec<String>,
}

/// Simulation controller and its termination conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub name: String,
    pub conditions: Vec<ComponentRef>,
}

/// Per-phase run control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseConfig {
    pub mode: String,
    pub worker: u64,
    pub episodes: i64,
}

/// The single training phase emitted by the converter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingPhase {
    pub environments: Vec<EnvironmentBinding>,
    pub agents: Vec<AgentSpec>,
    pub simulation: Simulation,
    pub phase_config: PhaseConfig,
}

/// Schedule entry wrapping the phase under its schema key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulePhase {
    pub phase_train: TrainingPhase,
}

/// Run-governor configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub condition: ComponentRef,
}

/// A complete experiment run configuration, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentDocument {
    pub uid: String,
    pub seed: i64,
    pub version: String,
    pub schedule: Vec<SchedulePhase>,
    pub run_config: RunConfig,
}

impl ExperimentDocument {
    /// Serialize to YAML, preserving construction order of all keys.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
