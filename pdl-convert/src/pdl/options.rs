//! Conversion parameters.

/// Parameters for a conversion run.
///
/// Every field has a default, so the mapper never fails because a parameter
/// is missing, only because a supplied value is invalid (unknown profile,
/// non-positive tick count). The numeric fields stay signed so that
/// out-of-range values reach the mapper and fail with a proper
/// `InvalidParameter` instead of dying at the parsing boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Tick budget handed to the simulation environment.
    pub max_ticks: i64,
    /// Number of training episodes in the generated phase.
    pub episodes: i64,
    /// Seed copied verbatim into the experiment document.
    pub seed: i64,
    /// Uid of the environment section in the output.
    pub environment_uid: String,
    /// Prefix of the generated experiment uid.
    pub experiment_uid_prefix: String,
    /// Profile name resolved against the profile registry.
    pub profile: String,
    /// Action budget for the attacker muscle (PPO profile only).
    pub attacker_budget: f64,
    /// Action budget for the defender muscle (PPO profile only).
    pub defender_budget: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            max_ticks: 365,
            episodes: 1,
            seed: 42,
            environment_uid: "provider_env".to_string(),
            experiment_uid_prefix: "provider".to_string(),
            profile: "dummy".to_string(),
            attacker_budget: 0.8,
            defender_budget: 0.4,
        }
    }
}
