//! Profile registry: named bundles of control-component references.
//!
//! A profile decides which brain/muscle implementations the generated
//! experiment references. The references are fully-qualified platform paths,
//! opaque to this crate: they are copied into the output, never inspected
//! or loaded. The table is data, not control flow: adding a profile is a new
//! entry here, no new branches anywhere else.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;

/// Relative checkpoint path for the attacker agent (PPO profile).
pub const ATTACKER_CHECKPOINT: &str = "checkpoints/attacker.pt";
/// Relative checkpoint path for the defender agent (PPO profile).
pub const DEFENDER_CHECKPOINT: &str = "checkpoints/defender.pt";

/// Fixed PPO hyperparameters emitted with the `ppo` profile's brain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PpoHyperparams {
    pub lr: f64,
    pub gamma: f64,
    pub gae_lambda: f64,
    pub clip_eps: f64,
    pub entropy_coef: f64,
    pub value_coef: f64,
    pub ppo_epochs: u64,
}

const PPO_DEFAULTS: PpoHyperparams = PpoHyperparams {
    lr: 3e-4,
    gamma: 0.99,
    gae_lambda: 0.95,
    clip_eps: 0.2,
    entropy_coef: 0.01,
    value_coef: 0.5,
    ppo_epochs: 4,
};

/// Component references injected by a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileComponents {
    /// Profile name as registered.
    pub name: &'static str,
    /// Fully-qualified brain implementation reference.
    pub brain: &'static str,
    /// Fully-qualified muscle implementation reference.
    pub muscle: &'static str,
    /// Hyperparameter block for the brain, when the profile carries one.
    pub hyperparams: Option<PpoHyperparams>,
}

static PROFILES: Lazy<BTreeMap<&'static str, ProfileComponents>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "dummy",
            ProfileComponents {
                name: "dummy",
                brain: "palaestrai.agent.dummy_brain:DummyBrain",
                muscle: "palaestrai.agent.dummy_muscle:DummyMuscle",
                hyperparams: None,
            },
        ),
        (
            "ppo",
            ProfileComponents {
                name: "ppo",
                brain: "provider_sim.rl.ppo_brain:PPOBrain",
                muscle: "provider_sim.rl.ppo_muscle:PPOMuscle",
                hyperparams: Some(PPO_DEFAULTS),
            },
        ),
    ])
});

/// Error for a profile name missing from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidProfile {
    /// The name that failed to resolve.
    pub name: String,
}

impl fmt::Display for InvalidProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown profile '{}' (known profiles: {})",
            self.name,
            known_profiles().join(", ")
        )
    }
}

impl std::error::Error for InvalidProfile {}

/// Resolve a profile name against the registry.
pub fn resolve_profile(name: &str) -> Result<&'static ProfileComponents, InvalidProfile> {
    PROFILES.get(name).ok_or_else(|| InvalidProfile {
        name: name.to_string(),
    })
}

/// Registered profile names, sorted.
pub fn known_profiles() -> Vec<&'static str> {
    PROFILES.keys().copied().collect()
}
