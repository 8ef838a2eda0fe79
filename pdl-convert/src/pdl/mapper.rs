//! Mapping from a validated PDL document to an experiment document.
//!
//! `convert` is a pure function: no filesystem, no clock, no entropy. The
//! same `(document, options)` pair always produces a structurally identical
//! [`ExperimentDocument`], so serialized output is byte-stable and downstream
//! tooling diffs generated configurations.

use serde_yaml::{Mapping, Value};
use std::fmt;

use super::document::PdlDocument;
use super::experiment::{
    AgentSpec, ComponentRef, EnvironmentBinding, EnvironmentRef, ExperimentDocument, PhaseConfig,
    RunConfig, SchedulePhase, Simulation, TrainingPhase, SCHEMA_VERSION,
};
use super::options::ConvertOptions;
use super::profiles::{
    resolve_profile, InvalidProfile, ProfileComponents, ATTACKER_CHECKPOINT, DEFENDER_CHECKPOINT,
};

/// Default simulation environment implementation. Opaque passthrough
/// constant, never derived from PDL content.
pub const ENVIRONMENT_IMPL: &str = "provider_sim.env.environment:ProviderEnvironment";

const DUMMY_REWARD: &str = "palaestrai.agent.dummy_objective:DummyObjective";
const ATTACKER_OBJECTIVE: &str = "provider_sim.env.objectives:AttackerObjective";
const DEFENDER_OBJECTIVE: &str = "provider_sim.env.objectives:DefenderObjective";
const SIM_CONTROLLER: &str = "palaestrai.simulation.vanilla_sim_controller:VanillaSimController";
const SIM_TERMINATION: &str =
    "palaestrai.simulation.vanilla_simcontroller_termination_condition:VanillaSimControllerTerminationCondition";
const GOVERNOR_TERMINATION: &str =
    "palaestrai.experiment.vanilla_rungovernor_termination_condition:VanillaRunGovernorTerminationCondition";

/// Per-entity observation channels exposed by the simulation environment.
const ENTITY_CHANNELS: [&str; 4] = ["supply", "demand", "price", "health"];

/// Error produced when conversion preconditions fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// The requested profile is not in the registry.
    InvalidProfile(InvalidProfile),
    /// A supplied parameter value is out of range or malformed.
    InvalidParameter { name: &'static str, message: String },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InvalidProfile(err) => write!(f, "{err}"),
            ConvertError::InvalidParameter { name, message } => {
                write!(f, "invalid parameter {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<InvalidProfile> for ConvertError {
    fn from(err: InvalidProfile) -> Self {
        ConvertError::InvalidProfile(err)
    }
}

/// Convert a validated PDL document into an experiment document.
///
/// Fails with [`ConvertError`] when a parameter is invalid or the profile is
/// unknown; a failed conversion never yields a partially built document.
pub fn convert(
    document: &PdlDocument,
    options: &ConvertOptions,
) -> Result<ExperimentDocument, ConvertError> {
    check_options(options)?;
    let profile = resolve_profile(&options.profile)?;

    let sensors = sensor_ids(&options.environment_uid, document);
    let actuators = |role: &str| actuator_ids(&options.environment_uid, document, role);

    let n_obs = sensors.len() as u64;
    let n_act = document.entity_ids().len() as u64;

    let agents = vec![
        agent(
            "attacker",
            profile,
            ATTACKER_CHECKPOINT,
            ATTACKER_OBJECTIVE,
            "reward.attacker",
            options.attacker_budget,
            n_obs,
            n_act,
            sensors.clone(),
            actuators("attacker"),
        ),
        agent(
            "defender",
            profile,
            DEFENDER_CHECKPOINT,
            DEFENDER_OBJECTIVE,
            "reward.defender",
            options.defender_budget,
            n_obs,
            n_act,
            sensors,
            actuators("defender"),
        ),
    ];

    let mut environment_params = Mapping::new();
    environment_params.insert(
        Value::from("pdl_source"),
        Value::from(document.source()),
    );
    environment_params.insert(Value::from("max_ticks"), Value::from(options.max_ticks));

    let mut reward_params = Mapping::new();
    reward_params.insert(Value::from("params"), Value::Mapping(Mapping::new()));

    let phase = TrainingPhase {
        environments: vec![EnvironmentBinding {
            environment: EnvironmentRef {
                name: ENVIRONMENT_IMPL.to_string(),
                uid: options.environment_uid.clone(),
                params: environment_params,
            },
            reward: ComponentRef {
                name: DUMMY_REWARD.to_string(),
                params: reward_params,
            },
        }],
        agents,
        simulation: Simulation {
            name: SIM_CONTROLLER.to_string(),
            conditions: vec![ComponentRef::bare(SIM_TERMINATION)],
        },
        phase_config: PhaseConfig {
            mode: "train".to_string(),
            worker: 1,
            episodes: options.episodes,
        },
    };

    Ok(ExperimentDocument {
        uid: format!(
            "{}-{}",
            options.experiment_uid_prefix,
            document.scenario_id()
        ),
        seed: options.seed,
        version: SCHEMA_VERSION.to_string(),
        schedule: vec![SchedulePhase { phase_train: phase }],
        run_config: RunConfig {
            condition: ComponentRef::bare(GOVERNOR_TERMINATION),
        },
    })
}

fn check_options(options: &ConvertOptions) -> Result<(), ConvertError> {
    if options.max_ticks < 1 {
        return Err(ConvertError::InvalidParameter {
            name: "max-ticks",
            message: format!("must be positive, got {}", options.max_ticks),
        });
    }
    if options.episodes < 1 {
        return Err(ConvertError::InvalidParameter {
            name: "episodes",
            message: format!("must be positive, got {}", options.episodes),
        });
    }
    if options.environment_uid.trim().is_empty() {
        return Err(ConvertError::InvalidParameter {
            name: "environment-uid",
            message: "must be a non-empty string".to_string(),
        });
    }
    if options.experiment_uid_prefix.trim().is_empty() {
        return Err(ConvertError::InvalidParameter {
            name: "experiment-uid-prefix",
            message: "must be a non-empty string".to_string(),
        });
    }
    Ok(())
}

/// Sensor ids exposed to both agents: four channels per entity, one activity
/// flag per event, plus the global tick counter.
fn sensor_ids(environment_uid: &str, document: &PdlDocument) -> Vec<String> {
    let mut sensors = Vec::new();
    for entity_id in document.entity_ids() {
        for channel in ENTITY_CHANNELS {
            sensors.push(format!("{environment_uid}.entity.{entity_id}.{channel}"));
        }
    }
    for event_id in document.event_ids() {
        sensors.push(format!("{environment_uid}.event.{event_id}.active"));
    }
    sensors.push(format!("{environment_uid}.sim.tick"));
    sensors
}

fn actuator_ids(environment_uid: &str, document: &PdlDocument, role: &str) -> Vec<String> {
    document
        .entity_ids()
        .iter()
        .map(|entity_id| format!("{environment_uid}.{role}.{entity_id}"))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn agent(
    name: &str,
    profile: &ProfileComponents,
    checkpoint: &str,
    objective: &str,
    reward_id: &str,
    budget: f64,
    n_obs: u64,
    n_act: u64,
    sensors: Vec<String>,
    actuators: Vec<String>,
) -> AgentSpec {
    let (brain_params, muscle_params) = match profile.hyperparams {
        Some(hp) => {
            let mut brain = Mapping::new();
            brain.insert(Value::from("checkpoint_path"), Value::from(checkpoint));
            brain.insert(Value::from("lr"), Value::from(hp.lr));
            brain.insert(Value::from("gamma"), Value::from(hp.gamma));
            brain.insert(Value::from("gae_lambda"), Value::from(hp.gae_lambda));
            brain.insert(Value::from("clip_eps"), Value::from(hp.clip_eps));
            brain.insert(Value::from("entropy_coef"), Value::from(hp.entropy_coef));
            brain.insert(Value::from("value_coef"), Value::from(hp.value_coef));
            brain.insert(Value::from("ppo_epochs"), Value::from(hp.ppo_epochs));
            brain.insert(Value::from("n_obs"), Value::from(n_obs));
            brain.insert(Value::from("n_act"), Value::from(n_act));

            let mut muscle = Mapping::new();
            muscle.insert(Value::from("checkpoint_path"), Value::from(checkpoint));
            muscle.insert(Value::from("n_obs"), Value::from(n_obs));
            muscle.insert(Value::from("n_act"), Value::from(n_act));
            muscle.insert(Value::from("budget"), Value::from(budget));

            (brain, muscle)
        }
        None => (Mapping::new(), Mapping::new()),
    };

    let mut objective_params = Mapping::new();
    objective_params.insert(Value::from("reward_id"), Value::from(reward_id));

    AgentSpec {
        name: name.to_string(),
        brain: ComponentRef {
            name: profile.brain.to_string(),
            params: brain_params,
        },
        muscle: ComponentRef {
            name: profile.muscle.to_string(),
            params: muscle_params,
        },
        objective: ComponentRef {
            name: objective.to_string(),
            params: objective_params,
        },
        sensors,
        actuators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> PdlDocument {
        PdlDocument::from_str("minimal.pdl.yaml", "scenario: {id: minimal}\nentities: [{id: e1}]\n")
            .expect("minimal document validates")
    }

    #[test]
    fn test_defaults_reflected_in_output() {
        let doc = convert(&minimal(), &ConvertOptions::default()).expect("conversion succeeds");

        assert_eq!(doc.uid, "provider-minimal");
        assert_eq!(doc.seed, 42);
        assert_eq!(doc.version, SCHEMA_VERSION);

        let phase = &doc.schedule[0].phase_train;
        let environment = &phase.environments[0].environment;
        assert_eq!(environment.uid, "provider_env");
        assert_eq!(environment.name, ENVIRONMENT_IMPL);
        assert_eq!(
            environment.params.get("max_ticks"),
            Some(&Value::from(365))
        );
        assert_eq!(
            environment.params.get("pdl_source"),
            Some(&Value::from("minimal.pdl.yaml"))
        );
        assert_eq!(phase.phase_config.episodes, 1);
        assert_eq!(phase.phase_config.mode, "train");
    }

    #[test]
    fn test_dummy_profile_components() {
        let doc = convert(&minimal(), &ConvertOptions::default()).expect("conversion succeeds");
        for agent in &doc.schedule[0].phase_train.agents {
            assert_eq!(agent.brain.name, "palaestrai.agent.dummy_brain:DummyBrain");
            assert_eq!(
                agent.muscle.name,
                "palaestrai.agent.dummy_muscle:DummyMuscle"
            );
            assert!(agent.brain.params.is_empty());
            assert!(agent.muscle.params.is_empty());
        }
    }

    #[test]
    fn test_ppo_profile_components() {
        let options = ConvertOptions {
            profile: "ppo".to_string(),
            ..ConvertOptions::default()
        };
        let doc = convert(&minimal(), &options).expect("conversion succeeds");

        // Same uid/env/run-control as dummy; only the control components change.
        assert_eq!(doc.uid, "provider-minimal");

        let agents = &doc.schedule[0].phase_train.agents;
        let attacker = &agents[0];
        assert_eq!(attacker.brain.name, "provider_sim.rl.ppo_brain:PPOBrain");
        assert_eq!(attacker.muscle.name, "provider_sim.rl.ppo_muscle:PPOMuscle");
        assert_eq!(
            attacker.brain.params.get("checkpoint_path"),
            Some(&Value::from("checkpoints/attacker.pt"))
        );
        // 1 entity -> 4 channel sensors + sim.tick
        assert_eq!(
            attacker.brain.params.get("n_obs"),
            Some(&Value::from(5u64))
        );
        assert_eq!(
            attacker.muscle.params.get("budget"),
            Some(&Value::from(0.8))
        );
        let defender = &agents[1];
        assert_eq!(
            defender.muscle.params.get("checkpoint_path"),
            Some(&Value::from("checkpoints/defender.pt"))
        );
        assert_eq!(
            defender.muscle.params.get("budget"),
            Some(&Value::from(0.4))
        );
    }

    #[test]
    fn test_sensor_and_actuator_wiring() {
        let pdl = PdlDocument::from_str(
            "grid",
            "scenario: {id: grid}\n\
             entities: [{id: plant}, {id: sub}]\n\
             events: [{id: storm}]\n",
        )
        .expect("document validates");
        let doc = convert(&pdl, &ConvertOptions::default()).expect("conversion succeeds");

        let attacker = &doc.schedule[0].phase_train.agents[0];
        assert_eq!(attacker.sensors.len(), 2 * 4 + 1 + 1);
        assert_eq!(attacker.sensors[0], "provider_env.entity.plant.supply");
        assert_eq!(attacker.sensors[8], "provider_env.event.storm.active");
        assert_eq!(attacker.sensors.last().unwrap(), "provider_env.sim.tick");
        assert_eq!(
            attacker.actuators,
            vec!["provider_env.attacker.plant", "provider_env.attacker.sub"]
        );
        let defender = &doc.schedule[0].phase_train.agents[1];
        assert_eq!(defender.sensors, attacker.sensors);
        assert_eq!(
            defender.actuators,
            vec!["provider_env.defender.plant", "provider_env.defender.sub"]
        );
    }

    #[test]
    fn test_unknown_profile_fails() {
        let options = ConvertOptions {
            profile: "sac".to_string(),
            ..ConvertOptions::default()
        };
        match convert(&minimal(), &options) {
            Err(ConvertError::InvalidProfile(err)) => assert_eq!(err.name, "sac"),
            other => panic!("expected InvalidProfile, got {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_parameters_fail() {
        for (field, options) in [
            (
                "max-ticks",
                ConvertOptions {
                    max_ticks: 0,
                    ..ConvertOptions::default()
                },
            ),
            (
                "episodes",
                ConvertOptions {
                    episodes: -3,
                    ..ConvertOptions::default()
                },
            ),
        ] {
            match convert(&minimal(), &options) {
                Err(ConvertError::InvalidParameter { name, .. }) => assert_eq!(name, field),
                other => panic!("expected InvalidParameter for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_uid_parameters_fail() {
        let options = ConvertOptions {
            environment_uid: "  ".to_string(),
            ..ConvertOptions::default()
        };
        assert!(matches!(
            convert(&minimal(), &options),
            Err(ConvertError::InvalidParameter {
                name: "environment-uid",
                ..
            })
        ));
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let doc = minimal();
        let options = ConvertOptions {
            profile: "ppo".to_string(),
            ..ConvertOptions::default()
        };
        let first = convert(&doc, &options).expect("conversion succeeds");
        let second = convert(&doc, &options).expect("conversion succeeds");
        assert_eq!(first, second);
        assert_eq!(
            first.to_yaml().expect("serializes"),
            second.to_yaml().expect("serializes")
        );
    }
}
