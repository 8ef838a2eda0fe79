//! Command-line interface for the PDL experiment converter.
//!
//! Usage:
//!   pdl2arl validate <file>                      - Check a PDL file's structure
//!   pdl2arl convert <file> [options]             - Convert one PDL file
//!   pdl2arl batch-convert <dir> [options]        - Convert every YAML file in a directory
//!
//! Exit codes: 0 success, 1 validation/conversion failure, 2 IO or internal error.

use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgMatches, Command};
use std::fs;
use std::path::{Path, PathBuf};

use pdl_convert::{
    convert, convert_all, discover_pdl_files, known_profiles, load_pdl_file, scenario_name,
    validate_document, ConvertOptions, ExperimentDocument, Outcome, PdlDocument,
};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let matches = build_command().get_matches();
    match matches.subcommand() {
        Some(("validate", sub)) => handle_validate(sub),
        Some(("convert", sub)) => handle_convert(sub),
        Some(("batch-convert", sub)) => handle_batch_convert(sub),
        _ => unreachable!("subcommand is required"),
    }
}

fn build_command() -> Command {
    Command::new("pdl2arl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert PDL scenario YAML into experiment run configurations")
        .subcommand_required(true)
        .subcommand(
            Command::new("validate").about("Validate a PDL YAML file").arg(
                Arg::new("input")
                    .help("Path to the PDL file")
                    .required(true)
                    .index(1),
            ),
        )
        .subcommand(
            with_convert_args(
                Command::new("convert").about("Convert one PDL YAML file").arg(
                    Arg::new("input")
                        .help("Path to the PDL file")
                        .required(true)
                        .index(1),
                ),
            )
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .help("Output YAML path (default: output/<scenario>.arl.<profile>.yaml)"),
            ),
        )
        .subcommand(
            with_convert_args(
                Command::new("batch-convert")
                    .about("Convert every YAML file in a directory")
                    .arg(
                        Arg::new("input-dir")
                            .help("Directory with PDL YAML files")
                            .required(true)
                            .index(1),
                    ),
            )
            .arg(
                Arg::new("output-dir")
                    .long("output-dir")
                    .default_value("output")
                    .help("Directory for generated configurations"),
            ),
        )
}

/// The conversion parameters shared by `convert` and `batch-convert`.
fn with_convert_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("max-ticks")
                .long("max-ticks")
                .default_value("365")
                .value_parser(value_parser!(i64))
                .help("Tick budget for the simulation environment"),
        )
        .arg(
            Arg::new("episodes")
                .long("episodes")
                .default_value("1")
                .value_parser(value_parser!(i64))
                .help("Training episodes"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .default_value("42")
                .value_parser(value_parser!(i64))
                .help("Random seed copied into the configuration"),
        )
        .arg(
            Arg::new("environment-uid")
                .long("environment-uid")
                .default_value("provider_env")
                .help("Uid of the environment section"),
        )
        .arg(
            Arg::new("experiment-uid-prefix")
                .long("experiment-uid-prefix")
                .default_value("provider")
                .help("Prefix of the generated experiment uid"),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .default_value("dummy")
                .value_parser(PossibleValuesParser::new(known_profiles()))
                .help("Control-component profile for the generated configuration"),
        )
        .arg(
            Arg::new("attacker-budget")
                .long("attacker-budget")
                .default_value("0.8")
                .value_parser(value_parser!(f64))
                .help("Action budget for the attacker muscle (ppo profile)"),
        )
        .arg(
            Arg::new("defender-budget")
                .long("defender-budget")
                .default_value("0.4")
                .value_parser(value_parser!(f64))
                .help("Action budget for the defender muscle (ppo profile)"),
        )
}

fn options_from(matches: &ArgMatches) -> ConvertOptions {
    ConvertOptions {
        max_ticks: *matches.get_one::<i64>("max-ticks").expect("has default"),
        episodes: *matches.get_one::<i64>("episodes").expect("has default"),
        seed: *matches.get_one::<i64>("seed").expect("has default"),
        environment_uid: matches
            .get_one::<String>("environment-uid")
            .expect("has default")
            .clone(),
        experiment_uid_prefix: matches
            .get_one::<String>("experiment-uid-prefix")
            .expect("has default")
            .clone(),
        profile: matches
            .get_one::<String>("profile")
            .expect("has default")
            .clone(),
        attacker_budget: *matches
            .get_one::<f64>("attacker-budget")
            .expect("has default"),
        defender_budget: *matches
            .get_one::<f64>("defender-budget")
            .expect("has default"),
    }
}

fn handle_validate(matches: &ArgMatches) -> i32 {
    let input = matches.get_one::<String>("input").expect("input is required");

    let value = match load_pdl_file(input) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Validation failed: {err}");
            return 2;
        }
    };

    let violations = validate_document(&value);
    if !violations.is_empty() {
        eprintln!("PDL is invalid:");
        for violation in &violations {
            eprintln!("- {violation}");
        }
        return 1;
    }

    println!("PDL is valid.");
    0
}

fn handle_convert(matches: &ArgMatches) -> i32 {
    let options = options_from(matches);
    let input = matches.get_one::<String>("input").expect("input is required");
    let input_path = Path::new(input);

    let value = match load_pdl_file(input_path) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Conversion failed: {err}");
            return 2;
        }
    };

    let document = match PdlDocument::from_value(input.as_str(), &value) {
        Ok(document) => document,
        Err(violations) => {
            eprintln!("PDL validation failed for {input}:");
            for violation in &violations {
                eprintln!("- {violation}");
            }
            return 1;
        }
    };

    let experiment = match convert(&document, &options) {
        Ok(experiment) => experiment,
        Err(err) => {
            eprintln!("Conversion failed: {err}");
            return 1;
        }
    };

    let target = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(Path::new("output"), input_path, &options.profile));

    match write_experiment(&target, &experiment) {
        Ok(()) => {
            println!("Written: {}", target.display());
            0
        }
        Err(err) => {
            eprintln!("Failed to write {}: {err}", target.display());
            2
        }
    }
}

fn handle_batch_convert(matches: &ArgMatches) -> i32 {
    let options = options_from(matches);
    let input_dir = Path::new(
        matches
            .get_one::<String>("input-dir")
            .expect("input-dir is required"),
    );
    let output_dir = Path::new(
        matches
            .get_one::<String>("output-dir")
            .expect("has default"),
    );

    if !input_dir.is_dir() {
        eprintln!("Input directory does not exist: {}", input_dir.display());
        return 1;
    }

    let files = match discover_pdl_files(input_dir) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("Batch conversion failed: {err}");
            return 2;
        }
    };
    if files.is_empty() {
        println!("No YAML files found.");
        return 0;
    }

    // Unreadable files are reported up front; everything that parsed goes
    // through the batch driver so each input gets exactly one outcome.
    let mut io_failed = 0usize;
    let mut inputs = Vec::new();
    for path in &files {
        match load_pdl_file(path) {
            Ok(value) => inputs.push((path.display().to_string(), value)),
            Err(err) => {
                io_failed += 1;
                eprintln!("failed {}: {err}", path.display());
            }
        }
    }

    let mut converted = 0usize;
    let mut rejected = 0usize;
    for (identifier, outcome) in convert_all(inputs, &options) {
        match outcome {
            Outcome::Converted(experiment) => {
                let target =
                    default_output_path(output_dir, Path::new(&identifier), &options.profile);
                match write_experiment(&target, &experiment) {
                    Ok(()) => {
                        converted += 1;
                        println!("converted {identifier} -> {}", target.display());
                    }
                    Err(err) => {
                        io_failed += 1;
                        eprintln!("failed {identifier}: {err}");
                    }
                }
            }
            Outcome::Invalid(violations) => {
                rejected += 1;
                eprintln!("failed {identifier}:");
                for violation in &violations {
                    eprintln!("- {violation}");
                }
            }
            Outcome::Failed(err) => {
                rejected += 1;
                eprintln!("failed {identifier}: {err}");
            }
        }
    }

    println!("Converted {converted} of {} files.", files.len());
    if io_failed > 0 {
        2
    } else if rejected > 0 {
        1
    } else {
        0
    }
}

/// `{output_dir}/{scenario}.arl.{profile}.yaml`
fn default_output_path(output_dir: &Path, input: &Path, profile: &str) -> PathBuf {
    output_dir.join(format!("{}.arl.{profile}.yaml", scenario_name(input)))
}

fn write_experiment(target: &Path, experiment: &ExperimentDocument) -> Result<(), String> {
    let yaml = experiment.to_yaml().map_err(|err| err.to_string())?;
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| err.to_string())?;
        }
    }
    fs::write(target, yaml).map_err(|err| err.to_string())
}
