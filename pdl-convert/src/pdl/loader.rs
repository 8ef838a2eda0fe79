//! File-boundary helpers: YAML reading, scenario naming, directory scans.
//!
//! Everything that touches the filesystem lives here; the validator, mapper
//! and batch driver stay pure.

use serde_yaml::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffixes stripped when deriving a scenario name from a file name, longest
/// first so `x.pdl.yaml` becomes `x`, not `x.pdl`.
const PDL_SUFFIXES: [&str; 4] = [".pdl.yaml", ".pdl.yml", ".yaml", ".yml"];

/// Error reading or decoding a PDL file.
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// IO error when reading the file
    Io(String),
    /// The file is not valid YAML
    Yaml(String),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::Io(msg) => write!(f, "IO error: {msg}"),
            LoaderError::Yaml(msg) => write!(f, "YAML error: {msg}"),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for LoaderError {
    fn from(err: serde_yaml::Error) -> Self {
        LoaderError::Yaml(err.to_string())
    }
}

/// Read a file and parse it as YAML.
///
/// Structural checks (including "root must be a mapping") belong to the
/// validator; this only fails on IO or codec problems.
pub fn load_pdl_file(path: impl AsRef<Path>) -> Result<Value, LoaderError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

/// Derive a scenario name from a file name by stripping the PDL suffixes.
/// Other extensions lose their last component (`grid.other` becomes `grid`).
pub fn scenario_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    for suffix in PDL_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or(name)
}

/// List the YAML files in a directory, sorted by file name.
///
/// Matches `*.pdl.yaml`, `*.pdl.yml`, `*.yaml` and `*.yml`. Sorting keeps
/// batch runs deterministic regardless of directory enumeration order.
pub fn discover_pdl_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoaderError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            name.ends_with(".yaml") || name.ends_with(".yml")
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("grid.pdl.yaml", "grid")]
    #[case("grid.pdl.yml", "grid")]
    #[case("grid.yaml", "grid")]
    #[case("grid.yml", "grid")]
    #[case("grid.other", "grid")]
    #[case("grid", "grid")]
    #[case("nested.pdl.pdl.yaml", "nested.pdl")]
    fn test_scenario_name_strips_suffixes(#[case] file: &str, #[case] expected: &str) {
        assert_eq!(scenario_name(Path::new(file)), expected);
    }

    #[test]
    fn test_load_pdl_file_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("scenario.pdl.yaml");
        let mut file = fs::File::create(&path).expect("create file");
        writeln!(file, "scenario: {{id: s}}").expect("write file");

        let value = load_pdl_file(&path).expect("file loads");
        assert_eq!(
            value.get("scenario").and_then(|s| s.get("id")),
            Some(&Value::from("s"))
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_pdl_file("does/not/exist.yaml").expect_err("missing file fails");
        assert!(matches!(err, LoaderError::Io(_)));
    }

    #[test]
    fn test_discover_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().expect("temp dir");
        for name in ["b.yaml", "a.pdl.yaml", "c.yml", "ignore.txt"] {
            fs::File::create(dir.path().join(name)).expect("create file");
        }

        let files = discover_pdl_files(dir.path()).expect("scan succeeds");
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdl.yaml", "b.yaml", "c.yml"]);
    }
}
