//! Check command implementation.

use anyhow::{Context, Result};
use ignore::overrides::OverrideBuilder;
use lint_gate_core::{check_availability, Availability, Config, FileRecord, HostInfo, PipelineError};
use lint_gate_engines::{standard, OutputFormat};
use semver::Version;
use std::path::{Path, PathBuf};

use super::output;
use crate::config_resolver::ConfigSource;

/// How a check run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No diagnostics.
    Passed,
    /// At least one diagnostic; the summary has been printed.
    Failed,
    /// The pipeline is unavailable on this host; nothing was checked.
    Skipped,
}

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<Outcome> {
    let config = source.load()?;
    let version =
        Version::parse(env!("CARGO_PKG_VERSION")).context("Invalid package version")?;
    check(path, format, exclude, &config, &HostInfo::new("lint-gate", version))
}

fn check(
    path: &Path,
    format: OutputFormat,
    exclude: Vec<String>,
    config: &Config,
    host: &HostInfo,
) -> Result<Outcome> {
    let root = if path.is_file() {
        path.parent().unwrap_or(path)
    } else {
        path
    };
    let config = config.clone().with_base_dir(root);
    let factory = match check_availability(host, || standard::factory(&config, format)) {
        Availability::Available(factory) => factory,
        Availability::Unavailable { .. } => return Ok(Outcome::Skipped),
    };

    let mut patterns = config.files.exclude.clone();
    patterns.extend(exclude);
    let files = discover_files(path, &patterns)?;

    tracing::info!("Checking {} file(s) under {}", files.len(), path.display());

    let records = files
        .iter()
        .map(|file| {
            std::fs::read(file)
                .map(|bytes| FileRecord::buffered(file, bytes))
                .with_context(|| format!("Failed to read {}", file.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let pipeline = factory.create().context("Failed to configure engines")?;

    match pipeline.run(records) {
        Ok(summary) => {
            output::print_success(&summary);
            Ok(Outcome::Passed)
        }
        Err(err @ PipelineError::ValidationFailed { .. }) => {
            output::print_failure(err);
            Ok(Outcome::Failed)
        }
        Err(err) => Err(err).context("Validation aborted"),
    }
}

fn discover_files(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    let mut overrides = OverrideBuilder::new(root);
    for pattern in exclude {
        overrides
            .add(&format!("!{pattern}"))
            .with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
    }
    let overrides = overrides.build().context("Invalid exclude patterns")?;

    let mut builder = ignore::WalkBuilder::new(root);
    builder.hidden(false).git_ignore(true).overrides(overrides);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        dir
    }

    fn host(version: &str) -> HostInfo {
        HostInfo::new("lint-gate", Version::parse(version).unwrap())
    }

    fn check_dir(dir: &Path, exclude: &[&str], version: &str) -> Outcome {
        check_with(dir, exclude, &Config::new(), version)
    }

    fn check_with(dir: &Path, exclude: &[&str], config: &Config, version: &str) -> Outcome {
        let exclude = exclude.iter().map(|s| (*s).to_string()).collect();
        check(dir, OutputFormat::Compact, exclude, config, &host(version)).unwrap()
    }

    #[test]
    fn clean_project_passes() {
        let dir = project(&[("src/lib.rs", "pub fn ok() -> u8 {\n    1\n}\n")]);
        assert_eq!(check_dir(dir.path(), &[], "0.3.0"), Outcome::Passed);
    }

    #[test]
    fn diagnostics_fail_the_check() {
        let dir = project(&[
            ("src/lib.rs", "pub fn ok() -> u8 {\n    1\n}\n"),
            ("src/debug.rs", "pub fn f() {\n    dbg!(1);\n}\n"),
        ]);
        assert_eq!(check_dir(dir.path(), &[], "0.3.0"), Outcome::Failed);
    }

    #[test]
    fn excluded_files_are_not_read() {
        let dir = project(&[
            ("src/lib.rs", "pub fn ok() -> u8 {\n    1\n}\n"),
            ("gen/bad.rs", "fn f() { dbg!(1); }"),
        ]);
        assert_eq!(check_dir(dir.path(), &["gen/**"], "0.3.0"), Outcome::Passed);
    }

    #[test]
    fn exclude_files_are_relative_to_the_checked_root() {
        let dir = project(&[
            ("src/lib.rs", "pub fn ok() -> u8 {\n    1\n}\n"),
            ("src/gen/a.rs", "pub fn a() -> u8 {   \n    1\n}\n"),
        ]);
        let config = Config::parse(
            r#"
[engines.style.rules]
exclude-files = ["src/gen/*.rs"]
"#,
        )
        .unwrap();

        assert_eq!(check_with(dir.path(), &[], &config, "0.3.0"), Outcome::Passed);
        assert_eq!(check_dir(dir.path(), &[], "0.3.0"), Outcome::Failed);
    }

    #[test]
    fn old_hosts_skip_validation() {
        let dir = project(&[("src/debug.rs", "fn f() { dbg!(1); }")]);
        assert_eq!(check_dir(dir.path(), &[], "0.2.9"), Outcome::Skipped);
    }

    #[test]
    fn only_rust_files_are_discovered() {
        let dir = project(&[("src/lib.rs", ""), ("README.md", ""), ("src/a/b.rs", "")]);
        let files = discover_files(dir.path(), &[]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("src/a/b.rs"), PathBuf::from("src/lib.rs")]
        );
    }

    #[test]
    fn invalid_exclude_patterns_are_errors() {
        let dir = project(&[]);
        let err = discover_files(dir.path(), &["src/[".to_string()]).unwrap_err();
        assert!(err.to_string().starts_with("Invalid exclude pattern"));
    }
}
