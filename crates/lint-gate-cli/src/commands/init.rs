//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "lint-gate.toml";

const DEFAULT_CONFIG: &str = r#"# lint-gate configuration
#
# Each engine starts from its built-in rule table; entries here replace
# whole rule settings (no deep merge).

[files]
# Glob patterns skipped before any engine sees them
exclude = [
    "**/target/**",
    "**/vendor/**",
]

[engines.ast]
# Treat every file as test code
# envs = ["test"]
# parser_options = { detect_test_paths = true }

[engines.ast.rules]
no-unwrap-expect = ["error", { allow_in_tests = true }]
no-dbg-macro = "error"
# no-print-macro = "warn"
# max-params = ["error", { max = 5 }]

[engines.style.rules]
max-len = ["error", { code = 100 }]
# no-warning-comments = ["warn", { terms = ["todo", "fixme"] }]
# Files the style engine skips, relative to the checked directory
exclude-files = ["**/target/**", "**/generated/**"]
"#;

/// Runs the init command, writing the config into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: lint-gate check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lint_gate_core::Config;
    use lint_gate_engines::{standard, OutputFormat};
    use tempfile::TempDir;

    #[test]
    fn template_is_a_valid_config() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.files.exclude.len(), 2);
        assert!(standard::factory(&config, OutputFormat::Compact)
            .create()
            .is_ok());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        run(dir.path(), false).unwrap();

        let err = run(dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        run(dir.path(), true).unwrap();
        let written = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);
    }
}
