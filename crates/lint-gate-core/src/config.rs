//! Rule configurations, the configuration merger, and caller options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Enablement level of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Rule disabled.
    Off,
    /// Rule reports warnings.
    Warn,
    /// Rule reports errors.
    Error,
}

impl Level {
    /// Parses a level keyword.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Maps an enabled level to the severity of the diagnostics it reports.
    #[must_use]
    pub fn severity(self) -> Option<crate::Severity> {
        match self {
            Self::Off => None,
            Self::Warn => Some(crate::Severity::Warning),
            Self::Error => Some(crate::Severity::Error),
        }
    }
}

/// Setting for a single rule.
///
/// Accepts every shape a rule table uses: `true`/`false`, a level keyword,
/// a number, a list (`["error", { max = 4 }]` or a plain value list), or a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// `true` enables with error level, `false` disables.
    Toggle(bool),
    /// Bare level keyword.
    Level(Level),
    /// Numeric parameter; enables the rule.
    Number(i64),
    /// Free-form string parameter; enables the rule.
    Text(String),
    /// Level followed by options, or a list parameter.
    List(Vec<toml::Value>),
    /// Table of named options; enables the rule.
    Table(toml::Table),
}

impl RuleSetting {
    /// Returns the effective level of this setting.
    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            Self::Toggle(false) => Level::Off,
            Self::Level(level) => *level,
            Self::List(items) => items
                .first()
                .and_then(toml::Value::as_str)
                .and_then(Level::from_keyword)
                .unwrap_or(Level::Error),
            Self::Toggle(true) | Self::Number(_) | Self::Text(_) | Self::Table(_) => Level::Error,
        }
    }

    /// Returns true unless the setting turns the rule off.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.level() != Level::Off
    }

    /// Options following the level in a list setting, or the whole list when
    /// it does not start with a level.
    #[must_use]
    pub fn options(&self) -> &[toml::Value] {
        match self {
            Self::List(items) => {
                let has_level = items
                    .first()
                    .and_then(toml::Value::as_str)
                    .and_then(Level::from_keyword)
                    .is_some();
                if has_level {
                    &items[1..]
                } else {
                    items
                }
            }
            _ => &[],
        }
    }

    /// Looks up a named option in a table setting or in the first table of a
    /// list setting.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&toml::Value> {
        match self {
            Self::Table(table) => table.get(key),
            Self::List(_) => self
                .options()
                .iter()
                .find_map(toml::Value::as_table)
                .and_then(|t| t.get(key)),
            _ => None,
        }
    }
}

impl From<Level> for RuleSetting {
    fn from(level: Level) -> Self {
        Self::Level(level)
    }
}

impl From<bool> for RuleSetting {
    fn from(value: bool) -> Self {
        Self::Toggle(value)
    }
}

/// Overlays key/value mappings, later layers replacing earlier ones key-for-key.
///
/// Values are replaced wholesale; nested values are never merged.
#[must_use]
pub fn combine<'a, K, V, I>(layers: I) -> BTreeMap<K, V>
where
    K: Ord + Clone + 'a,
    V: Clone + 'a,
    I: IntoIterator<Item = &'a BTreeMap<K, V>>,
{
    let mut merged = BTreeMap::new();
    for layer in layers {
        for (key, value) in layer {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Mapping from rule name to rule setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleConfiguration(BTreeMap<String, RuleSetting>);

impl RuleConfiguration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges configurations in order; see [`combine`].
    #[must_use]
    pub fn combine<'a, I>(layers: I) -> Self
    where
        I: IntoIterator<Item = &'a RuleConfiguration>,
    {
        Self(combine(layers.into_iter().map(|c| &c.0)))
    }

    /// Returns this configuration with `rule` set to `setting`.
    #[must_use]
    pub fn with(mut self, rule: impl Into<String>, setting: impl Into<RuleSetting>) -> Self {
        self.0.insert(rule.into(), setting.into());
        self
    }

    /// Gets the setting for a rule.
    #[must_use]
    pub fn get(&self, rule: &str) -> Option<&RuleSetting> {
        self.0.get(rule)
    }

    /// Checks if a rule is present and enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule: &str) -> bool {
        self.get(rule).is_some_and(RuleSetting::is_enabled)
    }

    /// Iterates over rule names and settings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of configured rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RuleSetting)> for RuleConfiguration {
    fn from_iter<T: IntoIterator<Item = (K, RuleSetting)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Environment and parser settings handed to an analyzer when it is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Named environments (e.g., `"test"`).
    #[serde(default)]
    pub envs: Vec<String>,
    /// Engine-specific parser options.
    #[serde(default)]
    pub parser_options: toml::Table,
    /// Directory that relative path patterns are resolved against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl EngineSettings {
    /// Returns true if `env` is listed.
    #[must_use]
    pub fn has_env(&self, env: &str) -> bool {
        self.envs.iter().any(|e| e == env)
    }

    /// Gets a boolean parser option with a default value.
    #[must_use]
    pub fn parser_bool(&self, key: &str, default: bool) -> bool {
        self.parser_options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }
}

/// Caller options for one engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Rule overrides layered over the engine's built-in defaults.
    #[serde(default)]
    pub rules: RuleConfiguration,
    /// Environment and parser settings.
    #[serde(flatten)]
    pub settings: EngineSettings,
}

/// File discovery settings used by hosts that walk a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Glob patterns excluded before records enter the pipeline.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Top-level caller options, usually read from `lint-gate.toml`.
///
/// ```toml
/// [engines.ast]
/// envs = ["test"]
///
/// [engines.ast.rules]
/// max-params = ["error", { max = 4 }]
///
/// [engines.style.rules]
/// exclude-files = ["**/generated/**"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File discovery settings.
    #[serde(default)]
    pub files: FilesConfig,
    /// Per-engine options keyed by engine name.
    #[serde(default)]
    pub engines: BTreeMap<String, EngineOptions>,
    /// Directory handed to every engine as its default `base_dir`.
    /// Set by the host, never read from TOML.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Returns this configuration with paths resolved against `dir`.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Options for `engine`, or empty options when none were given.
    ///
    /// An engine without its own `base_dir` inherits the configuration's.
    #[must_use]
    pub fn engine(&self, engine: &str) -> EngineOptions {
        let mut options = self.engines.get(engine).cloned().unwrap_or_default();
        if options.settings.base_dir.is_none() {
            options.settings.base_dir.clone_from(&self.base_dir);
        }
        options
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, i32)]) -> BTreeMap<String, i32> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn combine_later_layers_win() {
        let merged = combine([&map(&[("a", 1), ("b", 2)]), &map(&[("b", 3), ("c", 4)])]);
        assert_eq!(merged, map(&[("a", 1), ("b", 3), ("c", 4)]));
    }

    #[test]
    fn combine_of_nothing_is_empty() {
        let merged: BTreeMap<String, i32> = combine(std::iter::empty());
        assert!(merged.is_empty());
    }

    #[test]
    fn explicit_override_wins_even_when_empty() {
        let base = RuleConfiguration::new().with(
            "keywords",
            RuleSetting::List(vec![toml::Value::from("if"), toml::Value::from("for")]),
        );
        let overrides = RuleConfiguration::new().with("keywords", RuleSetting::List(vec![]));

        let merged = RuleConfiguration::combine([&base, &overrides]);
        assert_eq!(merged.get("keywords"), Some(&RuleSetting::List(vec![])));
    }

    #[test]
    fn nested_values_are_replaced_not_merged() {
        let base: RuleConfiguration = toml::from_str(r#"max-len = ["error", { code = 100, tabs = 4 }]"#)
            .expect("base should parse");
        let overrides: RuleConfiguration = toml::from_str(r#"max-len = ["warn", { code = 120 }]"#)
            .expect("override should parse");

        let merged = RuleConfiguration::combine([&base, &overrides]);
        let setting = merged.get("max-len").expect("rule present");
        assert_eq!(setting.level(), Level::Warn);
        assert_eq!(setting.option("code").and_then(toml::Value::as_integer), Some(120));
        assert!(setting.option("tabs").is_none());
    }

    #[test]
    fn setting_shapes_parse_and_resolve_levels() {
        let config: RuleConfiguration = toml::from_str(
            r#"
a = "off"
b = "warn"
c = true
d = false
e = 100
f = ["break", "case"]
g = { max = 3 }
h = "unix"
"#,
        )
        .expect("rules should parse");

        let level = |name: &str| config.get(name).map(RuleSetting::level);
        assert_eq!(level("a"), Some(Level::Off));
        assert_eq!(level("b"), Some(Level::Warn));
        assert_eq!(level("c"), Some(Level::Error));
        assert_eq!(level("d"), Some(Level::Off));
        assert_eq!(level("e"), Some(Level::Error));
        assert_eq!(level("f"), Some(Level::Error));
        assert_eq!(level("g"), Some(Level::Error));
        assert_eq!(level("h"), Some(Level::Error));

        assert_eq!(config.get("f").map(|s| s.options().len()), Some(2));
        assert!(!config.is_rule_enabled("a"));
        assert!(!config.is_rule_enabled("missing"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[files]
exclude = ["**/generated/**"]

[engines.ast]
envs = ["test"]
parser_options = { detect_test_paths = false }

[engines.ast.rules]
no-print-macro = "error"
max-params = ["error", { max = 4 }]

[engines.style.rules]
exclude-files = ["**/fixtures/**"]
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.files.exclude, vec!["**/generated/**".to_string()]);

        let ast = config.engine("ast");
        assert!(ast.settings.has_env("test"));
        assert!(!ast.settings.parser_bool("detect_test_paths", true));
        assert!(ast.rules.is_rule_enabled("no-print-macro"));
        assert_eq!(
            ast.rules
                .get("max-params")
                .and_then(|s| s.option("max"))
                .and_then(toml::Value::as_integer),
            Some(4)
        );

        assert_eq!(config.engine("style").rules.len(), 1);
        assert!(config.engine("unknown").rules.is_empty());
    }

    #[test]
    fn engines_inherit_the_base_dir() {
        let config = Config::parse(
            r#"
[engines.ast]
base_dir = "crates/ast"
"#,
        )
        .expect("valid config")
        .with_base_dir("/work/project");

        assert_eq!(
            config.engine("style").settings.base_dir,
            Some(PathBuf::from("/work/project"))
        );
        assert_eq!(
            config.engine("ast").settings.base_dir,
            Some(PathBuf::from("crates/ast"))
        );
        assert_eq!(Config::new().engine("style").settings.base_dir, None);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Config::parse("[engines").expect_err("should fail");
        assert!(err.to_string().starts_with("Failed to parse config"));
    }
}
