//! Built-in rule tables.
//!
//! Each call builds a fresh value; callers layer their overrides on top with
//! [`RuleConfiguration::combine`].

use crate::style::EXCLUDE_FILES;
use lint_gate_core::{Level, RuleConfiguration, RuleSetting};

fn with_options(level: &str, options: &[(&str, toml::Value)]) -> RuleSetting {
    let table: toml::Table = options
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect();
    RuleSetting::List(vec![level.into(), table.into()])
}

fn with_keyword(level: &str, keyword: &str) -> RuleSetting {
    RuleSetting::List(vec![level.into(), keyword.into()])
}

/// Default table for the `ast` engine.
#[must_use]
pub fn ast_rules() -> RuleConfiguration {
    RuleConfiguration::new()
        .with("no-unwrap-expect", Level::Error)
        .with("no-dbg-macro", Level::Error)
        .with("no-print-macro", Level::Off)
        .with("no-todo-macro", Level::Error)
        .with("max-params", Level::Off)
}

/// Default table for the `style` engine, including its `exclude-files` list.
#[must_use]
pub fn style_rules() -> RuleConfiguration {
    RuleConfiguration::new()
        .with(
            "max-len",
            with_options("error", &[("code", toml::Value::Integer(100))]),
        )
        .with(
            "no-trailing-spaces",
            with_options("error", &[("skip_blank_lines", toml::Value::Boolean(true))]),
        )
        .with("no-tabs", Level::Error)
        .with("eol-last", with_keyword("error", "always"))
        .with(
            "no-multiple-empty-lines",
            with_options("error", &[("max", toml::Value::Integer(1))]),
        )
        .with("unicode-bom", with_keyword("error", "never"))
        .with("linebreak-style", with_keyword("error", "unix"))
        .with("no-warning-comments", Level::Error)
        .with(EXCLUDE_FILES, RuleSetting::List(vec!["**/target/**".into()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast, style};

    #[test]
    fn tables_only_name_known_rules() {
        for (name, _) in ast_rules().iter() {
            assert!(ast::RULES.iter().any(|r| r.name == name), "{name}");
        }
        for (name, _) in style_rules().iter().filter(|(n, _)| *n != EXCLUDE_FILES) {
            assert!(style::RULES.iter().any(|r| r.name == name), "{name}");
        }
    }

    #[test]
    fn overrides_layer_over_defaults() {
        let overrides = RuleConfiguration::new().with("max-params", Level::Warn);
        let merged = RuleConfiguration::combine([&ast_rules(), &overrides]);
        assert_eq!(merged.get("max-params").map(RuleSetting::level), Some(Level::Warn));
        assert!(merged.is_rule_enabled("no-unwrap-expect"));
    }

    #[test]
    fn calls_return_independent_values() {
        let mut first = style_rules();
        first = first.with("max-len", false);
        assert!(!first.is_rule_enabled("max-len"));
        assert!(style_rules().is_rule_enabled("max-len"));
    }
}
