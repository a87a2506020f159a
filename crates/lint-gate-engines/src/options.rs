//! Typed access to rule options, with configuration errors for bad shapes.

use lint_gate_core::{EngineError, RuleSetting, Severity};

/// Severity a setting reports at. Disabled settings never reach rule
/// construction, so `off` maps to the error default.
pub(crate) fn severity(setting: &RuleSetting) -> Severity {
    setting.level().severity().unwrap_or(Severity::Error)
}

pub(crate) fn bool_option(
    rule: &str,
    setting: &RuleSetting,
    key: &str,
    default: bool,
) -> Result<bool, EngineError> {
    match setting.option(key) {
        None => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| invalid(rule, key, "a boolean")),
    }
}

pub(crate) fn usize_option(
    rule: &str,
    setting: &RuleSetting,
    key: &str,
    default: usize,
) -> Result<usize, EngineError> {
    match setting.option(key) {
        None => Ok(default),
        Some(value) => value
            .as_integer()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid(rule, key, "a non-negative integer")),
    }
}

/// First bare string among the options, e.g. `"unix"` in `["error", "unix"]`
/// or a plain `"unix"`.
pub(crate) fn keyword_option<'a>(setting: &'a RuleSetting, default: &'a str) -> &'a str {
    if let RuleSetting::Text(keyword) = setting {
        return keyword;
    }
    setting
        .options()
        .iter()
        .find_map(toml::Value::as_str)
        .unwrap_or(default)
}

/// Like [`keyword_option`], restricted to `choices`.
pub(crate) fn keyword_choice<'a>(
    rule: &str,
    setting: &'a RuleSetting,
    choices: &[&str],
    default: &'a str,
) -> Result<&'a str, EngineError> {
    let keyword = keyword_option(setting, default);
    if choices.contains(&keyword) {
        Ok(keyword)
    } else {
        Err(EngineError::new(format!(
            "invalid option `{keyword}` for rule `{rule}`: expected one of {}",
            choices.join(", ")
        )))
    }
}

/// String list option under `key`, or `default` when absent.
pub(crate) fn string_list_option(
    rule: &str,
    setting: &RuleSetting,
    key: &str,
    default: &[&str],
) -> Result<Vec<String>, EngineError> {
    let Some(value) = setting.option(key) else {
        return Ok(default.iter().map(|s| (*s).to_string()).collect());
    };
    value
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|v| v.as_str().map(String::from))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| invalid(rule, key, "a list of strings"))
}

pub(crate) fn invalid(rule: &str, key: &str, expected: &str) -> EngineError {
    EngineError::new(format!(
        "invalid option `{key}` for rule `{rule}`: expected {expected}"
    ))
}

pub(crate) fn unknown_rule(engine: &str, rule: &str) -> EngineError {
    EngineError::new(format!("unknown {engine} rule `{rule}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lint_gate_core::RuleConfiguration;

    fn setting(toml_src: &str) -> RuleSetting {
        let rules: RuleConfiguration = toml::from_str(toml_src).expect("should parse");
        rules.get("r").cloned().expect("rule present")
    }

    #[test]
    fn options_fall_back_to_defaults() {
        let s = setting(r#"r = "warn""#);
        assert_eq!(severity(&s), Severity::Warning);
        assert!(bool_option("r", &s, "flag", true).expect("default"));
        assert_eq!(usize_option("r", &s, "max", 3).expect("default"), 3);
        assert_eq!(keyword_option(&s, "unix"), "unix");
    }

    #[test]
    fn options_are_read_from_tables() {
        let s = setting(r#"r = ["error", "windows", { max = 5, flag = false, terms = ["a"] }]"#);
        assert_eq!(usize_option("r", &s, "max", 3).expect("set"), 5);
        assert!(!bool_option("r", &s, "flag", true).expect("set"));
        assert_eq!(keyword_option(&s, "unix"), "windows");
        assert_eq!(
            string_list_option("r", &s, "terms", &[]).expect("set"),
            vec!["a".to_string()]
        );
    }

    #[test]
    fn malformed_options_are_rejected() {
        let s = setting(r#"r = ["error", { max = -1, flag = "yes" }]"#);
        let err = usize_option("r", &s, "max", 3).expect_err("negative");
        assert_eq!(
            err.to_string(),
            "invalid option `max` for rule `r`: expected a non-negative integer"
        );
        assert!(bool_option("r", &s, "flag", true).is_err());
    }

    #[test]
    fn keywords_are_checked_against_choices() {
        let s = setting(r#"r = ["error", "sometimes"]"#);
        let err = keyword_choice("r", &s, &["always", "never"], "always").expect_err("bad keyword");
        assert_eq!(
            err.to_string(),
            "invalid option `sometimes` for rule `r`: expected one of always, never"
        );

        let s = setting(r#"r = "never""#);
        assert_eq!(
            keyword_choice("r", &s, &["always", "never"], "always").expect("plain keyword"),
            "never"
        );
    }
}
