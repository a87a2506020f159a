//! Syntax-tree engine for Rust sources, built on `syn`.
//!
//! Parse failures are reported as a single `parse-error` diagnostic rather
//! than failing the run, so a broken file still counts against validation.

mod attributes;
mod macros;
mod max_params;
mod no_unwrap_expect;
mod scope;

use crate::options::unknown_rule;
use crate::RuleInfo;
use lint_gate_core::{
    Analyzer, AnalyzerBox, EngineError, EngineSettings, Location, RuleConfiguration, RuleSetting,
    Severity, Violation,
};
use std::path::Path;
use tracing::debug;

pub use macros::MacroRule;
pub use max_params::MaxParams;
pub use no_unwrap_expect::NoUnwrapExpect;

/// Rule name used for files that fail to parse.
pub const PARSE_ERROR: &str = "parse-error";

/// Rules this engine understands.
pub const RULES: &[RuleInfo] = &[
    RuleInfo::new(
        no_unwrap_expect::CODE,
        no_unwrap_expect::NAME,
        "Forbids .unwrap() and .expect() in production code",
    ),
    RuleInfo::new(macros::DBG_CODE, macros::DBG_NAME, "Forbids leftover dbg!() calls"),
    RuleInfo::new(
        macros::PRINT_CODE,
        macros::PRINT_NAME,
        "Forbids println!/eprintln! and friends outside tests",
    ),
    RuleInfo::new(
        macros::TODO_CODE,
        macros::TODO_NAME,
        "Forbids todo!() and unimplemented!()",
    ),
    RuleInfo::new(
        max_params::CODE,
        max_params::NAME,
        "Limits the number of function parameters",
    ),
];

/// Context handed to each AST rule.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path of the file.
    pub path: &'a Path,
    /// File contents.
    pub content: &'a str,
    /// Whether the whole file is test code.
    pub is_test: bool,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, is_test: bool) -> Self {
        Self {
            path,
            content,
            is_test,
        }
    }

    /// Location of a syntax node's start.
    #[must_use]
    pub fn location(&self, span: proc_macro2::Span) -> Location {
        let start = span.start();
        Location::new(self.path, start.line, start.column + 1)
    }
}

/// Detects test files from path conventions.
#[must_use]
pub fn is_test_path(path: &Path) -> bool {
    let in_test_dir = path.components().any(|c| {
        matches!(c, std::path::Component::Normal(s)
            if s == "tests" || s == "test" || s == "benches")
    });
    if in_test_dir {
        return true;
    }

    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            name.ends_with("_test.rs")
                || name.ends_with("_tests.rs")
                || name.starts_with("test_")
                || name == "tests.rs"
        })
}

/// A per-file rule over the parsed syntax tree.
pub trait AstRule {
    /// Kebab-case rule name.
    fn name(&self) -> &'static str;

    /// Checks one file.
    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation>;
}

/// Engine that parses Rust sources and runs the configured [`AstRule`]s.
pub struct AstEngine {
    all_tests: bool,
    detect_test_paths: bool,
    rules: Vec<Box<dyn AstRule>>,
}

impl AstEngine {
    /// Engine name and annotation key.
    pub const NAME: &'static str = "ast";

    /// Creates an unconfigured engine.
    ///
    /// `envs = ["test"]` treats every file as test code; the parser option
    /// `detect_test_paths` (default true) recognises `tests/`, `*_test.rs`
    /// and similar paths.
    #[must_use]
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            all_tests: settings.has_env("test"),
            detect_test_paths: settings.parser_bool("detect_test_paths", true),
            rules: Vec::new(),
        }
    }

    /// Boxed constructor, usable as an analyzer factory.
    #[must_use]
    pub fn factory(settings: &EngineSettings) -> AnalyzerBox {
        Box::new(Self::new(settings))
    }

    /// Names of the rules currently active.
    #[must_use]
    pub fn active_rules(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    fn build_rule(name: &str, setting: &RuleSetting) -> Result<Box<dyn AstRule>, EngineError> {
        let rule: Box<dyn AstRule> = match name {
            no_unwrap_expect::NAME => Box::new(NoUnwrapExpect::from_setting(setting)?),
            macros::DBG_NAME => Box::new(MacroRule::dbg(setting)?),
            macros::PRINT_NAME => Box::new(MacroRule::print(setting)?),
            macros::TODO_NAME => Box::new(MacroRule::todo(setting)?),
            max_params::NAME => Box::new(MaxParams::from_setting(setting)?),
            other => return Err(unknown_rule(Self::NAME, other)),
        };
        Ok(rule)
    }

    fn parse_error(path: &Path, err: &syn::Error) -> Violation {
        let start = err.span().start();
        Violation::new(
            "AST000",
            PARSE_ERROR,
            Severity::Error,
            Location::new(path, start.line, start.column + 1),
            format!("Parsing error: {err}"),
        )
    }
}

impl Analyzer for AstEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn configure(&mut self, rules: &RuleConfiguration) -> Result<(), EngineError> {
        let mut active = Vec::new();
        for (name, setting) in rules.iter() {
            let rule = Self::build_rule(name, setting)?;
            if setting.is_enabled() {
                active.push(rule);
            }
        }
        self.rules = active;
        debug!("ast: {} active rule(s)", self.rules.len());
        Ok(())
    }

    fn check_text(&self, contents: &str, path: &Path) -> Result<Vec<Violation>, EngineError> {
        let ast = match syn::parse_file(contents) {
            Ok(ast) => ast,
            Err(err) => return Ok(vec![Self::parse_error(path, &err)]),
        };

        let is_test = self.all_tests || (self.detect_test_paths && is_test_path(path));
        let ctx = FileContext::new(path, contents, is_test);

        let mut violations: Vec<Violation> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(&ctx, &ast))
            .collect();
        violations.sort_by_key(|v| (v.location.line, v.location.column));
        Ok(violations)
    }
}

/// Parses `code` and runs `rule` on it, for rule tests.
#[cfg(test)]
pub(crate) fn check_with(rule: &dyn AstRule, code: &str, is_test: bool) -> Vec<Violation> {
    let ast = syn::parse_file(code).expect("Failed to parse");
    let ctx = FileContext::new(Path::new("test.rs"), code, is_test);
    rule.check(&ctx, &ast)
}
