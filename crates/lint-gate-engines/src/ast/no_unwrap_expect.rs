//! Rule to forbid `.unwrap()` and `.expect()` in production code.
//!
//! # Configuration
//!
//! - `allow_in_tests`: Allow in test code (default: true)
//! - `allow_expect`: Allow `.expect()` but forbid `.unwrap()` (default: false)
//!
//! # Suppression
//!
//! - `#[allow(clippy::unwrap_used)]` or `#[allow(clippy::expect_used)]` on the enclosing item

use super::scope::{walk, Scope, ScopedCheck};
use super::{AstRule, FileContext};
use crate::options::{bool_option, severity};
use lint_gate_core::{EngineError, RuleSetting, Severity, Suggestion, Violation};
use syn::{Expr, ExprMethodCall};

/// Rule code for no-unwrap-expect.
pub const CODE: &str = "AST001";

/// Rule name for no-unwrap-expect.
pub const NAME: &str = "no-unwrap-expect";

/// Forbids `.unwrap()` and `.expect()` calls in production code.
#[derive(Debug, Clone)]
pub struct NoUnwrapExpect {
    /// Allow in test code.
    pub allow_in_tests: bool,
    /// Allow `.expect()` (only forbid `.unwrap()`).
    pub allow_expect: bool,
    /// Severity of reported violations.
    pub severity: Severity,
}

impl Default for NoUnwrapExpect {
    fn default() -> Self {
        Self::new()
    }
}

impl NoUnwrapExpect {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_in_tests: true,
            allow_expect: false,
            severity: Severity::Error,
        }
    }

    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error if an option has the wrong type.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        Ok(Self {
            allow_in_tests: bool_option(NAME, setting, "allow_in_tests", true)?,
            allow_expect: bool_option(NAME, setting, "allow_expect", false)?,
            severity: severity(setting),
        })
    }

    /// Sets whether to allow `.expect()`.
    #[must_use]
    pub fn allow_expect(mut self, allow: bool) -> Self {
        self.allow_expect = allow;
        self
    }
}

impl AstRule for NoUnwrapExpect {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
        if self.allow_in_tests && ctx.is_test {
            return Vec::new();
        }
        let check = UnwrapCheck {
            ctx,
            rule: self,
            violations: Vec::new(),
        };
        walk(ast, ALLOW_LINTS, check).violations
    }
}

/// `#[allow(..)]` lints that silence this rule on an item.
const ALLOW_LINTS: &[&str] = &["clippy::unwrap_used", "clippy::expect_used"];

struct UnwrapCheck<'a> {
    ctx: &'a FileContext<'a>,
    rule: &'a NoUnwrapExpect,
    violations: Vec<Violation>,
}

impl UnwrapCheck<'_> {
    fn report(&mut self, node: &ExprMethodCall, unwrap: bool) {
        let called = if unwrap { "unwrap" } else { "expect" };
        let mut message = format!(".{called}() is forbidden in production code");
        if unwrap && is_partial_cmp_chain(&node.receiver) {
            message.push_str(" (NaN comparison danger with partial_cmp)");
        }
        let help = if unwrap {
            "Use `?` operator, `.ok_or(Error)?`, or pattern matching"
        } else {
            "Use `?` operator with `.context()` or custom error"
        };
        self.violations.push(
            Violation::new(
                CODE,
                NAME,
                self.rule.severity,
                self.ctx.location(node.method.span()),
                message,
            )
            .with_suggestion(Suggestion::new(help)),
        );
    }
}

impl ScopedCheck for UnwrapCheck<'_> {
    fn method_call(&mut self, node: &ExprMethodCall, scope: Scope) {
        if scope.suppresses(self.rule.allow_in_tests) {
            return;
        }
        if node.method == "unwrap" {
            self.report(node, true);
        } else if node.method == "expect" && !self.rule.allow_expect {
            self.report(node, false);
        }
    }
}

/// Checks if the receiver is a `partial_cmp()` call.
fn is_partial_cmp_chain(expr: &Expr) -> bool {
    matches!(expr, Expr::MethodCall(call) if call.method == "partial_cmp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::check_with;

    fn check_code(code: &str) -> Vec<Violation> {
        check_with(&NoUnwrapExpect::new(), code, false)
    }

    #[test]
    fn test_detects_unwrap() {
        let violations = check_code(
            r#"
fn foo() {
    let x = Some(1).unwrap();
}
"#,
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!(violations[0].location.line, 3);
        assert_eq!(violations[0].location.column, 21);
    }

    #[test]
    fn test_detects_expect() {
        let violations = check_code(
            r#"
fn foo() {
    let x = Some(1).expect("should exist");
}
"#,
        );
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_allow_expect_option() {
        let code = r#"
fn foo() {
    let x = Some(1).expect("should exist");
}
"#;
        let violations = check_with(&NoUnwrapExpect::new().allow_expect(true), code, false);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_allows_in_test_fn() {
        let violations = check_code(
            r#"
#[test]
fn test_foo() {
    let x = Some(1).unwrap();
}
"#,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_allows_in_cfg_test_mod() {
        let violations = check_code(
            r#"
#[cfg(test)]
mod tests {
    fn helper() {
        let x = Some(1).unwrap();
    }
}
"#,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_allows_with_clippy_allow() {
        let violations = check_code(
            r#"
#[allow(clippy::unwrap_used)]
fn foo() {
    let x = Some(1).unwrap();
}
"#,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_allows_methods_under_clippy_allow() {
        let violations = check_code(
            r#"
struct S;

impl S {
    #[allow(clippy::expect_used)]
    fn load(&self) -> u8 {
        Some(1).expect("present")
    }

    fn other(&self) -> u8 {
        Some(1).unwrap()
    }
}
"#,
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 11);
    }

    #[test]
    fn test_flags_partial_cmp_unwrap() {
        let violations = check_code(
            r#"
fn foo(a: f64, b: f64) {
    let o = a.partial_cmp(&b).unwrap();
}
"#,
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("partial_cmp"));
    }

    #[test]
    fn test_from_setting_reads_options() {
        let rules: lint_gate_core::RuleConfiguration =
            toml::from_str(r#"no-unwrap-expect = ["warn", { allow_expect = true, allow_in_tests = false }]"#)
                .expect("should parse");
        let rule = NoUnwrapExpect::from_setting(rules.get(NAME).expect("present"))
            .expect("valid options");
        assert!(rule.allow_expect);
        assert!(!rule.allow_in_tests);
        assert_eq!(rule.severity, Severity::Warning);
    }
}
