//! Rules that forbid specific macro invocations.
//!
//! - `no-dbg-macro`: leftover `dbg!()` calls
//! - `no-print-macro`: `print!`/`println!`/`eprint!`/`eprintln!` outside tests
//! - `no-todo-macro`: `todo!()` and `unimplemented!()`
//!
//! Each accepts `allow_in_tests`; only `no-print-macro` defaults it to true.

use super::scope::{walk, Scope, ScopedCheck};
use super::{AstRule, FileContext};
use crate::options::{bool_option, severity};
use lint_gate_core::{EngineError, RuleSetting, Severity, Suggestion, Violation};
use syn::Macro;

/// Rule code for no-dbg-macro.
pub const DBG_CODE: &str = "AST002";
/// Rule name for no-dbg-macro.
pub const DBG_NAME: &str = "no-dbg-macro";

/// Rule code for no-print-macro.
pub const PRINT_CODE: &str = "AST003";
/// Rule name for no-print-macro.
pub const PRINT_NAME: &str = "no-print-macro";

/// Rule code for no-todo-macro.
pub const TODO_CODE: &str = "AST004";
/// Rule name for no-todo-macro.
pub const TODO_NAME: &str = "no-todo-macro";

/// Reports invocations of any macro in a fixed list.
#[derive(Debug, Clone)]
pub struct MacroRule {
    name: &'static str,
    code: &'static str,
    macros: &'static [&'static str],
    help: &'static str,
    allow_in_tests: bool,
    severity: Severity,
}

impl MacroRule {
    fn configured(
        name: &'static str,
        code: &'static str,
        macros: &'static [&'static str],
        help: &'static str,
        setting: &RuleSetting,
        allow_in_tests_default: bool,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            name,
            code,
            macros,
            help,
            allow_in_tests: bool_option(name, setting, "allow_in_tests", allow_in_tests_default)?,
            severity: severity(setting),
        })
    }

    /// `no-dbg-macro` from its setting.
    ///
    /// # Errors
    ///
    /// Returns an error if an option has the wrong type.
    pub fn dbg(setting: &RuleSetting) -> Result<Self, EngineError> {
        Self::configured(
            DBG_NAME,
            DBG_CODE,
            &["dbg"],
            "Remove the dbg!() call before committing",
            setting,
            false,
        )
    }

    /// `no-print-macro` from its setting.
    ///
    /// # Errors
    ///
    /// Returns an error if an option has the wrong type.
    pub fn print(setting: &RuleSetting) -> Result<Self, EngineError> {
        Self::configured(
            PRINT_NAME,
            PRINT_CODE,
            &["print", "println", "eprint", "eprintln"],
            "Use `tracing` macros instead of printing",
            setting,
            true,
        )
    }

    /// `no-todo-macro` from its setting.
    ///
    /// # Errors
    ///
    /// Returns an error if an option has the wrong type.
    pub fn todo(setting: &RuleSetting) -> Result<Self, EngineError> {
        Self::configured(
            TODO_NAME,
            TODO_CODE,
            &["todo", "unimplemented"],
            "Implement the code path or return an error",
            setting,
            false,
        )
    }
}

impl AstRule for MacroRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
        if self.allow_in_tests && ctx.is_test {
            return Vec::new();
        }
        let check = MacroCheck {
            ctx,
            rule: self,
            violations: Vec::new(),
        };
        walk(ast, &[], check).violations
    }
}

struct MacroCheck<'a> {
    ctx: &'a FileContext<'a>,
    rule: &'a MacroRule,
    violations: Vec<Violation>,
}

impl ScopedCheck for MacroCheck<'_> {
    fn macro_call(&mut self, node: &Macro, scope: Scope) {
        if scope.suppresses(self.rule.allow_in_tests) {
            return;
        }
        let Some(segment) = node.path.segments.last() else {
            return;
        };
        let name = segment.ident.to_string();
        if self.rule.macros.contains(&name.as_str()) {
            self.violations.push(
                Violation::new(
                    self.rule.code,
                    self.rule.name,
                    self.rule.severity,
                    self.ctx.location(segment.ident.span()),
                    format!("Unexpected {name}!() invocation"),
                )
                .with_suggestion(Suggestion::new(self.rule.help)),
            );
        }
    }
}
