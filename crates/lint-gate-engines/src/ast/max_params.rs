//! Rule to limit the number of parameters a function takes.
//!
//! `self` receivers are not counted.
//!
//! # Configuration
//!
//! - `max`: Maximum allowed parameters (default: 3)

use super::{AstRule, FileContext};
use crate::options::{severity, usize_option};
use lint_gate_core::{EngineError, RuleSetting, Severity, Suggestion, Violation};
use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::{FnArg, Ident, ImplItemFn, ItemFn, Token, TraitItemFn};

/// Rule code for max-params.
pub const CODE: &str = "AST005";

/// Rule name for max-params.
pub const NAME: &str = "max-params";

const DEFAULT_MAX: usize = 3;

/// Limits function parameter counts.
#[derive(Debug, Clone)]
pub struct MaxParams {
    /// Maximum allowed parameters.
    pub max: usize,
    /// Severity of reported violations.
    pub severity: Severity,
}

impl MaxParams {
    /// Creates the rule with an explicit limit.
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self {
            max,
            severity: Severity::Error,
        }
    }

    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error if `max` is not a non-negative integer.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        Ok(Self {
            max: usize_option(NAME, setting, "max", DEFAULT_MAX)?,
            severity: severity(setting),
        })
    }
}

impl AstRule for MaxParams {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check(&self, ctx: &FileContext, ast: &syn::File) -> Vec<Violation> {
        let mut visitor = ParamVisitor {
            ctx,
            rule: self,
            violations: Vec::new(),
        };
        visitor.visit_file(ast);
        visitor.violations
    }
}

struct ParamVisitor<'a> {
    ctx: &'a FileContext<'a>,
    rule: &'a MaxParams,
    violations: Vec<Violation>,
}

impl ParamVisitor<'_> {
    fn check_signature(&mut self, ident: &Ident, inputs: &Punctuated<FnArg, Token![,]>) {
        let count = inputs
            .iter()
            .filter(|arg| matches!(arg, FnArg::Typed(_)))
            .count();
        if count > self.rule.max {
            self.violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.rule.severity,
                    self.ctx.location(ident.span()),
                    format!(
                        "Function `{ident}` has too many parameters ({count}). Maximum allowed is {}",
                        self.rule.max
                    ),
                )
                .with_suggestion(Suggestion::new("Group related parameters into a struct")),
            );
        }
    }
}

impl<'ast> Visit<'ast> for ParamVisitor<'_> {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        self.check_signature(&node.sig.ident, &node.sig.inputs);
        syn::visit::visit_item_fn(self, node);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        self.check_signature(&node.sig.ident, &node.sig.inputs);
        syn::visit::visit_impl_item_fn(self, node);
    }

    fn visit_trait_item_fn(&mut self, node: &'ast TraitItemFn) {
        self.check_signature(&node.sig.ident, &node.sig.inputs);
        syn::visit::visit_trait_item_fn(self, node);
    }
}
