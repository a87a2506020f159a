//! Item-scope tracking shared by the AST rules.
//!
//! [`walk`] visits a file while tracking whether the current item sits in
//! test code or under a lint `#[allow]`, and hands each method call and
//! macro invocation to a [`ScopedCheck`] together with that scope.

use super::attributes::{has_allow_attr, has_cfg_test, has_test_attr};
use syn::visit::Visit;
use syn::{Attribute, ExprMethodCall, ImplItemFn, ItemFn, ItemImpl, ItemMod, Macro};

/// Where the visitor currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scope {
    /// Inside `#[cfg(test)]` or a `#[test]` item.
    pub in_test: bool,
    /// Inside an item that allows one of the rule's lints.
    pub allowed: bool,
}

impl Scope {
    /// Scope of an item nested in `self` and carrying `attrs`.
    #[must_use]
    pub fn enter(self, attrs: &[Attribute], allow_lints: &[&str]) -> Self {
        Self {
            in_test: self.in_test || has_cfg_test(attrs) || has_test_attr(attrs),
            allowed: self.allowed
                || (!allow_lints.is_empty() && has_allow_attr(attrs, allow_lints)),
        }
    }

    /// Whether a rule with the given `allow_in_tests` stays quiet here.
    #[must_use]
    pub fn suppresses(self, allow_in_tests: bool) -> bool {
        self.allowed || (allow_in_tests && self.in_test)
    }
}

/// Callbacks for the nodes AST rules inspect.
pub trait ScopedCheck {
    /// A `.method(..)` call.
    fn method_call(&mut self, _node: &ExprMethodCall, _scope: Scope) {}

    /// A macro invocation.
    fn macro_call(&mut self, _node: &Macro, _scope: Scope) {}
}

/// Walks `ast`, returning `check` once every node has been seen.
pub fn walk<C: ScopedCheck>(ast: &syn::File, allow_lints: &[&str], check: C) -> C {
    let mut walker = Walker {
        scope: Scope::default(),
        allow_lints,
        check,
    };
    walker.visit_file(ast);
    walker.check
}

struct Walker<'l, C> {
    scope: Scope,
    allow_lints: &'l [&'l str],
    check: C,
}

impl<C> Walker<'_, C> {
    fn within(&mut self, attrs: &[Attribute], visit: impl FnOnce(&mut Self)) {
        let outer = self.scope;
        self.scope = outer.enter(attrs, self.allow_lints);
        visit(self);
        self.scope = outer;
    }
}

impl<'ast, C: ScopedCheck> Visit<'ast> for Walker<'_, C> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        self.within(&node.attrs, |w| syn::visit::visit_item_mod(w, node));
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        self.within(&node.attrs, |w| syn::visit::visit_item_impl(w, node));
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        self.within(&node.attrs, |w| syn::visit::visit_item_fn(w, node));
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        self.within(&node.attrs, |w| syn::visit::visit_impl_item_fn(w, node));
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        self.check.method_call(node, self.scope);
        syn::visit::visit_expr_method_call(self, node);
    }

    fn visit_macro(&mut self, node: &'ast Macro) {
        self.check.macro_call(node, self.scope);
        syn::visit::visit_macro(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Calls(Vec<(String, Scope)>);

    impl ScopedCheck for Calls {
        fn method_call(&mut self, node: &ExprMethodCall, scope: Scope) {
            self.0.push((node.method.to_string(), scope));
        }
    }

    fn scopes(code: &str) -> Vec<(String, Scope)> {
        let ast = syn::parse_file(code).expect("valid rust");
        walk(&ast, &["clippy::unwrap_used"], Calls::default()).0
    }

    #[test]
    fn tracks_test_and_allow_scopes() {
        let calls = scopes(
            r#"
fn a() { x.plain(); }

#[allow(clippy::unwrap_used)]
fn b() { x.allowed(); }

impl S {
    #[test]
    fn c() { x.method_test(); }
}

#[cfg(test)]
mod tests {
    fn d() { x.in_mod(); }
}

fn e() { x.after(); }
"#,
        );
        let plain = Scope::default();
        let test = Scope { in_test: true, allowed: false };
        let allowed = Scope { in_test: false, allowed: true };
        assert_eq!(
            calls,
            vec![
                ("plain".to_string(), plain),
                ("allowed".to_string(), allowed),
                ("method_test".to_string(), test),
                ("in_mod".to_string(), test),
                ("after".to_string(), plain),
            ]
        );
    }

    #[test]
    fn without_lints_allow_attributes_are_ignored() {
        let ast = syn::parse_file("#[allow(clippy::unwrap_used)]\nfn b() { x.y(); }")
            .expect("valid rust");
        let calls = walk(&ast, &[], Calls::default()).0;
        assert_eq!(calls[0].1, Scope::default());
    }

    #[test]
    fn suppression_depends_on_allow_in_tests() {
        let test = Scope { in_test: true, allowed: false };
        assert!(test.suppresses(true));
        assert!(!test.suppresses(false));
        assert!(Scope { in_test: false, allowed: true }.suppresses(false));
    }
}
