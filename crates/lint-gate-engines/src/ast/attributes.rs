//! Attribute helpers shared by AST rules.

use syn::Attribute;

/// Checks if attributes contain an `#[allow(...)]` naming one of `lint_names`.
#[must_use]
pub fn has_allow_attr(attrs: &[Attribute], lint_names: &[&str]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("allow"))
        .map(|attr| quote::quote!(#attr).to_string().replace(' ', ""))
        .any(|attr_str| lint_names.iter().any(|name| attr_str.contains(name)))
}

/// Checks if attributes contain `#[test]`.
#[must_use]
pub fn has_test_attr(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("test"))
}

/// Checks if attributes contain `#[cfg(test)]`.
#[must_use]
pub fn has_cfg_test(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("cfg"))
        .any(|attr| quote::quote!(#attr).to_string().contains("test"))
}
