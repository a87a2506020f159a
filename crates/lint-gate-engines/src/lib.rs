//! # lint-gate-engines
//!
//! Built-in analysis engines for lint-gate pipelines.
//!
//! ## Engines
//!
//! | Engine | Input | Exclusion |
//! |--------|-------|-----------|
//! | `ast` | Rust syntax tree (`syn`) | none |
//! | `style` | raw text, line by line | `exclude-files` globs |
//!
//! ## Rules
//!
//! | Code | Name | Engine |
//! |------|------|--------|
//! | AST001 | `no-unwrap-expect` | ast |
//! | AST002 | `no-dbg-macro` | ast |
//! | AST003 | `no-print-macro` | ast |
//! | AST004 | `no-todo-macro` | ast |
//! | AST005 | `max-params` | ast |
//! | STY001 | `max-len` | style |
//! | STY002 | `no-trailing-spaces` | style |
//! | STY003 | `no-tabs` | style |
//! | STY004 | `eol-last` | style |
//! | STY005 | `no-multiple-empty-lines` | style |
//! | STY006 | `unicode-bom` | style |
//! | STY007 | `linebreak-style` | style |
//! | STY008 | `no-warning-comments` | style |
//!
//! ## Usage
//!
//! ```ignore
//! use lint_gate_core::{Config, FileRecord};
//! use lint_gate_engines::standard::{self, OutputFormat};
//!
//! let factory = standard::factory(&Config::new(), OutputFormat::Stylish);
//! let summary = factory.create()?.run(records)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod defaults;
mod options;
pub mod standard;
pub mod style;

pub use ast::AstEngine;
pub use standard::OutputFormat;
pub use style::StyleEngine;

/// Re-export core types for convenience.
pub use lint_gate_core::{Analyzer, Severity, Violation};

/// Description of one rule an engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInfo {
    /// Stable rule code (e.g., `AST001`).
    pub code: &'static str,
    /// Kebab-case rule name used in rule tables.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
}

impl RuleInfo {
    /// Creates a rule description.
    #[must_use]
    pub const fn new(code: &'static str, name: &'static str, description: &'static str) -> Self {
        Self {
            code,
            name,
            description,
        }
    }
}

/// Every built-in rule, grouped by engine name.
#[must_use]
pub fn all_rules() -> [(&'static str, &'static [RuleInfo]); 2] {
    [(AstEngine::NAME, ast::RULES), (StyleEngine::NAME, style::RULES)]
}
