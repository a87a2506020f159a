//! The standard two-engine pipeline.
//!
//! Stage order: `ast`, its reporter, `style`, its reporter, validation gate.

use crate::ast::AstEngine;
use crate::defaults;
use crate::style::StyleEngine;
use lint_gate_core::writers::{CompactWriter, JsonWriter, StylishWriter};
use lint_gate_core::{Config, EngineOptions, EngineSlot, PipelineBuilder, PipelineFactory, WriterBox};

/// How reporters print diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Grouped per file for the syntax engine, one line per diagnostic for
    /// the style engine.
    #[default]
    Stylish,
    /// One line per diagnostic for both engines.
    Compact,
    /// A JSON array per reported file.
    Json,
}

/// Slot for the syntax engine with its built-in defaults and `options`
/// layered on top. No reporter is attached.
#[must_use]
pub fn ast_slot(options: EngineOptions) -> EngineSlot {
    EngineSlot::new(AstEngine::NAME, AstEngine::factory)
        .defaults(defaults::ast_rules())
        .options(options)
}

/// Slot for the style engine with its built-in defaults and `options`
/// layered on top. No reporter is attached.
#[must_use]
pub fn style_slot(options: EngineOptions) -> EngineSlot {
    EngineSlot::new(StyleEngine::NAME, StyleEngine::factory)
        .defaults(defaults::style_rules())
        .options(options)
}

fn stylish() -> WriterBox {
    Box::new(StylishWriter::stdout())
}

fn compact() -> WriterBox {
    Box::new(CompactWriter::stdout())
}

fn json() -> WriterBox {
    Box::new(JsonWriter::stdout())
}

/// Builder for the standard pipeline, reporting to stdout in `format`.
#[must_use]
pub fn builder(config: &Config, format: OutputFormat) -> PipelineBuilder {
    let (ast_writer, style_writer): (fn() -> WriterBox, fn() -> WriterBox) = match format {
        OutputFormat::Stylish => (stylish, compact),
        OutputFormat::Compact => (compact, compact),
        OutputFormat::Json => (json, json),
    };

    PipelineBuilder::new()
        .engine(ast_slot(config.engine(AstEngine::NAME)).writer(ast_writer))
        .engine(style_slot(config.engine(StyleEngine::NAME)).writer(style_writer))
}

/// Factory for the standard pipeline.
#[must_use]
pub fn factory(config: &Config, format: OutputFormat) -> PipelineFactory {
    builder(config, format).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lint_gate_core::{FileRecord, PipelineError};

    #[test]
    fn stages_follow_the_standard_order() {
        let pipeline = factory(&Config::new(), OutputFormat::Compact)
            .create()
            .expect("defaults configure");
        assert_eq!(
            pipeline.stage_names(),
            vec!["ast", "ast-reporter", "style", "style-reporter", "validation-gate"]
        );
    }

    #[test]
    fn config_overrides_reach_the_engines() {
        let config = Config::parse(
            r#"
[engines.ast.rules]
no-unwrap-expect = "off"
"#,
        )
        .expect("valid config");
        let factory = factory(&config, OutputFormat::Json);
        let rules = factory.rules("ast").expect("ast engine present");
        assert!(!rules.is_rule_enabled("no-unwrap-expect"));
        assert!(rules.is_rule_enabled("no-dbg-macro"));

        let summary = factory
            .create()
            .expect("should configure")
            .run([FileRecord::buffered(
                "src/lib.rs",
                "pub fn f() -> u8 {\n    Some(1).unwrap()\n}\n",
            )])
            .expect("unwrap is allowed");
        assert_eq!(summary.files_checked, 1);
    }

    #[test]
    fn unknown_rules_fail_at_creation() {
        let config = Config::parse(
            r#"
[engines.style.rules]
semi = "error"
"#,
        )
        .expect("valid config");
        let err = factory(&config, OutputFormat::Compact)
            .create()
            .err()
            .expect("unknown rule");
        assert!(matches!(err, PipelineError::Configure { .. }));
    }
}
