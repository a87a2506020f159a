//! Contracts for analysis engines and diagnostic writers.

use crate::config::{EngineSettings, RuleConfiguration};
use crate::record::DiagnosticSet;
use crate::types::Violation;
use std::path::Path;

/// Failure reported by an engine while configuring or checking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    /// Creates a new engine error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The engine's own description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A static-analysis engine that checks one file at a time.
///
/// An analyzer is configured once, when its stage is built, and then asked
/// to check every non-excluded buffered record that reaches it.
///
/// # Example
///
/// ```ignore
/// use lint_gate_core::{Analyzer, EngineError, RuleConfiguration, Violation};
/// use std::path::Path;
///
/// struct NoTabs { enabled: bool }
///
/// impl Analyzer for NoTabs {
///     fn name(&self) -> &str { "tabs" }
///
///     fn configure(&mut self, rules: &RuleConfiguration) -> Result<(), EngineError> {
///         self.enabled = rules.is_rule_enabled("no-tabs");
///         Ok(())
///     }
///
///     fn check_text(&self, contents: &str, path: &Path) -> Result<Vec<Violation>, EngineError> {
///         // ...
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait Analyzer {
    /// Engine name; annotations are stored under this key.
    fn name(&self) -> &str;

    /// Applies the effective rule configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration names unknown rules or carries
    /// malformed options.
    fn configure(&mut self, rules: &RuleConfiguration) -> Result<(), EngineError>;

    /// Checks one file and returns its diagnostics in reporting order.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine itself fails; the pipeline aborts.
    fn check_text(&self, contents: &str, path: &Path) -> Result<Vec<Violation>, EngineError>;

    /// Whether the engine's own ignore policy skips `path`.
    fn is_excluded(&self, _path: &Path) -> bool {
        false
    }
}

/// Type alias for boxed [`Analyzer`] trait objects.
pub type AnalyzerBox = Box<dyn Analyzer>;

/// Creates fresh, unconfigured analyzers.
pub trait AnalyzerFactory {
    /// Creates an analyzer using the given environment and parser settings.
    fn create(&self, settings: &EngineSettings) -> AnalyzerBox;
}

impl<F> AnalyzerFactory for F
where
    F: Fn(&EngineSettings) -> AnalyzerBox,
{
    fn create(&self, settings: &EngineSettings) -> AnalyzerBox {
        self(settings)
    }
}

/// Side-channel output for one engine's diagnostics.
///
/// Writers must not fail the stream; implementations log their own I/O
/// failures and carry on.
pub trait DiagnosticWriter {
    /// Writes the given diagnostic sets.
    fn write(&mut self, sets: &[&DiagnosticSet]);
}

/// Type alias for boxed [`DiagnosticWriter`] trait objects.
pub type WriterBox = Box<dyn DiagnosticWriter>;

/// Creates a writer for each pipeline instance.
pub trait WriterFactory {
    /// Creates a writer.
    fn create(&self) -> WriterBox;
}

impl<F> WriterFactory for F
where
    F: Fn() -> WriterBox,
{
    fn create(&self) -> WriterBox {
        self()
    }
}
