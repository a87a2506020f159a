//! # lint-gate-core
//!
//! Streaming validation pipeline that runs source files through several
//! independent analysis engines and turns their combined diagnostic count
//! into a single pass/fail outcome.
//!
//! This crate provides:
//!
//! - [`FileRecord`] and [`DiagnosticSet`], the values flowing through a pipeline
//! - [`RuleConfiguration`] and [`combine`] for layering rule overrides on defaults
//! - [`Analyzer`] and [`DiagnosticWriter`], the contracts engines and reporters implement
//! - [`AnalysisStage`], [`ReporterStage`] and [`ValidationGate`]
//! - [`PipelineBuilder`] for assembling reusable [`PipelineFactory`] instances
//!
//! ## Example
//!
//! ```ignore
//! use lint_gate_core::{EngineSlot, FileRecord, PipelineBuilder};
//!
//! let factory = PipelineBuilder::new()
//!     .engine(EngineSlot::new("ast", ast_factory).defaults(ast_defaults()))
//!     .engine(EngineSlot::new("style", style_factory).defaults(style_defaults()))
//!     .build();
//!
//! let summary = factory.create()?.run(records)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod availability;
mod config;
mod engine;
mod error;
mod gate;
mod pipeline;
mod record;
mod stage;
mod types;

/// Built-in diagnostic writers.
pub mod writers;

pub use availability::{check as check_availability, Availability, HostInfo, MINIMUM_HOST_VERSION};
pub use config::{
    combine, Config, ConfigError, EngineOptions, EngineSettings, FilesConfig, Level,
    RuleConfiguration, RuleSetting,
};
pub use engine::{
    Analyzer, AnalyzerBox, AnalyzerFactory, DiagnosticWriter, EngineError, WriterBox,
    WriterFactory,
};
pub use error::PipelineError;
pub use gate::{GateState, ValidationGate, Verdict};
pub use pipeline::{EngineSlot, Pipeline, PipelineBuilder, PipelineFactory, PipelineStream, RunSummary};
pub use record::{DiagnosticSet, FileRecord, Payload};
pub use stage::{AnalysisStage, ReporterStage, Stage, StageBox};
pub use types::{Location, Severity, Suggestion, Violation};
