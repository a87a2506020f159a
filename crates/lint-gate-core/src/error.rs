//! Fatal pipeline errors.

use crate::engine::EngineError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Every variant is fatal: the run stops at the first one and no other
/// error is reported for that run.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    /// A record reached an analysis stage before its contents were buffered.
    #[error("Streaming not supported: {}", .path.display())]
    #[diagnostic(
        code(lint_gate::streaming_unsupported),
        help("buffer file contents before they enter the pipeline")
    )]
    StreamingUnsupported {
        /// Engine whose stage rejected the record.
        engine: String,
        /// Path of the streamed record.
        path: PathBuf,
    },

    /// Buffered contents could not be decoded as UTF-8 text.
    #[error("{} is not valid UTF-8", .path.display())]
    #[diagnostic(code(lint_gate::invalid_encoding))]
    InvalidEncoding {
        /// Path of the malformed record.
        path: PathBuf,
    },

    /// An engine failed while checking a file.
    ///
    /// The message is the engine's own.
    #[error("{source}")]
    #[diagnostic(code(lint_gate::engine_failure))]
    Engine {
        /// Engine that failed.
        engine: String,
        /// File being checked.
        path: PathBuf,
        /// The engine's error.
        source: EngineError,
    },

    /// An engine rejected its rule configuration.
    #[error("Failed to configure engine `{engine}`: {source}")]
    #[diagnostic(code(lint_gate::configure))]
    Configure {
        /// Engine that rejected the configuration.
        engine: String,
        /// The engine's error.
        source: EngineError,
    },

    /// Diagnostics were found across the stream.
    #[error("Validation failed with {count} {}", error_noun(.count))]
    #[diagnostic(
        code(lint_gate::validation_failed),
        help("see the reported diagnostics above")
    )]
    ValidationFailed {
        /// Total diagnostic count over every engine and file.
        count: usize,
    },

    /// The validation gate was used after it reached a verdict.
    #[error("Validation gate already completed")]
    #[diagnostic(code(lint_gate::gate_closed))]
    GateClosed,
}

fn error_noun(count: &usize) -> &'static str {
    if *count == 1 {
        "error"
    } else {
        "errors"
    }
}
