//! Run summaries printed after the reporters.
//!
//! Diagnostics go to stdout through the pipeline's reporters; the summary
//! goes to stderr so JSON output stays parseable.

use lint_gate_core::{PipelineError, RunSummary};

/// Prints the summary of a run without diagnostics.
pub fn print_success(summary: &RunSummary) {
    eprintln!(
        "\x1b[32mNo problems found in {} file(s) ({} checked)\x1b[0m",
        summary.files_seen, summary.files_checked
    );
}

/// Prints the gate's failure with its diagnostic code.
pub fn print_failure(err: PipelineError) {
    eprintln!("{:?}", miette::Report::new(err));
}
