//! The terminal validation gate.

use crate::error::PipelineError;
use crate::record::FileRecord;
use crate::stage::Stage;
use tracing::{debug, info};

/// Outcome decided by the gate at end of stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No diagnostics were seen.
    Pass,
    /// The given number of diagnostics were seen.
    Fail(usize),
}

/// Lifecycle of a [`ValidationGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Records are still arriving.
    Accumulating,
    /// End of stream was reached and a verdict recorded.
    Completed(Verdict),
}

/// Sums every engine's diagnostic count and fails the run once, at end of stream.
#[derive(Debug)]
pub struct ValidationGate {
    total: usize,
    state: GateState,
}

impl Default for ValidationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationGate {
    /// Creates a gate with a zero total.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: 0,
            state: GateState::Accumulating,
        }
    }

    /// Running total of diagnostics seen so far.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }
}

impl Stage for ValidationGate {
    fn name(&self) -> &str {
        "validation-gate"
    }

    fn process(&mut self, record: FileRecord) -> Result<FileRecord, PipelineError> {
        if self.state != GateState::Accumulating {
            return Err(PipelineError::GateClosed);
        }
        for (engine, set) in record.annotations() {
            debug!(
                "gate: {} +{} from {}",
                record.path().display(),
                set.error_count(),
                engine
            );
            self.total += set.error_count();
        }
        Ok(record)
    }

    fn finish(&mut self) -> Result<(), PipelineError> {
        if self.state != GateState::Accumulating {
            return Err(PipelineError::GateClosed);
        }

        if self.total == 0 {
            self.state = GateState::Completed(Verdict::Pass);
            info!("Validation passed");
            Ok(())
        } else {
            self.state = GateState::Completed(Verdict::Fail(self.total));
            info!("Validation failed with {} diagnostic(s)", self.total);
            Err(PipelineError::ValidationFailed { count: self.total })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DiagnosticSet;
    use crate::types::{Location, Severity, Violation};

    fn leveled(n: usize, severity: Severity) -> DiagnosticSet {
        DiagnosticSet::new(
            (0..n)
                .map(|i| Violation::new("T001", "test", severity, Location::new("a.rs", i + 1, 1), "x"))
                .collect(),
        )
    }

    fn diagnostics(n: usize) -> DiagnosticSet {
        leveled(n, Severity::Error)
    }

    #[test]
    fn passes_when_nothing_was_reported() {
        let mut gate = ValidationGate::new();
        gate.process(FileRecord::buffered("a.rs", "").with_annotation("ast", diagnostics(0)))
            .expect("forwards");
        gate.process(FileRecord::null("dir")).expect("forwards");

        assert!(gate.finish().is_ok());
        assert_eq!(gate.state(), GateState::Completed(Verdict::Pass));
    }

    #[test]
    fn sums_all_engines_across_records() {
        let mut gate = ValidationGate::new();
        gate.process(
            FileRecord::buffered("a.rs", "")
                .with_annotation("ast", diagnostics(2))
                .with_annotation("style", diagnostics(1)),
        )
        .expect("forwards");
        gate.process(FileRecord::buffered("b.rs", "").with_annotation("style", diagnostics(4)))
            .expect("forwards");

        assert_eq!(gate.total(), 7);
        assert_eq!(gate.state(), GateState::Accumulating);

        let err = gate.finish().expect_err("should fail");
        assert_eq!(err.to_string(), "Validation failed with 7 errors");
        assert_eq!(gate.state(), GateState::Completed(Verdict::Fail(7)));
    }

    #[test]
    fn warnings_alone_do_not_fail() {
        let mut gate = ValidationGate::new();
        gate.process(FileRecord::buffered("a.rs", "").with_annotation("ast", leveled(3, Severity::Warning)))
            .expect("forwards");
        assert_eq!(gate.total(), 0);
        assert!(gate.finish().is_ok());

        let mut gate = ValidationGate::new();
        let mut mixed = leveled(1, Severity::Warning).errors().to_vec();
        mixed.extend(diagnostics(1).errors().iter().cloned());
        gate.process(FileRecord::buffered("a.rs", "").with_annotation("ast", DiagnosticSet::new(mixed)))
            .expect("forwards");
        let err = gate.finish().expect_err("should fail");
        assert_eq!(err.to_string(), "Validation failed with 1 error");
    }

    #[test]
    fn forwards_records_unchanged_regardless_of_count() {
        let mut gate = ValidationGate::new();
        let record = FileRecord::buffered("a.rs", "x").with_annotation("ast", diagnostics(3));
        assert_eq!(gate.process(record.clone()).expect("forwards"), record);
    }

    #[test]
    fn completes_exactly_once() {
        let mut gate = ValidationGate::new();
        gate.finish().expect("passes");
        assert!(matches!(gate.finish(), Err(PipelineError::GateClosed)));
        assert!(matches!(
            gate.process(FileRecord::null("late")),
            Err(PipelineError::GateClosed)
        ));
        assert_eq!(gate.state(), GateState::Completed(Verdict::Pass));
    }
}
