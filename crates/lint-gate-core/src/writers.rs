//! Built-in diagnostic writers.

use crate::engine::DiagnosticWriter;
use crate::record::DiagnosticSet;
use std::io::Write;
use tracing::warn;

/// Groups diagnostics under their file path, one indented line each.
///
/// ```text
/// src/lib.rs
///   3:13  error  .unwrap() is forbidden in production code  no-unwrap-expect
/// ```
pub struct StylishWriter<W: Write> {
    out: W,
}

impl StylishWriter<std::io::Stdout> {
    /// Creates a writer on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> StylishWriter<W> {
    /// Creates a writer on `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_set(&mut self, set: &DiagnosticSet) -> std::io::Result<()> {
        let Some(first) = set.errors().first() else {
            return Ok(());
        };
        writeln!(self.out, "{}", first.location.file.display())?;
        for v in set.errors() {
            writeln!(
                self.out,
                "  {}:{}  {}  {}  {}",
                v.location.line, v.location.column, v.severity, v.message, v.rule
            )?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> DiagnosticWriter for StylishWriter<W> {
    fn write(&mut self, sets: &[&DiagnosticSet]) {
        for set in sets {
            if let Err(e) = self.write_set(set) {
                warn!("Failed to write diagnostics: {e}");
            }
        }
    }
}

/// One line per diagnostic: `file:line:column: severity [code] message`.
pub struct CompactWriter<W: Write> {
    out: W,
}

impl CompactWriter<std::io::Stdout> {
    /// Creates a writer on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> CompactWriter<W> {
    /// Creates a writer on `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DiagnosticWriter for CompactWriter<W> {
    fn write(&mut self, sets: &[&DiagnosticSet]) {
        for violation in sets.iter().flat_map(|s| s.errors()) {
            if let Err(e) = writeln!(self.out, "{violation}") {
                warn!("Failed to write diagnostics: {e}");
                return;
            }
        }
    }
}

/// One JSON document per write call.
pub struct JsonWriter<W: Write> {
    out: W,
}

impl JsonWriter<std::io::Stdout> {
    /// Creates a writer on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonWriter<W> {
    /// Creates a writer on `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DiagnosticWriter for JsonWriter<W> {
    fn write(&mut self, sets: &[&DiagnosticSet]) {
        let result = serde_json::to_writer(&mut self.out, sets)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out));
        if let Err(e) = result {
            warn!("Failed to write diagnostics: {e}");
        }
    }
}
