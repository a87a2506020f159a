//! Rules about the overall shape of a file.

use super::{TextContext, TextRule};
use crate::options::{keyword_choice, severity, usize_option};
use lint_gate_core::{EngineError, RuleSetting, Severity, Violation};

/// Rule code for eol-last.
pub const EOL_CODE: &str = "STY004";
/// Rule name for eol-last.
pub const EOL_NAME: &str = "eol-last";

/// Rule code for no-multiple-empty-lines.
pub const EMPTY_LINES_CODE: &str = "STY005";
/// Rule name for no-multiple-empty-lines.
pub const EMPTY_LINES_NAME: &str = "no-multiple-empty-lines";

/// Rule code for unicode-bom.
pub const BOM_CODE: &str = "STY006";
/// Rule name for unicode-bom.
pub const BOM_NAME: &str = "unicode-bom";

/// Requires a trailing newline (`"always"`, the default) or forbids one
/// (`"never"`). Empty files are not checked.
#[derive(Debug, Clone)]
pub struct EolLast {
    always: bool,
    severity: Severity,
}

impl EolLast {
    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error for a mode other than `always` or `never`.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        let mode = keyword_choice(EOL_NAME, setting, &["always", "never"], "always")?;
        Ok(Self {
            always: mode == "always",
            severity: severity(setting),
        })
    }
}

impl TextRule for EolLast {
    fn name(&self) -> &'static str {
        EOL_NAME
    }

    fn check(&self, ctx: &TextContext) -> Vec<Violation> {
        let Some(last) = ctx.lines.last() else {
            return Vec::new();
        };
        let message = match (self.always, last.terminated) {
            (true, false) => "Newline required at end of file but not found.",
            (false, true) => "Newline not allowed at end of file.",
            _ => return Vec::new(),
        };
        vec![Violation::new(
            EOL_CODE,
            EOL_NAME,
            self.severity,
            ctx.location(last.number, last.text.chars().count() + 1),
            message,
        )]
    }
}

/// Limits runs of blank lines.
///
/// Options: `max` (default 2).
#[derive(Debug, Clone)]
pub struct NoMultipleEmptyLines {
    max: usize,
    severity: Severity,
}

impl NoMultipleEmptyLines {
    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error if `max` is not a non-negative integer.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        Ok(Self {
            max: usize_option(EMPTY_LINES_NAME, setting, "max", 2)?,
            severity: severity(setting),
        })
    }
}

impl TextRule for NoMultipleEmptyLines {
    fn name(&self) -> &'static str {
        EMPTY_LINES_NAME
    }

    fn check(&self, ctx: &TextContext) -> Vec<Violation> {
        let noun = if self.max == 1 { "line" } else { "lines" };
        let mut violations = Vec::new();
        let mut run = 0;
        for line in &ctx.lines {
            if !line.text.trim().is_empty() {
                run = 0;
                continue;
            }
            run += 1;
            // One report per run, on the first line past the limit.
            if run == self.max + 1 {
                violations.push(Violation::new(
                    EMPTY_LINES_CODE,
                    EMPTY_LINES_NAME,
                    self.severity,
                    ctx.location(line.number, 1),
                    format!("More than {} blank {noun} not allowed.", self.max),
                ));
            }
        }
        violations
    }
}

/// Forbids a leading byte order mark (`"never"`, the default) or requires
/// one (`"always"`).
#[derive(Debug, Clone)]
pub struct UnicodeBom {
    always: bool,
    severity: Severity,
}

impl UnicodeBom {
    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error for a mode other than `always` or `never`.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        let mode = keyword_choice(BOM_NAME, setting, &["always", "never"], "never")?;
        Ok(Self {
            always: mode == "always",
            severity: severity(setting),
        })
    }
}

impl TextRule for UnicodeBom {
    fn name(&self) -> &'static str {
        BOM_NAME
    }

    fn check(&self, ctx: &TextContext) -> Vec<Violation> {
        let message = match (self.always, ctx.content.starts_with('\u{feff}')) {
            (true, false) => "Expected Unicode BOM (Byte Order Mark).",
            (false, true) => "Unexpected Unicode BOM (Byte Order Mark).",
            _ => return Vec::new(),
        };
        vec![Violation::new(
            BOM_CODE,
            BOM_NAME,
            self.severity,
            ctx.location(1, 1),
            message,
        )]
    }
}
