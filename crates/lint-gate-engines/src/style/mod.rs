//! Line-oriented style engine.
//!
//! Works on raw text, so it checks files the syntax engine cannot parse.
//! Besides rules, its table accepts `exclude-files`, a list of glob patterns
//! for files this engine skips. The syntax engine has no such policy.

mod layout;
mod lines;

use crate::options::unknown_rule;
use crate::RuleInfo;
use glob::Pattern;
use lint_gate_core::{
    Analyzer, AnalyzerBox, EngineError, EngineSettings, Location, RuleConfiguration, RuleSetting,
    Violation,
};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use layout::{EolLast, NoMultipleEmptyLines, UnicodeBom};
pub use lines::{LinebreakStyle, MaxLen, NoTabs, NoTrailingSpaces, NoWarningComments};

/// Table key holding glob patterns of files to skip.
pub const EXCLUDE_FILES: &str = "exclude-files";

/// Rules this engine understands.
pub const RULES: &[RuleInfo] = &[
    RuleInfo::new(lines::MAX_LEN_CODE, lines::MAX_LEN_NAME, "Limits line length"),
    RuleInfo::new(
        lines::TRAILING_CODE,
        lines::TRAILING_NAME,
        "Forbids trailing whitespace",
    ),
    RuleInfo::new(lines::TABS_CODE, lines::TABS_NAME, "Forbids tab characters"),
    RuleInfo::new(
        layout::EOL_CODE,
        layout::EOL_NAME,
        "Requires (or forbids) a newline at end of file",
    ),
    RuleInfo::new(
        layout::EMPTY_LINES_CODE,
        layout::EMPTY_LINES_NAME,
        "Limits consecutive blank lines",
    ),
    RuleInfo::new(
        layout::BOM_CODE,
        layout::BOM_NAME,
        "Requires (or forbids) a byte order mark",
    ),
    RuleInfo::new(
        lines::LINEBREAK_CODE,
        lines::LINEBREAK_NAME,
        "Enforces unix or windows line endings",
    ),
    RuleInfo::new(
        lines::WARNING_COMMENTS_CODE,
        lines::WARNING_COMMENTS_NAME,
        "Forbids TODO/FIXME style comments",
    ),
];

/// One physical line of a file.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    /// 1-indexed line number.
    pub number: usize,
    /// Text without the line terminator.
    pub text: &'a str,
    /// Whether the line ends with `\n`.
    pub terminated: bool,
    /// Whether the terminator is `\r\n`.
    pub crlf: bool,
}

/// A file split into lines, handed to each [`TextRule`].
#[derive(Debug, Clone)]
pub struct TextContext<'a> {
    /// Path of the file.
    pub path: &'a Path,
    /// Raw file contents, including any byte order mark.
    pub content: &'a str,
    /// Lines of the contents after the byte order mark.
    pub lines: Vec<Line<'a>>,
}

impl<'a> TextContext<'a> {
    /// Splits `content` into lines.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str) -> Self {
        let body = content.strip_prefix('\u{feff}').unwrap_or(content);
        let lines = body
            .split_inclusive('\n')
            .enumerate()
            .map(|(i, raw)| {
                let (text, terminated) = match raw.strip_suffix('\n') {
                    Some(text) => (text, true),
                    None => (raw, false),
                };
                let (text, crlf) = match text.strip_suffix('\r') {
                    Some(text) if terminated => (text, true),
                    _ => (text, false),
                };
                Line {
                    number: i + 1,
                    text,
                    terminated,
                    crlf,
                }
            })
            .collect();
        Self {
            path,
            content,
            lines,
        }
    }

    /// Location within this file.
    #[must_use]
    pub fn location(&self, line: usize, column: usize) -> Location {
        Location::new(self.path, line, column)
    }
}

/// A rule over the raw text of a file.
pub trait TextRule {
    /// Kebab-case rule name.
    fn name(&self) -> &'static str;

    /// Checks one file.
    fn check(&self, ctx: &TextContext) -> Vec<Violation>;
}

/// Engine running the configured [`TextRule`]s.
#[derive(Default)]
pub struct StyleEngine {
    rules: Vec<Box<dyn TextRule>>,
    exclude: Vec<Pattern>,
    base_dir: Option<PathBuf>,
}

impl StyleEngine {
    /// Engine name and annotation key.
    pub const NAME: &'static str = "style";

    /// Creates an unconfigured engine.
    ///
    /// `exclude-files` patterns match paths relative to `base_dir` when one
    /// is set, as well as the record path itself.
    #[must_use]
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            base_dir: settings.base_dir.clone(),
            ..Self::default()
        }
    }

    /// Boxed constructor, usable as an analyzer factory.
    #[must_use]
    pub fn factory(settings: &EngineSettings) -> AnalyzerBox {
        Box::new(Self::new(settings))
    }

    /// Names of the rules currently active.
    #[must_use]
    pub fn active_rules(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    fn build_rule(name: &str, setting: &RuleSetting) -> Result<Box<dyn TextRule>, EngineError> {
        let rule: Box<dyn TextRule> = match name {
            lines::MAX_LEN_NAME => Box::new(MaxLen::from_setting(setting)?),
            lines::TRAILING_NAME => Box::new(NoTrailingSpaces::from_setting(setting)?),
            lines::TABS_NAME => Box::new(NoTabs::from_setting(setting)?),
            lines::LINEBREAK_NAME => Box::new(LinebreakStyle::from_setting(setting)?),
            lines::WARNING_COMMENTS_NAME => Box::new(NoWarningComments::from_setting(setting)?),
            layout::EOL_NAME => Box::new(EolLast::from_setting(setting)?),
            layout::EMPTY_LINES_NAME => Box::new(NoMultipleEmptyLines::from_setting(setting)?),
            layout::BOM_NAME => Box::new(UnicodeBom::from_setting(setting)?),
            other => return Err(unknown_rule(Self::NAME, other)),
        };
        Ok(rule)
    }

    fn exclude_patterns(setting: &RuleSetting) -> Result<Vec<Pattern>, EngineError> {
        let patterns: Vec<&str> = match setting {
            RuleSetting::Text(pattern) => vec![pattern.as_str()],
            RuleSetting::List(items) => items
                .iter()
                .map(toml::Value::as_str)
                .collect::<Option<_>>()
                .ok_or_else(|| {
                    EngineError::new(format!("`{EXCLUDE_FILES}` must be a list of glob patterns"))
                })?,
            RuleSetting::Toggle(false) => Vec::new(),
            _ => {
                return Err(EngineError::new(format!(
                    "`{EXCLUDE_FILES}` must be a list of glob patterns"
                )))
            }
        };

        patterns
            .into_iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    EngineError::new(format!("invalid `{EXCLUDE_FILES}` pattern `{p}`: {e}"))
                })
            })
            .collect()
    }
}

impl Analyzer for StyleEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn configure(&mut self, rules: &RuleConfiguration) -> Result<(), EngineError> {
        let mut active = Vec::new();
        let mut exclude = Vec::new();
        for (name, setting) in rules.iter() {
            if name == EXCLUDE_FILES {
                exclude = Self::exclude_patterns(setting)?;
                continue;
            }
            let rule = Self::build_rule(name, setting)?;
            if setting.is_enabled() {
                active.push(rule);
            }
        }
        self.rules = active;
        self.exclude = exclude;
        debug!(
            "style: {} active rule(s), {} exclude pattern(s)",
            self.rules.len(),
            self.exclude.len()
        );
        Ok(())
    }

    fn check_text(&self, contents: &str, path: &Path) -> Result<Vec<Violation>, EngineError> {
        let ctx = TextContext::new(path, contents);
        let mut violations: Vec<Violation> =
            self.rules.iter().flat_map(|rule| rule.check(&ctx)).collect();
        violations.sort_by_key(|v| (v.location.line, v.location.column));
        Ok(violations)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = self
            .base_dir
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path);
        self.exclude
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
    }
}

#[cfg(test)]
pub(crate) fn check_with(rule: &dyn TextRule, content: &str) -> Vec<Violation> {
    let ctx = TextContext::new(Path::new("test.rs"), content);
    rule.check(&ctx)
}
