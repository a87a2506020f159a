//! Rules checked one line at a time.

use super::{Line, TextContext, TextRule};
use crate::options::{bool_option, keyword_choice, severity, string_list_option, usize_option};
use lint_gate_core::{EngineError, RuleSetting, Severity, Violation};

/// Rule code for max-len.
pub const MAX_LEN_CODE: &str = "STY001";
/// Rule name for max-len.
pub const MAX_LEN_NAME: &str = "max-len";

/// Rule code for no-trailing-spaces.
pub const TRAILING_CODE: &str = "STY002";
/// Rule name for no-trailing-spaces.
pub const TRAILING_NAME: &str = "no-trailing-spaces";

/// Rule code for no-tabs.
pub const TABS_CODE: &str = "STY003";
/// Rule name for no-tabs.
pub const TABS_NAME: &str = "no-tabs";

/// Rule code for linebreak-style.
pub const LINEBREAK_CODE: &str = "STY007";
/// Rule name for linebreak-style.
pub const LINEBREAK_NAME: &str = "linebreak-style";

/// Rule code for no-warning-comments.
pub const WARNING_COMMENTS_CODE: &str = "STY008";
/// Rule name for no-warning-comments.
pub const WARNING_COMMENTS_NAME: &str = "no-warning-comments";

fn each_line<F>(ctx: &TextContext, mut check: F) -> Vec<Violation>
where
    F: FnMut(&Line) -> Option<Violation>,
{
    ctx.lines.iter().filter_map(|line| check(line)).collect()
}

fn column_of(text: &str, byte_index: usize) -> usize {
    text[..byte_index].chars().count() + 1
}

/// Limits line length.
///
/// Options: `code` (default 100), `tab_width` (default 4),
/// `ignore_urls` (default true).
#[derive(Debug, Clone)]
pub struct MaxLen {
    max: usize,
    tab_width: usize,
    ignore_urls: bool,
    severity: Severity,
}

impl MaxLen {
    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error if an option has the wrong type.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        let max = match setting {
            RuleSetting::Number(n) => usize::try_from(*n).map_err(|_| {
                crate::options::invalid(MAX_LEN_NAME, "code", "a non-negative integer")
            })?,
            _ => usize_option(MAX_LEN_NAME, setting, "code", 100)?,
        };
        Ok(Self {
            max,
            tab_width: usize_option(MAX_LEN_NAME, setting, "tab_width", 4)?,
            ignore_urls: bool_option(MAX_LEN_NAME, setting, "ignore_urls", true)?,
            severity: severity(setting),
        })
    }

    fn width(&self, text: &str) -> usize {
        text.chars()
            .map(|c| if c == '\t' { self.tab_width } else { 1 })
            .sum()
    }
}

impl TextRule for MaxLen {
    fn name(&self) -> &'static str {
        MAX_LEN_NAME
    }

    fn check(&self, ctx: &TextContext) -> Vec<Violation> {
        each_line(ctx, |line| {
            let width = self.width(line.text);
            if width <= self.max || (self.ignore_urls && line.text.contains("://")) {
                return None;
            }
            Some(Violation::new(
                MAX_LEN_CODE,
                MAX_LEN_NAME,
                self.severity,
                ctx.location(line.number, 1),
                format!(
                    "This line has a length of {width}. Maximum allowed is {}.",
                    self.max
                ),
            ))
        })
    }
}

/// Forbids whitespace at the end of lines.
///
/// Options: `skip_blank_lines` (default false).
#[derive(Debug, Clone)]
pub struct NoTrailingSpaces {
    skip_blank_lines: bool,
    severity: Severity,
}

impl NoTrailingSpaces {
    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error if an option has the wrong type.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        Ok(Self {
            skip_blank_lines: bool_option(TRAILING_NAME, setting, "skip_blank_lines", false)?,
            severity: severity(setting),
        })
    }
}

impl TextRule for NoTrailingSpaces {
    fn name(&self) -> &'static str {
        TRAILING_NAME
    }

    fn check(&self, ctx: &TextContext) -> Vec<Violation> {
        each_line(ctx, |line| {
            let kept = line.text.trim_end_matches([' ', '\t']);
            if kept.len() == line.text.len() || (self.skip_blank_lines && kept.is_empty()) {
                return None;
            }
            Some(Violation::new(
                TRAILING_CODE,
                TRAILING_NAME,
                self.severity,
                ctx.location(line.number, column_of(line.text, kept.len())),
                "Trailing spaces not allowed.",
            ))
        })
    }
}

/// Forbids tab characters.
///
/// Options: `allow_indentation` (default false) permits tabs in leading
/// whitespace.
#[derive(Debug, Clone)]
pub struct NoTabs {
    allow_indentation: bool,
    severity: Severity,
}

impl NoTabs {
    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error if an option has the wrong type.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        Ok(Self {
            allow_indentation: bool_option(TABS_NAME, setting, "allow_indentation", false)?,
            severity: severity(setting),
        })
    }
}

impl TextRule for NoTabs {
    fn name(&self) -> &'static str {
        TABS_NAME
    }

    fn check(&self, ctx: &TextContext) -> Vec<Violation> {
        each_line(ctx, |line| {
            let start = if self.allow_indentation {
                line.text.len() - line.text.trim_start_matches([' ', '\t']).len()
            } else {
                0
            };
            let index = line.text[start..].find('\t')? + start;
            Some(Violation::new(
                TABS_CODE,
                TABS_NAME,
                self.severity,
                ctx.location(line.number, column_of(line.text, index)),
                "Unexpected tab character.",
            ))
        })
    }
}

/// Enforces one kind of line terminator: `"unix"` (default) or `"windows"`.
#[derive(Debug, Clone)]
pub struct LinebreakStyle {
    windows: bool,
    severity: Severity,
}

impl LinebreakStyle {
    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error for a style other than `unix` or `windows`.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        let style = keyword_choice(LINEBREAK_NAME, setting, &["unix", "windows"], "unix")?;
        Ok(Self {
            windows: style == "windows",
            severity: severity(setting),
        })
    }
}

impl TextRule for LinebreakStyle {
    fn name(&self) -> &'static str {
        LINEBREAK_NAME
    }

    fn check(&self, ctx: &TextContext) -> Vec<Violation> {
        let (expected, found) = if self.windows {
            ("CRLF", "LF")
        } else {
            ("LF", "CRLF")
        };
        each_line(ctx, |line| {
            if !line.terminated || line.crlf == self.windows {
                return None;
            }
            Some(Violation::new(
                LINEBREAK_CODE,
                LINEBREAK_NAME,
                self.severity,
                ctx.location(line.number, line.text.chars().count() + 1),
                format!("Expected linebreaks to be '{expected}' but found '{found}'."),
            ))
        })
    }
}

/// Forbids comments carrying warning terms such as `TODO`.
///
/// Options: `terms` (default `["todo", "fixme", "xxx"]`, case-insensitive),
/// `location` (`"start"` of the comment, the default, or `"anywhere"`).
#[derive(Debug, Clone)]
pub struct NoWarningComments {
    terms: Vec<String>,
    anywhere: bool,
    severity: Severity,
}

impl NoWarningComments {
    /// Creates the rule from its configured setting.
    ///
    /// # Errors
    ///
    /// Returns an error if an option has the wrong type or value.
    pub fn from_setting(setting: &RuleSetting) -> Result<Self, EngineError> {
        let terms = string_list_option(
            WARNING_COMMENTS_NAME,
            setting,
            "terms",
            &["todo", "fixme", "xxx"],
        )?;
        let location = match setting.option("location") {
            None => "start",
            Some(value) => value.as_str().ok_or_else(|| {
                crate::options::invalid(WARNING_COMMENTS_NAME, "location", "a string")
            })?,
        };
        let anywhere = match location {
            "start" => false,
            "anywhere" => true,
            _ => {
                return Err(crate::options::invalid(
                    WARNING_COMMENTS_NAME,
                    "location",
                    "\"start\" or \"anywhere\"",
                ))
            }
        };
        Ok(Self {
            terms: terms.into_iter().map(|t| t.to_lowercase()).collect(),
            anywhere,
            severity: severity(setting),
        })
    }

    fn matched_term(&self, comment: &str) -> Option<&str> {
        let body = comment
            .trim_start_matches(['/', '*', '!'])
            .trim_start()
            .to_lowercase();
        self.terms
            .iter()
            .find(|term| {
                if self.anywhere {
                    body.match_indices(term.as_str())
                        .any(|(i, _)| is_word_at(&body, i, term.len()))
                } else {
                    body.starts_with(term.as_str()) && is_word_at(&body, 0, term.len())
                }
            })
            .map(String::as_str)
    }
}

impl TextRule for NoWarningComments {
    fn name(&self) -> &'static str {
        WARNING_COMMENTS_NAME
    }

    fn check(&self, ctx: &TextContext) -> Vec<Violation> {
        each_line(ctx, |line| {
            let start = comment_start(line.text)?;
            let term = self.matched_term(&line.text[start..])?;
            Some(Violation::new(
                WARNING_COMMENTS_CODE,
                WARNING_COMMENTS_NAME,
                self.severity,
                ctx.location(line.number, column_of(line.text, start)),
                format!("Unexpected '{term}' comment."),
            ))
        })
    }
}

fn is_word_at(text: &str, start: usize, len: usize) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let before = text[..start].chars().next_back().map_or(true, |c| !is_word(c));
    let after = text[start + len..].chars().next().map_or(true, |c| !is_word(c));
    before && after
}

/// Byte index where a `//` or `/*` comment starts, ignoring ones inside
/// string or char literals on the same line.
fn comment_start(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'\'' if !in_string => i = char_literal_end(bytes, i).unwrap_or(i),
            b'/' if !in_string && matches!(bytes.get(i + 1), Some(b'/' | b'*')) => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index of the closing quote of a char literal opened at `open`, or `None`
/// for a lifetime.
fn char_literal_end(bytes: &[u8], open: usize) -> Option<usize> {
    match bytes.get(open + 1)? {
        b'\\' => {
            let escaped = open + 2;
            bytes
                .get(escaped + 1..)?
                .iter()
                .position(|&b| b == b'\'')
                .map(|offset| escaped + 1 + offset)
        }
        _ => (bytes.get(open + 2) == Some(&b'\'')).then_some(open + 2),
    }
}
