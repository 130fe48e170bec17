//! Rule pattern compilation and template parameter resolution.
//!
//! # Responsibilities
//! - Compile a rule `src` into an anchored, case-insensitive matcher
//! - Record capture group names in left-to-right order
//! - Substitute `$1` / `$name` tokens in destination and header templates
//!
//! # Design Decisions
//! - Anchoring wraps the source as `^(?:src)$`, so sources that already carry
//!   `^`/`$` compile to the same matcher
//! - Unknown tokens resolve to the empty string, never to an error

use regex::{Captures, Regex, RegexBuilder};
use thiserror::Error;

/// A rule source that could not be compiled.
#[derive(Debug, Error)]
#[error("invalid pattern `{source_pattern}`: {error}")]
pub struct PatternError {
    pub source_pattern: String,
    #[source]
    pub error: regex::Error,
}

/// A compiled rule source.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    /// One entry per capturing group (group 0 excluded), `""` when unnamed.
    names: Vec<String>,
}

impl Pattern {
    /// Compile `source` into a fully-anchored, case-insensitive matcher.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(&format!("^(?:{source})$"))
            .case_insensitive(true)
            .build()
            .map_err(|error| PatternError {
                source_pattern: source.to_string(),
                error,
            })?;

        let names = regex
            .capture_names()
            .skip(1)
            .map(|name| name.unwrap_or_default().to_string())
            .collect();

        Ok(Self { regex, names })
    }

    /// Capture group names, left to right.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Match the whole of `path`. Group 0 is the full match.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Captures<'p>> {
        self.regex.captures(path)
    }
}

/// Replace every `$token` in `template` with the capture it refers to.
///
/// A token is `$` followed by one or more ASCII alphanumerics. Tokens equal to
/// a capture name select that group; anything else selects the group given by
/// the token's leading digits. Missing groups become `""`.
pub fn resolve(template: &str, captures: &Captures<'_>, names: &[String]) -> String {
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len());

    let mut i = 0usize;
    let mut copied = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let start = i + 1;
        let len = bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        if len == 0 {
            i += 1;
            continue;
        }

        let end = start + len;
        out.push_str(&template[copied..i]);
        let token = &template[start..end];
        if let Some(value) = capture_index(token, names).and_then(|idx| captures.get(idx)) {
            out.push_str(value.as_str());
        }

        i = end;
        copied = end;
    }

    out.push_str(&template[copied..]);
    out
}

fn capture_index(token: &str, names: &[String]) -> Option<usize> {
    if let Some(pos) = names.iter().position(|name| name == token) {
        // names skips group 0
        return Some(pos + 1);
    }

    let digits = token.bytes().take_while(u8::is_ascii_digit).count();
    token[..digits].parse().ok()
}
