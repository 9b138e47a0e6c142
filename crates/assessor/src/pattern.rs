//! Builds [`Regex`] matchers from a pattern plus a JavaScript-style flags
//! string (`"im"`, `"gs"`, ...), the form workflow authors already write.

use regex::{Regex, RegexBuilder};

use crate::error::{AssessorError, Result};

/// Compiles `pattern` with the given flag letters.
///
/// Supported flags: `i` (case-insensitive), `m` (multi-line anchors), `s`
/// (dot matches newline), `x` (ignore whitespace), `u` (unicode, always on)
/// plus `g` and `d` (global, match indices), which do not change a single
/// match and are ignored. Anything else,
/// including a repeated letter, is rejected.
pub fn compile_regex(pattern: &str, flags: Option<&str>) -> Result<Regex> {
    let flags = flags.unwrap_or_default();
    let invalid = |reason: String| AssessorError::InvalidRegex {
        pattern: pattern.to_string(),
        flags: flags.to_string(),
        reason,
    };

    let mut builder = RegexBuilder::new(pattern);
    let mut seen = String::new();

    for flag in flags.chars() {
        if seen.contains(flag) {
            return Err(invalid(format!("flag '{}' given more than once", flag)));
        }
        seen.push(flag);

        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'u' => {
                builder.unicode(true);
            }
            // Match-position and iteration flags; no effect on a single match.
            'g' | 'd' => {}
            other => return Err(invalid(format!("unsupported flag '{}'", other))),
        }
    }

    builder.build().map_err(|e| invalid(e.to_string()))
}
