//! Plain-text rendering of violations.

use crate::violation::Violation;

const INDENT: &str = "   ";

/// Render one violation.
///
/// Single-location violations render as `<file>:[<line>,<column>] <message>`.
/// Violations spanning several occurrences render the message followed by
/// one indented `<file>:[<line>,<column>] <token>` line per occurrence.
#[must_use]
pub fn format(violation: &Violation) -> String {
    if let Some(primary) = violation.primary_location.as_ref() {
        return format!("{primary} {}", violation.message);
    }
    violation
        .locations
        .iter()
        .fold(violation.message.clone(), |mut out, location| {
            out.push_str(&format!("\n{INDENT}{location} {}", location.token));
            out
        })
}

/// Render many violations, one block per violation, each ending in a newline.
#[must_use]
pub fn format_all(violations: &[Violation]) -> String {
    violations.iter().fold(String::new(), |mut out, violation| {
        out.push_str(&format(violation));
        out.push('\n');
        out
    })
}
