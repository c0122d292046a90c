//! The uniform result type produced by every checker.

use std::fmt;

use crate::checkers::CheckKind;
use crate::location::Location;

/// One reported rule breach.
///
/// A violation either points at a single primary location or, when it spans
/// several occurrences, lists them in `locations` with no primary location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Human-readable description.
    pub message: String,
    /// The single location this violation is about, if any.
    pub primary_location: Option<Location>,
    /// Every occurrence, for violations without a primary location.
    pub locations: Vec<Location>,
    /// The checker that produced the violation.
    pub check: CheckKind,
}

impl Violation {
    /// A violation about one location.
    #[must_use]
    pub fn single(check: CheckKind, message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            primary_location: Some(location),
            locations: Vec::new(),
            check,
        }
    }

    /// A violation spanning several occurrences.
    #[must_use]
    pub fn spanning(check: CheckKind, message: impl Into<String>, locations: Vec<Location>) -> Self {
        Self {
            message: message.into(),
            primary_location: None,
            locations,
            check,
        }
    }

    /// The primary location followed by the listed ones.
    pub fn all_locations(&self) -> impl Iterator<Item = &Location> {
        self.primary_location.iter().chain(&self.locations)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format(self))
    }
}
