//! Source positions attached to violations.

use std::fmt;

/// A point in a feature file or glue source.
///
/// Locations are presentation data only: checkers group and compare by names
/// and pattern sources, never by location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Identifier of the source document (URI or path).
    pub file: String,
    /// Human-readable token found at the location (scenario name, step text,
    /// step definition attribution).
    pub token: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, or `0` when the producer has no column information.
    pub column: usize,
}

impl Location {
    /// Create a location with full position information.
    ///
    /// # Examples
    /// ```
    /// use cuke_inspector::Location;
    ///
    /// let location = Location::new("a.feature", "Checkout", 3, 5);
    /// assert_eq!(location.to_string(), "a.feature:[3,5]");
    /// ```
    #[must_use]
    pub fn new(
        file: impl Into<String>,
        token: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            file: file.into(),
            token: token.into(),
            line,
            column,
        }
    }

    /// Create a location for producers that only report a line.
    #[must_use]
    pub fn at_line(file: impl Into<String>, token: impl Into<String>, line: usize) -> Self {
        Self::new(file, token, line, 0)
    }

    /// Replace the token while keeping the position.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{},{}]", self.file, self.line, self.column)
    }
}
