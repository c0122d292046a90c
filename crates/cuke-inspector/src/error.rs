//! Error types surfaced while configuring and building an inspection.
//!
//! Configuration and parse failures are fatal: they are returned before any
//! checker runs. Failures inside pattern matching are recovered locally by
//! the matching facade and never reach this type.

use std::path::PathBuf;

use thiserror::Error;

use crate::glue::GlueError;

/// Errors that abort an inspection before checkers can run.
#[derive(Debug, Error)]
pub enum InspectorError {
    /// A configured feature source or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A feature source could not be parsed as Gherkin.
    #[error("failed to parse feature '{uri}': {source}")]
    Parse {
        /// Identifier of the offending source.
        uri: String,
        /// The parser error.
        #[source]
        source: gherkin::ParseError,
    },

    /// The parser produced a document without a feature.
    #[error("no feature in {uri}")]
    MissingFeature {
        /// Identifier of the offending source.
        uri: String,
    },

    /// A checker was configured with a malformed regular expression.
    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        /// The expression as supplied by the caller.
        pattern: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// Step definitions could not be discovered from a glue location.
    #[error(transparent)]
    Glue(#[from] GlueError),
}

impl InspectorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
