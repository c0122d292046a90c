//! Feature source parsing.
//!
//! Wraps `gherkin` so every source becomes exactly one
//! [`SpecificationDocument`] or a fatal [`InspectorError`].

use std::path::Path;

use gherkin::GherkinEnv;
use tracing::debug;

use crate::error::InspectorError;
use crate::model::{Feature, SpecificationDocument};

/// Language assumed when a source has no `# language:` header.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Parse one feature source.
///
/// The parser switches dialect on its own when it meets a `# language:`
/// header; the header is read here as well so the model records it.
///
/// # Errors
/// Returns [`InspectorError::Parse`] when the text is not valid Gherkin.
pub fn parse_feature(uri: &str, text: &str) -> Result<SpecificationDocument, InspectorError> {
    let mut text = text.to_string();
    normalise_trailing_newline(&mut text);

    let language = declared_language(&text).unwrap_or(DEFAULT_LANGUAGE);
    let parsed = gherkin::Feature::parse(&text, GherkinEnv::default()).map_err(|source| {
        InspectorError::Parse {
            uri: uri.to_string(),
            source,
        }
    })?;
    debug!(uri, language, scenarios = parsed.scenarios.len(), "parsed feature");

    let feature = Feature::from_gherkin(uri, &parsed, language);
    SpecificationDocument::new(uri, Some(feature))
}

/// Read and parse a feature file, using its path as the document URI.
///
/// # Errors
/// Returns [`InspectorError::Io`] when the file cannot be read and
/// [`InspectorError::Parse`] when it is not valid Gherkin.
pub fn parse_feature_file(path: &Path) -> Result<SpecificationDocument, InspectorError> {
    let text = std::fs::read_to_string(path).map_err(|source| InspectorError::io(path, source))?;
    parse_feature(&path.display().to_string(), &text)
}

fn normalise_trailing_newline(text: &mut String) {
    if !text.ends_with('\n') {
        text.push('\n');
    }
}

/// The language named by a `# language:` header comment.
///
/// Only comments and blank lines may precede the header.
fn declared_language(text: &str) -> Option<&str> {
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        let comment = line.strip_prefix('#')?;
        if let Some(language) = comment.trim_start().strip_prefix("language:") {
            let language = language.trim();
            return (!language.is_empty()).then_some(language);
        }
    }
    None
}
