//! Steps written with a forbidden keyword.

use tracing::warn;

use crate::checkers::{CheckKind, ForbiddenKeywords};
use crate::dialect;
use crate::snapshot::Snapshot;
use crate::violation::Violation;

/// Per feature, the configured keywords are first narrowed to those that
/// are step keywords of the feature's language; every step (backgrounds
/// included) using one of the remaining keywords yields one violation.
#[must_use]
pub fn invalid_step_keywords(snapshot: &Snapshot, keywords: &ForbiddenKeywords) -> Vec<Violation> {
    if keywords.keywords().is_empty() {
        return Vec::new();
    }

    let mut violations = Vec::new();
    for document in snapshot.documents() {
        let feature = document.feature();
        let forbidden = normalise_keywords(keywords, &feature.language);
        if forbidden.is_empty() {
            continue;
        }
        violations.extend(
            feature
                .steps()
                .filter(|step| forbidden.contains(&step.keyword.trim()))
                .map(|step| {
                    Violation::single(
                        CheckKind::InvalidStepKeyword,
                        format!(
                            "Step '{}' starts with invalid step keyword: '{}'.",
                            step.text, step.keyword
                        ),
                        step.location
                            .clone()
                            .with_token(format!("{} {}", step.keyword, step.text)),
                    )
                }),
        );
    }
    violations
}

/// The configured keywords that are canonical step keywords of `language`.
fn normalise_keywords<'k>(keywords: &'k ForbiddenKeywords, language: &str) -> Vec<&'k str> {
    let Some(dialect) = dialect::dialect(language) else {
        warn!(language, "unknown Gherkin language; no step keyword is enforced");
        return Vec::new();
    };
    keywords
        .keywords()
        .iter()
        .map(String::as_str)
        .filter(|keyword| dialect.is_step_keyword(keyword))
        .collect()
}
