//! Tags that must not be attached to a feature.

use crate::checkers::{CheckKind, TagPattern};
use crate::snapshot::Snapshot;
use crate::violation::Violation;

/// One violation per feature tag whose whole name matches `pattern`.
#[must_use]
pub fn forbidden_feature_tags(snapshot: &Snapshot, pattern: &TagPattern) -> Vec<Violation> {
    snapshot
        .documents()
        .iter()
        .flat_map(|document| {
            let feature = document.feature();
            feature
                .tags
                .iter()
                .filter(|tag| pattern.matches_fully(tag.name()))
                .map(move |tag| {
                    Violation::single(
                        CheckKind::ForbiddenFeatureTag,
                        format!(
                            "Feature '{}' contains forbidden tag: {}.",
                            feature.name,
                            tag.name()
                        ),
                        feature.location.clone(),
                    )
                })
        })
        .collect()
}
