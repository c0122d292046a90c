//! Forbidden combinations of tags on features and scenarios.

use std::collections::BTreeSet;

use crate::checkers::{CheckKind, TagCombination};
use crate::model::Tag;
use crate::snapshot::Snapshot;
use crate::violation::Violation;

/// A feature whose own tags contain the whole combination yields one
/// feature-level violation and its scenarios are not inspected. Otherwise
/// each scenario whose tags, together with the feature's, contain the
/// combination yields one scenario-level violation.
#[must_use]
pub fn invalid_tag_combinations(
    snapshot: &Snapshot,
    combination: &TagCombination,
) -> Vec<Violation> {
    if combination.is_empty() {
        return Vec::new();
    }

    let mut violations = Vec::new();
    for document in snapshot.documents() {
        let feature = document.feature();
        let feature_tags = feature.tag_names();
        if combination.is_subset_of(&feature_tags) {
            violations.push(Violation::single(
                CheckKind::InvalidTagCombination,
                format!(
                    "Feature '{}' contains invalid tag combination: {combination}.",
                    feature.name
                ),
                feature.location.clone(),
            ));
            continue;
        }

        for scenario in feature.scenarios() {
            let mut effective: BTreeSet<&str> = scenario.tags.iter().map(Tag::name).collect();
            effective.extend(&feature_tags);
            if combination.is_subset_of(&effective) {
                violations.push(Violation::single(
                    CheckKind::InvalidTagCombination,
                    format!(
                        "Scenario '{}' contains invalid tag combination: {combination}.",
                        scenario.name
                    ),
                    scenario.location.clone(),
                ));
            }
        }
    }
    violations
}
