//! Several step definitions registered under one pattern source.

use crate::checkers::CheckKind;
use crate::snapshot::Snapshot;
use crate::violation::Violation;

/// One violation per pattern source registered more than once, visited in
/// sorted pattern order. Each occurrence is listed with its attribution.
#[must_use]
pub fn duplicate_step_definitions(snapshot: &Snapshot) -> Vec<Violation> {
    snapshot
        .registry()
        .definitions_by_pattern()
        .iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(pattern, group)| {
            let locations = group
                .iter()
                .map(|entry| {
                    let definition = entry.definition();
                    definition.location.clone().with_token(definition.describe())
                })
                .collect();
            Violation::spanning(
                CheckKind::DuplicateStepDefinitions,
                format!(
                    "The step definition expression '{pattern}' was found {} times.",
                    group.len()
                ),
                locations,
            )
        })
        .collect()
}
