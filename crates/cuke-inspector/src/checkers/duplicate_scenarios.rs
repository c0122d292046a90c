//! Scenario names used more than once across the document set.

use std::collections::BTreeMap;

use crate::checkers::CheckKind;
use crate::location::Location;
use crate::snapshot::Snapshot;
use crate::violation::Violation;

/// One violation per scenario name shared by several scenarios, in any
/// file. Names are visited in sorted order; occurrences keep document and
/// declaration order.
#[must_use]
pub fn duplicate_scenarios(snapshot: &Snapshot) -> Vec<Violation> {
    let mut by_name: BTreeMap<&str, Vec<Location>> = BTreeMap::new();
    for document in snapshot.documents() {
        for scenario in document.feature().scenarios() {
            by_name
                .entry(scenario.name.as_str())
                .or_default()
                .push(scenario.location.clone());
        }
    }

    by_name
        .into_iter()
        .filter(|(_, locations)| locations.len() > 1)
        .map(|(name, locations)| {
            Violation::spanning(
                CheckKind::DuplicateScenarios,
                format!(
                    "Duplicated scenario name '{name}' found in {} scenarios.",
                    locations.len()
                ),
                locations,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::checkers::test_support::snapshot;

    const FIRST: &str = "Feature: One\n  Scenario: scenario to test\n    Given a\n  Scenario: unique one\n    Given b\n";
    const SECOND: &str = "Feature: Two\n  Scenario: scenario to test\n    Given c\n";

    #[rstest]
    #[case(&[("one.feature", FIRST), ("two.feature", SECOND)])]
    #[case(&[("two.feature", SECOND), ("one.feature", FIRST)])]
    fn detects_duplicates_across_files_in_any_order(#[case] features: &[(&str, &str)]) {
        let violations = duplicate_scenarios(&snapshot(features, ""));
        assert_eq!(violations.len(), 1);
        let violation = violations.first();
        assert_eq!(violation.map(|v| v.locations.len()), Some(2));
        assert_eq!(
            violation.map(|v| v.message.as_str()),
            Some("Duplicated scenario name 'scenario to test' found in 2 scenarios.")
        );
    }

    #[test]
    fn detects_duplicates_in_one_file_including_rules() {
        let feature = concat!(
            "Feature: F\n",
            "  Scenario: same\n",
            "    Given a\n",
            "  Rule: r\n",
            "    Scenario: same\n",
            "      Given b\n",
        );
        let violations = duplicate_scenarios(&snapshot(&[("a.feature", feature)], ""));
        let lines: Vec<_> = violations
            .iter()
            .flat_map(|v| v.locations.iter().map(|l| l.line))
            .collect();
        assert_eq!(lines, [2, 5]);
    }

    #[test]
    fn unique_names_are_clean() {
        assert!(duplicate_scenarios(&snapshot(&[("one.feature", FIRST)], "")).is_empty());
    }
}
