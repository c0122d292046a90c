//! Scenarios lacking a required (traceability) tag.

use crate::checkers::{CheckKind, TagPattern};
use crate::snapshot::Snapshot;
use crate::violation::Violation;

/// One violation per scenario, rules flattened, none of whose own tags
/// contains a match for `pattern`.
#[must_use]
pub fn missing_required_tags(snapshot: &Snapshot, pattern: &TagPattern) -> Vec<Violation> {
    snapshot
        .documents()
        .iter()
        .flat_map(|document| document.feature().scenarios())
        .filter(|scenario| !scenario.tags.iter().any(|tag| pattern.occurs_in(tag.name())))
        .map(|scenario| {
            Violation::single(
                CheckKind::MissingRequiredTag,
                format!(
                    "Scenario '{}' does not contain a required tag matching '{}'.",
                    scenario.name,
                    pattern.as_str()
                ),
                scenario.location.clone(),
            )
        })
        .collect()
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
mod tests {
    use super::*;
    use crate::checkers::test_support::snapshot;

    fn check(feature: &str) -> Vec<String> {
        let pattern = TagPattern::new(r"@\d{6}").expect("valid pattern");
        missing_required_tags(&snapshot(&[("a.feature", feature)], ""), &pattern)
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn reports_scenario_without_matching_tag() {
        let feature = "Feature: F\n  @tag1\n  Scenario: untraced\n    Given a\n  @123456\n  Scenario: traced\n    Given b\n";
        assert_eq!(
            check(feature),
            ["Scenario 'untraced' does not contain a required tag matching '@\\d{6}'."]
        );
    }

    #[test]
    fn partial_match_is_enough() {
        let feature = "Feature: F\n  @JIRA-@1234567\n  Scenario: s\n    Given a\n";
        assert!(check(feature).is_empty());
    }

    #[test]
    fn scenarios_inside_rules_are_checked() {
        let feature = "Feature: F\n  Rule: r\n    Scenario: nested\n      Given a\n";
        assert_eq!(check(feature).len(), 1);
    }
}
