//! Step definitions that no executed step exercises.

use crate::checkers::CheckKind;
use crate::snapshot::Snapshot;
use crate::violation::Violation;

/// One violation per definition whose pattern neither equals nor matches
/// any concrete step text.
#[must_use]
pub fn unused_step_definitions(snapshot: &Snapshot) -> Vec<Violation> {
    let usage = snapshot.usage_set();
    snapshot
        .registry()
        .all_definitions()
        .filter(|entry| {
            !usage.contains(entry.source()) && !usage.iter().any(|text| entry.matches(text).is_some())
        })
        .map(|entry| {
            let definition = entry.definition();
            Violation::spanning(
                CheckKind::UnusedStepDefinitions,
                format!(
                    "The step definition '{}' is not used in any feature file.",
                    entry.source()
                ),
                vec![definition.location.clone().with_token(definition.describe())],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::test_support::snapshot;

    const GLUE: &str = concat!(
        "#[when(\"act\")]\n",
        "fn no_params() {}\n",
        "#[given(\"arrange with {n:u32}\")]\n",
        "fn with_int() {}\n",
        "#[then(regex = r\"^assert (\\w+)$\")]\n",
        "fn with_regex() {}\n",
    );

    fn unused(feature: &str) -> Vec<String> {
        unused_step_definitions(&snapshot(&[("a.feature", feature)], GLUE))
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn literal_and_structural_usage_count() {
        let feature = "Feature: F\n  Scenario: s\n    When act\n    Given arrange with 3\n    Then assert done\n";
        assert!(unused(feature).is_empty());
    }

    #[test]
    fn outline_rows_provide_concrete_usage() {
        let feature = concat!(
            "Feature: F\n",
            "  Scenario Outline: s\n",
            "    When act\n",
            "    Given arrange with <n>\n",
            "    Then assert <word>\n",
            "    Examples:\n",
            "      | n | word |\n",
            "      | 1 | fine |\n",
        );
        assert!(unused(feature).is_empty());
    }

    #[test]
    fn raw_outline_placeholders_are_not_usage() {
        let feature = "Feature: F\n  Scenario Outline: s\n    Given arrange with <n>\n";
        assert_eq!(unused(feature).len(), 3);
    }

    #[test]
    fn reports_one_violation_per_unused_definition() {
        let feature = "Feature: F\n  Scenario: s\n    Then no match step\n";
        let messages = unused(feature);
        assert_eq!(
            messages,
            [
                "The step definition '^assert (\\w+)$' is not used in any feature file.",
                "The step definition 'act' is not used in any feature file.",
                "The step definition 'arrange with {n:u32}' is not used in any feature file.",
            ]
        );
    }

    #[test]
    fn unresolvable_attribution_degrades_to_marker() {
        use crate::glue::{DefinitionPattern, DefinitionRegistry, StepDefinition, UNRESOLVABLE_DEFINITION};
        use crate::location::Location;
        use crate::snapshot::Snapshot;

        let mut registry = DefinitionRegistry::default();
        registry.register(
            StepDefinition {
                pattern: DefinitionPattern::placeholder("orphan"),
                location: Location::at_line("steps.rs", "orphan", 7),
                attribution: None,
            },
            None,
        );
        let violations = unused_step_definitions(&Snapshot::new(Vec::new(), registry));
        let token = violations
            .first()
            .and_then(|v| v.locations.first())
            .map(|l| l.token.as_str());
        assert_eq!(token, Some(UNRESOLVABLE_DEFINITION));
    }
}
