//! Concrete steps no definition implements.

use std::collections::{BTreeMap, HashSet};

use crate::checkers::CheckKind;
use crate::snapshot::Snapshot;
use crate::violation::Violation;

/// One violation per unmatched concrete step, located at the step in its
/// feature file.
///
/// A step shared by several pickles (backgrounds, repeated outline rows) is
/// reported once per distinct text at that position.
#[must_use]
pub fn missing_step_definitions(snapshot: &Snapshot) -> Vec<Violation> {
    let registry = snapshot.registry();
    let mut implemented: BTreeMap<&str, bool> = BTreeMap::new();
    let mut reported: HashSet<(&str, usize, usize, &str)> = HashSet::new();
    let mut violations = Vec::new();

    for (document, pickle) in snapshot.pickles() {
        for step in &pickle.steps {
            let text = step.text.as_str();
            let is_implemented = *implemented.entry(text).or_insert_with(|| {
                registry
                    .all_definitions()
                    .any(|entry| entry.matches(text).is_some())
            });
            if is_implemented {
                continue;
            }
            let key = (document.uri(), step.location.line, step.location.column, text);
            if !reported.insert(key) {
                continue;
            }
            violations.push(Violation::single(
                CheckKind::MissingStepDefinitions,
                format!(
                    "The Gherkin step '{} {}' has no step definition.",
                    step.keyword, step.text
                ),
                step.location.clone().with_token(step.text.clone()),
            ));
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::test_support::snapshot;

    const GLUE: &str = "#[given(\"I have {n:u32} apples\")]\nfn apples() {}\n#[when(\"I eat\")]\nfn eat() {}\n";

    #[test]
    fn reports_unmatched_steps_at_their_location() {
        let feature = "Feature: F\n  Scenario: s\n    Given I have 3 apples\n    Then no match step\n";
        let violations = missing_step_definitions(&snapshot(&[("a.feature", feature)], GLUE));
        assert_eq!(violations.len(), 1);
        let violation = violations.first();
        assert_eq!(
            violation.map(|v| v.message.as_str()),
            Some("The Gherkin step 'Then no match step' has no step definition.")
        );
        let location = violation.and_then(|v| v.primary_location.clone());
        assert_eq!(
            location.map(|l| (l.file, l.token, l.line)),
            Some(("a.feature".to_string(), "no match step".to_string(), 4))
        );
    }

    #[test]
    fn background_steps_are_reported_once() {
        let feature = concat!(
            "Feature: F\n",
            "  Background:\n",
            "    Given an unknown precondition\n",
            "  Scenario: one\n",
            "    When I eat\n",
            "  Scenario: two\n",
            "    When I eat\n",
        );
        let violations = missing_step_definitions(&snapshot(&[("a.feature", feature)], GLUE));
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn outline_rows_are_checked_with_substituted_text() {
        let feature = concat!(
            "Feature: F\n",
            "  Scenario Outline: s\n",
            "    Given I have <n> apples\n",
            "    Examples:\n",
            "      | n    |\n",
            "      | 3    |\n",
            "      | many |\n",
        );
        let violations = missing_step_definitions(&snapshot(&[("a.feature", feature)], GLUE));
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            ["The Gherkin step 'Given I have many apples' has no step definition."]
        );
    }

    #[test]
    fn every_step_is_missing_without_glue() {
        let feature = "Feature: F\n  Scenario: s\n    Given a\n    When b\n";
        let violations = missing_step_definitions(&snapshot(&[("a.feature", feature)], ""));
        assert_eq!(violations.len(), 2);
    }
}
