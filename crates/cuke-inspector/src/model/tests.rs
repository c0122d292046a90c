//! Tests for the document model and pickle expansion.

use rstest::rstest;

use super::*;
use crate::parsing::parse_feature;

fn feature(text: &str) -> Feature {
    #[expect(clippy::expect_used, reason = "fixture text is valid Gherkin")]
    let document = parse_feature("test.feature", text).expect("fixture parses");
    document.feature().clone()
}

const WITH_RULES: &str = "\
Feature: Ordering
  Background:
    Given a feature background

  Scenario: first
    Given a top-level step

  Scenario: second
    Then another top-level step

  Rule: grouped
    Background:
      Given a rule background

    Scenario: third
      When a rule step
";

#[rstest]
#[case("smoke", "@smoke")]
#[case("@smoke", "@smoke")]
#[case("  @wip ", "@wip")]
fn tags_are_normalised(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(Tag::new(raw).name(), expected);
}

#[test]
fn missing_feature_is_rejected() {
    let result = SpecificationDocument::new("empty.feature", None);
    assert!(matches!(
        result,
        Err(InspectorError::MissingFeature { uri }) if uri == "empty.feature"
    ));
}

#[test]
fn scenarios_follow_declaration_order() {
    let feature = feature(WITH_RULES);
    let names: Vec<_> = feature.scenarios().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[test]
fn backgrounds_include_rule_backgrounds() {
    let feature = feature(WITH_RULES);
    let texts: Vec<_> = feature
        .backgrounds()
        .flat_map(|b| b.steps.iter().map(|s| s.text.as_str()))
        .collect();
    assert_eq!(texts, ["a feature background", "a rule background"]);
}

#[test]
fn steps_list_scenarios_before_backgrounds() {
    let feature = feature(WITH_RULES);
    let texts: Vec<_> = feature.steps().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        [
            "a top-level step",
            "another top-level step",
            "a rule step",
            "a feature background",
            "a rule background",
        ]
    );
}

#[test]
fn locations_point_at_source_lines() {
    let feature = feature(WITH_RULES);
    let third = feature
        .scenarios()
        .find(|s| s.name == "third")
        .map(|s| s.location.clone());
    assert_eq!(
        third.map(|l| (l.file, l.token, l.line)),
        Some(("test.feature".to_string(), "third".to_string(), 15))
    );
}

#[test]
fn tags_are_recorded_with_prefix() {
    let feature = feature("@billing\nFeature: F\n  @wip @JIRA-1\n  Scenario: s\n    Given x\n");
    assert_eq!(feature.tag_names().into_iter().collect::<Vec<_>>(), ["@billing"]);
    let scenario_tags: Vec<_> = feature
        .scenarios()
        .flat_map(|s| s.tags.iter().map(Tag::name))
        .collect();
    assert_eq!(scenario_tags, ["@wip", "@JIRA-1"]);
}

#[test]
fn pickles_prepend_backgrounds() {
    let feature = feature(WITH_RULES);
    let pickles = feature.pickles();
    let third = pickles.iter().find(|p| p.name == "third");
    let texts: Option<Vec<_>> =
        third.map(|p| p.steps.iter().map(|s| s.text.as_str()).collect());
    assert_eq!(
        texts,
        Some(vec!["a feature background", "a rule background", "a rule step"])
    );
    let second = pickles.iter().find(|p| p.name == "second");
    assert_eq!(second.map(|p| p.steps.len()), Some(2));
}

#[test]
fn outlines_expand_per_example_row() {
    let feature = feature(
        "\
Feature: Outlines
  Scenario Outline: buying <count>
    Given I have <count> apples
    When I eat <eaten>

    Examples:
      | count | eaten |
      | 3     | 1     |
      | 5     | 2     |
",
    );
    let scenario = feature.scenarios().next();
    assert!(scenario.is_some_and(|s| s.is_outline(&feature.language)));

    let pickles = feature.pickles();
    let texts: Vec<_> = pickles
        .iter()
        .flat_map(|p| p.steps.iter().map(|s| s.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        ["I have 3 apples", "I eat 1", "I have 5 apples", "I eat 2"]
    );
    assert_eq!(pickles.first().map(|p| p.name.as_str()), Some("buying 3"));
}

#[rstest]
#[case("Feature: F\n  Scenario Outline: o\n    Given <x>\n")]
#[case("Feature: F\n  Scenario Template: o\n    Given <x>\n")]
#[case("# language: de\nFunktionalität: F\n  Szenariogrundriss: o\n    Angenommen ich habe <n> Äpfel\n")]
#[case("# language: fr\nFonctionnalité: F\n  Plan du scénario: o\n    Soit <x>\n")]
fn outline_without_examples_has_no_pickles(#[case] text: &str) {
    let feature = feature(text);
    assert!(feature.scenarios().all(|s| s.is_outline(&feature.language)));
    assert!(feature.pickles().is_empty());
}

#[test]
fn localised_plain_scenario_is_not_an_outline() {
    let feature = feature("# language: de\nFunktionalität: F\n  Szenario: s\n    Angenommen <n>\n");
    let texts: Vec<_> = feature
        .pickles()
        .iter()
        .flat_map(|p| p.steps.iter().map(|s| s.text.clone()))
        .collect();
    assert_eq!(texts, ["<n>"]);
}

#[test]
fn substitution_is_a_single_pass() {
    let feature = feature(
        "\
Feature: F
  Scenario Outline: o
    Given value <a>

    Examples:
      | a   | b |
      | <b> | x |
",
    );
    let texts: Vec<_> = feature
        .pickles()
        .iter()
        .flat_map(|p| p.steps.iter().map(|s| s.text.clone()))
        .collect();
    assert_eq!(texts, ["value <b>"]);
}

#[test]
fn unknown_placeholders_are_kept() {
    let feature = feature(
        "\
Feature: F
  Scenario Outline: o
    Given <a> and <missing> and <a

    Examples:
      | a |
      | 1 |
",
    );
    let texts: Vec<_> = feature
        .pickles()
        .iter()
        .flat_map(|p| p.steps.iter().map(|s| s.text.clone()))
        .collect();
    assert_eq!(texts, ["1 and <missing> and <a"]);
}
