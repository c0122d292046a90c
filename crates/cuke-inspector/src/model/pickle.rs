//! Executed ("pickled") scenarios.
//!
//! A pickle is what a runner would actually execute: the applicable
//! backgrounds followed by the scenario's own steps, with outline
//! placeholders replaced by the cells of one Examples row.

use std::collections::HashMap;

use super::{Background, Examples, ExampleRow, Feature, FeatureChild, RuleChild, Scenario, Step};
use crate::location::Location;

/// One concrete step of a pickle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickleStep {
    /// Keyword of the source step.
    pub keyword: String,
    /// Step text with outline parameters substituted.
    pub text: String,
    /// Position of the source step.
    pub location: Location,
}

/// One executed scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickle {
    /// Name of the source scenario.
    pub name: String,
    /// Position of the source scenario.
    pub location: Location,
    /// Background steps followed by scenario steps.
    pub steps: Vec<PickleStep>,
}

impl Feature {
    /// Expand every scenario into the pickles a runner would execute.
    ///
    /// Outlines produce one pickle per Examples body row and none when they
    /// have no rows.
    #[must_use]
    pub fn pickles(&self) -> Vec<Pickle> {
        let feature_background = self.children.iter().find_map(|child| match child {
            FeatureChild::Background(background) => Some(background),
            FeatureChild::Scenario(_) | FeatureChild::Rule(_) => None,
        });

        let mut pickles = Vec::new();
        for child in &self.children {
            match child {
                FeatureChild::Background(_) => {}
                FeatureChild::Scenario(scenario) => {
                    expand(scenario, &self.language, &[feature_background], &mut pickles);
                }
                FeatureChild::Rule(rule) => {
                    let rule_background = rule.children.iter().find_map(RuleChild::as_background);
                    for scenario in rule.children.iter().filter_map(RuleChild::as_scenario) {
                        expand(
                            scenario,
                            &self.language,
                            &[feature_background, rule_background],
                            &mut pickles,
                        );
                    }
                }
            }
        }
        pickles
    }
}

fn expand(
    scenario: &Scenario,
    language: &str,
    backgrounds: &[Option<&Background>],
    out: &mut Vec<Pickle>,
) {
    let prefix: Vec<PickleStep> = backgrounds
        .iter()
        .flatten()
        .flat_map(|background| background.steps.iter())
        .map(|step| pickle_step(step, step.text.clone()))
        .collect();

    if !scenario.is_outline(language) {
        let mut steps = prefix;
        steps.extend(
            scenario
                .steps
                .iter()
                .map(|step| pickle_step(step, step.text.clone())),
        );
        out.push(Pickle {
            name: scenario.name.clone(),
            location: scenario.location.clone(),
            steps,
        });
        return;
    }

    for examples in &scenario.examples {
        for row in &examples.rows {
            let mut steps = prefix.clone();
            steps.extend(
                scenario
                    .steps
                    .iter()
                    .map(|step| pickle_step(step, substitute(&step.text, examples, row))),
            );
            out.push(Pickle {
                name: substitute(&scenario.name, examples, row),
                location: scenario.location.clone(),
                steps,
            });
        }
    }
}

fn pickle_step(step: &Step, text: String) -> PickleStep {
    PickleStep {
        keyword: step.keyword.clone(),
        text,
        location: step.location.clone(),
    }
}

/// Replace every `<header>` occurrence with the row's matching cell in one
/// left-to-right pass; substituted values are never rescanned.
fn substitute(text: &str, examples: &Examples, row: &ExampleRow) -> String {
    let cells: HashMap<&str, &str> = examples
        .header
        .iter()
        .map(String::as_str)
        .zip(row.cells.iter().map(String::as_str))
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        let (before, tail) = rest.split_at(open);
        out.push_str(before);
        let (marker, inner) = tail.split_at(1);
        match inner.find(['<', '>']) {
            Some(close) if inner.as_bytes().get(close) == Some(&b'>') => {
                let (name, after) = inner.split_at(close);
                let value = cells
                    .get(name)
                    .map_or_else(|| format!("<{name}>"), |value| (*value).to_string());
                out.push_str(&value);
                rest = after.get(1..).unwrap_or_default();
            }
            _ => {
                out.push_str(marker);
                rest = inner;
            }
        }
    }
    out.push_str(rest);
    out
}
