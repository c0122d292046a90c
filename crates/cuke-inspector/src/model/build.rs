//! Conversion from the `gherkin` parse tree into the inspector model.
//!
//! `gherkin` keeps backgrounds, scenarios and rules in separate fields. The
//! conversion merges them back into one child list ordered by byte offset,
//! which is the order they were declared in the source.

use gherkin::Span;

use super::{
    Background, ExampleRow, Examples, Feature, FeatureChild, Rule, RuleChild, Scenario, Step, Tag,
};
use crate::location::Location;

impl Feature {
    /// Build the model for a parsed feature.
    ///
    /// `uri` identifies the source document and becomes the file of every
    /// location in the model. `language` is the declared dialect.
    #[must_use]
    pub fn from_gherkin(uri: &str, feature: &gherkin::Feature, language: &str) -> Self {
        let builder = ModelBuilder { uri };

        let mut children: Vec<(Span, FeatureChild)> = Vec::new();
        if let Some(background) = feature.background.as_ref() {
            children.push((
                background.span,
                FeatureChild::Background(builder.background(background)),
            ));
        }
        children.extend(
            feature
                .scenarios
                .iter()
                .map(|scenario| (scenario.span, FeatureChild::Scenario(builder.scenario(scenario)))),
        );
        children.extend(
            feature
                .rules
                .iter()
                .map(|rule| (rule.span, FeatureChild::Rule(builder.rule(rule)))),
        );
        children.sort_by_key(|(span, _)| span.start);

        Self {
            name: feature.name.clone(),
            language: language.to_string(),
            tags: tags(&feature.tags),
            children: children.into_iter().map(|(_, child)| child).collect(),
            location: builder.location(&feature.name, feature.position),
        }
    }
}

#[derive(Clone, Copy)]
struct ModelBuilder<'a> {
    uri: &'a str,
}

impl ModelBuilder<'_> {
    fn location(self, token: &str, position: gherkin::LineCol) -> Location {
        Location::new(self.uri, token, position.line, position.col)
    }

    fn steps(self, steps: &[gherkin::Step]) -> Vec<Step> {
        steps
            .iter()
            .map(|step| Step {
                keyword: step.keyword.trim().to_string(),
                text: step.value.clone(),
                location: self.location(&step.value, step.position),
            })
            .collect()
    }

    fn background(self, background: &gherkin::Background) -> Background {
        Background {
            steps: self.steps(&background.steps),
            location: self.location(&background.keyword, background.position),
        }
    }

    fn scenario(self, scenario: &gherkin::Scenario) -> Scenario {
        Scenario {
            keyword: scenario.keyword.clone(),
            name: scenario.name.clone(),
            tags: tags(&scenario.tags),
            steps: self.steps(&scenario.steps),
            examples: scenario.examples.iter().filter_map(examples).collect(),
            location: self.location(&scenario.name, scenario.position),
        }
    }

    fn rule(self, rule: &gherkin::Rule) -> Rule {
        let mut children: Vec<(Span, RuleChild)> = Vec::new();
        if let Some(background) = rule.background.as_ref() {
            children.push((
                background.span,
                RuleChild::Background(self.background(background)),
            ));
        }
        children.extend(
            rule.scenarios
                .iter()
                .map(|scenario| (scenario.span, RuleChild::Scenario(self.scenario(scenario)))),
        );
        children.sort_by_key(|(span, _)| span.start);

        Rule {
            name: rule.name.clone(),
            tags: tags(&rule.tags),
            children: children.into_iter().map(|(_, child)| child).collect(),
            location: self.location(&rule.name, rule.position),
        }
    }
}

fn tags(raw: &[String]) -> Vec<Tag> {
    let mut out: Vec<Tag> = Vec::with_capacity(raw.len());
    for tag in raw.iter().map(|name| Tag::new(name)) {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Convert an Examples block; blocks without a table carry no rows.
fn examples(examples: &gherkin::Examples) -> Option<Examples> {
    let table = examples.table.as_ref()?;
    let mut rows = table.rows.iter();
    let header = rows.next()?.clone();
    Some(Examples {
        tags: tags(&examples.tags),
        header,
        rows: rows
            .map(|cells| ExampleRow {
                cells: cells.clone(),
            })
            .collect(),
    })
}
