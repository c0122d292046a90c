//! Normalised in-memory model of parsed feature files.
//!
//! The model is built once from the `gherkin` parse tree and never mutated
//! afterwards. Children keep their source declaration order so that Rules,
//! Backgrounds and Scenarios can be traversed exactly as they were written.

use std::collections::BTreeSet;

use crate::dialect;
use crate::error::InspectorError;
use crate::location::Location;

mod build;
mod pickle;

pub use pickle::{Pickle, PickleStep};

/// A tag attached to a feature, rule, scenario or examples block.
///
/// Names are always stored in `@name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    name: String,
}

impl Tag {
    /// Create a tag, adding the leading `@` when missing.
    ///
    /// # Examples
    /// ```
    /// use cuke_inspector::model::Tag;
    ///
    /// assert_eq!(Tag::new("smoke").name(), "@smoke");
    /// assert_eq!(Tag::new(" @smoke ").name(), "@smoke");
    /// ```
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            name: normalise_tag(raw),
        }
    }

    /// The tag name including the leading `@`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Normalise a raw tag name to `@name` form.
pub(crate) fn normalise_tag(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{trimmed}")
    }
}

/// One instruction line of a background or scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The keyword as written in the source (`Given`, `Und`, `*`, ...).
    pub keyword: String,
    /// The literal text after the keyword.
    pub text: String,
    /// Position of the step; the token is the step text.
    pub location: Location,
}

/// One body row of an Examples table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRow {
    /// Cell values, aligned with the owning table's header.
    pub cells: Vec<String>,
}

/// An Examples block of a scenario outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Examples {
    /// Tags declared on the Examples block.
    pub tags: Vec<Tag>,
    /// Header cells naming the outline parameters.
    pub header: Vec<String>,
    /// Body rows.
    pub rows: Vec<ExampleRow>,
}

/// A scenario or scenario outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Keyword used to declare the scenario.
    pub keyword: String,
    /// Scenario name; not guaranteed to be unique.
    pub name: String,
    /// Tags declared directly on the scenario.
    pub tags: Vec<Tag>,
    /// Steps in source order.
    pub steps: Vec<Step>,
    /// Examples blocks for outlines.
    pub examples: Vec<Examples>,
    /// Position of the scenario; the token is the scenario name.
    pub location: Location,
}

impl Scenario {
    /// Whether the scenario was declared as an outline in `language`.
    #[must_use]
    pub fn is_outline(&self, language: &str) -> bool {
        !self.examples.is_empty()
            || dialect::dialect(language)
                .is_some_and(|dialect| dialect.is_outline_keyword(&self.keyword))
    }
}

/// Steps implicitly prepended to each scenario of a feature or rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    /// Steps in source order.
    pub steps: Vec<Step>,
    /// Position of the background block.
    pub location: Location,
}

/// Child of a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChild {
    /// A rule-level background.
    Background(Background),
    /// A scenario inside the rule.
    Scenario(Scenario),
}

impl RuleChild {
    /// The scenario, if this child is one.
    #[must_use]
    pub fn as_scenario(&self) -> Option<&Scenario> {
        match self {
            Self::Scenario(scenario) => Some(scenario),
            Self::Background(_) => None,
        }
    }

    /// The background, if this child is one.
    #[must_use]
    pub fn as_background(&self) -> Option<&Background> {
        match self {
            Self::Background(background) => Some(background),
            Self::Scenario(_) => None,
        }
    }
}

const EMPTY_RULE: &[RuleChild] = &[];

/// An optional grouping level inside a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Rule name.
    pub name: String,
    /// Tags declared on the rule.
    pub tags: Vec<Tag>,
    /// Backgrounds and scenarios in declaration order.
    pub children: Vec<RuleChild>,
    /// Position of the rule.
    pub location: Location,
}

/// Child of a [`Feature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureChild {
    /// The feature background.
    Background(Background),
    /// A top-level scenario.
    Scenario(Scenario),
    /// A rule grouping further scenarios.
    Rule(Rule),
}

/// Top-level specification unit of a feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Feature name.
    pub name: String,
    /// Declared dialect (`# language:` header), `en` by default.
    pub language: String,
    /// Tags declared on the feature.
    pub tags: Vec<Tag>,
    /// Backgrounds, scenarios and rules in declaration order.
    pub children: Vec<FeatureChild>,
    /// Position of the feature; the token is the feature name.
    pub location: Location,
}

impl Feature {
    /// All scenarios, flattening rules, in declaration order.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.children.iter().flat_map(|child| {
            let (own, nested) = match child {
                FeatureChild::Scenario(scenario) => (Some(scenario), EMPTY_RULE),
                FeatureChild::Rule(rule) => (None, rule.children.as_slice()),
                FeatureChild::Background(_) => (None, EMPTY_RULE),
            };
            own.into_iter()
                .chain(nested.iter().filter_map(RuleChild::as_scenario))
        })
    }

    /// All backgrounds, flattening rules, in declaration order.
    pub fn backgrounds(&self) -> impl Iterator<Item = &Background> {
        self.children.iter().flat_map(|child| {
            let (own, nested) = match child {
                FeatureChild::Background(background) => (Some(background), EMPTY_RULE),
                FeatureChild::Rule(rule) => (None, rule.children.as_slice()),
                FeatureChild::Scenario(_) => (None, EMPTY_RULE),
            };
            own.into_iter()
                .chain(nested.iter().filter_map(RuleChild::as_background))
        })
    }

    /// Every scenario step followed by every background step.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.scenarios()
            .flat_map(|scenario| scenario.steps.iter())
            .chain(self.backgrounds().flat_map(|background| background.steps.iter()))
    }

    /// Names of the feature's own tags.
    #[must_use]
    pub fn tag_names(&self) -> BTreeSet<&str> {
        self.tags.iter().map(Tag::name).collect()
    }
}

/// The parse result of exactly one feature source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecificationDocument {
    uri: String,
    feature: Feature,
}

impl SpecificationDocument {
    /// Wrap a parsed feature.
    ///
    /// # Errors
    /// Returns [`InspectorError::MissingFeature`] when `feature` is `None`:
    /// a document without a feature is a parse error.
    pub fn new(uri: impl Into<String>, feature: Option<Feature>) -> Result<Self, InspectorError> {
        let uri = uri.into();
        match feature {
            Some(feature) => Ok(Self { uri, feature }),
            None => Err(InspectorError::MissingFeature { uri }),
        }
    }

    /// Identifier of the source this document was parsed from.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The document's feature.
    #[must_use]
    pub fn feature(&self) -> &Feature {
        &self.feature
    }
}

#[cfg(test)]
mod tests;
