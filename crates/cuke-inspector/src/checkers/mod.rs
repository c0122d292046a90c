//! Rule checkers.
//!
//! Every checker is a pure function from a [`Snapshot`] (and its own
//! configuration) to a list of violations. Checkers are independent, so the
//! inspector may run them in parallel.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;

use crate::error::InspectorError;
use crate::model::normalise_tag;
use crate::snapshot::Snapshot;
use crate::violation::Violation;

mod duplicate_scenarios;
mod duplicate_steps;
mod forbidden_tag;
mod missing_steps;
mod required_tag;
mod step_keyword;
mod tag_combination;
mod unused_steps;

pub use duplicate_scenarios::duplicate_scenarios;
pub use duplicate_steps::duplicate_step_definitions;
pub use forbidden_tag::forbidden_feature_tags;
pub use missing_steps::missing_step_definitions;
pub use required_tag::missing_required_tags;
pub use step_keyword::invalid_step_keywords;
pub use tag_combination::invalid_tag_combinations;
pub use unused_steps::unused_step_definitions;

/// Identifies the rule that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckKind {
    /// Several definitions share one pattern source.
    DuplicateStepDefinitions,
    /// A definition matches no concrete step.
    UnusedStepDefinitions,
    /// A concrete step matches no definition.
    MissingStepDefinitions,
    /// Several scenarios share one name.
    DuplicateScenarios,
    /// A feature or scenario carries a forbidden tag combination.
    InvalidTagCombination,
    /// A feature carries a forbidden tag.
    ForbiddenFeatureTag,
    /// A scenario lacks a required tag.
    MissingRequiredTag,
    /// A step uses a forbidden keyword.
    InvalidStepKeyword,
}

impl CheckKind {
    /// Stable kebab-case name, as used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DuplicateStepDefinitions => "duplicate-steps",
            Self::UnusedStepDefinitions => "unused-steps",
            Self::MissingStepDefinitions => "missing-steps",
            Self::DuplicateScenarios => "duplicate-scenarios",
            Self::InvalidTagCombination => "invalid-tag-combination",
            Self::ForbiddenFeatureTag => "forbidden-feature-tag",
            Self::MissingRequiredTag => "required-tag",
            Self::InvalidStepKeyword => "forbidden-keyword",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of tags that must not all apply to one feature or scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCombination {
    tags: BTreeSet<String>,
}

impl TagCombination {
    /// Build a combination; names are normalised to `@name` form.
    ///
    /// # Examples
    /// ```
    /// use cuke_inspector::checkers::TagCombination;
    ///
    /// let combination = TagCombination::new(["tag2", "@tag3"]);
    /// assert_eq!(combination.to_string(), "@tag2, @tag3");
    /// ```
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|tag| normalise_tag(tag.as_ref()))
                .collect(),
        }
    }

    /// Whether the combination has no tags (and so never applies).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether every tag of the combination is in `tags`.
    #[must_use]
    pub fn is_subset_of(&self, tags: &BTreeSet<&str>) -> bool {
        !self.is_empty() && self.tags.iter().all(|tag| tags.contains(tag.as_str()))
    }
}

impl fmt::Display for TagCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        f.write_str(&names.join(", "))
    }
}

/// A regular expression applied to tag names (including the `@`).
#[derive(Debug, Clone)]
pub struct TagPattern {
    source: String,
    full: Regex,
    partial: Regex,
}

impl TagPattern {
    /// Compile a tag pattern.
    ///
    /// # Errors
    /// Returns [`InspectorError::InvalidRegex`] when `pattern` is malformed.
    pub fn new(pattern: &str) -> Result<Self, InspectorError> {
        let invalid = |source| InspectorError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        };
        let partial = Regex::new(pattern).map_err(invalid)?;
        let full = Regex::new(&format!("^(?:{pattern})$")).map_err(invalid)?;
        Ok(Self {
            source: pattern.to_string(),
            full,
            partial,
        })
    }

    /// The expression as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the whole tag name matches.
    #[must_use]
    pub fn matches_fully(&self, tag: &str) -> bool {
        self.full.is_match(tag)
    }

    /// Whether the expression occurs anywhere in the tag name.
    #[must_use]
    pub fn occurs_in(&self, tag: &str) -> bool {
        self.partial.is_match(tag)
    }
}

/// Step keywords that must not be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForbiddenKeywords {
    keywords: Vec<String>,
}

impl ForbiddenKeywords {
    /// Build the list; keywords are compared trimmed.
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if !keyword.is_empty() && !list.iter().any(|known| known == keyword) {
                list.push(keyword.to_string());
            }
        }
        Self { keywords: list }
    }

    /// The configured keywords.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// A checker together with its configuration.
#[derive(Debug, Clone)]
pub enum Check {
    /// See [`duplicate_step_definitions`].
    DuplicateStepDefinitions,
    /// See [`unused_step_definitions`].
    UnusedStepDefinitions,
    /// See [`missing_step_definitions`].
    MissingStepDefinitions,
    /// See [`duplicate_scenarios`].
    DuplicateScenarios,
    /// See [`invalid_tag_combinations`].
    InvalidTagCombination(TagCombination),
    /// See [`forbidden_feature_tags`].
    ForbiddenFeatureTag(TagPattern),
    /// See [`missing_required_tags`].
    MissingRequiredTag(TagPattern),
    /// See [`invalid_step_keywords`].
    InvalidStepKeyword(ForbiddenKeywords),
}

impl Check {
    /// The kind of violation this check produces.
    #[must_use]
    pub fn kind(&self) -> CheckKind {
        match self {
            Self::DuplicateStepDefinitions => CheckKind::DuplicateStepDefinitions,
            Self::UnusedStepDefinitions => CheckKind::UnusedStepDefinitions,
            Self::MissingStepDefinitions => CheckKind::MissingStepDefinitions,
            Self::DuplicateScenarios => CheckKind::DuplicateScenarios,
            Self::InvalidTagCombination(_) => CheckKind::InvalidTagCombination,
            Self::ForbiddenFeatureTag(_) => CheckKind::ForbiddenFeatureTag,
            Self::MissingRequiredTag(_) => CheckKind::MissingRequiredTag,
            Self::InvalidStepKeyword(_) => CheckKind::InvalidStepKeyword,
        }
    }

    /// Run the checker against a snapshot.
    #[must_use]
    pub fn run(&self, snapshot: &Snapshot) -> Vec<Violation> {
        match self {
            Self::DuplicateStepDefinitions => duplicate_step_definitions(snapshot),
            Self::UnusedStepDefinitions => unused_step_definitions(snapshot),
            Self::MissingStepDefinitions => missing_step_definitions(snapshot),
            Self::DuplicateScenarios => duplicate_scenarios(snapshot),
            Self::InvalidTagCombination(combination) => {
                invalid_tag_combinations(snapshot, combination)
            }
            Self::ForbiddenFeatureTag(pattern) => forbidden_feature_tags(snapshot, pattern),
            Self::MissingRequiredTag(pattern) => missing_required_tags(snapshot, pattern),
            Self::InvalidStepKeyword(keywords) => invalid_step_keywords(snapshot, keywords),
        }
    }
}
