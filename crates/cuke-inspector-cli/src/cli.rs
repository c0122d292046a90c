//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use cuke_inspector::{Check, ForbiddenKeywords, InspectorError, TagCombination, TagPattern};

use crate::config::LogLevel;

/// Static analysis for Gherkin feature suites and their Rust step definitions.
#[derive(Parser, Debug, Default)]
#[command(name = "cuke-inspector", version, about)]
pub struct Args {
    /// Feature file or directory searched recursively for `.feature` files.
    #[arg(long = "features", value_name = "PATH", required = true)]
    pub features: Vec<PathBuf>,

    /// Rust glue file or directory searched recursively for `.rs` files.
    #[arg(long = "glue", value_name = "PATH")]
    pub glue: Vec<PathBuf>,

    /// Report step definition patterns declared more than once.
    #[arg(long)]
    pub duplicate_steps: bool,

    /// Report step definitions no step uses.
    #[arg(long)]
    pub unused_steps: bool,

    /// Report steps without a step definition.
    #[arg(long)]
    pub missing_steps: bool,

    /// Report scenario names used more than once.
    #[arg(long)]
    pub duplicate_scenarios: bool,

    /// Comma separated tags that must not all apply to one feature or scenario.
    #[arg(long = "invalid-tag-combination", value_name = "TAG,TAG,..")]
    pub invalid_tag_combinations: Vec<String>,

    /// Regular expression no feature tag may fully match.
    #[arg(long, value_name = "REGEX")]
    pub forbidden_feature_tag: Option<String>,

    /// Regular expression every scenario needs a matching tag for.
    #[arg(long, value_name = "REGEX")]
    pub required_tag: Option<String>,

    /// Step keyword that must not be used.
    #[arg(long = "forbidden-keyword", value_name = "KEYWORD")]
    pub forbidden_keywords: Vec<String>,

    /// Run every check that needs no configuration.
    #[arg(long)]
    pub all: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// Exit with status 1 when violations are found.
    #[arg(long, value_name = "BOOL")]
    pub fail_on_violations: Option<bool>,
}

impl Args {
    /// The checks selected on the command line, in report order.
    ///
    /// # Errors
    ///
    /// Returns [`InspectorError::InvalidRegex`] for a malformed tag pattern.
    pub fn checks(&self) -> Result<Vec<Check>, InspectorError> {
        let mut checks = Vec::new();
        if self.all || self.duplicate_steps {
            checks.push(Check::DuplicateStepDefinitions);
        }
        if self.all || self.unused_steps {
            checks.push(Check::UnusedStepDefinitions);
        }
        if self.all || self.missing_steps {
            checks.push(Check::MissingStepDefinitions);
        }
        if self.all || self.duplicate_scenarios {
            checks.push(Check::DuplicateScenarios);
        }
        checks.extend(self.invalid_tag_combinations.iter().map(|raw| {
            Check::InvalidTagCombination(TagCombination::new(
                raw.split(',').map(str::trim).filter(|tag| !tag.is_empty()),
            ))
        }));
        if let Some(pattern) = &self.forbidden_feature_tag {
            checks.push(Check::ForbiddenFeatureTag(TagPattern::new(pattern)?));
        }
        if let Some(pattern) = &self.required_tag {
            checks.push(Check::MissingRequiredTag(TagPattern::new(pattern)?));
        }
        if !self.forbidden_keywords.is_empty() {
            checks.push(Check::InvalidStepKeyword(ForbiddenKeywords::new(
                &self.forbidden_keywords,
            )));
        }
        Ok(checks)
    }
}
