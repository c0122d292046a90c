//! Configuration and orchestration of an inspection.
//!
//! An [`InspectorBuilder`] collects feature sources and glue locations. Its
//! [`build`](InspectorBuilder::build) step parses every feature and compiles
//! all glue exactly once, producing an [`Inspector`] that owns the resulting
//! immutable [`Snapshot`]. Checker methods append to the inspector's
//! violation list; nothing is deduplicated across invocations.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::checkers::{Check, ForbiddenKeywords, TagCombination, TagPattern};
use crate::error::InspectorError;
use crate::format::format_all;
use crate::glue::{
    self, DefinitionRegistry, GlueIndex, ParameterTypeDefinition, StepDefinition,
};
use crate::parsing::parse_feature;
use crate::snapshot::Snapshot;
use crate::violation::Violation;

#[derive(Debug, Clone)]
struct FeatureSource {
    uri: String,
    text: String,
}

#[derive(Debug, Clone)]
enum GlueSource {
    Directory(PathBuf),
    File(PathBuf),
    Text { path: String, source: String },
}

/// Collects the inputs of one inspection.
#[derive(Debug, Clone, Default)]
pub struct InspectorBuilder {
    features: Vec<FeatureSource>,
    seen_feature_files: HashSet<PathBuf>,
    glue: Vec<GlueSource>,
    extra: GlueIndex,
}

impl InspectorBuilder {
    /// Add a feature from in-memory text.
    #[must_use]
    pub fn with_feature_source(mut self, uri: impl Into<String>, text: impl Into<String>) -> Self {
        self.features.push(FeatureSource {
            uri: uri.into(),
            text: text.into(),
        });
        self
    }

    /// Add a feature read from a stream.
    ///
    /// # Errors
    /// Returns [`InspectorError::Io`] when the stream cannot be read.
    pub fn with_feature_reader(
        self,
        uri: impl Into<String>,
        mut reader: impl Read,
    ) -> Result<Self, InspectorError> {
        let uri = uri.into();
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|source| InspectorError::io(&uri, source))?;
        Ok(self.with_feature_source(uri, text))
    }

    /// Add one feature file. A file added twice is loaded once.
    ///
    /// # Errors
    /// Returns [`InspectorError::Io`] when the file cannot be read.
    pub fn with_feature_file(mut self, path: impl AsRef<Path>) -> Result<Self, InspectorError> {
        let path = path.as_ref();
        let canonical = path
            .canonicalize()
            .map_err(|source| InspectorError::io(path, source))?;
        if !self.seen_feature_files.insert(canonical) {
            debug!(path = %path.display(), "feature file already configured");
            return Ok(self);
        }
        let text =
            std::fs::read_to_string(path).map_err(|source| InspectorError::io(path, source))?;
        Ok(self.with_feature_source(path.display().to_string(), text))
    }

    /// Add every `.feature` file below a directory, in path order.
    ///
    /// # Errors
    /// Returns [`InspectorError::Io`] when the directory or one of its files
    /// cannot be read.
    pub fn with_feature_directory(
        mut self,
        path: impl AsRef<Path>,
    ) -> Result<Self, InspectorError> {
        let path = path.as_ref();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|err| InspectorError::io(path, err.into()))?;
            if entry.file_type().is_file() && is_feature_file(entry.path()) {
                self = self.with_feature_file(entry.path())?;
            }
        }
        Ok(self)
    }

    /// Add a glue directory, walked recursively for `.rs` files at build time.
    ///
    /// # Errors
    /// Returns [`InspectorError::Io`] when `path` is not a readable directory.
    pub fn with_glue_directory(mut self, path: impl AsRef<Path>) -> Result<Self, InspectorError> {
        let path = path.as_ref();
        std::fs::read_dir(path).map_err(|source| InspectorError::io(path, source))?;
        self.glue.push(GlueSource::Directory(path.to_path_buf()));
        Ok(self)
    }

    /// Add one glue file.
    ///
    /// # Errors
    /// Returns [`InspectorError::Io`] when `path` does not exist.
    pub fn with_glue_file(mut self, path: impl AsRef<Path>) -> Result<Self, InspectorError> {
        let path = path.as_ref();
        std::fs::metadata(path).map_err(|source| InspectorError::io(path, source))?;
        self.glue.push(GlueSource::File(path.to_path_buf()));
        Ok(self)
    }

    /// Add glue from in-memory Rust source.
    #[must_use]
    pub fn with_glue_source(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.glue.push(GlueSource::Text {
            path: path.into(),
            source: source.into(),
        });
        self
    }

    /// Add a step definition directly, bypassing discovery.
    #[must_use]
    pub fn with_step_definition(mut self, definition: StepDefinition) -> Self {
        self.extra.step_definitions.push(definition);
        self
    }

    /// Add a custom parameter type directly, bypassing discovery.
    #[must_use]
    pub fn with_parameter_type(mut self, parameter_type: ParameterTypeDefinition) -> Self {
        self.extra.parameter_types.push(parameter_type);
        self
    }

    /// Parse all features, discover and compile all glue.
    ///
    /// # Errors
    /// Returns the first parse, I/O or glue error encountered; no partial
    /// inspector is produced.
    pub fn build(self) -> Result<Inspector, InspectorError> {
        let documents = self
            .features
            .iter()
            .map(|source| parse_feature(&source.uri, &source.text))
            .collect::<Result<Vec<_>, _>>()?;

        let mut index = GlueIndex::default();
        for source in &self.glue {
            index.extend(match source {
                GlueSource::Directory(path) => glue::discover_directory(path)?,
                GlueSource::File(path) => glue::discover_file(path)?,
                GlueSource::Text { path, source } => glue::discover_source(path, source)?,
            });
        }
        index.extend(self.extra);
        let registry = DefinitionRegistry::build(index)?;

        info!(
            documents = documents.len(),
            definitions = registry.len(),
            parameter_types = registry.parameter_types().len(),
            "inspection snapshot built"
        );
        Ok(Inspector::from_snapshot(Snapshot::new(documents, registry)))
    }
}

fn is_feature_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == OsStr::new("feature"))
}

/// Runs checkers over one snapshot and accumulates their violations.
#[derive(Debug, Clone)]
pub struct Inspector {
    snapshot: Snapshot,
    violations: Vec<Violation>,
}

impl Inspector {
    /// Start configuring an inspection.
    #[must_use]
    pub fn builder() -> InspectorBuilder {
        InspectorBuilder::default()
    }

    /// Inspect an already assembled snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            violations: Vec::new(),
        }
    }

    /// The read-only inspection input.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn apply(&mut self, check: &Check) -> &mut Self {
        let found = check.run(&self.snapshot);
        debug!(check = %check.kind(), violations = found.len(), "check finished");
        self.violations.extend(found);
        self
    }

    /// Report pattern sources registered more than once.
    pub fn check_duplicate_step_definitions(&mut self) -> &mut Self {
        self.apply(&Check::DuplicateStepDefinitions)
    }

    /// Report definitions no concrete step uses.
    pub fn check_unused_step_definitions(&mut self) -> &mut Self {
        self.apply(&Check::UnusedStepDefinitions)
    }

    /// Report concrete steps no definition implements.
    pub fn check_missing_step_definitions(&mut self) -> &mut Self {
        self.apply(&Check::MissingStepDefinitions)
    }

    /// Report scenario names used more than once.
    pub fn check_duplicate_scenarios(&mut self) -> &mut Self {
        self.apply(&Check::DuplicateScenarios)
    }

    /// Report features and scenarios carrying every tag of `combination`.
    pub fn check_invalid_tag_combinations(&mut self, combination: TagCombination) -> &mut Self {
        self.apply(&Check::InvalidTagCombination(combination))
    }

    /// Report feature tags fully matching `pattern`.
    pub fn check_forbidden_feature_tags(&mut self, pattern: TagPattern) -> &mut Self {
        self.apply(&Check::ForbiddenFeatureTag(pattern))
    }

    /// Report scenarios without a tag matching `pattern`.
    pub fn check_missing_required_tags(&mut self, pattern: TagPattern) -> &mut Self {
        self.apply(&Check::MissingRequiredTag(pattern))
    }

    /// Report steps using one of `keywords` in their feature's language.
    pub fn check_invalid_step_keywords(&mut self, keywords: ForbiddenKeywords) -> &mut Self {
        self.apply(&Check::InvalidStepKeyword(keywords))
    }

    /// Run several checks in parallel; their violations are appended in the
    /// order the checks are given.
    pub fn run(&mut self, checks: &[Check]) -> &mut Self {
        let snapshot = &self.snapshot;
        let batches: Vec<Vec<Violation>> = checks
            .par_iter()
            .map(|check| check.run(snapshot))
            .collect();
        self.violations.extend(batches.into_iter().flatten());
        self
    }

    /// Violations accumulated so far.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The formatted report of every accumulated violation.
    #[must_use]
    pub fn report(&self) -> String {
        format_all(&self.violations)
    }

    /// Succeed when no violation has been accumulated.
    ///
    /// # Errors
    /// Returns a [`ViolationReport`] carrying every violation otherwise.
    pub fn assert_no_violations(&self) -> Result<(), ViolationReport> {
        if self.violations.is_empty() {
            return Ok(());
        }
        Err(ViolationReport {
            violations: self.violations.clone(),
        })
    }
}

/// The failure payload of [`Inspector::assert_no_violations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationReport {
    violations: Vec<Violation>,
}

impl ViolationReport {
    /// The reported violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} violation(s) found:", self.violations.len())?;
        f.write_str(&format_all(&self.violations))
    }
}

impl std::error::Error for ViolationReport {}
