//! Compiled step-definition registry.
//!
//! Definitions are keyed by their literal pattern source. The registry never
//! rejects duplicates; two entries under one key is what the duplicate-step
//! checker reports.

use std::collections::BTreeMap;

use tracing::warn;

use super::{GlueError, GlueIndex, StepDefinition};
use crate::matching::{self, CompiledPattern, MatchResult, ParameterTypeRegistry};

/// A step definition together with its matcher.
#[derive(Debug, Clone)]
pub struct RegisteredDefinition {
    definition: StepDefinition,
    compiled: Option<CompiledPattern>,
}

impl RegisteredDefinition {
    /// The discovered definition.
    #[must_use]
    pub fn definition(&self) -> &StepDefinition {
        &self.definition
    }

    /// The literal pattern source.
    #[must_use]
    pub fn source(&self) -> &str {
        self.definition.pattern.source()
    }

    /// The compiled matcher; `None` when compilation failed.
    #[must_use]
    pub fn compiled(&self) -> Option<&CompiledPattern> {
        self.compiled.as_ref()
    }

    /// Whether `text` satisfies this definition.
    #[must_use]
    pub fn matches(&self, text: &str) -> Option<MatchResult> {
        matching::matches(self.source(), self.compiled.as_ref(), text)
    }
}

/// All step definitions of one analysis, indexed by pattern source.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    by_pattern: BTreeMap<String, Vec<RegisteredDefinition>>,
    parameter_types: ParameterTypeRegistry,
}

impl DefinitionRegistry {
    /// Register every custom parameter type, then compile and register every
    /// step definition.
    ///
    /// Patterns that fail to compile are logged and kept without a matcher,
    /// so they still match by literal equality.
    ///
    /// # Errors
    /// Returns [`GlueError::InvalidParameterType`] when a custom parameter
    /// type's expression is invalid.
    pub fn build(index: GlueIndex) -> Result<Self, GlueError> {
        let mut registry = Self::default();
        for parameter_type in &index.parameter_types {
            registry.parameter_types.register(parameter_type)?;
        }

        for mut definition in index.step_definitions {
            let types = &registry.parameter_types;
            definition
                .pattern
                .resolve_custom_types(|name| types.contains(name));
            let compiled = match matching::compile(&definition.pattern, types) {
                Ok(compiled) => Some(compiled),
                Err(err) => {
                    warn!(
                        location = %definition.location,
                        error = %err,
                        "step pattern does not compile; only literal matches apply"
                    );
                    None
                }
            };
            registry.register(definition, compiled);
        }
        Ok(registry)
    }

    /// Append a definition under its pattern source.
    pub fn register(&mut self, definition: StepDefinition, compiled: Option<CompiledPattern>) {
        self.by_pattern
            .entry(definition.pattern.source().to_string())
            .or_default()
            .push(RegisteredDefinition {
                definition,
                compiled,
            });
    }

    /// Definitions grouped by pattern source, keys sorted.
    #[must_use]
    pub fn definitions_by_pattern(&self) -> &BTreeMap<String, Vec<RegisteredDefinition>> {
        &self.by_pattern
    }

    /// Every definition: keys in sorted order, insertion order per key.
    pub fn all_definitions(&self) -> impl Iterator<Item = &RegisteredDefinition> {
        self.by_pattern.values().flatten()
    }

    /// Custom parameter types registered before compilation.
    #[must_use]
    pub fn parameter_types(&self) -> &ParameterTypeRegistry {
        &self.parameter_types
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_pattern.values().map(Vec::len).sum()
    }

    /// Whether no definition is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_pattern.is_empty()
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
mod tests {
    use super::*;
    use crate::glue::{DefinitionPattern, ParameterTypeDefinition, discover_source};
    use crate::location::Location;

    fn definition(pattern: &str, line: usize) -> StepDefinition {
        StepDefinition {
            pattern: DefinitionPattern::placeholder(pattern),
            location: Location::at_line("steps.rs", pattern, line),
            attribution: None,
        }
    }

    #[test]
    fn groups_by_pattern_in_sorted_order() {
        let index = GlueIndex {
            step_definitions: vec![
                definition("b step", 1),
                definition("a step", 2),
                definition("b step", 3),
            ],
            parameter_types: Vec::new(),
        };
        let registry = DefinitionRegistry::build(index).expect("registry builds");

        let keys: Vec<_> = registry.definitions_by_pattern().keys().cloned().collect();
        assert_eq!(keys, ["a step", "b step"]);
        let lines: Vec<_> = registry
            .all_definitions()
            .map(|d| d.definition().location.line)
            .collect();
        assert_eq!(lines, [2, 1, 3]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn uncompilable_pattern_stays_registered() {
        let index = GlueIndex {
            step_definitions: vec![definition("broken }", 1)],
            parameter_types: Vec::new(),
        };
        let registry = DefinitionRegistry::build(index).expect("registry builds");
        let entry = registry.all_definitions().next().expect("entry kept");
        assert!(entry.compiled().is_none());
        assert_eq!(entry.matches("broken }"), Some(MatchResult::Exact));
        assert_eq!(entry.matches("broken"), None);
    }

    #[test]
    fn parameter_types_are_registered_before_compilation() {
        let source = concat!(
            "#[derive(Debug)]\n",
            "#[param(name = \"colour\", regex = \"red|blue\")]\n",
            "struct Colour;\n",
            "\n",
            "#[given(\"the car is {colour}\")]\n",
            "fn car_colour() {}\n",
        );
        let index = discover_source("steps.rs", source).expect("discover glue");
        let registry = DefinitionRegistry::build(index).expect("registry builds");

        assert!(registry.parameter_types().contains("colour"));
        let entry = registry.all_definitions().next().expect("definition");
        assert!(entry.definition().pattern.parameter_types().iter().all(|t| t.custom));
        assert!(entry.matches("the car is red").is_some());
        assert!(entry.matches("the car is green").is_none());
    }

    #[test]
    fn invalid_parameter_type_is_fatal() {
        let index = GlueIndex {
            step_definitions: Vec::new(),
            parameter_types: vec![ParameterTypeDefinition {
                name: "broken".to_string(),
                regex: "(".to_string(),
                location: Location::at_line("steps.rs", "broken", 1),
            }],
        };
        assert!(matches!(
            DefinitionRegistry::build(index),
            Err(GlueError::InvalidParameterType { .. })
        ));
    }
}
