//! Step definitions discovered from Rust glue code.
//!
//! Discovery parses Rust sources with `syn` and extracts functions annotated
//! with `#[given]`, `#[when]` or `#[then]`, together with custom parameter
//! types declared via `#[param(..)]`. The [`DefinitionRegistry`] then indexes
//! the definitions by their literal pattern source.

use std::fmt;

use crate::location::Location;

mod discovery;
mod registry;

pub use discovery::{discover_directory, discover_file, discover_source};
pub use registry::{DefinitionRegistry, RegisteredDefinition};

/// Marker rendered in place of an attribution that discovery could not
/// determine.
pub const UNRESOLVABLE_DEFINITION: &str = "<unresolvable step definition>";

/// The step attribute a definition was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKind {
    /// `#[given]`
    Given,
    /// `#[when]`
    When,
    /// `#[then]`
    Then,
}

impl StepKind {
    /// The attribute name as written in source.
    #[must_use]
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// How the pattern source is interpreted by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternSyntax {
    /// Literal text with `{name}` / `{name:type}` placeholders.
    Placeholder,
    /// A regular expression, matched against the whole step text.
    Regex,
}

/// A parameter type referenced by a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTypeRef {
    /// The referenced type name (`u32`, `colour`, ...).
    pub name: String,
    /// Whether the name resolves to a registered custom parameter type.
    pub custom: bool,
}

/// The literal, uncompiled pattern of a step definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionPattern {
    source: String,
    syntax: PatternSyntax,
    parameter_types: Vec<ParameterTypeRef>,
}

impl DefinitionPattern {
    /// A placeholder pattern; typed placeholders are recorded as
    /// parameter-type references.
    ///
    /// # Examples
    /// ```
    /// use cuke_inspector::glue::DefinitionPattern;
    ///
    /// let pattern = DefinitionPattern::placeholder("I have {n:u32} {fruit}");
    /// let names: Vec<_> = pattern.parameter_types().iter().map(|t| t.name.as_str()).collect();
    /// assert_eq!(names, ["u32", "fruit"]);
    /// ```
    #[must_use]
    pub fn placeholder(source: impl Into<String>) -> Self {
        let source = source.into();
        let parameter_types = crate::matching::placeholders(&source)
            .into_iter()
            .map(|placeholder| ParameterTypeRef {
                name: placeholder.type_name().to_string(),
                custom: false,
            })
            .collect();
        Self {
            source,
            syntax: PatternSyntax::Placeholder,
            parameter_types,
        }
    }

    /// A regular-expression pattern.
    #[must_use]
    pub fn regex(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            syntax: PatternSyntax::Regex,
            parameter_types: Vec::new(),
        }
    }

    /// The pattern exactly as declared.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// How the source is interpreted.
    #[must_use]
    pub fn syntax(&self) -> PatternSyntax {
        self.syntax
    }

    /// Parameter types referenced by placeholders, in order of appearance.
    #[must_use]
    pub fn parameter_types(&self) -> &[ParameterTypeRef] {
        &self.parameter_types
    }

    pub(crate) fn resolve_custom_types(&mut self, is_custom: impl Fn(&str) -> bool) {
        for parameter_type in &mut self.parameter_types {
            parameter_type.custom = is_custom(&parameter_type.name);
        }
    }
}

/// Which attribute and function produced a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// The step attribute.
    pub kind: StepKind,
    /// The pattern as written in the attribute, or `None` when it was
    /// inferred from the function name.
    pub declared_pattern: Option<String>,
    /// Module-qualified function name.
    pub function: String,
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#[{}", self.kind)?;
        if let Some(pattern) = &self.declared_pattern {
            write!(f, "({pattern:?})")?;
        }
        write!(f, "] {}", self.function)
    }
}

/// One discovered step implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    /// The definition's pattern.
    pub pattern: DefinitionPattern,
    /// Position of the step attribute.
    pub location: Location,
    /// The implementing function, when known.
    pub attribution: Option<Attribution>,
}

impl StepDefinition {
    /// The attribution rendered for reports, or the unresolvable marker.
    #[must_use]
    pub fn describe(&self) -> String {
        self.attribution
            .as_ref()
            .map_or_else(|| UNRESOLVABLE_DEFINITION.to_string(), ToString::to_string)
    }
}

/// A custom parameter type declared with `#[param(name = "..", regex = "..")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTypeDefinition {
    /// Name used in placeholders.
    pub name: String,
    /// Regular expression matching the parameter text.
    pub regex: String,
    /// Position of the declaring attribute.
    pub location: Location,
}

/// Everything discovered from one or more glue locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlueIndex {
    /// Step definitions in discovery order.
    pub step_definitions: Vec<StepDefinition>,
    /// Custom parameter types in discovery order.
    pub parameter_types: Vec<ParameterTypeDefinition>,
}

impl GlueIndex {
    /// Append another index, keeping discovery order.
    pub fn extend(&mut self, other: Self) {
        self.step_definitions.extend(other.step_definitions);
        self.parameter_types.extend(other.parameter_types);
    }
}

/// Errors raised while discovering step definitions.
#[derive(Debug, thiserror::Error)]
pub enum GlueError {
    /// A glue file or directory could not be read.
    #[error("failed to read glue source {path}: {source}")]
    Read {
        /// The unreadable path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A glue file is not valid Rust.
    #[error("failed to parse glue source {path}: {source}")]
    Parse {
        /// The offending source.
        path: String,
        /// The parser error.
        #[source]
        source: syn::Error,
    },
    /// A function carries more than one step attribute.
    #[error("step function '{function}' in {path} has multiple step attributes")]
    MultipleStepAttributes {
        /// The offending source.
        path: String,
        /// Function name.
        function: String,
    },
    /// A step attribute could not be interpreted.
    #[error("invalid arguments for #[{attribute}] on step function '{function}' in {path}: {message}")]
    InvalidStepAttributeArguments {
        /// The offending source.
        path: String,
        /// Function name.
        function: String,
        /// Attribute keyword.
        attribute: StepKind,
        /// Parser message.
        message: String,
    },
    /// A `#[param]` declaration is malformed or its regex does not compile.
    #[error("invalid parameter type '{name}' in {path}: {message}")]
    InvalidParameterType {
        /// The offending source.
        path: String,
        /// Parameter type name, or the annotated item when no name is known.
        name: String,
        /// What is wrong with the declaration.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribution_renders_attribute_form() {
        let attribution = Attribution {
            kind: StepKind::Given,
            declared_pattern: Some("a {colour} apple".to_string()),
            function: "fruit::an_apple".to_string(),
        };
        assert_eq!(
            attribution.to_string(),
            "#[given(\"a {colour} apple\")] fruit::an_apple"
        );
    }

    #[test]
    fn inferred_attribution_renders_bare_attribute() {
        let attribution = Attribution {
            kind: StepKind::Then,
            declared_pattern: None,
            function: "it_works".to_string(),
        };
        assert_eq!(attribution.to_string(), "#[then] it_works");

        let empty = Attribution {
            declared_pattern: Some(String::new()),
            ..attribution
        };
        assert_eq!(empty.to_string(), "#[then(\"\")] it_works");
    }

    #[test]
    fn missing_attribution_degrades_to_marker() {
        let definition = StepDefinition {
            pattern: DefinitionPattern::placeholder("a step"),
            location: Location::at_line("steps.rs", "a step", 3),
            attribution: None,
        };
        assert_eq!(definition.describe(), UNRESOLVABLE_DEFINITION);
    }

    #[test]
    fn regex_patterns_do_not_reference_types() {
        let pattern = DefinitionPattern::regex(r"^I have (\d+)$");
        assert_eq!(pattern.syntax(), PatternSyntax::Regex);
        assert!(pattern.parameter_types().is_empty());
    }

    #[test]
    fn custom_types_are_resolved_by_name() {
        let mut pattern = DefinitionPattern::placeholder("{colour} and {n:u32}");
        pattern.resolve_custom_types(|name| name == "colour");
        let flags: Vec<_> = pattern.parameter_types().iter().map(|t| t.custom).collect();
        assert_eq!(flags, [true, false]);
    }
}
