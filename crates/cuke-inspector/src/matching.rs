//! Pattern compilation and the matching facade.
//!
//! Placeholder patterns are compiled with `rstest-bdd-patterns`. Placeholders
//! whose type names a registered custom parameter type are spliced in with
//! that type's regular expression, so the pattern is compiled segment by
//! segment around them. Regex patterns are matched against the whole step
//! text.

use std::collections::BTreeMap;
use std::ops::Range;

use regex::Regex;
use rstest_bdd_patterns::{PatternError, build_regex_from_pattern};
use tracing::{debug, warn};

use crate::glue::{DefinitionPattern, GlueError, ParameterTypeDefinition, PatternSyntax};

/// A placeholder found in a pattern source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placeholder {
    pub(crate) name: String,
    pub(crate) hint: Option<String>,
    pub(crate) range: Range<usize>,
}

impl Placeholder {
    /// The type hint, or the name for untyped placeholders.
    pub(crate) fn type_name(&self) -> &str {
        self.hint.as_deref().unwrap_or(&self.name)
    }
}

/// Scan a placeholder pattern using the same lexical rules as
/// `rstest-bdd-patterns`: `\x` escapes, `{{`/`}}` are literal braces, and a
/// placeholder starts with `{` followed by a letter or underscore.
///
/// Scanning stops at the first malformed placeholder; compilation reports it.
pub(crate) fn placeholders(source: &str) -> Vec<Placeholder> {
    let bytes = source.as_bytes();
    let mut found = Vec::new();
    let mut index = 0;
    while let Some(&byte) = bytes.get(index) {
        match byte {
            b'\\' => index += 2,
            b'{' | b'}' if bytes.get(index + 1) == Some(&byte) => index += 2,
            b'{' if bytes
                .get(index + 1)
                .is_some_and(|next| next.is_ascii_alphabetic() || *next == b'_') =>
            {
                let Some(placeholder) = scan_placeholder(source, index) else {
                    break;
                };
                index = placeholder.range.end;
                found.push(placeholder);
            }
            _ => index += 1,
        }
    }
    found
}

fn scan_placeholder(source: &str, start: usize) -> Option<Placeholder> {
    let bytes = source.as_bytes();
    let name_start = start + 1;
    let mut index = name_start;
    while bytes
        .get(index)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        index += 1;
    }
    let name = source.get(name_start..index)?.to_string();

    if bytes.get(index) == Some(&b':') {
        let hint_start = index + 1;
        let close = hint_start + source.get(hint_start..)?.find('}')?;
        let hint = source.get(hint_start..close)?;
        if hint.is_empty() || hint.contains(char::is_whitespace) || hint.contains('{') {
            return None;
        }
        return Some(Placeholder {
            name,
            hint: Some(hint.to_string()),
            range: start..close + 1,
        });
    }

    let mut depth = 0usize;
    while let Some(&byte) = bytes.get(index) {
        match byte {
            b'{' => depth += 1,
            b'}' if depth == 0 => {
                return Some(Placeholder {
                    name,
                    hint: None,
                    range: start..index + 1,
                });
            }
            b'}' => depth -= 1,
            _ => {}
        }
        index += 1;
    }
    None
}

/// A registered custom parameter type with its validated expression.
#[derive(Debug, Clone)]
pub struct CustomParameterType {
    name: String,
    regex: String,
    groups: usize,
}

impl CustomParameterType {
    /// The name used in placeholders.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The expression matching the parameter text.
    #[must_use]
    pub fn regex(&self) -> &str {
        &self.regex
    }
}

/// Custom parameter types known to the compiler.
#[derive(Debug, Clone, Default)]
pub struct ParameterTypeRegistry {
    types: BTreeMap<String, CustomParameterType>,
}

impl ParameterTypeRegistry {
    /// Register a custom type. A later registration with the same name
    /// replaces the earlier one.
    ///
    /// # Errors
    /// Returns [`GlueError::InvalidParameterType`] when the expression does
    /// not compile.
    pub fn register(&mut self, definition: &ParameterTypeDefinition) -> Result<(), GlueError> {
        let compiled = Regex::new(&format!("^(?:{})$", definition.regex)).map_err(|err| {
            GlueError::InvalidParameterType {
                path: definition.location.file.clone(),
                name: definition.name.clone(),
                message: err.to_string(),
            }
        })?;
        let custom = CustomParameterType {
            name: definition.name.clone(),
            regex: definition.regex.clone(),
            groups: compiled.captures_len().saturating_sub(1),
        };
        if self.types.insert(definition.name.clone(), custom).is_some() {
            warn!(name = %definition.name, "custom parameter type registered twice; keeping the later one");
        }
        Ok(())
    }

    /// Look up a custom type by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CustomParameterType> {
        self.types.get(name)
    }

    /// Whether `name` is a registered custom type.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CustomParameterType> {
        self.types.values()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A pattern could not be compiled into a matcher.
#[derive(Debug, thiserror::Error)]
pub enum PatternCompileError {
    /// Malformed placeholder syntax.
    #[error("invalid step pattern '{pattern}': {source}")]
    Placeholder {
        /// The pattern source.
        pattern: String,
        /// The pattern lexer error.
        #[source]
        source: PatternError,
    },
    /// The resulting (or declared) regular expression is invalid.
    #[error("invalid regular expression for step pattern '{pattern}': {source}")]
    Regex {
        /// The pattern source.
        pattern: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// Matching failed for reasons other than the text not matching.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A placeholder's capture group did not participate in the match.
    #[error("placeholder '{placeholder}' of '{pattern}' captured nothing")]
    MissingCapture {
        /// The pattern source.
        pattern: String,
        /// Placeholder name.
        placeholder: String,
    },
}

/// One value extracted by a structural match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Placeholder or capture-group name, when the pattern names it.
    pub name: Option<String>,
    /// Declared parameter type, when known.
    pub type_name: Option<String>,
    /// The matched text.
    pub value: String,
}

/// How a candidate text satisfied a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The text equals the pattern source.
    Exact,
    /// The compiled pattern matched, yielding arguments.
    Parameterized {
        /// Extracted values in pattern order.
        arguments: Vec<Argument>,
    },
}

#[derive(Debug, Clone)]
struct Capture {
    name: String,
    type_name: Option<String>,
    group: usize,
}

/// A pattern compiled into an anchored regular expression.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    syntax: PatternSyntax,
    regex: Regex,
    captures: Vec<Capture>,
}

impl CompiledPattern {
    /// The pattern source this matcher was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The anchored regular expression used for matching.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Match `text` structurally.
    ///
    /// # Errors
    /// Returns [`MatchError`] when the text matched but arguments could not
    /// be extracted.
    pub fn try_match(&self, text: &str) -> Result<Option<MatchResult>, MatchError> {
        let Some(caps) = self.regex.captures(text) else {
            return Ok(None);
        };
        let arguments = match self.syntax {
            PatternSyntax::Placeholder => self
                .captures
                .iter()
                .map(|capture| {
                    let value = caps.get(capture.group).ok_or_else(|| MatchError::MissingCapture {
                        pattern: self.source.clone(),
                        placeholder: capture.name.clone(),
                    })?;
                    Ok(Argument {
                        name: Some(capture.name.clone()),
                        type_name: capture.type_name.clone(),
                        value: value.as_str().to_string(),
                    })
                })
                .collect::<Result<Vec<_>, MatchError>>()?,
            PatternSyntax::Regex => self
                .regex
                .capture_names()
                .zip(caps.iter())
                .skip(1)
                .filter_map(|(name, value)| {
                    value.map(|value| Argument {
                        name: name.map(ToString::to_string),
                        type_name: None,
                        value: value.as_str().to_string(),
                    })
                })
                .collect(),
        };
        Ok(Some(MatchResult::Parameterized { arguments }))
    }
}

/// Compile a definition pattern against the registered custom types.
///
/// # Errors
/// Returns [`PatternCompileError`] when the placeholder syntax is malformed
/// or the resulting expression does not compile.
pub fn compile(
    pattern: &DefinitionPattern,
    types: &ParameterTypeRegistry,
) -> Result<CompiledPattern, PatternCompileError> {
    let source = pattern.source();
    let regex_error = |source_err| PatternCompileError::Regex {
        pattern: source.to_string(),
        source: source_err,
    };
    match pattern.syntax() {
        PatternSyntax::Regex => {
            let regex = Regex::new(&format!("^(?:{source})$")).map_err(regex_error)?;
            Ok(CompiledPattern {
                source: source.to_string(),
                syntax: PatternSyntax::Regex,
                regex,
                captures: Vec::new(),
            })
        }
        PatternSyntax::Placeholder => {
            let (expression, captures) = placeholder_expression(source, types)?;
            let regex = Regex::new(&expression).map_err(regex_error)?;
            Ok(CompiledPattern {
                source: source.to_string(),
                syntax: PatternSyntax::Placeholder,
                regex,
                captures,
            })
        }
    }
}

fn placeholder_expression(
    source: &str,
    types: &ParameterTypeRegistry,
) -> Result<(String, Vec<Capture>), PatternCompileError> {
    let mut expression = String::from("^");
    let mut captures = Vec::new();
    let mut next_group = 1;
    let mut segment_start = 0;
    let mut builtin: Vec<Placeholder> = Vec::new();

    for placeholder in placeholders(source) {
        let Some(custom) = types.get(placeholder.type_name()) else {
            builtin.push(placeholder);
            continue;
        };
        let segment = source.get(segment_start..placeholder.range.start).unwrap_or_default();
        expression.push_str(&segment_expression(source, segment)?);
        for earlier in builtin.drain(..) {
            captures.push(capture_for(earlier, next_group));
            next_group += 1;
        }

        expression.push('(');
        expression.push_str(custom.regex());
        expression.push(')');
        segment_start = placeholder.range.end;
        let groups = custom.groups;
        captures.push(Capture {
            type_name: Some(custom.name().to_string()),
            ..capture_for(placeholder, next_group)
        });
        next_group += 1 + groups;
    }

    let tail = source.get(segment_start..).unwrap_or_default();
    expression.push_str(&segment_expression(source, tail)?);
    for earlier in builtin {
        captures.push(capture_for(earlier, next_group));
        next_group += 1;
    }
    expression.push('$');
    Ok((expression, captures))
}

fn capture_for(placeholder: Placeholder, group: usize) -> Capture {
    Capture {
        type_name: placeholder.hint,
        name: placeholder.name,
        group,
    }
}

/// Compile a literal-plus-builtin-placeholder segment to an unanchored
/// expression. Each builtin placeholder contributes exactly one group.
fn segment_expression(pattern: &str, segment: &str) -> Result<String, PatternCompileError> {
    let anchored =
        build_regex_from_pattern(segment).map_err(|source| PatternCompileError::Placeholder {
            pattern: pattern.to_string(),
            source,
        })?;
    let body = anchored
        .strip_prefix('^')
        .and_then(|rest| rest.strip_suffix('$'))
        .unwrap_or(&anchored);
    Ok(body.to_string())
}

/// Decide whether `candidate` satisfies a pattern.
///
/// Literal equality with the pattern source short-circuits structural
/// matching. Match errors are logged and treated as "no match".
#[must_use]
pub fn matches(
    source: &str,
    compiled: Option<&CompiledPattern>,
    candidate: &str,
) -> Option<MatchResult> {
    if source == candidate {
        return Some(MatchResult::Exact);
    }
    match compiled?.try_match(candidate) {
        Ok(result) => result,
        Err(err) => {
            debug!(pattern = source, candidate, error = %err, "treating failed match as no match");
            None
        }
    }
}
