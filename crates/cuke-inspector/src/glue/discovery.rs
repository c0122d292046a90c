//! Step definition discovery from Rust sources.
//!
//! Sources are parsed with `syn`. Discovery mirrors the `rstest-bdd` step
//! macros:
//!
//! - `#[given("text")]` and `#[given(expr = "text")]` declare placeholder
//!   patterns; `#[given(regex = r"...")]` declares a regular expression.
//! - Missing attribute arguments infer the pattern from the function name by
//!   replacing underscores with spaces. A whitespace-only literal also
//!   triggers inference; the empty literal registers an empty pattern.
//! - Functions in inline modules and `impl` blocks are included.
//! - `#[param(name = "..", regex = "..")]` on a struct or enum declares a
//!   custom parameter type; `name` defaults to the lower-cased type name.

use std::ffi::OsStr;
use std::path::Path;

use proc_macro2::LineColumn;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Lit, LitStr, Meta, MetaNameValue, Token};
use tracing::debug;
use walkdir::WalkDir;

use super::{
    Attribution, DefinitionPattern, GlueError, GlueIndex, ParameterTypeDefinition, StepDefinition,
    StepKind,
};
use crate::location::Location;

/// Discover glue from Rust source text. `path` identifies the source in
/// locations and errors.
///
/// # Errors
/// Returns [`GlueError`] when the source is not valid Rust or a step or
/// parameter attribute is malformed.
///
/// # Examples
/// ```
/// use cuke_inspector::glue::discover_source;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let index = discover_source("steps.rs", "#[when]\nfn do_the_thing() {}\n")?;
/// let pattern = index.step_definitions.first().map(|d| d.pattern.source());
/// assert_eq!(pattern, Some("do the thing"));
/// # Ok(())
/// # }
/// ```
pub fn discover_source(path: &str, source: &str) -> Result<GlueIndex, GlueError> {
    let file = syn::parse_file(source).map_err(|source| GlueError::Parse {
        path: path.to_string(),
        source,
    })?;
    let mut collector = Collector {
        path,
        module_path: Vec::new(),
        index: GlueIndex::default(),
    };
    collector.items(&file.items)?;
    debug!(
        path,
        steps = collector.index.step_definitions.len(),
        parameter_types = collector.index.parameter_types.len(),
        "discovered glue"
    );
    Ok(collector.index)
}

/// Discover glue from a Rust source file.
///
/// # Errors
/// Returns [`GlueError::Read`] when the file cannot be read, otherwise as
/// [`discover_source`].
pub fn discover_file(path: &Path) -> Result<GlueIndex, GlueError> {
    let display = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| GlueError::Read {
        path: display.clone(),
        source,
    })?;
    discover_source(&display, &source)
}

/// Discover glue from every `.rs` file below `path`, visited in path order.
///
/// # Errors
/// Returns [`GlueError::Read`] when the directory cannot be walked,
/// otherwise as [`discover_source`].
pub fn discover_directory(path: &Path) -> Result<GlueIndex, GlueError> {
    let mut index = GlueIndex::default();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|err| GlueError::Read {
            path: path.display().to_string(),
            source: err.into(),
        })?;
        if entry.file_type().is_file() && is_rust_file(entry.path()) {
            index.extend(discover_file(entry.path())?);
        }
    }
    Ok(index)
}

fn is_rust_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == OsStr::new("rs"))
}

struct Collector<'a> {
    path: &'a str,
    module_path: Vec<String>,
    index: GlueIndex,
}

/// A function-like item that may carry a step attribute.
struct StepFunction<'f> {
    attrs: &'f [Attribute],
    ident: &'f syn::Ident,
    owner: Option<String>,
}

impl Collector<'_> {
    fn items(&mut self, items: &[syn::Item]) -> Result<(), GlueError> {
        for item in items {
            match item {
                syn::Item::Fn(item_fn) => self.function(&StepFunction {
                    attrs: &item_fn.attrs,
                    ident: &item_fn.sig.ident,
                    owner: None,
                })?,
                syn::Item::Impl(item_impl) => {
                    let owner = type_name(&item_impl.self_ty);
                    for impl_item in &item_impl.items {
                        if let syn::ImplItem::Fn(method) = impl_item {
                            self.function(&StepFunction {
                                attrs: &method.attrs,
                                ident: &method.sig.ident,
                                owner: owner.clone(),
                            })?;
                        }
                    }
                }
                syn::Item::Mod(item_mod) => {
                    let Some((_, items)) = item_mod.content.as_ref() else {
                        continue;
                    };
                    self.module_path.push(item_mod.ident.to_string());
                    self.items(items)?;
                    self.module_path.pop();
                }
                syn::Item::Struct(item) => self.parameter_type(&item.attrs, &item.ident)?,
                syn::Item::Enum(item) => self.parameter_type(&item.attrs, &item.ident)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn qualified(&self, owner: Option<&str>, ident: &syn::Ident) -> String {
        let mut segments = self.module_path.clone();
        segments.extend(owner.map(ToString::to_string));
        segments.push(ident.to_string());
        segments.join("::")
    }

    fn location(&self, token: &str, start: LineColumn) -> Location {
        Location::new(self.path, token, start.line, start.column + 1)
    }

    fn function(&mut self, function: &StepFunction<'_>) -> Result<(), GlueError> {
        let mut found: Option<(StepKind, &Attribute)> = None;
        for attr in function.attrs {
            let Some(kind) = step_kind(attr) else {
                continue;
            };
            if found.is_some() {
                return Err(GlueError::MultipleStepAttributes {
                    path: self.path.to_string(),
                    function: function.ident.to_string(),
                });
            }
            found = Some((kind, attr));
        }
        let Some((kind, attr)) = found else {
            return Ok(());
        };

        let declared = parse_step_attribute(attr).map_err(|message| {
            GlueError::InvalidStepAttributeArguments {
                path: self.path.to_string(),
                function: function.ident.to_string(),
                attribute: kind,
                message,
            }
        })?;
        let (pattern, declared_pattern) = match declared {
            Declared::Placeholder(raw) if !raw.is_empty() && raw.trim().is_empty() => {
                (DefinitionPattern::placeholder(infer_pattern(function.ident)), None)
            }
            Declared::Placeholder(raw) => (DefinitionPattern::placeholder(raw.clone()), Some(raw)),
            Declared::Regex(raw) => (DefinitionPattern::regex(raw.clone()), Some(raw)),
            Declared::Inferred => (
                DefinitionPattern::placeholder(infer_pattern(function.ident)),
                None,
            ),
        };

        let location = self.location(pattern.source(), attr.span().start());
        let attribution = Attribution {
            kind,
            declared_pattern,
            function: self.qualified(function.owner.as_deref(), function.ident),
        };
        self.index.step_definitions.push(StepDefinition {
            pattern,
            location,
            attribution: Some(attribution),
        });
        Ok(())
    }

    fn parameter_type(&mut self, attrs: &[Attribute], ident: &syn::Ident) -> Result<(), GlueError> {
        for attr in attrs.iter().filter(|attr| last_segment_is(attr, "param")) {
            let invalid = |message: String| GlueError::InvalidParameterType {
                path: self.path.to_string(),
                name: ident.to_string(),
                message,
            };
            let args = attr
                .parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)
                .map_err(|err| invalid(err.to_string()))?;

            let mut name = None;
            let mut regex = None;
            for arg in &args {
                let value = string_value(&arg.value)
                    .ok_or_else(|| invalid("expected string literal value".to_string()))?;
                if arg.path.is_ident("name") {
                    name = Some(value);
                } else if arg.path.is_ident("regex") {
                    regex = Some(value);
                } else {
                    return Err(invalid("expected `name` or `regex`".to_string()));
                }
            }
            let regex = regex.ok_or_else(|| invalid("missing `regex`".to_string()))?;
            let name = name.unwrap_or_else(|| ident.to_string().to_lowercase());
            let location = self.location(&name, attr.span().start());
            self.index.parameter_types.push(ParameterTypeDefinition {
                name,
                regex,
                location,
            });
        }
        Ok(())
    }
}

enum Declared {
    Placeholder(String),
    Regex(String),
    Inferred,
}

fn parse_step_attribute(attr: &Attribute) -> Result<Declared, String> {
    match &attr.meta {
        Meta::Path(_) => Ok(Declared::Inferred),
        Meta::List(list) if list.tokens.is_empty() => Ok(Declared::Inferred),
        Meta::List(_) => {
            if let Ok(literal) = attr.parse_args::<LitStr>() {
                return Ok(Declared::Placeholder(literal.value()));
            }
            let args = attr
                .parse_args_with(Punctuated::<MetaNameValue, Token![,]>::parse_terminated)
                .map_err(|err| err.to_string())?;
            let mut declared = None;
            for arg in &args {
                let value = string_value(&arg.value)
                    .ok_or_else(|| "expected string literal value".to_string())?;
                let next = if arg.path.is_ident("expr") {
                    Declared::Placeholder(value)
                } else if arg.path.is_ident("regex") {
                    Declared::Regex(value)
                } else {
                    return Err("expected a string literal, `expr = ..` or `regex = ..`".to_string());
                };
                if declared.replace(next).is_some() {
                    return Err("only one of `expr` and `regex` may be given".to_string());
                }
            }
            declared.ok_or_else(|| "missing step pattern".to_string())
        }
        Meta::NameValue(name_value) => string_value(&name_value.value)
            .map(Declared::Placeholder)
            .ok_or_else(|| "expected string literal value".to_string()),
    }
}

fn string_value(expr: &Expr) -> Option<String> {
    let Expr::Lit(expr_lit) = expr else {
        return None;
    };
    let Lit::Str(lit) = &expr_lit.lit else {
        return None;
    };
    Some(lit.value())
}

fn last_segment_is(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == name)
}

fn step_kind(attr: &Attribute) -> Option<StepKind> {
    let ident = attr.path().segments.last()?.ident.to_string();
    match ident.as_str() {
        "given" => Some(StepKind::Given),
        "when" => Some(StepKind::When),
        "then" => Some(StepKind::Then),
        _ => None,
    }
}

fn type_name(ty: &syn::Type) -> Option<String> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    type_path
        .path
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
}

fn infer_pattern(ident: &syn::Ident) -> String {
    ident.to_string().replace('_', " ")
}
