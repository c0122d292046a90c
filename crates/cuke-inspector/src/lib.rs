//! Static analysis for Gherkin feature suites and their Rust step definitions.
//!
//! The crate parses `.feature` files, discovers `#[given]`, `#[when]` and
//! `#[then]` step definitions in Rust glue sources, and runs independent
//! checkers over the resulting snapshot. Every finding is reported as a
//! [`Violation`] that can be rendered as plain text.
//!
//! # Overview
//!
//! - [`parsing`] turns feature text into the [`model`] types.
//! - [`glue`] discovers step definitions and custom parameter types.
//! - [`matching`] compiles definition patterns and matches step text.
//! - [`checkers`] holds one pure function per rule.
//! - [`inspector`] wires the pieces together behind a fluent API.
//!
//! # Example
//!
//! ```
//! use cuke_inspector::Inspector;
//!
//! let mut inspector = Inspector::builder()
//!     .with_feature_source(
//!         "checkout.feature",
//!         "Feature: Checkout\n  Scenario: pay\n    Given a basket\n",
//!     )
//!     .with_glue_source("steps.rs", "#[given(\"a basket\")]\nfn a_basket() {}\n")
//!     .build()?;
//! inspector
//!     .check_missing_step_definitions()
//!     .check_unused_step_definitions();
//! assert!(inspector.assert_no_violations().is_ok());
//! # Ok::<(), cuke_inspector::InspectorError>(())
//! ```

pub mod checkers;
pub mod dialect;
pub mod error;
pub mod format;
pub mod glue;
pub mod inspector;
pub mod location;
pub mod matching;
pub mod model;
pub mod parsing;
pub mod snapshot;
pub mod violation;

pub use checkers::{Check, CheckKind, ForbiddenKeywords, TagCombination, TagPattern};
pub use error::InspectorError;
pub use inspector::{Inspector, InspectorBuilder, ViolationReport};
pub use location::Location;
pub use snapshot::Snapshot;
pub use violation::Violation;
