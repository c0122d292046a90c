//! Command line front end for cuke-inspector.
//!
//! Loads the configured feature suites and glue, runs the selected checks
//! and writes the violation report to stdout.
//!
//! Exit status is `0` when the suite is clean, `1` when violations were
//! found and `2` for configuration or parse errors.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cuke_inspector::{CheckKind, Inspector, InspectorBuilder};
use eyre::{Context, Result, bail};
use tracing::{error, info};

mod cli;
mod config;
mod logging;

use cli::Args;
use config::CliConfig;
use logging::init_logging;

const EXIT_VIOLATIONS: u8 = 1;
const EXIT_CONFIGURATION: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config.apply_overrides(args.log_level, args.fail_on_violations),
        Err(e) => {
            init_logging(&CliConfig::default());
            error!(error = %e, "invalid configuration");
            return ExitCode::from(EXIT_CONFIGURATION);
        }
    };
    init_logging(&config);

    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(count) => {
            info!(violations = count, "inspection finished with violations");
            if config.fail_on_violations {
                ExitCode::from(EXIT_VIOLATIONS)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(report) => {
            error!("{report:?}");
            ExitCode::from(EXIT_CONFIGURATION)
        }
    }
}

/// Run the selected checks and write the report, returning the number of
/// violations found.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or an input cannot be
/// loaded.
fn run(args: &Args) -> Result<usize> {
    let checks = args.checks().wrap_err("invalid check configuration")?;
    if checks.is_empty() {
        bail!("no checks selected; pass --all or at least one check flag");
    }

    let mut builder = Inspector::builder();
    for path in &args.features {
        builder = add_features(builder, path)?;
    }
    for path in &args.glue {
        builder = add_glue(builder, path)?;
    }
    let mut inspector = builder.build().wrap_err("failed to load the suite")?;
    inspector.run(&checks);

    let violations = inspector.violations();
    let mut stdout = io::stdout().lock();
    if let Err(report) = inspector.assert_no_violations() {
        write!(stdout, "{report}").wrap_err("failed to write the report")?;
        write_summary(&mut stdout, violations.iter().map(|v| v.check))?;
    }
    stdout.flush().wrap_err("failed to flush the report")?;
    Ok(violations.len())
}

fn add_features(builder: InspectorBuilder, path: &Path) -> Result<InspectorBuilder> {
    let builder = if path.is_dir() {
        builder.with_feature_directory(path)
    } else {
        builder.with_feature_file(path)
    };
    builder.wrap_err_with(|| format!("failed to load features from {}", path.display()))
}

fn add_glue(builder: InspectorBuilder, path: &Path) -> Result<InspectorBuilder> {
    let builder = if path.is_dir() {
        builder.with_glue_directory(path)
    } else {
        builder.with_glue_file(path)
    };
    builder.wrap_err_with(|| format!("failed to load glue from {}", path.display()))
}

fn write_summary(writer: &mut dyn Write, kinds: impl Iterator<Item = CheckKind>) -> Result<()> {
    let mut counts: BTreeMap<CheckKind, usize> = BTreeMap::new();
    for kind in kinds {
        *counts.entry(kind).or_default() += 1;
    }
    writeln!(writer, "---").wrap_err("failed to write the summary")?;
    for (kind, count) in counts {
        writeln!(writer, "{kind}: {count}").wrap_err("failed to write the summary")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "writing to a vector cannot fail")]
    fn summary_counts_violations_per_check() {
        let mut out = Vec::new();
        write_summary(
            &mut out,
            [
                CheckKind::MissingStepDefinitions,
                CheckKind::DuplicateScenarios,
                CheckKind::MissingStepDefinitions,
            ]
            .into_iter(),
        )
        .expect("summary written");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "---\nmissing-steps: 2\nduplicate-scenarios: 1\n"
        );
    }
}
