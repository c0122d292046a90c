//! Runtime configuration parsed from environment variables.
//!
//! Settings can be overridden via environment variables prefixed with
//! `CUKE_INSPECTOR_`; command line flags take precedence over both.

use std::env;
use std::str::FromStr;

use thiserror::Error;

const LOG_LEVEL_VAR: &str = "CUKE_INSPECTOR_LOG_LEVEL";
const FAIL_ON_VIOLATIONS_VAR: &str = "CUKE_INSPECTOR_FAIL_ON_VIOLATIONS";

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A log level name was not recognised.
    #[error("unknown log level '{0}', expected one of: trace, debug, info, warn, error")]
    UnknownLogLevel(String),
    /// A boolean setting held something other than `true` or `false`.
    #[error("invalid value '{value}' for {name}, expected true or false")]
    InvalidBool {
        /// The variable name.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn` so reports are not drowned in progress messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging.
    Trace,
    /// Per-document and per-glue-file loading.
    Debug,
    /// Snapshot summaries.
    Info,
    /// Recoverable problems such as uncompilable patterns.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::UnknownLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Configuration for one CLI invocation.
///
/// # Environment Variables
///
/// - `CUKE_INSPECTOR_LOG_LEVEL`: log level (trace, debug, info, warn, error)
/// - `CUKE_INSPECTOR_FAIL_ON_VIOLATIONS`: exit non-zero when violations are
///   found (`true` or `false`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level.
    pub log_level: LogLevel,
    /// Whether violations turn into a failing exit status.
    pub fail_on_violations: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            fail_on_violations: true,
        }
    }
}

impl CliConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable contains an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing values.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(val) => val.parse()?,
            None => defaults.log_level,
        };
        let fail_on_violations = match lookup(FAIL_ON_VIOLATIONS_VAR) {
            Some(val) => parse_bool(FAIL_ON_VIOLATIONS_VAR, &val)?,
            None => defaults.fail_on_violations,
        };
        Ok(Self {
            log_level,
            fail_on_violations,
        })
    }

    /// Apply command line overrides on top of environment settings.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        fail_on_violations: Option<bool>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(fail) = fail_on_violations {
            self.fail_on_violations = fail;
        }
        self
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[rstest]
    #[case("trace", LogLevel::Trace)]
    #[case("Debug", LogLevel::Debug)]
    #[case("INFO", LogLevel::Info)]
    #[case("warning", LogLevel::Warn)]
    #[case("error", LogLevel::Error)]
    fn log_level_parses_case_insensitively(#[case] raw: &str, #[case] expected: LogLevel) {
        assert_eq!(raw.parse::<LogLevel>(), Ok(expected));
    }

    #[test]
    fn log_level_rejects_invalid_values() {
        let result = "loud".parse::<LogLevel>();
        assert_eq!(result, Err(ConfigError::UnknownLogLevel("loud".to_string())));
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        assert_eq!(CliConfig::from_lookup(lookup(&[])), Ok(CliConfig::default()));
    }

    #[test]
    fn variables_are_read() {
        let config = CliConfig::from_lookup(lookup(&[
            (LOG_LEVEL_VAR, "debug"),
            (FAIL_ON_VIOLATIONS_VAR, "false"),
        ]));
        assert_eq!(
            config,
            Ok(CliConfig {
                log_level: LogLevel::Debug,
                fail_on_violations: false,
            })
        );
    }

    #[test]
    fn invalid_boolean_is_a_configuration_error() {
        let config = CliConfig::from_lookup(lookup(&[(FAIL_ON_VIOLATIONS_VAR, "sometimes")]));
        assert!(matches!(config, Err(ConfigError::InvalidBool { .. })));
    }

    #[test]
    fn overrides_take_precedence() {
        let config = CliConfig::default().apply_overrides(Some(LogLevel::Error), Some(false));
        assert_eq!(config.log_level, LogLevel::Error);
        assert!(!config.fail_on_violations);

        let unchanged = CliConfig::default().apply_overrides(None, None);
        assert_eq!(unchanged, CliConfig::default());
    }
}
