//! Log output for the wizard. Events go to stderr so they never interleave with prompts
//! or review output written to stdout.

use std::fmt;

use tracing::debug;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

/// Where the active filter directive was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOrigin {
    RustLog,
    AppLogLevel,
}

impl fmt::Display for FilterOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterOrigin::RustLog => "RUST_LOG",
            FilterOrigin::AppLogLevel => "APP_LOG_LEVEL",
        })
    }
}

#[derive(Debug)]
pub enum TelemetryError {
    InvalidLogLevel {
        directive: String,
        source: ParseError,
    },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidLogLevel { directive, .. } => {
                write!(f, "APP_LOG_LEVEL '{directive}' is not a valid log filter")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "a log subscriber is already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidLogLevel { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

#[derive(Debug)]
struct LogFilter {
    origin: FilterOrigin,
    directive: String,
    filter: EnvFilter,
}

/// A non-empty `RUST_LOG` that parses wins; anything else falls back to the configured level,
/// which must parse.
fn select_filter(
    rust_log: Option<&str>,
    config: &TelemetryConfig,
) -> Result<LogFilter, TelemetryError> {
    let from_env = rust_log
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .and_then(|directive| {
            EnvFilter::try_new(directive)
                .ok()
                .map(|filter| LogFilter {
                    origin: FilterOrigin::RustLog,
                    directive: directive.to_string(),
                    filter,
                })
        });
    if let Some(selected) = from_env {
        return Ok(selected);
    }

    let directive = config.log_level.trim();
    EnvFilter::try_new(directive)
        .map(|filter| LogFilter {
            origin: FilterOrigin::AppLogLevel,
            directive: directive.to_string(),
            filter,
        })
        .map_err(|source| TelemetryError::InvalidLogLevel {
            directive: config.log_level.clone(),
            source,
        })
}

/// Installs the global stderr subscriber and reports which setting chose the filter.
pub fn init(config: &TelemetryConfig) -> Result<FilterOrigin, TelemetryError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let LogFilter {
        origin,
        directive,
        filter,
    } = select_filter(rust_log.as_deref(), config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)?;

    debug!(%origin, %directive, "log filter selected");
    Ok(origin)
}
