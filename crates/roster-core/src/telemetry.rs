//! Tracing subscriber setup shared by binaries and integration tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directives when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,roster=debug,tower_http=debug";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, multi-line output.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name, falling back to `Pretty` for anything unknown.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Builds the env filter: `RUST_LOG` wins, then `level`, then [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| match level {
            Some(level) if !level.trim().is_empty() => {
                EnvFilter::try_new(format!("{level},roster=debug,tower_http=debug"))
            }
            _ => EnvFilter::try_new(DEFAULT_FILTER),
        })
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global tracing subscriber.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(level: Option<&str>, format: LogFormat) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter(level));

    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    result.is_ok()
}
