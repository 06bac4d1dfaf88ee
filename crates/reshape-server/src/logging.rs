//! Structured logging setup
//!
//! tracing-subscriber with an `EnvFilter`: `RUST_LOG` wins, otherwise the
//! default level is `info`. `RESHAPE_LOG_FORMAT=json` switches to JSON
//! output for log shippers; the default compact format is for humans.

use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("RESHAPE_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") | Err(_) => LogFormat::Compact,
            Ok(other) => {
                eprintln!("invalid RESHAPE_LOG_FORMAT '{}', using compact", other);
                LogFormat::Compact
            }
        }
    }
}

/// Initialize the global tracing subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match LogFormat::from_env() {
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .compact()
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .json()
                .init();
        }
    }
}
