//! Structured JSON tracing for state transitions and reveals.
//!
//! Events go to a JSON-lines file next to the debug log and only when file
//! logging is on, so an unattended display never writes without being asked.

use crate::config::AppConfig;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_subscriber::fmt::time::UtcTime;

const TRACE_LOG_ENV: &str = "MAGIC7BALL_TRACE_LOG";
const TRACE_LOG_FILE: &str = "magic7ball_trace.jsonl";

static TRACING_INIT: OnceLock<()> = OnceLock::new();

pub fn tracing_log_path() -> PathBuf {
    trace_path_from(env::var(TRACE_LOG_ENV).ok())
}

fn trace_path_from(override_path: Option<String>) -> PathBuf {
    match override_path {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => env::temp_dir().join(TRACE_LOG_FILE),
    }
}

/// Install the global subscriber once and record how the session was launched.
pub fn init_tracing(config: &AppConfig) {
    if !config.logs || config.no_logs {
        return;
    }

    TRACING_INIT.get_or_init(|| {
        let path = tracing_log_path();
        let file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(err) => {
                crate::log_debug(&format!(
                    "tracing disabled: cannot open {}: {err}",
                    path.display()
                ));
                return;
            }
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(file)
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            crate::log_debug("tracing subscriber already installed");
            return;
        }
        tracing::info!(
            config = %config.config_path.display(),
            seed = ?config.seed,
            fps = ?config.fps,
            "session tracing started"
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_path_honours_override() {
        assert_eq!(
            trace_path_from(Some("/tmp/show.jsonl".to_string())),
            PathBuf::from("/tmp/show.jsonl")
        );
    }

    #[test]
    fn blank_override_falls_back_to_temp_dir() {
        let expected = env::temp_dir().join(TRACE_LOG_FILE);
        assert_eq!(trace_path_from(Some("  ".to_string())), expected);
        assert_eq!(trace_path_from(None), expected);
    }
}
