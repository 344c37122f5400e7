use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const PERCEPT_APPS_CONFIG_ENV_NAME: &str = "PERCEPT_APPS_SERVICE_CONFIG_PATH";

/// Get service config from input or env PERCEPT_APPS_SERVICE_CONFIG_PATH
pub fn get_apps_service_config(config: Option<PathBuf>) -> Option<PathBuf> {
    if config.is_some() {
        config
    } else {
        std::env::var(PERCEPT_APPS_CONFIG_ENV_NAME)
            .map(|s| {
                warn!("### ENV VAR {} is used ###", s);
                PathBuf::from(s)
            })
            .ok()
    }
}

/// Logs to stderr, filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Same as [`init_tracing`], and additionally writes the events of
/// `percept_tracing` wrappers as JSON into daily files under `log_dir`.
///
/// The files can be read back with `percept_tracing::de::from_str`. Keep the
/// returned guard alive until the program exits, or buffered lines are lost.
pub fn init_tracing_with_file_appender(log_dir: &Path, prefix: &str) -> WorkerGuard {
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, prefix));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());
    let file_layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .with_current_span(false)
        .with_filter(EnvFilter::new("percept_tracing=trace"));
    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    guard
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_apps_service_config() {
        let path = get_apps_service_config(Some(PathBuf::from("a.toml")));
        assert_eq!(path, Some(PathBuf::from("a.toml")));

        std::env::set_var(PERCEPT_APPS_CONFIG_ENV_NAME, "b.toml");
        let path = get_apps_service_config(Some(PathBuf::from("a.toml")));
        assert_eq!(path, Some(PathBuf::from("a.toml")));
        let path = get_apps_service_config(None);
        assert_eq!(path, Some(PathBuf::from("b.toml")));
        std::env::remove_var(PERCEPT_APPS_CONFIG_ENV_NAME);

        let path = get_apps_service_config(None);
        assert!(path.is_none());
    }
}
