//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber described by [`LoggingConfig`]:
//! one `fmt` layer per enabled output (console, file), under a shared
//! `EnvFilter`. `RUST_LOG` still wins over the configured level when it is set.

use crate::config::LoggingConfig;
use crate::error::{NetworkError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Target used by the diagnostic dump formatter
pub const DUMP_TARGET: &str = "zone_net::dump";

type FilteredRegistry = Layered<EnvFilter, Registry>;
type OutputLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync + 'static>;

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    config_errors(config)?;
    let layers = output_layers(config)?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(layers)
        .try_init()
        .map_err(|e| NetworkError::ConfigError(format!("Failed to install logger: {e}")))?;

    tracing::info!(
        app = %config.app_name,
        level = %config.log_level,
        console = config.log_to_console,
        file = config.log_to_file,
        "Logging initialized"
    );
    Ok(())
}

/// One layer per enabled output
fn output_layers(config: &LoggingConfig) -> Result<Vec<OutputLayer>> {
    let mut layers: Vec<OutputLayer> = Vec::new();

    if config.log_to_console {
        let layer = fmt::layer();
        layers.push(if config.json_format {
            layer.json().boxed()
        } else {
            layer.boxed()
        });
    }

    if config.log_to_file {
        let path = config.log_file_path.as_deref().ok_or_else(|| {
            NetworkError::ConfigError("log_file_path must be set for file logging".to_string())
        })?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
        layers.push(if config.json_format {
            layer.json().boxed()
        } else {
            layer.boxed()
        });
    }

    Ok(layers)
}

fn config_errors(config: &LoggingConfig) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(NetworkError::ConfigError(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logging_without_path_is_rejected() {
        let config = LoggingConfig {
            log_to_file: true,
            log_file_path: None,
            ..LoggingConfig::default()
        };
        assert!(matches!(
            init_logging(&config),
            Err(NetworkError::ConfigError(_))
        ));
    }

    #[test]
    fn console_and_file_outputs_both_get_a_layer() {
        let path = std::env::temp_dir().join(format!("zone-net-log-{}.log", std::process::id()));
        let config = LoggingConfig {
            log_to_console: true,
            log_to_file: true,
            log_file_path: Some(path.to_string_lossy().into_owned()),
            ..LoggingConfig::default()
        };

        let layers = output_layers(&config).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(layers.len(), 2);
    }

    #[test]
    fn each_output_is_driven_by_its_flag() {
        let console_only = LoggingConfig::default();
        assert_eq!(output_layers(&console_only).unwrap().len(), 1);

        let path = std::env::temp_dir().join(format!("zone-net-file-{}.log", std::process::id()));
        let file_only = LoggingConfig {
            log_to_console: false,
            log_to_file: true,
            log_file_path: Some(path.to_string_lossy().into_owned()),
            json_format: true,
            ..LoggingConfig::default()
        };
        let layers = output_layers(&file_only).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(layers.len(), 1);
    }
}
