//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so that `list` and `gen-config` output on stdout stays
//! clean. `RUST_LOG` wins over the configured level when it is set.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

/// The filter the subscriber will use: `RUST_LOG` if set, else `config.level`.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.json {
        builder.json().finish().try_init()
    } else {
        builder.finish().try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_uses_configured_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = env_filter(&LoggingConfig {
            level: "debug".into(),
            json: false,
        });
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
