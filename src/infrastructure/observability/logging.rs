use crate::config::ObservabilityEnvConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Install the global subscriber: plain text to stderr, filtered by
/// `RUST_LOG` with the configured level as the default directive.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(config: &ObservabilityEnvConfig) {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(config.log_level.into()))
        .with(stderr_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let config = ObservabilityEnvConfig::default();
        init_logging(&config);
        init_logging(&config);
        tracing::info!("logging initialised");
    }
}
