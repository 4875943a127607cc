use crate::config::AppConfig;
use crate::error::{FlowForgeError, FlowResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global fmt subscriber filtered by `config.log_filter`.
///
/// An unparsable filter falls back to `info`. Fails if a global subscriber
/// has already been set.
pub fn init_tracing(config: &AppConfig) -> FlowResult<()> {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(true))
        .try_init()
        .map_err(|error| FlowForgeError::Config(format!("failed to initialize tracing subscriber: {}", error)))
}
