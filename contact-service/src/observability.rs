//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Install the global JSON subscriber.
///
/// `service.log_level` may be a bare level (`debug`) or a full filter
/// directive (`contact_service=debug,sqlx=warn`); anything unparsable falls
/// back to `info`.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.service.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second call (tests, embedding) keeps the first subscriber.
    if tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }

    tracing::info!(
        service = %config.service.name,
        environment = %config.service.environment,
        "Tracing initialized"
    );

    Ok(())
}
