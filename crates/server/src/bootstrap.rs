use std::sync::Arc;

use bargainer_core::config::AppConfig;
use bargainer_core::{AspirationNegotiator, ConfigurationError, DefaultNegotiator};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub negotiator: Arc<DefaultNegotiator>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("negotiator construction failed: {0}")]
    Negotiator(#[from] ConfigurationError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let negotiator =
        AspirationNegotiator::with_target_fraction(config.negotiation.target_fraction)?;
    info!(
        event_name = "system.bootstrap.negotiator_ready",
        correlation_id = "bootstrap",
        target_fraction = %negotiator.target_fraction(),
        "aspiration negotiator initialized"
    );

    Ok(Application { config, negotiator: Arc::new(negotiator) })
}
