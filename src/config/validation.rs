//! Configuration validation.

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("certificate file not found: {0}")]
    MissingCertFile(String),

    #[error("key file not found: {0}")]
    MissingKeyFile(String),

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("shutdown grace period must be greater than zero")]
    ZeroGracePeriod,
}

/// Check a merged configuration before the listener binds.
///
/// TLS material is only checked when TLS is actually in play.
pub fn validate_config(config: &GatewayConfig) -> Result<(), ValidationError> {
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        return Err(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if !config.listener.insecure {
        if !Path::new(&config.listener.cert_file).exists() {
            return Err(ValidationError::MissingCertFile(
                config.listener.cert_file.clone(),
            ));
        }
        if !Path::new(&config.listener.key_file).exists() {
            return Err(ValidationError::MissingKeyFile(
                config.listener.key_file.clone(),
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        return Err(ValidationError::ZeroRequestTimeout);
    }
    if config.shutdown.grace_secs == 0 {
        return Err(ValidationError::ZeroGracePeriod);
    }

    Ok(())
}
