//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS material).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Shutdown configuration.
    pub shutdown: ShutdownConfig,

    /// Logging configuration.
    pub log: LogConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9998").
    pub bind_address: String,

    /// Serve plain HTTP instead of TLS.
    pub insecure: bool,

    /// Path to the certificate file (PEM).
    pub cert_file: String,

    /// Path to the private key file (PEM).
    pub key_file: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9998".to_string(),
            insecure: false,
            cert_file: "/certs/cert.pem".to_string(),
            key_file: "/certs/key.pem".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 5 }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Seconds the drain may take before the process force-exits.
    pub grace_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { grace_secs: 15 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Debug-level logging for the gateway's own crates.
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9998");
        assert!(!config.listener.insecure);
        assert_eq!(config.timeouts.request_secs, 5);
        assert_eq!(config.shutdown.grace_secs, 15);
        assert!(!config.log.debug);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:4000"
            insecure = true
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert!(config.listener.insecure);
        assert_eq!(config.listener.cert_file, "/certs/cert.pem");
        assert_eq!(config.shutdown.grace_secs, 15);
    }
}
