//! Gateway configuration.
//!
//! Schema types deserialize from a TOML file; the CLI flags in `main`
//! override the listener and logging sections. Validation runs after the
//! merge, before the listener binds.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{GatewayConfig, ListenerConfig, LogConfig, ShutdownConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
