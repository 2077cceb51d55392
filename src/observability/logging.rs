//! Structured logging.
//!
//! Uses the tracing crate throughout; `RUST_LOG` overrides the level chosen
//! by the `--debug` flag.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber. Call once, before any log line.
pub fn init(debug: bool) {
    let default_filter = if debug {
        "warden_gateway=debug,tower_http=debug"
    } else {
        "warden_gateway=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
