//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router: health probes, secret routes under the API
//!   prefix, the session-scoping middleware on the secret routes only
//! - Wire up the ambient layers (request ID, tracing, request timeout)
//! - Serve plain HTTP or TLS depending on the listener config
//! - Stop accepting and drain in-flight requests on the shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::schema::GatewayConfig;
use crate::http::handlers;
use crate::http::middleware::session_scope;
use crate::http::request::MakeRequestUuid;
use crate::vault::session::SessionProvider;

/// Prefix for the authenticated secret routes.
pub const API_PREFIX: &str = "/rest/api/1";

/// State injected into the session-scoping middleware.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SessionProvider>,
}

/// The gateway's HTTP server.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Build the server from a config and a session provider.
    pub fn new(config: GatewayConfig, provider: Arc<dyn SessionProvider>) -> Self {
        let state = AppState { provider };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        // Only the secret routes authenticate; the probes answer regardless
        // of vault reachability.
        let secrets = Router::new()
            .route(
                "/secret",
                get(handlers::get_secret)
                    .delete(handlers::delete_secrets)
                    .post(handlers::create_secret)
                    .put(handlers::update_secret),
            )
            .route("/secrets", get(handlers::list_secrets))
            .route("/secrets-by-ids", get(handlers::get_secrets_by_ids))
            .layer(from_fn_with_state(state, session_scope));

        Router::new()
            .route("/ready", get(|| async { "ready" }))
            .route("/live", get(|| async { "live" }))
            .nest(API_PREFIX, secrets)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The assembled router, for driving the server in tests without a
    /// listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until the shutdown signal fires, then drain and return.
    ///
    /// Startup problems (TLS material, accept loop) surface through the
    /// returned error; the caller owns the decision to terminate.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;

        if self.config.listener.insecure {
            tracing::info!(address = %addr, "listening on plain http");
            axum::serve(listener, self.router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown.recv().await;
                })
                .await?;
        } else {
            tracing::info!(address = %addr, "listening on https");
            let tls = RustlsConfig::from_pem_file(
                &self.config.listener.cert_file,
                &self.config.listener.key_file,
            )
            .await?;

            let handle = axum_server::Handle::new();
            let drain_handle = handle.clone();
            tokio::spawn(async move {
                let _ = shutdown.recv().await;
                // None: in-flight requests finish on their own time; the
                // lifecycle controller enforces the hard deadline.
                drain_handle.graceful_shutdown(None);
            });

            axum_server::from_tcp_rustls(listener.into_std()?, tls)
                .handle(handle)
                .serve(self.router.into_make_service())
                .await?;
        }

        tracing::info!("http server stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
