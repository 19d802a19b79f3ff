//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::future::IntoFuture;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::{Config, ServerState};
use crate::middleware::logging_middleware;
use crate::utils::AppError;

/// Custom request ID generator
#[derive(Clone, Default)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and in-process tests
pub fn build_app(state: ServerState) -> Router {
    let body_limit = state.config.max_body_bytes;

    crate::api::build_router()
        .fallback(not_found)
        .with_state(state)
        // ========== Tower HTTP Middleware ==========
        // Body limit - payloads arrive as JSON text
        .layer(DefaultBodyLimit::max(body_limit))
        // CORS - local web pages call this endpoint from other origins
        .layer(CorsLayer::permissive())
        // Request logging
        .layer(axum_middleware::from_fn(logging_middleware))
        // Trace - Request tracing
        .layer(TraceLayer::new_for_http())
        // ========== Request ID ==========
        // Set wraps propagate: the id exists before propagate copies it out
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
}

async fn not_found(uri: http::Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let state = ServerState::initialize(&config);
        Self { config, state }
    }

    /// Serve until ctrl-c / SIGTERM
    pub async fn run(&self) -> anyhow::Result<()> {
        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            tracing::info!("Shutting down...");
            signal_token.cancel();
        });

        self.serve(shutdown).await
    }

    /// Serve until `shutdown` is cancelled
    ///
    /// In-flight requests get `shutdown_timeout_ms` to finish after that.
    pub async fn serve(&self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!(
            addr = %listener.local_addr()?,
            dry_run = self.config.dry_run,
            "🖨️ Raw print server listening"
        );

        let app = build_app(self.state.clone());

        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .into_future();

        tokio::select! {
            result = serve => result?,
            _ = async {
                shutdown.cancelled().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(timeout_ms = self.config.shutdown_timeout_ms, "Graceful shutdown timed out");
            }
        }

        // Spool jobs already on the blocking pool still run to completion
        // before the runtime exits.
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
