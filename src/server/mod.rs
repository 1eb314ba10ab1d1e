//! HTTP server wiring for the faucet.
//!
//! # Responsibilities
//! - Build the axum router (claim + info API, static front-end)
//! - Gate the claim route with the cooldown middleware
//! - Apply permissive CORS and request tracing
//! - Spawn the drain worker alongside the listener

pub mod handlers;
pub mod rate_limit;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::chain::tx::Dispatch;
use crate::config::schema::FaucetConfig;
use crate::config::validation::ValidationError;
use crate::faucet::dispatch::DispatchPolicy;
use crate::faucet::lock::SingleFlight;
use crate::faucet::queue::DispatchQueue;
use crate::faucet::worker::DrainWorker;

pub use handlers::{AppState, ClaimPayload, ClaimResponse, InfoResponse, ValidatedAddress};
pub use rate_limit::CooldownLimiter;

/// Build the axum router for the given application state.
pub fn build_router<D: Dispatch>(state: AppState<D>, limiter: Arc<CooldownLimiter>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/claim",
            post(handlers::handle_claim::<D>).options(handlers::preflight),
        )
        .route_layer(middleware::from_fn_with_state(
            limiter,
            rate_limit::cooldown_middleware,
        ))
        .route(
            "/api/info",
            get(handlers::handle_info::<D>).options(handlers::preflight),
        )
        .layer(cors)
        .with_state(state)
        .fallback_service(ServeDir::new("web"))
        .layer(TraceLayer::new_for_http())
}

/// The faucet HTTP server plus its background drain worker.
pub struct FaucetServer<D> {
    state: AppState<D>,
    limiter: Arc<CooldownLimiter>,
}

impl<D: Dispatch> FaucetServer<D> {
    /// Assemble the server: payout policy, queue, lock, and cooldown gate.
    pub fn new(dispatcher: D, config: Arc<FaucetConfig>) -> Result<Self, ValidationError> {
        let policy = Arc::new(DispatchPolicy::from_config(&config)?);
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            policy,
            queue: Arc::new(DispatchQueue::new(config.queue_cap)),
            flight: Arc::new(SingleFlight::new()),
            config: config.clone(),
        };
        let limiter = Arc::new(CooldownLimiter::new(
            config.proxy_count,
            Duration::from_secs(config.interval_minutes * 60),
        ));

        Ok(Self { state, limiter })
    }

    /// Shared handles into the dispatch engine (used by tests and `run`).
    pub fn state(&self) -> &AppState<D> {
        &self.state
    }

    /// The assembled router.
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.limiter.clone())
    }

    /// Serve requests and drain the queue until ctrl-c.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let worker = DrainWorker::new(
            self.state.queue.clone(),
            self.state.flight.clone(),
            self.state.dispatcher.clone(),
            self.state.policy.clone(),
        );
        tokio::spawn(async move {
            worker.run().await;
        });

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
