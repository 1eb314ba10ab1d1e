//! HTTP handlers for the faucet API.
//!
//! # Responsibilities
//! - `POST /api/claim`: dispatch immediately when idle, enqueue when busy,
//!   reject when the queue is full
//! - `GET /api/info`: display configuration for the front-end
//!
//! The claim handler is the request-time decision point of the dispatch
//! engine. The gate condition is evaluated in order: a non-empty queue or a
//! lost try-acquire routes the claim to the queue, which keeps queued
//! addresses strictly ahead of new synchronous dispatches.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::chain::tx::Dispatch;
use crate::config::schema::FaucetConfig;
use crate::faucet::dispatch::{dispatch_claim, DispatchPolicy};
use crate::faucet::lock::SingleFlight;
use crate::faucet::queue::DispatchQueue;

/// Bound on the synchronous outbound dispatch, not on lock hold time.
const CLAIM_TIMEOUT: Duration = Duration::from_secs(5);

/// Inbound claim body.
#[derive(Debug, Deserialize)]
pub struct ClaimPayload {
    pub address: String,
}

/// Destination validated by the cooldown gate, passed via request extensions.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedAddress(pub Address);

/// Uniform `{message}` JSON body for claim outcomes.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub message: String,
}

/// Display strings for `GET /api/info`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub network_name: String,
    pub faucet_address: String,
    pub contract_address: String,
    pub eth_amount: String,
    pub usdt_amount: String,
    pub usdc_amount: String,
    pub interval_minutes: String,
}

/// Application state injected into handlers.
pub struct AppState<D> {
    pub dispatcher: Arc<D>,
    pub policy: Arc<DispatchPolicy>,
    pub queue: Arc<DispatchQueue>,
    pub flight: Arc<SingleFlight>,
    pub config: Arc<FaucetConfig>,
}

// Manual impl: `D` itself does not need to be Clone behind the Arc.
impl<D> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            policy: self.policy.clone(),
            queue: self.queue.clone(),
            flight: self.flight.clone(),
            config: self.config.clone(),
        }
    }
}

fn message(text: String) -> Json<ClaimResponse> {
    Json(ClaimResponse { message: text })
}

/// Handle a validated claim.
pub async fn handle_claim<D: Dispatch>(
    State(state): State<AppState<D>>,
    Extension(ValidatedAddress(address)): Extension<ValidatedAddress>,
) -> (StatusCode, Json<ClaimResponse>) {
    // Synchronous dispatch only when the queue is empty and no other
    // dispatch is in flight; both checks together form the gate condition.
    if !state.queue.is_empty() {
        return enqueue(&state, address);
    }
    let Some(_permit) = state.flight.try_acquire() else {
        return enqueue(&state, address);
    };

    // The permit is held across the bounded call and dropped on every exit
    // path below. The nonce fetch happens inside dispatch_claim, after the
    // acquire, so two racing idle-looking requests cannot reuse a nonce.
    let outcome = tokio::time::timeout(
        CLAIM_TIMEOUT,
        dispatch_claim(state.dispatcher.as_ref(), &state.policy, address),
    )
    .await;

    match outcome {
        Ok(Ok(tx_hash)) => {
            tracing::info!(tx_hash = %tx_hash, address = %address, "Funded directly");
            (StatusCode::OK, message(format!("TransactionHash:{}", tx_hash)))
        }
        Ok(Err(e)) => {
            tracing::error!(address = %address, error = %e, "Failed to send transaction");
            (StatusCode::INTERNAL_SERVER_ERROR, message(e.to_string()))
        }
        Err(_) => {
            tracing::error!(address = %address, "Transaction send timed out");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                message("transaction send timed out".to_string()),
            )
        }
    }
}

fn enqueue<D>(state: &AppState<D>, address: Address) -> (StatusCode, Json<ClaimResponse>) {
    match state.queue.try_push(address) {
        Ok(()) => {
            tracing::info!(address = %address, "Added to queue");
            (StatusCode::OK, message(format!("Added {} to the queue", address)))
        }
        Err(_) => {
            tracing::warn!("Max queue capacity reached");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                message("Faucet queue is too long, please try again later".to_string()),
            )
        }
    }
}

/// Handle `GET /api/info`.
pub async fn handle_info<D: Dispatch>(State(state): State<AppState<D>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        network_name: state.config.network_name.clone(),
        faucet_address: state.dispatcher.sender().to_string(),
        contract_address: state.config.payout.contract_address.clone(),
        eth_amount: state.config.payout.native_amount.to_string(),
        usdt_amount: state.config.payout.usdt_amount.to_string(),
        usdc_amount: state.config.payout.usdc_amount.to_string(),
        interval_minutes: state.config.interval_minutes.to_string(),
    })
}

/// Plain OPTIONS on the API routes answers 200; the CORS layer supplies the
/// permissive headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
