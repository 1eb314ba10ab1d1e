//! Claim cooldown gate.
//!
//! # Responsibilities
//! - Validate the destination address before any side effect
//! - Derive the client key from the socket address, unwinding
//!   `X-Forwarded-For` through the configured number of trusted proxies
//! - Reject clients that claimed within the cooldown interval (429)
//!
//! Entries expire implicitly: a stored timestamp older than the interval is
//! simply overwritten on the next claim, so no eviction pass is needed.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::server::handlers::{ClaimPayload, ClaimResponse, ValidatedAddress};

/// Claim bodies are a single JSON object with one address field.
const MAX_CLAIM_BODY: usize = 4 * 1024;

/// Per-client cooldown state, keyed by origin IP.
pub struct CooldownLimiter {
    entries: DashMap<String, Instant>,
    interval: Duration,
    proxy_count: usize,
}

impl CooldownLimiter {
    pub fn new(proxy_count: usize, interval: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            interval,
            proxy_count,
        }
    }

    /// Check and refresh the cooldown for `key`.
    ///
    /// Within the interval the claim is denied and the remaining wait is
    /// returned; otherwise the timer resets and the claim proceeds. The
    /// entry API keeps the check-and-set atomic per key.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let elapsed = now.duration_since(*occupied.get());
                if elapsed < self.interval {
                    Err(self.interval - elapsed)
                } else {
                    occupied.insert(now);
                    Ok(())
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(now);
                Ok(())
            }
        }
    }
}

/// Resolve the true client origin behind trusted reverse proxies.
fn client_key(headers: &HeaderMap, addr: SocketAddr, proxy_count: usize) -> String {
    if proxy_count > 0 {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
        {
            let hops: Vec<&str> = forwarded
                .split(',')
                .map(str::trim)
                .filter(|hop| !hop.is_empty())
                .collect();
            // A header with fewer hops than trusted proxies did not pass
            // through our proxy chain intact; distrust it entirely.
            if hops.len() >= proxy_count {
                return hops[hops.len() - proxy_count].to_string();
            }
        }
    }
    addr.ip().to_string()
}

fn reject(status: StatusCode, message: String) -> Response {
    (status, Json(ClaimResponse { message })).into_response()
}

/// Middleware wrapping the claim route.
///
/// Buffers the small JSON body, validates the address (so a malformed
/// request never consumes the client's cooldown), then applies the per-key
/// cooldown check. The parsed address is handed to the handler through
/// request extensions.
pub async fn cooldown_middleware(
    State(limiter): State<Arc<CooldownLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_CLAIM_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return reject(StatusCode::BAD_REQUEST, "invalid request body".to_string());
        }
    };

    let destination = match parse_destination(&bytes) {
        Ok(address) => address,
        Err(message) => return reject(StatusCode::BAD_REQUEST, message),
    };

    let key = client_key(&parts.headers, addr, limiter.proxy_count);
    if let Err(remaining) = limiter.check(&key) {
        tracing::warn!(client = %key, "Claim rejected by cooldown");
        return reject(
            StatusCode::TOO_MANY_REQUESTS,
            format!(
                "You have exceeded the rate limit. Please wait {} seconds before you try again",
                remaining.as_secs().max(1)
            ),
        );
    }

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(ValidatedAddress(destination));
    next.run(request).await
}

fn parse_destination(bytes: &[u8]) -> Result<alloy::primitives::Address, String> {
    let payload: ClaimPayload = serde_json::from_slice(bytes)
        .map_err(|_| "request body must be JSON with an \"address\" field".to_string())?;
    payload
        .address
        .parse()
        .map_err(|_| format!("invalid address: {}", payload.address))
}
