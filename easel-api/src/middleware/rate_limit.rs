/// Rate limiting middleware for authentication endpoints
///
/// This module implements per-IP token bucket rate limiting for the auth
/// routes, which are the brute-force surface of the service. State is kept
/// in process memory; a single API instance owns its own buckets.
///
/// # Algorithm
///
/// Uses token bucket algorithm:
/// - Tokens refill at constant rate
/// - Each request consumes 1 token
/// - Request blocked if bucket empty
///
/// With the default budget of 10 requests/minute a client can burst 10
/// login attempts and then gains one attempt every 6 seconds.
///
/// # Headers
///
/// Response includes rate limit headers:
/// - `X-RateLimit-Limit`: Total requests allowed per window
/// - `X-RateLimit-Remaining`: Tokens remaining
/// - `X-RateLimit-Reset`: Unix timestamp when tokens fully replenish
/// - `Retry-After`: Seconds to wait (429 responses only)

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Buckets older than this are dropped during cleanup
const STALE_AFTER_SECS: u64 = 120;

/// Cleanup runs when the bucket map grows past this size
const MAX_TRACKED_CLIENTS: usize = 4096;

/// Token bucket state for one client IP
#[derive(Debug, Clone)]
struct TokenBucket {
    /// Current number of tokens
    tokens: f64,

    /// Last refill timestamp (Unix seconds)
    last_refill: u64,
}

impl TokenBucket {
    /// Creates a new full bucket
    fn new(capacity: u32) -> Self {
        TokenBucket {
            tokens: capacity as f64,
            last_refill: now_secs(),
        }
    }

    /// Refills tokens based on elapsed time
    fn refill(&mut self, rate: f64, capacity: u32) {
        let now = now_secs();

        let elapsed_secs = now.saturating_sub(self.last_refill) as f64;
        let new_tokens = elapsed_secs * rate;

        self.tokens = (self.tokens + new_tokens).min(capacity as f64);
        self.last_refill = now;
    }

    /// Attempts to consume N tokens
    fn try_consume(&mut self, count: f64) -> bool {
        if self.tokens >= count {
            self.tokens -= count;
            true
        } else {
            false
        }
    }

    /// Calculates seconds until N tokens available
    fn seconds_until_available(&self, count: f64, rate: f64) -> u64 {
        let deficit = count - self.tokens;
        if deficit <= 0.0 {
            0
        } else {
            (deficit / rate).ceil() as u64
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Result of a rate limit check
#[derive(Debug)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub ok: bool,

    /// Tokens remaining
    pub remaining: u32,

    /// Seconds until the next token is available (429 responses)
    pub retry_after: u64,
}

/// Per-IP token bucket rate limiter
///
/// Shared across requests via `AppState`. The bucket map is pruned of stale
/// entries once it grows past a threshold, so idle clients do not accumulate
/// forever.
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum tokens in a bucket (burst capacity)
    capacity: u32,

    /// Token refill rate (tokens per second)
    refill_rate: f64,

    /// One bucket per client IP
    buckets: Mutex<HashMap<IpAddr, TokenBucket>>,
}

impl RateLimiter {
    /// Creates a limiter allowing `requests` per minute per client IP
    pub fn per_minute(requests: u32) -> Self {
        Self {
            capacity: requests,
            refill_rate: f64::from(requests) / 60.0,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Requests allowed per minute
    pub fn limit(&self) -> u32 {
        self.capacity
    }

    /// Checks and consumes one token for the given client IP
    pub fn check(&self, ip: IpAddr) -> RateLimitResult {
        // A poisoned lock only means another request panicked mid-check;
        // the map itself is still usable.
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if buckets.len() >= MAX_TRACKED_CLIENTS && !buckets.contains_key(&ip) {
            let now = now_secs();
            buckets.retain(|_, bucket| now.saturating_sub(bucket.last_refill) < STALE_AFTER_SECS);
        }

        let bucket = buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::new(self.capacity));
        bucket.refill(self.refill_rate, self.capacity);

        if bucket.try_consume(1.0) {
            RateLimitResult {
                ok: true,
                remaining: bucket.tokens.floor() as u32,
                retry_after: 0,
            }
        } else {
            RateLimitResult {
                ok: false,
                remaining: 0,
                retry_after: bucket.seconds_until_available(1.0, self.refill_rate).max(1),
            }
        }
    }
}

/// Resolves the client IP for rate limiting
///
/// Uses the socket peer address when the server is run with connect info.
/// Requests without one (in-process test calls) share a loopback bucket.
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Rate limiting middleware layer
///
/// Checks rate limits before processing requests. Returns 429 if exceeded.
pub async fn rate_limit_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = client_ip(&request);
    let result = state.auth_limiter.check(ip);

    if !result.ok {
        tracing::warn!(
            client = %ip,
            retry_after = result.retry_after,
            "Rate limited authentication request"
        );
        return Err(ApiError::RateLimitExceeded {
            retry_after: result.retry_after,
            message: format!(
                "Rate limit exceeded. Try again in {} seconds",
                result.retry_after
            ),
        });
    }

    let mut response = next.run(request).await;

    // Add rate limit headers
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&state.auth_limiter.limit().to_string()) {
        headers.insert("X-RateLimit-Limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&result.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", value);
    }
    if let Ok(value) = HeaderValue::from_str(&(now_secs() + 60).to_string()) {
        headers.insert("X-RateLimit-Reset", value);
    }

    Ok(response)
}
