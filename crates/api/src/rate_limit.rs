//! Per-IP sliding window rate limiting (`spec.md` §5): 100 requests / 60 s
//! by default, in-memory, with inline TTL sweep per bucket on each check.
//! `X-Forwarded-For` is honored when `trust_proxy` is configured.

use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::ApiError;
use crate::state::AppState;

pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    buckets: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(window_ms: u64, max_requests: u32) -> Self {
        Self { window: Duration::from_millis(window_ms), max_requests, buckets: Mutex::new(HashMap::new()) }
    }

    /// Returns `Ok(())` if the request is allowed, `Err(retry_after_secs)`
    /// otherwise.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");
        let entry = buckets.entry(ip).or_default();
        while let Some(&oldest) = entry.front() {
            if now.duration_since(oldest) > self.window {
                entry.pop_front();
            } else {
                break;
            }
        }
        if entry.len() as u32 >= self.max_requests {
            let retry_after = entry.front().map(|oldest| self.window.saturating_sub(now.duration_since(*oldest))).unwrap_or(self.window);
            return Err(retry_after.as_secs().max(1));
        }
        entry.push_back(now);
        Ok(())
    }
}

fn client_ip<B>(req: &Request<B>, trust_proxy: bool, connect_ip: IpAddr) -> IpAddr {
    if trust_proxy {
        if let Some(forwarded) = req.headers().get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            if let Some(first) = forwarded.split(',').next() {
                if let Ok(ip) = first.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }
    connect_ip
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(connect_addr): ConnectInfo<SocketAddr>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = client_ip(&req, state.trust_proxy, connect_addr.ip());
    match state.rate_limiter.check(ip) {
        Ok(()) => Ok(next.run(req).await),
        Err(retry_after_secs) => Err(ApiError::RateLimited { retry_after_secs }),
    }
}
