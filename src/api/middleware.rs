//! Security middleware for API authentication and rate limiting.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Requests per minute allowed when rate limiting is on and
/// `ESTIMATOR_RATE_LIMIT` is unset.
const DEFAULT_RATE_LIMIT: u32 = 100;

/// Security configuration loaded from environment variables.
#[derive(Clone, Debug, Default)]
pub struct SecurityConfig {
    /// API key for authentication (from ESTIMATOR_API_KEY)
    pub api_key: Option<String>,
    /// Allowed CORS origins (from ESTIMATOR_CORS_ORIGINS, comma-separated)
    pub cors_origins: Option<Vec<String>>,
    /// Rate limiter instance
    pub rate_limiter: Option<RateLimiter>,
}

impl SecurityConfig {
    /// Load security configuration from environment variables.
    pub fn from_env() -> Self {
        let api_key = std::env::var("ESTIMATOR_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let cors_origins = std::env::var("ESTIMATOR_CORS_ORIGINS").ok().map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let rate_limit = std::env::var("ESTIMATOR_RATE_LIMIT")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT);

        let trust_proxy = std::env::var("ESTIMATOR_TRUST_PROXY")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        // Rate limiting only applies to keyed (remote) deployments
        let rate_limiter = api_key.as_ref().map(|_| {
            RateLimiter::new(rate_limit, Duration::from_secs(60))
                .trust_forwarded_headers(trust_proxy)
        });

        Self {
            api_key,
            cors_origins,
            rate_limiter,
        }
    }

    /// No authentication, permissive CORS, no rate limiting.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn with_cors_origins(origins: Vec<String>) -> Self {
        Self {
            cors_origins: Some(origins),
            ..Self::default()
        }
    }

    pub fn with_rate_limit(max_requests: u32) -> Self {
        Self {
            rate_limiter: Some(RateLimiter::new(max_requests, Duration::from_secs(60))),
            ..Self::default()
        }
    }

    /// CORS layer for this configuration: permissive unless origins are listed.
    pub fn cors_layer(&self) -> CorsLayer {
        match &self.cors_origins {
            None => CorsLayer::permissive(),
            Some(origins) => {
                let origins: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|o| match o.parse() {
                        Ok(value) => Some(value),
                        Err(_) => {
                            tracing::warn!("Ignoring invalid CORS origin: {}", o);
                            None
                        }
                    })
                    .collect();

                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
    }
}

/// Simple in-memory rate limiter using a sliding window.
///
/// Clients are keyed by peer address. `X-Forwarded-For` and `X-Real-IP` are
/// client-controlled, so they are only honoured once
/// [`trust_forwarded_headers`](Self::trust_forwarded_headers) is set, which
/// is only correct behind a reverse proxy that overwrites them.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    trust_forwarded: bool,
    requests: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            trust_forwarded: false,
            requests: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Key clients by proxy headers instead of the peer address.
    pub fn trust_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }

    /// Record a request from `ip`; false when the window is already full.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();

        let mut requests = self.requests.lock().unwrap_or_else(|e| e.into_inner());

        // Drop idle clients so the map doesn't grow without bound
        requests.retain(|_, timestamps| {
            timestamps.retain(|&t| now.duration_since(t) < self.window);
            !timestamps.is_empty()
        });

        let entry = requests.entry(ip).or_default();
        if entry.len() < self.max_requests as usize {
            entry.push(now);
            true
        } else {
            false
        }
    }
}

/// Rejects requests without the configured bearer token.
pub async fn auth_middleware(
    State(config): State<SecurityConfig>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected_key) = &config.api_key else {
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth_header.map(|h| h.strip_prefix("Bearer ")) {
        Some(Some(token)) if token == expected_key.as_str() => Ok(next.run(request).await),
        Some(Some(_)) => {
            tracing::warn!("Invalid API key provided");
            Err(StatusCode::UNAUTHORIZED)
        }
        Some(None) => {
            tracing::warn!("Invalid Authorization header format");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Missing Authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

pub async fn rate_limit_middleware(
    State(rate_limiter): State<RateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let ip = extract_client_ip(&request, rate_limiter.trust_forwarded);

    if rate_limiter.check(ip) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Rate limit exceeded for IP: {}", ip);
        Err(StatusCode::TOO_MANY_REQUESTS)
    }
}

/// Client IP for rate limiting.
///
/// Uses proxy headers only when trusted, then the peer address, then localhost
/// (in-process callers have no peer).
fn extract_client_ip(request: &Request<Body>, trust_forwarded: bool) -> IpAddr {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if !trust_forwarded {
        return peer.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    let forwarded: Option<IpAddr> = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse().ok());

    let real_ip = || -> Option<IpAddr> {
        request
            .headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok())
    };

    forwarded
        .or_else(real_ip)
        .or(peer)
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}
