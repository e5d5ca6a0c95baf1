//! Per-route rate limiting backed by `tower_governor`.
//!
//! Every limited route gets its own limiter keyed by client IP. The IP comes from the
//! `x-forwarded-for`, `x-real-ip` or `forwarded` headers set by API Gateway. Requests
//! without any of them share the loopback key.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use axum::error_handling::HandleErrorLayer;
use axum::http::Request;
use axum::routing::{MethodRouter, Route};
use axum::BoxError;
use tower::layer::layer_fn;
use tower::ServiceBuilder;
use tower_governor::errors::display_error;
use tower_governor::governor::{Governor, GovernorConfigBuilder};
use tower_governor::key_extractor::{KeyExtractor, SmartIpKeyExtractor};
use tower_governor::GovernorError;

pub const REGISTER_REQUESTS_PER_MINUTE: u64 = 10;
pub const FILTER_REQUESTS_PER_MINUTE: u64 = 20;
pub const BOOK_EXISTS_REQUESTS_PER_MINUTE: u64 = 20;

/// Quota of a single route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per minute allowed, also used as the burst size.
    pub requests_per_minute: u64,
}

impl RateLimitConfig {
    pub fn per_minute(requests_per_minute: u64) -> Self {
        Self {
            requests_per_minute,
        }
    }

    // One element of the quota is replenished every period.
    fn replenish_ms(&self) -> u64 {
        (60_000 / self.requests_per_minute.max(1)).max(1)
    }

    fn burst_size(&self) -> u32 {
        u32::try_from(self.requests_per_minute).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(SmartIpKeyExtractor.extract(req).unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)))
    }
}

/// Wraps a route with its own limiter. Rejected requests get `429 Too Many Requests`.
pub(crate) fn rate_limited<S>(route: MethodRouter<S>, quota: RateLimitConfig) -> MethodRouter<S>
    where S: Clone + Send + Sync + 'static {
    let config = match GovernorConfigBuilder::default()
        .per_millisecond(quota.replenish_ms())
        .burst_size(quota.burst_size())
        .key_extractor(ClientIpKeyExtractor)
        .finish() {
        Some(config) => Arc::new(config),
        None => {
            tracing::warn!(requests_per_minute = quota.requests_per_minute, "rate limit disabled for empty quota");
            return route;
        }
    };
    route.layer(ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            tracing::warn!(error = %err, "rejected rate limited request");
            display_error(err)
        }))
        .layer(layer_fn(move |inner: Route| Governor::new(inner, config.as_ref()))))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;
    use tower_governor::key_extractor::KeyExtractor;
    use crate::utils::rate_limit::{rate_limited, ClientIpKeyExtractor, RateLimitConfig};

    fn request(client: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri("/ping");
        if let Some(client) = client {
            builder = builder.header("x-forwarded-for", client);
        }
        builder.body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn test_should_compute_quota() {
        let quota = RateLimitConfig::per_minute(20);
        assert_eq!(3_000, quota.replenish_ms());
        assert_eq!(20, quota.burst_size());
        assert_eq!(60_000, RateLimitConfig::per_minute(0).replenish_ms());
    }

    #[tokio::test]
    async fn test_should_extract_client_ip() {
        let ip = ClientIpKeyExtractor.extract(&request(Some("10.1.2.3, 172.16.0.1"))).expect("key");
        assert_eq!("10.1.2.3", ip.to_string());
        let fallback = ClientIpKeyExtractor.extract(&request(None)).expect("key");
        assert!(fallback.is_loopback());
    }

    #[tokio::test]
    async fn test_should_reject_requests_over_quota() {
        let app: Router = Router::new()
            .route("/ping", rate_limited(get(|| async { "pong" }), RateLimitConfig::per_minute(3)));
        for _ in 0..3 {
            let res = app.clone().oneshot(request(Some("10.0.0.1"))).await.expect("response");
            assert_eq!(StatusCode::OK, res.status());
        }
        let res = app.clone().oneshot(request(Some("10.0.0.1"))).await.expect("response");
        assert_eq!(StatusCode::TOO_MANY_REQUESTS, res.status());

        let other = app.oneshot(request(Some("10.0.0.2"))).await.expect("response");
        assert_eq!(StatusCode::OK, other.status());
    }
}
