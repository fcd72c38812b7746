use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use campus_infra::{FixedWindowLimiter, RateLimitOutcome};
use campus_tenancy::{
    Admission, ComplianceGate, FeatureGate, HeaderSet, InboundRequest, LimitGate, ResolvedContext,
    TenantConfigStore, TenantError, TenantPipeline,
};

use crate::app::errors;
use crate::config::Environment;
use crate::context::RequestId;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Assigns a request id, opens the request span and echoes the id back.
pub async fn request_id_middleware(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID, value);
    }
    res
}

#[derive(Clone)]
pub struct TenantState {
    pub pipeline: Arc<TenantPipeline>,
    pub environment: Environment,
}

/// Runs the tenant pipeline, attaches the resolved context and the tenant's
/// response headers, or short-circuits with a classified error.
pub async fn tenant_middleware(
    State(state): State<TenantState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let inbound = inbound_request(&req);

    let admitted = match state.pipeline.process(&inbound).await {
        Ok(Admission::Bypass) => return next.run(req).await,
        Ok(Admission::Admitted(admitted)) => admitted,
        Err(err) => return errors::tenant_error_to_response(&err, state.environment),
    };

    let cors_enabled = admitted.context.configuration().security.cors.enabled;
    if cors_enabled && req.method() == Method::OPTIONS {
        let mut res = StatusCode::NO_CONTENT.into_response();
        apply_headers(res.headers_mut(), &admitted.headers);
        return res;
    }

    req.extensions_mut().insert(admitted.context);
    let mut res = next.run(req).await;
    apply_headers(res.headers_mut(), &admitted.headers);
    res
}

fn inbound_request(req: &Request<Body>) -> InboundRequest {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.as_str().to_string()))
        .unwrap_or_default();

    let mut inbound = InboundRequest::new(host, req.uri().path());
    if let Some(query) = req.uri().query() {
        inbound = inbound.with_query(query);
    }
    for (name, value) in req.headers() {
        if let Ok(value) = value.to_str() {
            inbound = inbound.with_header(name.as_str(), value);
        }
    }
    inbound
}

/// Copy `set` onto `target`, replacing existing values. Entries that are not
/// valid HTTP header names/values are skipped.
pub fn apply_headers(target: &mut HeaderMap, set: &HeaderSet) {
    for (name, value) in set.iter() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                target.insert(name, value);
            }
            _ => tracing::warn!(header = name, "skipping tenant header with invalid name or value"),
        }
    }
}

#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<FixedWindowLimiter>,
}

/// Counts requests against the tenant's `rateLimiting` policy.
///
/// Only installed when enforcement is switched on; requests without a tenant
/// or with rate limiting disabled pass through uncounted.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(context) = req.extensions().get::<ResolvedContext>().cloned() else {
        return next.run(req).await;
    };
    let policy = context.configuration().security.rate_limiting.clone();
    if !policy.enabled {
        return next.run(req).await;
    }

    let outcome = state.limiter.check(
        context.tenant_id(),
        policy.max_requests,
        Duration::from_millis(policy.window_ms),
        Instant::now(),
    );

    match outcome {
        RateLimitOutcome::Allowed { remaining } => {
            let mut res = next.run(req).await;
            if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
                res.headers_mut().insert(RATE_LIMIT_REMAINING, value);
            }
            res
        }
        RateLimitOutcome::Limited { retry_after } => {
            tracing::info!(tenant_id = %context.tenant_id(), "rate limit exceeded");
            let err = TenantError::RateLimited {
                max: policy.max_requests,
                window_ms: policy.window_ms,
            };
            errors::with_retry_after(
                errors::tenant_error_to_response(&err, Environment::Production),
                retry_after,
            )
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gates
// ─────────────────────────────────────────────────────────────────────────────

fn context_or_reject(req: &Request<Body>) -> Result<ResolvedContext, Response> {
    req.extensions()
        .get::<ResolvedContext>()
        .cloned()
        .ok_or_else(|| {
            errors::tenant_error_to_response(&TenantError::Unresolvable, Environment::Production)
        })
}

#[derive(Clone)]
pub struct FeatureGuard {
    pub gate: FeatureGate,
}

pub async fn require_feature(
    State(guard): State<FeatureGuard>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let context = match context_or_reject(&req) {
        Ok(context) => context,
        Err(res) => return res,
    };
    match guard.gate.check(&context) {
        Ok(()) => next.run(req).await,
        Err(err) => errors::tenant_error_to_response(&err, Environment::Production),
    }
}

#[derive(Clone)]
pub struct ComplianceGuard {
    pub gate: ComplianceGate,
}

pub async fn require_compliance(
    State(guard): State<ComplianceGuard>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let context = match context_or_reject(&req) {
        Ok(context) => context,
        Err(res) => return res,
    };
    match guard.gate.check(&context) {
        Ok(()) => next.run(req).await,
        Err(err) => errors::tenant_error_to_response(&err, Environment::Production),
    }
}

#[derive(Clone)]
pub struct LimitGuard {
    pub gate: LimitGate,
    pub store: Arc<dyn TenantConfigStore>,
    pub environment: Environment,
}

pub async fn require_limit_available(
    State(guard): State<LimitGuard>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let context = match context_or_reject(&req) {
        Ok(context) => context,
        Err(res) => return res,
    };
    match guard.gate.check(guard.store.as_ref(), &context).await {
        Ok(()) => next.run(req).await,
        Err(err) => errors::tenant_error_to_response(&err, guard.environment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_tenancy::headers;

    #[test]
    fn applying_headers_twice_is_idempotent() {
        let mut set = HeaderSet::new();
        set.insert(headers::TENANT_ID, "acme");
        set.insert(headers::PRIMARY_COLOR, "#112233");

        let mut target = HeaderMap::new();
        apply_headers(&mut target, &set);
        let once = target.clone();
        apply_headers(&mut target, &set);
        assert_eq!(target, once);
        assert_eq!(target.len(), 2);
        assert_eq!(target["x-tenant-id"], "acme");
    }

    #[test]
    fn invalid_header_values_are_skipped() {
        let mut set = HeaderSet::new();
        set.insert(headers::TENANT_NAME, "line\nbreak");
        set.insert(headers::TENANT_ID, "acme");

        let mut target = HeaderMap::new();
        apply_headers(&mut target, &set);
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn inbound_request_reads_host_query_and_headers() {
        let req = Request::builder()
            .uri("/courses?tenant=acme")
            .header(header::HOST, "www.example.com:8080")
            .header("Origin", "https://app.acme.test")
            .body(Body::empty())
            .unwrap();
        let inbound = inbound_request(&req);
        assert_eq!(inbound.host(), "www.example.com:8080");
        assert_eq!(inbound.path(), "/courses");
        assert_eq!(inbound.query_param("tenant").as_deref(), Some("acme"));
        assert_eq!(inbound.origin(), Some("https://app.acme.test"));
    }
}
