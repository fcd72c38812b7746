//! HTTP application wiring (Axum router + middleware stack).
//!
//! - `routes/`: handlers, one file per area
//! - `errors.rs`: the JSON error shape and the tenant error taxonomy

use std::sync::Arc;

use axum::{Router, http::StatusCode, middleware::from_fn, middleware::from_fn_with_state};
use tower::ServiceBuilder;

use campus_infra::FixedWindowLimiter;
use campus_tenancy::{TenantConfigStore, TenantPipeline, UsageRecorder};

use crate::config::ApiConfig;
use crate::middleware::{self, RateLimitState, TenantState};

pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// Middleware order, outermost first: request id, tenant pipeline, optional
/// rate limiting, then per-route gates.
///
/// `usage` receives the quota consumed by successful writes; it must feed the
/// same counters `store` reads for limit checks.
pub fn build_app(
    config: &ApiConfig,
    store: Arc<dyn TenantConfigStore>,
    usage: Arc<dyn UsageRecorder>,
) -> Router {
    let pipeline = Arc::new(TenantPipeline::new(
        Arc::clone(&store),
        config.pipeline_options(),
    ));
    let tenant_state = TenantState {
        pipeline,
        environment: config.environment,
    };

    let mut app = routes::router(store, usage, config.environment).fallback(not_found);

    if config.enforce_rate_limits {
        let state = RateLimitState {
            limiter: Arc::new(FixedWindowLimiter::new()),
        };
        app = app.layer(from_fn_with_state(state, middleware::rate_limit_middleware));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(from_fn(middleware::request_id_middleware))
            .layer(from_fn_with_state(tenant_state, middleware::tenant_middleware)),
    )
}

async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "Not found", None)
}
