use axum::{
    Json, Router,
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use campus_core::FeaturePath;
use campus_tenancy::{branding, gates};

use crate::app::errors;
use crate::context::Tenant;

pub fn router() -> Router {
    Router::new()
        .route("/", get(summary))
        .route("/features/:path", get(feature))
        .route("/branding.css", get(stylesheet))
}

/// Public view of the current tenant. Security policy is not exposed.
pub async fn summary(Tenant(context): Tenant) -> impl IntoResponse {
    let config = context.configuration();
    let compliance: Vec<&str> = config
        .compliance
        .iter()
        .filter(|(_, setting)| setting.enabled)
        .map(|(kind, _)| kind.as_str())
        .collect();
    Json(json!({
        "id": config.id,
        "name": config.name,
        "status": config.status,
        "metadata": config.metadata,
        "features": config.features,
        "limits": config.limits,
        "compliance": compliance,
    }))
}

/// Flag lookup against the configuration the pipeline already resolved for
/// this request; no second store round trip.
pub async fn feature(Tenant(context): Tenant, Path(path): Path<String>) -> Response {
    let path = match FeaturePath::parse(path) {
        Ok(path) => path,
        Err(e) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "Invalid feature path",
                Some(e.to_string()),
            );
        }
    };
    let enabled = gates::feature_enabled(&context, &path);
    Json(json!({ "feature": path.as_str(), "enabled": enabled })).into_response()
}

pub async fn stylesheet(Tenant(context): Tenant) -> Response {
    match branding::generate_stylesheet(&context.configuration().branding) {
        Some(css) => ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
