use axum::{Extension, Json, response::IntoResponse};
use serde_json::json;

use campus_tenancy::ResolvedContext;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Landing document. The root path is served with or without a tenant.
pub async fn root(context: Option<Extension<ResolvedContext>>) -> impl IntoResponse {
    match context {
        Some(Extension(context)) => {
            let config = context.configuration();
            Json(json!({
                "service": "campus",
                "tenant": {
                    "id": config.id.as_str(),
                    "name": config.name,
                },
            }))
        }
        None => Json(json!({ "service": "campus", "tenant": null })),
    }
}
