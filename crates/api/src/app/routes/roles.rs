//! Read-only view of the platform role → permission table.

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use campus_auth::{Permission, Role, has_permission, permissions_for};

use crate::app::errors;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_roles))
        .route("/:role/permissions", get(role_permissions))
        .route("/:role/permissions/:permission", get(check_permission))
}

pub async fn list_roles() -> impl IntoResponse {
    Json(json!({ "roles": Role::ALL }))
}

fn parse_role(raw: &str) -> Result<Role, Response> {
    raw.parse::<Role>()
        .map_err(|e| errors::json_error(StatusCode::NOT_FOUND, "Unknown role", Some(e.to_string())))
}

pub async fn role_permissions(Path(role): Path<String>) -> Response {
    let role = match parse_role(&role) {
        Ok(role) => role,
        Err(res) => return res,
    };
    let permissions: Vec<&Permission> = permissions_for(role).collect();
    Json(json!({ "role": role, "permissions": permissions })).into_response()
}

pub async fn check_permission(Path((role, permission)): Path<(String, String)>) -> Response {
    let role = match parse_role(&role) {
        Ok(role) => role,
        Err(res) => return res,
    };
    let permission = Permission::new(permission);
    Json(json!({
        "role": role,
        "permission": permission,
        "granted": has_permission(role, &permission),
    }))
    .into_response()
}
