use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use serde::Serialize;

use campus_tenancy::TenantError;

use crate::config::Environment;

/// Stable error body shape: `{success: false, message, error?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn json_error(
    status: StatusCode,
    message: impl Into<String>,
    error: Option<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(ErrorBody {
            success: false,
            message: message.into(),
            error,
        }),
    )
        .into_response()
}

pub fn tenant_error_to_response(err: &TenantError, env: Environment) -> axum::response::Response {
    match err {
        TenantError::Unresolvable => json_error(
            StatusCode::NOT_FOUND,
            "Tenant not found",
            Some("Invalid subdomain or domain".into()),
        ),
        TenantError::NotFound { .. } => json_error(
            StatusCode::NOT_FOUND,
            "Tenant configuration not found",
            Some("Invalid tenant ID".into()),
        ),
        TenantError::Inactive { status } => json_error(
            StatusCode::FORBIDDEN,
            "Tenant is not active",
            Some(format!("Tenant status: {status}")),
        ),
        TenantError::DomainNotAllowed => json_error(
            StatusCode::FORBIDDEN,
            "Domain not allowed",
            Some("Access denied for this domain".into()),
        ),
        TenantError::DomainBlocked => json_error(
            StatusCode::FORBIDDEN,
            "Domain blocked",
            Some("Access denied for this domain".into()),
        ),
        TenantError::FeatureDisabled { path } => json_error(
            StatusCode::FORBIDDEN,
            "Feature not available",
            Some(format!("Feature '{path}' is not enabled for this tenant")),
        ),
        TenantError::LimitReached { limit } => json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Limit reached",
            Some(format!("Tenant has reached the limit for {limit}")),
        ),
        TenantError::ComplianceRequired { kind } => json_error(
            StatusCode::FORBIDDEN,
            "Compliance required",
            Some(format!("{kind} compliance is required for this operation")),
        ),
        TenantError::RateLimited { max, window_ms } => json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests",
            Some(format!("Rate limit of {max} requests per {window_ms}ms exceeded")),
        ),
        TenantError::Store(e) => {
            tracing::error!(error = %e, "tenant pipeline failure");
            internal_error(e.to_string(), env)
        }
    }
}

/// 500 with the detail included only outside production.
pub fn internal_error(detail: String, env: Environment) -> axum::response::Response {
    let error = (!env.is_production()).then_some(detail);
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", error)
}

/// Attach `Retry-After` (whole seconds, rounded up) to a rate-limit response.
pub fn with_retry_after(
    mut response: axum::response::Response,
    retry_after: std::time::Duration,
) -> axum::response::Response {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::{ComplianceType, FeaturePath, LimitType, TenantKey, TenantStatus};
    use campus_tenancy::StoreError;

    async fn render(err: &TenantError, env: Environment) -> (StatusCode, serde_json::Value) {
        let res = tenant_error_to_response(err, env);
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn every_variant_maps_to_its_status_and_body() {
        let cases = [
            (
                TenantError::Unresolvable,
                StatusCode::NOT_FOUND,
                "Tenant not found",
                "Invalid subdomain or domain",
            ),
            (
                TenantError::NotFound { key: TenantKey::parse("ghost").unwrap() },
                StatusCode::NOT_FOUND,
                "Tenant configuration not found",
                "Invalid tenant ID",
            ),
            (
                TenantError::Inactive { status: TenantStatus::Suspended },
                StatusCode::FORBIDDEN,
                "Tenant is not active",
                "Tenant status: suspended",
            ),
            (
                TenantError::DomainNotAllowed,
                StatusCode::FORBIDDEN,
                "Domain not allowed",
                "Access denied for this domain",
            ),
            (
                TenantError::DomainBlocked,
                StatusCode::FORBIDDEN,
                "Domain blocked",
                "Access denied for this domain",
            ),
            (
                TenantError::FeatureDisabled { path: FeaturePath::from_static("reports.export") },
                StatusCode::FORBIDDEN,
                "Feature not available",
                "Feature 'reports.export' is not enabled for this tenant",
            ),
            (
                TenantError::LimitReached { limit: LimitType::COURSES },
                StatusCode::TOO_MANY_REQUESTS,
                "Limit reached",
                "Tenant has reached the limit for courses",
            ),
            (
                TenantError::ComplianceRequired { kind: ComplianceType::GDPR },
                StatusCode::FORBIDDEN,
                "Compliance required",
                "gdpr compliance is required for this operation",
            ),
            (
                TenantError::RateLimited { max: 1, window_ms: 1000 },
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests",
                "Rate limit of 1 requests per 1000ms exceeded",
            ),
            (
                TenantError::Store(StoreError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "tenant store unavailable: down",
            ),
        ];
        for (err, status, message, error) in cases {
            let (got, body) = render(&err, Environment::Development).await;
            assert_eq!(got, status, "{err:?}");
            assert_eq!(body["success"], false, "{err:?}");
            assert_eq!(body["message"], message, "{err:?}");
            assert_eq!(body["error"], error, "{err:?}");
        }
    }

    #[tokio::test]
    async fn store_detail_is_redacted_in_production() {
        let err = TenantError::Store(StoreError::Malformed("bad json at line 3".into()));
        let (status, body) = render(&err, Environment::Production).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Internal server error" })
        );

        // Classified errors are not redacted.
        let (_, body) = render(&TenantError::DomainNotAllowed, Environment::Production).await;
        assert_eq!(body["error"], "Access denied for this domain");
    }

    #[test]
    fn retry_after_rounds_up() {
        let res = with_retry_after(
            json_error(StatusCode::TOO_MANY_REQUESTS, "x", None),
            std::time::Duration::from_millis(1500),
        );
        assert_eq!(res.headers()[header::RETRY_AFTER], "2");
    }
}
