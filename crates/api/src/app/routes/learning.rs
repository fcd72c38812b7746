//! Demo LMS endpoints, each behind one tenant gate.

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use campus_core::{ComplianceType, FeaturePath, LimitType};
use campus_tenancy::{
    ComplianceGate, FeatureGate, LimitGate, TenantConfigStore, TenantError, UsageRecorder,
};

use crate::app::errors;
use crate::config::Environment;
use crate::context::Tenant;
use crate::middleware::{
    ComplianceGuard, FeatureGuard, LimitGuard, require_compliance, require_feature,
    require_limit_available,
};

const REPORTS_EXPORT: FeaturePath = FeaturePath::from_static("reports.export");

pub fn router(store: Arc<dyn TenantConfigStore>, environment: Environment) -> Router {
    let reports = Router::new()
        .route("/reports/export", get(export_reports))
        .route_layer(from_fn_with_state(
            FeatureGuard {
                gate: FeatureGate::new(REPORTS_EXPORT),
            },
            require_feature,
        ));

    let courses = Router::new()
        .route("/courses", post(create_course))
        .route_layer(from_fn_with_state(
            LimitGuard {
                gate: LimitGate::new(LimitType::COURSES),
                store,
                environment,
            },
            require_limit_available,
        ));

    let records = Router::new()
        .route("/records/students", get(student_records))
        .route_layer(from_fn_with_state(
            ComplianceGuard {
                gate: ComplianceGate::new(ComplianceType::FERPA),
            },
            require_compliance,
        ));

    reports.merge(courses).merge(records)
}

pub async fn export_reports(Tenant(context): Tenant) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "tenant": context.tenant_id().as_str(),
        "format": "csv",
        "rows": 0,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
}

/// Creates a course and charges one unit of the tenant's `courses` quota.
pub async fn create_course(
    Tenant(context): Tenant,
    Extension(usage): Extension<Arc<dyn UsageRecorder>>,
    Extension(environment): Extension<Environment>,
    Json(body): Json<CreateCourseRequest>,
) -> Response {
    let title = body.title.trim();
    if title.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "Invalid course",
            Some("title must not be empty".into()),
        );
    }

    let id = Uuid::now_v7();
    let used = match usage
        .record_usage(context.tenant_id(), &LimitType::COURSES, 1)
        .await
    {
        Ok(used) => used,
        Err(e) => return errors::tenant_error_to_response(&TenantError::Store(e), environment),
    };
    tracing::info!(tenant_id = %context.tenant_id(), course_id = %id, used, "course created");
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "course": { "id": id.to_string(), "title": title },
        })),
    )
        .into_response()
}

pub async fn student_records(Tenant(context): Tenant) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "tenant": context.tenant_id().as_str(),
        "students": [],
    }))
}
