use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use campus_tenancy::{TenantConfigStore, UsageRecorder};

use crate::config::Environment;

pub mod learning;
pub mod roles;
pub mod system;
pub mod tenant;

/// Every route the service exposes; tenant-agnostic ones live under the
/// pipeline's exempt prefixes.
pub fn router(
    store: Arc<dyn TenantConfigStore>,
    usage: Arc<dyn UsageRecorder>,
    environment: Environment,
) -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest("/api/roles", roles::router())
        .nest("/tenant", tenant::router())
        .merge(learning::router(store, environment))
        .layer(Extension(usage))
        .layer(Extension(environment))
}
