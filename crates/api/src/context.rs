use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Response,
};

use campus_tenancy::{ResolvedContext, TenantError};

use crate::app::errors;
use crate::config::Environment;

/// Correlation id for a request (client-supplied `X-Request-ID` or generated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extractor for the tenant context attached by the tenant middleware.
///
/// Handlers on paths the pipeline lets through without a tenant get the
/// standard "Tenant not found" rejection when no context is present.
#[derive(Debug, Clone)]
pub struct Tenant(pub ResolvedContext);

#[async_trait]
impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ResolvedContext>()
            .cloned()
            .map(Tenant)
            .ok_or_else(|| {
                errors::tenant_error_to_response(&TenantError::Unresolvable, Environment::Production)
            })
    }
}
