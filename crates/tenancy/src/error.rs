use thiserror::Error;

use campus_core::{ComplianceType, FeaturePath, LimitType, TenantKey, TenantStatus};

/// Failure raised by a [`crate::TenantConfigStore`] implementation.
///
/// These are the only truly exceptional failures in the pipeline; every other
/// outcome is an expected [`TenantError`] variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("tenant store unavailable: {0}")]
    Unavailable(String),

    /// A record exists but could not be decoded.
    #[error("malformed tenant configuration: {0}")]
    Malformed(String),
}

/// Classified outcome of a request that did not pass the tenant pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TenantError {
    /// No tenant key on a path that requires one.
    #[error("no tenant could be resolved for this request")]
    Unresolvable,

    /// A key was resolved but the store has no record for it.
    #[error("no configuration for tenant '{key}'")]
    NotFound { key: TenantKey },

    /// The record exists but the tenant is not active.
    #[error("tenant is {status}")]
    Inactive { status: TenantStatus },

    #[error("request host is not in the tenant's allowed domains")]
    DomainNotAllowed,

    #[error("request host is in the tenant's blocked domains")]
    DomainBlocked,

    #[error("feature '{path}' is not enabled")]
    FeatureDisabled { path: FeaturePath },

    #[error("limit '{limit}' reached")]
    LimitReached { limit: LimitType },

    #[error("{kind} compliance is required")]
    ComplianceRequired { kind: ComplianceType },

    #[error("rate limit of {max} requests per {window_ms}ms exceeded")]
    RateLimited { max: u64, window_ms: u64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}
