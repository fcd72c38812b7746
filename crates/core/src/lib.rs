//! `campus-core`: tenant domain primitives shared by every other crate.
//!
//! This crate contains **pure domain** types (no I/O, no HTTP).

pub mod error;
pub mod id;
pub mod name;
pub mod tenant;

pub use error::{DomainError, DomainResult};
pub use id::{TenantId, TenantKey};
pub use name::{ComplianceType, FeaturePath, LimitType};
pub use tenant::{
    Branding, ComplianceSetting, CorsPolicy, DomainRestrictions, FeatureNode, FeatureSet,
    LimitQuota, RateLimiting, SecurityPolicy, TenantConfiguration, TenantMetadata, TenantStatus,
};
