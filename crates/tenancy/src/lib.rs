//! `campus-tenancy`: per-request tenant resolution and policy enforcement.
//!
//! Flow for one request: [`resolver`] extracts a tenant key, [`loader`] fetches
//! the configuration once and checks activation, [`policy`] applies domain
//! rules and computes response headers, [`branding`] adds the tenant's visual
//! identity, and [`pipeline`] ties the steps together. [`gates`] are the
//! feature/limit/compliance checks downstream handlers run against the
//! resolved context.
//!
//! This crate has no HTTP framework dependency; requests come in as
//! [`InboundRequest`] and headers go out as a [`HeaderSet`].

pub mod branding;
pub mod context;
pub mod error;
pub mod gates;
pub mod headers;
pub mod loader;
pub mod pipeline;
pub mod policy;
pub mod request;
pub mod resolver;
pub mod store;

pub use context::ResolvedContext;
pub use error::{StoreError, TenantError};
pub use gates::{ComplianceGate, FeatureGate, LimitGate};
pub use headers::HeaderSet;
pub use loader::TenantContextLoader;
pub use pipeline::{Admission, Admitted, PipelineOptions, TenantPipeline};
pub use policy::{DenyReason, PolicyDecision, PolicyEnforcer};
pub use request::InboundRequest;
pub use resolver::TenantIdentityResolver;
pub use store::{TenantConfigStore, UsageRecorder};
