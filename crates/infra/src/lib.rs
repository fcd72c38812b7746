//! Infrastructure layer: tenant configuration stores and request accounting.

pub mod config_store;
pub mod rate_limit;

pub use config_store::{
    CachedTenantConfigStore, DEFAULT_CACHE_CAPACITY, FixtureError, InMemoryTenantConfigStore,
    load_fixtures,
};
pub use rate_limit::{FixedWindowLimiter, RateLimitOutcome};
