//! [`campus_tenancy::TenantConfigStore`] implementations.
//!
//! - `in_memory`: process-local store with usage counters (dev/tests, fixtures)
//! - `cached`: bounded TTL cache in front of any other store
//! - `fixtures`: JSON fixture loading

pub mod cached;
pub mod fixtures;
pub mod in_memory;

pub use cached::{CachedTenantConfigStore, DEFAULT_CACHE_CAPACITY};
pub use fixtures::{FixtureError, load_fixtures};
pub use in_memory::InMemoryTenantConfigStore;
