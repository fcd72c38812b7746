use std::time::Duration;

use moka::future::Cache;

use campus_core::{FeaturePath, LimitType, TenantConfiguration, TenantId, TenantKey};
use campus_tenancy::{StoreError, TenantConfigStore};

/// Default upper bound on cached keys.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Read-through TTL cache in front of another [`TenantConfigStore`].
///
/// Both hits and misses are cached for `ttl`, so an unknown subdomain cannot
/// hammer the backing store. The cache holds at most `capacity` keys and
/// evicts expired or least-used entries past that. Errors are never cached.
/// Usage verdicts always go to the inner store.
///
/// A zero `ttl` disables caching.
pub struct CachedTenantConfigStore<S> {
    inner: S,
    entries: Option<Cache<TenantKey, Option<TenantConfiguration>>>,
}

impl<S> CachedTenantConfigStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self::with_capacity(inner, ttl, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: S, ttl: Duration, capacity: u64) -> Self {
        let entries = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build()
        });
        Self { inner, entries }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop the cached entry for `key`.
    pub async fn invalidate(&self, key: &TenantKey) {
        if let Some(entries) = &self.entries {
            entries.invalidate(key).await;
        }
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.invalidate_all();
        }
    }

    /// Approximate number of cached keys; eviction runs lazily.
    pub fn entry_count(&self) -> u64 {
        self.entries.as_ref().map_or(0, Cache::entry_count)
    }
}

impl<S> core::fmt::Debug for CachedTenantConfigStore<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachedTenantConfigStore")
            .field("enabled", &self.entries.is_some())
            .field("entries", &self.entry_count())
            .finish()
    }
}

#[async_trait::async_trait]
impl<S> TenantConfigStore for CachedTenantConfigStore<S>
where
    S: TenantConfigStore,
{
    async fn get_tenant_config(
        &self,
        key: &TenantKey,
    ) -> Result<Option<TenantConfiguration>, StoreError> {
        let Some(entries) = &self.entries else {
            return self.inner.get_tenant_config(key).await;
        };

        // Concurrent misses for one key share a single inner lookup.
        entries
            .try_get_with_by_ref(key, async {
                tracing::trace!(tenant_key = %key, "tenant config cache miss");
                self.inner.get_tenant_config(key).await
            })
            .await
            .map_err(|e| StoreError::clone(&e))
    }

    async fn is_feature_enabled(
        &self,
        tenant_id: &TenantId,
        feature: &FeaturePath,
    ) -> Result<bool, StoreError> {
        self.inner.is_feature_enabled(tenant_id, feature).await
    }

    async fn is_limit_reached(
        &self,
        tenant_id: &TenantId,
        limit: &LimitType,
    ) -> Result<bool, StoreError> {
        self.inner.is_limit_reached(tenant_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use campus_core::TenantStatus;

    use crate::InMemoryTenantConfigStore;

    /// Counts lookups reaching the wrapped store.
    struct Counting {
        inner: InMemoryTenantConfigStore,
        lookups: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(fail: bool) -> Self {
            let inner = InMemoryTenantConfigStore::from_configs([TenantConfiguration::new(
                TenantId::parse("acme").unwrap(),
                "Acme",
                TenantStatus::Active,
            )]);
            Self {
                inner,
                lookups: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait::async_trait]
    impl TenantConfigStore for Counting {
        async fn get_tenant_config(
            &self,
            key: &TenantKey,
        ) -> Result<Option<TenantConfiguration>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Unavailable("down".into()));
            }
            self.inner.get_tenant_config(key).await
        }

        async fn is_feature_enabled(
            &self,
            tenant_id: &TenantId,
            feature: &FeaturePath,
        ) -> Result<bool, StoreError> {
            self.inner.is_feature_enabled(tenant_id, feature).await
        }

        async fn is_limit_reached(
            &self,
            tenant_id: &TenantId,
            limit: &LimitType,
        ) -> Result<bool, StoreError> {
            self.inner.is_limit_reached(tenant_id, limit).await
        }
    }

    fn key(raw: &str) -> TenantKey {
        TenantKey::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn repeated_lookups_within_ttl_hit_inner_once() {
        let store = CachedTenantConfigStore::new(Counting::new(false), Duration::from_secs(60));
        for _ in 0..3 {
            assert!(store.get_tenant_config(&key("acme")).await.unwrap().is_some());
        }
        assert_eq!(store.inner().lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn misses_are_cached_too() {
        let store = CachedTenantConfigStore::new(Counting::new(false), Duration::from_secs(60));
        assert!(store.get_tenant_config(&key("ghost")).await.unwrap().is_none());
        assert!(store.get_tenant_config(&key("ghost")).await.unwrap().is_none());
        assert_eq!(store.inner().lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_ttl_disables_caching() {
        let store = CachedTenantConfigStore::new(Counting::new(false), Duration::ZERO);
        store.get_tenant_config(&key("acme")).await.unwrap();
        store.get_tenant_config(&key("acme")).await.unwrap();
        assert_eq!(store.inner().lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_lookup() {
        let store = CachedTenantConfigStore::new(Counting::new(false), Duration::from_secs(60));
        store.get_tenant_config(&key("acme")).await.unwrap();
        store.invalidate(&key("acme")).await;
        store.get_tenant_config(&key("acme")).await.unwrap();
        assert_eq!(store.inner().lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let store = CachedTenantConfigStore::new(Counting::new(true), Duration::from_secs(60));
        assert!(store.get_tenant_config(&key("acme")).await.is_err());
        assert!(store.get_tenant_config(&key("acme")).await.is_err());
        assert_eq!(store.inner().lookups.load(Ordering::SeqCst), 2);
    }

    async fn settle(store: &CachedTenantConfigStore<Counting>) {
        if let Some(entries) = &store.entries {
            entries.run_pending_tasks().await;
        }
    }

    #[tokio::test]
    async fn distinct_keys_never_exceed_capacity() {
        let store = CachedTenantConfigStore::with_capacity(
            Counting::new(false),
            Duration::from_secs(60),
            16,
        );
        for i in 0..2_000 {
            store
                .get_tenant_config(&key(&format!("ghost-{i}")))
                .await
                .unwrap();
        }
        settle(&store).await;
        assert!(store.entry_count() <= 16, "entries: {}", store.entry_count());
    }

    #[tokio::test]
    async fn expired_entries_are_dropped() {
        let store = CachedTenantConfigStore::new(Counting::new(false), Duration::from_millis(5));
        for i in 0..500 {
            store
                .get_tenant_config(&key(&format!("ghost-{i}")))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.get_tenant_config(&key("acme")).await.unwrap();
        settle(&store).await;
        assert!(store.entry_count() <= 1, "entries: {}", store.entry_count());
    }

    #[tokio::test]
    async fn expired_entries_are_fetched_again() {
        let store = CachedTenantConfigStore::new(Counting::new(false), Duration::from_millis(5));
        store.get_tenant_config(&key("acme")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        store.get_tenant_config(&key("acme")).await.unwrap();
        assert_eq!(store.inner().lookups.load(Ordering::SeqCst), 2);
    }
}
