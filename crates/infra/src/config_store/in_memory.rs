use std::collections::HashMap;
use std::sync::RwLock;

use campus_core::{FeaturePath, LimitType, TenantConfiguration, TenantId, TenantKey};
use campus_tenancy::{StoreError, TenantConfigStore, UsageRecorder};

/// In-memory tenant configuration store for tests/dev.
///
/// Records are indexed by tenant key. Usage counters live next to the records
/// so `is_limit_reached` can compare them with the configured quota.
#[derive(Debug, Default)]
pub struct InMemoryTenantConfigStore {
    tenants: RwLock<HashMap<String, TenantConfiguration>>,
    usage: RwLock<HashMap<(TenantId, LimitType), u64>>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

impl InMemoryTenantConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `configs`, each reachable under its own id.
    pub fn from_configs(configs: impl IntoIterator<Item = TenantConfiguration>) -> Self {
        let store = Self::new();
        for config in configs {
            store.upsert(config);
        }
        store
    }

    /// Insert or replace a record, keyed by its id.
    pub fn upsert(&self, config: TenantConfiguration) {
        let key = config.id.as_str().to_string();
        if let Ok(mut map) = self.tenants.write() {
            map.insert(key, config);
        }
    }

    /// Insert or replace a record reachable under a key other than its id
    /// (e.g. a vanity subdomain).
    pub fn upsert_for_key(&self, key: &TenantKey, config: TenantConfiguration) {
        if let Ok(mut map) = self.tenants.write() {
            map.insert(key.as_str().to_string(), config);
        }
    }

    pub fn remove(&self, key: &TenantKey) -> Option<TenantConfiguration> {
        self.tenants.write().ok()?.remove(key.as_str())
    }

    /// Add `amount` to the tenant's usage of `limit`; returns the new total.
    pub fn add_usage(
        &self,
        tenant_id: &TenantId,
        limit: &LimitType,
        amount: u64,
    ) -> Result<u64, StoreError> {
        let mut usage = self.usage.write().map_err(poisoned)?;
        let total = usage
            .entry((tenant_id.clone(), limit.clone()))
            .or_insert(0);
        *total = total.saturating_add(amount);
        Ok(*total)
    }

    pub fn usage(&self, tenant_id: &TenantId, limit: &LimitType) -> u64 {
        self.usage
            .read()
            .ok()
            .and_then(|usage| usage.get(&(tenant_id.clone(), limit.clone())).copied())
            .unwrap_or(0)
    }

    fn find_by_id(&self, tenant_id: &TenantId) -> Result<Option<TenantConfiguration>, StoreError> {
        let map = self.tenants.read().map_err(poisoned)?;
        Ok(map.values().find(|c| &c.id == tenant_id).cloned())
    }
}

#[async_trait::async_trait]
impl TenantConfigStore for InMemoryTenantConfigStore {
    async fn get_tenant_config(
        &self,
        key: &TenantKey,
    ) -> Result<Option<TenantConfiguration>, StoreError> {
        let map = self.tenants.read().map_err(poisoned)?;
        Ok(map.get(key.as_str()).cloned())
    }

    async fn is_feature_enabled(
        &self,
        tenant_id: &TenantId,
        feature: &FeaturePath,
    ) -> Result<bool, StoreError> {
        Ok(self
            .find_by_id(tenant_id)?
            .and_then(|c| c.features.lookup(feature))
            .unwrap_or(false))
    }

    /// A limit with no configured quota is never reached.
    async fn is_limit_reached(
        &self,
        tenant_id: &TenantId,
        limit: &LimitType,
    ) -> Result<bool, StoreError> {
        let Some(config) = self.find_by_id(tenant_id)? else {
            return Ok(false);
        };
        let Some(quota) = config.limits.get(limit) else {
            return Ok(false);
        };
        Ok(self.usage(tenant_id, limit) >= quota.max())
    }
}

#[async_trait::async_trait]
impl UsageRecorder for InMemoryTenantConfigStore {
    async fn record_usage(
        &self,
        tenant_id: &TenantId,
        limit: &LimitType,
        amount: u64,
    ) -> Result<u64, StoreError> {
        self.add_usage(tenant_id, limit, amount)
    }
}
