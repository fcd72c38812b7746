use std::sync::Arc;

use campus_core::TenantKey;

use crate::{ResolvedContext, TenantConfigStore, TenantError};

/// Turns a resolved tenant key into a [`ResolvedContext`].
///
/// One store lookup per call, no retries. "Not found" and "found but not
/// active" are distinct failures.
#[derive(Clone)]
pub struct TenantContextLoader {
    store: Arc<dyn TenantConfigStore>,
}

impl TenantContextLoader {
    pub fn new(store: Arc<dyn TenantConfigStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TenantConfigStore> {
        &self.store
    }

    #[tracing::instrument(skip_all, fields(tenant_key = %key))]
    pub async fn load(&self, key: &TenantKey) -> Result<ResolvedContext, TenantError> {
        let configuration = self
            .store
            .get_tenant_config(key)
            .await?
            .ok_or_else(|| TenantError::NotFound { key: key.clone() })?;

        if !configuration.status.is_active() {
            tracing::info!(status = %configuration.status, "tenant is not active");
            return Err(TenantError::Inactive {
                status: configuration.status,
            });
        }

        Ok(ResolvedContext::new(configuration))
    }
}

impl core::fmt::Debug for TenantContextLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TenantContextLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::FakeStore;
    use crate::StoreError;
    use campus_core::{TenantConfiguration, TenantId, TenantStatus};

    fn tenant(id: &str, status: TenantStatus) -> TenantConfiguration {
        TenantConfiguration::new(TenantId::parse(id).unwrap(), id, status)
    }

    fn key(raw: &str) -> TenantKey {
        TenantKey::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn active_tenant_loads() {
        let store = Arc::new(FakeStore::with([tenant("acme", TenantStatus::Active)]));
        let loader = TenantContextLoader::new(store.clone());

        let ctx = loader.load(&key("acme")).await.unwrap();
        assert_eq!(ctx.tenant_id().as_str(), "acme");
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn missing_tenant_is_not_found() {
        let loader = TenantContextLoader::new(Arc::new(FakeStore::default()));
        let err = loader.load(&key("ghost")).await.unwrap_err();
        assert_eq!(err, TenantError::NotFound { key: key("ghost") });
    }

    #[tokio::test]
    async fn every_non_active_status_is_rejected_with_its_status() {
        for status in [TenantStatus::Inactive, TenantStatus::Suspended, TenantStatus::Pending] {
            let loader = TenantContextLoader::new(Arc::new(FakeStore::with([tenant("acme", status)])));
            let err = loader.load(&key("acme")).await.unwrap_err();
            assert_eq!(err, TenantError::Inactive { status });
        }
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let store = FakeStore {
            fail: true,
            ..FakeStore::default()
        };
        let loader = TenantContextLoader::new(Arc::new(store));
        let err = loader.load(&key("acme")).await.unwrap_err();
        assert!(matches!(err, TenantError::Store(StoreError::Unavailable(_))));
    }
}
