use std::sync::Arc;

use campus_core::{FeaturePath, LimitType, TenantConfiguration, TenantId, TenantKey};

use crate::StoreError;

/// Source of tenant configuration and usage verdicts.
///
/// Backed by a database or remote service in production; the pipeline treats
/// it as an async key→record lookup. Retries, caching and usage counting are
/// the implementation's business.
#[async_trait::async_trait]
pub trait TenantConfigStore: Send + Sync {
    /// Fetch the configuration for `key`, or `None` if no such tenant exists.
    async fn get_tenant_config(
        &self,
        key: &TenantKey,
    ) -> Result<Option<TenantConfiguration>, StoreError>;

    /// Whether `feature` is enabled for the tenant, read from the store rather
    /// than from an already-resolved context.
    async fn is_feature_enabled(
        &self,
        tenant_id: &TenantId,
        feature: &FeaturePath,
    ) -> Result<bool, StoreError>;

    /// Whether the tenant has used up its `limit` quota.
    async fn is_limit_reached(
        &self,
        tenant_id: &TenantId,
        limit: &LimitType,
    ) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl<S> TenantConfigStore for Arc<S>
where
    S: TenantConfigStore + ?Sized,
{
    async fn get_tenant_config(
        &self,
        key: &TenantKey,
    ) -> Result<Option<TenantConfiguration>, StoreError> {
        (**self).get_tenant_config(key).await
    }

    async fn is_feature_enabled(
        &self,
        tenant_id: &TenantId,
        feature: &FeaturePath,
    ) -> Result<bool, StoreError> {
        (**self).is_feature_enabled(tenant_id, feature).await
    }

    async fn is_limit_reached(
        &self,
        tenant_id: &TenantId,
        limit: &LimitType,
    ) -> Result<bool, StoreError> {
        (**self).is_limit_reached(tenant_id, limit).await
    }
}

/// Sink for consumed quota, the write side of [`TenantConfigStore::is_limit_reached`].
#[async_trait::async_trait]
pub trait UsageRecorder: Send + Sync {
    /// Add `amount` to the tenant's usage of `limit`; returns the new total.
    async fn record_usage(
        &self,
        tenant_id: &TenantId,
        limit: &LimitType,
        amount: u64,
    ) -> Result<u64, StoreError>;
}
