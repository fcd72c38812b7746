//! Feature, limit and compliance gates.
//!
//! Each gate reads an already-resolved context; none triggers a new
//! configuration lookup. Missing information always means "closed".

use campus_core::{ComplianceType, FeaturePath, LimitType, TenantId};

use crate::{ResolvedContext, StoreError, TenantConfigStore, TenantError};

/// Whether `path` is switched on for the context's tenant. Missing ⇒ `false`.
pub fn feature_enabled(context: &ResolvedContext, path: &FeaturePath) -> bool {
    context.configuration().features.lookup(path).unwrap_or(false)
}

/// Whether the tenant has opted into `kind`. Absent and `enabled: false` are
/// treated the same.
pub fn compliance_enabled(context: &ResolvedContext, kind: &ComplianceType) -> bool {
    context
        .configuration()
        .compliance
        .get(kind)
        .is_some_and(|setting| setting.enabled)
}

/// Store-backed feature check for callers that hold only a tenant id.
pub async fn feature_enabled_for(
    store: &dyn TenantConfigStore,
    tenant_id: &TenantId,
    path: &FeaturePath,
) -> Result<bool, StoreError> {
    store.is_feature_enabled(tenant_id, path).await
}

/// Guard on a single feature flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGate {
    path: FeaturePath,
}

impl FeatureGate {
    pub fn new(path: FeaturePath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &FeaturePath {
        &self.path
    }

    pub fn is_open(&self, context: &ResolvedContext) -> bool {
        feature_enabled(context, &self.path)
    }

    pub fn check(&self, context: &ResolvedContext) -> Result<(), TenantError> {
        if self.is_open(context) {
            Ok(())
        } else {
            Err(TenantError::FeatureDisabled {
                path: self.path.clone(),
            })
        }
    }
}

/// Guard on a compliance regime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceGate {
    kind: ComplianceType,
}

impl ComplianceGate {
    pub fn new(kind: ComplianceType) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &ComplianceType {
        &self.kind
    }

    pub fn is_open(&self, context: &ResolvedContext) -> bool {
        compliance_enabled(context, &self.kind)
    }

    pub fn check(&self, context: &ResolvedContext) -> Result<(), TenantError> {
        if self.is_open(context) {
            Ok(())
        } else {
            Err(TenantError::ComplianceRequired {
                kind: self.kind.clone(),
            })
        }
    }
}

/// Guard on a usage quota.
///
/// The verdict comes from the store's usage collaborator; this gate owns no
/// counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitGate {
    limit: LimitType,
}

impl LimitGate {
    pub fn new(limit: LimitType) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> &LimitType {
        &self.limit
    }

    pub async fn is_reached(
        &self,
        store: &dyn TenantConfigStore,
        context: &ResolvedContext,
    ) -> Result<bool, StoreError> {
        store.is_limit_reached(context.tenant_id(), &self.limit).await
    }

    pub async fn check(
        &self,
        store: &dyn TenantConfigStore,
        context: &ResolvedContext,
    ) -> Result<(), TenantError> {
        if self.is_reached(store, context).await? {
            Err(TenantError::LimitReached {
                limit: self.limit.clone(),
            })
        } else {
            Ok(())
        }
    }
}
