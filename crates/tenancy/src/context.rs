use std::sync::Arc;

use campus_core::{TenantConfiguration, TenantId};

/// Tenant identity plus configuration for one request.
///
/// Built once by [`crate::TenantContextLoader`], attached to the request and
/// read by every downstream gate. Cloning shares the configuration; nothing
/// can mutate it. Never cache a context beyond the request it was built for.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    tenant_id: TenantId,
    configuration: Arc<TenantConfiguration>,
}

impl ResolvedContext {
    pub fn new(configuration: TenantConfiguration) -> Self {
        Self {
            tenant_id: configuration.id.clone(),
            configuration: Arc::new(configuration),
        }
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn configuration(&self) -> &TenantConfiguration {
        &self.configuration
    }
}
