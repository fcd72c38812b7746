//! The composed per-request flow: resolve → load → enforce → brand.

use std::sync::Arc;

use crate::branding::branding_headers;
use crate::{
    HeaderSet, InboundRequest, PolicyEnforcer, ResolvedContext, TenantConfigStore,
    TenantContextLoader, TenantError, TenantIdentityResolver,
};

/// Tunables for [`TenantPipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Header carrying an explicit tenant override.
    pub tenant_header: String,
    /// Query parameter carrying an explicit tenant override.
    pub tenant_query_param: String,
    /// Path prefixes served without a tenant when none resolves. Matched on
    /// whole segments; the root path `/` is always exempt.
    pub exempt_prefixes: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            tenant_header: "x-tenant-id".to_string(),
            tenant_query_param: "tenant".to_string(),
            exempt_prefixes: vec!["/api".into(), "/graphql".into(), "/health".into()],
        }
    }
}

/// A request that passed every pipeline check.
#[derive(Debug, Clone)]
pub struct Admitted {
    pub context: ResolvedContext,
    /// Headers to attach to the eventual response.
    pub headers: HeaderSet,
}

#[derive(Debug, Clone)]
pub enum Admission {
    /// No tenant, but the path does not need one.
    Bypass,
    Admitted(Admitted),
}

/// Tenant resolution and policy enforcement for inbound requests.
///
/// The store is injected; the pipeline holds no other shared state.
#[derive(Debug, Clone)]
pub struct TenantPipeline {
    resolver: TenantIdentityResolver,
    loader: TenantContextLoader,
    policy: PolicyEnforcer,
    exempt_prefixes: Vec<String>,
}

impl TenantPipeline {
    pub fn new(store: Arc<dyn TenantConfigStore>, options: PipelineOptions) -> Self {
        Self {
            resolver: TenantIdentityResolver::new(options.tenant_header, options.tenant_query_param),
            loader: TenantContextLoader::new(store),
            policy: PolicyEnforcer::new(),
            exempt_prefixes: options.exempt_prefixes,
        }
    }

    pub fn store(&self) -> &Arc<dyn TenantConfigStore> {
        self.loader.store()
    }

    /// Whether `path` may be served without tenant context.
    pub fn is_exempt(&self, path: &str) -> bool {
        if path.is_empty() || path == "/" {
            return true;
        }
        self.exempt_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Run the full pipeline for one request.
    ///
    /// Performs at most one configuration lookup, and none at all when no
    /// tenant key resolves. The activation check precedes every policy rule.
    pub async fn process(&self, request: &InboundRequest) -> Result<Admission, TenantError> {
        let Some(key) = self.resolver.resolve(request) else {
            if self.is_exempt(request.path()) {
                tracing::debug!(path = request.path(), "no tenant; exempt path");
                return Ok(Admission::Bypass);
            }
            tracing::debug!(host = request.host(), path = request.path(), "no tenant resolved");
            return Err(TenantError::Unresolvable);
        };

        let context = self.loader.load(&key).await?;
        let mut headers = self.policy.enforce(&context, request)?;
        headers.extend_missing(branding_headers(&context.configuration().branding));

        tracing::debug!(tenant_id = %context.tenant_id(), "tenant admitted");
        Ok(Admission::Admitted(Admitted { context, headers }))
    }
}
