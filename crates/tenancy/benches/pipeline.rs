use std::collections::HashMap;
use std::sync::Arc;

use campus_core::{FeaturePath, LimitType, TenantConfiguration, TenantId, TenantKey};
use campus_tenancy::{
    InboundRequest, PipelineOptions, StoreError, TenantConfigStore, TenantPipeline,
    branding::branding_headers,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

struct StaticStore(HashMap<String, TenantConfiguration>);

#[async_trait::async_trait]
impl TenantConfigStore for StaticStore {
    async fn get_tenant_config(
        &self,
        key: &TenantKey,
    ) -> Result<Option<TenantConfiguration>, StoreError> {
        Ok(self.0.get(key.as_str()).cloned())
    }

    async fn is_feature_enabled(&self, _: &TenantId, _: &FeaturePath) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn is_limit_reached(&self, _: &TenantId, _: &LimitType) -> Result<bool, StoreError> {
        Ok(false)
    }
}

fn acme() -> TenantConfiguration {
    serde_json::from_value(json!({
        "id": "acme",
        "name": "Acme University",
        "status": "active",
        "metadata": { "plan": "enterprise", "tier": "gold" },
        "branding": {
            "colors": { "primary": "#112233", "secondary": "#445566", "accent": "#778899" },
            "typography": { "fontFamily": "Inter" },
            "customCss": ".banner { color: red; }"
        },
        "security": {
            "domainRestrictions": { "allowedDomains": ["acme.example.com"] },
            "cors": { "enabled": true, "origins": ["https://app.acme.test"], "methods": ["GET"] },
            "rateLimiting": { "enabled": true, "maxRequests": 100, "windowMs": 60000 },
            "securityHeaders": { "X-Frame-Options": "DENY" }
        }
    }))
    .expect("valid fixture")
}

fn bench_pipeline(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let store = Arc::new(StaticStore(HashMap::from([("acme".to_string(), acme())])));
    let pipeline = TenantPipeline::new(store, PipelineOptions::default());
    let request = InboundRequest::new("acme.example.com", "/courses")
        .with_header("Origin", "https://app.acme.test");

    c.bench_function("pipeline_admit", |b| {
        b.iter(|| rt.block_on(pipeline.process(black_box(&request))))
    });

    let branding = acme().branding;
    c.bench_function("branding_headers", |b| b.iter(|| branding_headers(black_box(&branding))));
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
