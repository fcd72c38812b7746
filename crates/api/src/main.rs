use std::sync::Arc;

use anyhow::Context;

use campus_api::config::{ApiConfig, Environment};
use campus_infra::{CachedTenantConfigStore, InMemoryTenantConfigStore, load_fixtures};
use campus_observability::LogFormat;
use campus_tenancy::{TenantConfigStore, UsageRecorder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;

    match config.environment {
        Environment::Production => campus_observability::init(),
        Environment::Development => campus_observability::tracing::init(LogFormat::Pretty),
    }

    let (store, usage) = build_store(&config)?;
    let app = campus_api::app::build_app(&config, store, usage);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        environment = ?config.environment,
        rate_limits = config.enforce_rate_limits,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// The configuration store the pipeline reads, plus the usage sink backed by
/// the same in-memory counters.
fn build_store(
    config: &ApiConfig,
) -> anyhow::Result<(Arc<dyn TenantConfigStore>, Arc<dyn UsageRecorder>)> {
    let store = match &config.fixtures_path {
        Some(path) => {
            let configs = load_fixtures(path)
                .with_context(|| format!("failed to load tenant fixtures from {}", path.display()))?;
            Arc::new(InMemoryTenantConfigStore::from_configs(configs))
        }
        None => {
            tracing::warn!("CAMPUS_TENANT_FIXTURES not set; starting with no tenants");
            Arc::new(InMemoryTenantConfigStore::new())
        }
    };
    let usage: Arc<dyn UsageRecorder> = store.clone();

    let reader: Arc<dyn TenantConfigStore> = if config.cache_ttl.is_zero() {
        store
    } else {
        Arc::new(CachedTenantConfigStore::with_capacity(
            store,
            config.cache_ttl,
            config.cache_capacity,
        ))
    };
    Ok((reader, usage))
}
