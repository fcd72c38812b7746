//! Process configuration, read from `CAMPUS_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use campus_infra::DEFAULT_CACHE_CAPACITY;
use campus_tenancy::PipelineOptions;

/// Deployment mode. Production redacts internal error detail from responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    pub tenant_header: String,
    pub tenant_query_param: String,
    pub exempt_prefixes: Vec<String>,
    /// JSON array of tenant configurations used to seed the in-memory store.
    pub fixtures_path: Option<PathBuf>,
    /// `Duration::ZERO` disables the configuration cache.
    pub cache_ttl: Duration,
    /// Upper bound on cached tenant keys (hits and misses alike).
    pub cache_capacity: u64,
    /// Count requests against each tenant's `rateLimiting` policy.
    pub enforce_rate_limits: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let pipeline = PipelineOptions::default();
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            environment: Environment::Development,
            tenant_header: pipeline.tenant_header,
            tenant_query_param: pipeline.tenant_query_param,
            exempt_prefixes: pipeline.exempt_prefixes,
            fixtures_path: None,
            cache_ttl: Duration::from_secs(60),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            enforce_rate_limits: false,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("CAMPUS_BIND_ADDR") {
            config.bind_addr = raw
                .parse()
                .map_err(|e: std::net::AddrParseError| {
                    ConfigError::invalid("CAMPUS_BIND_ADDR", &raw, e.to_string())
                })?;
        }

        if let Some(raw) = lookup("CAMPUS_ENV") {
            config.environment = match raw.to_ascii_lowercase().as_str() {
                "development" | "dev" => Environment::Development,
                "production" | "prod" => Environment::Production,
                _ => {
                    return Err(ConfigError::invalid(
                        "CAMPUS_ENV",
                        &raw,
                        "expected development or production",
                    ));
                }
            };
        }

        if let Some(raw) = lookup("CAMPUS_TENANT_HEADER") {
            let name = raw.trim().to_ascii_lowercase();
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
                return Err(ConfigError::invalid(
                    "CAMPUS_TENANT_HEADER",
                    &raw,
                    "not a valid header name",
                ));
            }
            config.tenant_header = name;
        }

        if let Some(raw) = lookup("CAMPUS_TENANT_QUERY_PARAM") {
            if raw.trim().is_empty() {
                return Err(ConfigError::invalid("CAMPUS_TENANT_QUERY_PARAM", &raw, "empty"));
            }
            config.tenant_query_param = raw.trim().to_string();
        }

        if let Some(raw) = lookup("CAMPUS_EXEMPT_PREFIXES") {
            let prefixes: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if let Some(bad) = prefixes.iter().find(|p| !p.starts_with('/')) {
                return Err(ConfigError::invalid(
                    "CAMPUS_EXEMPT_PREFIXES",
                    bad,
                    "prefixes must start with '/'",
                ));
            }
            config.exempt_prefixes = prefixes;
        }

        if let Some(raw) = lookup("CAMPUS_TENANT_FIXTURES") {
            config.fixtures_path = Some(PathBuf::from(raw));
        }

        if let Some(raw) = lookup("CAMPUS_TENANT_CACHE_TTL_SECS") {
            let secs: u64 = raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::invalid("CAMPUS_TENANT_CACHE_TTL_SECS", &raw, e.to_string())
            })?;
            config.cache_ttl = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("CAMPUS_TENANT_CACHE_CAPACITY") {
            config.cache_capacity = match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::invalid(
                        "CAMPUS_TENANT_CACHE_CAPACITY",
                        &raw,
                        "must be positive; set CAMPUS_TENANT_CACHE_TTL_SECS=0 to disable caching",
                    ));
                }
                Ok(capacity) => capacity,
                Err(e) => {
                    return Err(ConfigError::invalid(
                        "CAMPUS_TENANT_CACHE_CAPACITY",
                        &raw,
                        e.to_string(),
                    ));
                }
            };
        }

        if let Some(raw) = lookup("CAMPUS_ENFORCE_RATE_LIMITS") {
            config.enforce_rate_limits = parse_bool("CAMPUS_ENFORCE_RATE_LIMITS", &raw)?;
        }

        Ok(config)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            tenant_header: self.tenant_header.clone(),
            tenant_query_param: self.tenant_query_param.clone(),
            exempt_prefixes: self.exempt_prefixes.clone(),
        }
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(var, raw, "expected a boolean")),
    }
}
