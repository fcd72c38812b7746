//! Tenant configuration record.
//!
//! The record is written by the administrative side of the platform and is
//! read-only for request handling. Wire format is camelCase JSON; every section
//! other than `id`, `name` and `status` may be omitted and defaults to empty.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ComplianceType, FeaturePath, LimitType, TenantId};

/// Lifecycle state of a tenant. Only [`TenantStatus::Active`] tenants are served.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Inactive,
    Suspended,
    Pending,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Inactive => "inactive",
            TenantStatus::Suspended => "suspended",
            TenantStatus::Pending => "pending",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TenantStatus::Active)
    }
}

impl core::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form commercial classification, echoed into response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantMetadata {
    pub plan: Option<String>,
    pub tier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub font_family: Option<String>,
}

/// Visual identity of a tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    pub colors: BrandColors,
    pub typography: Typography,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    /// Raw stylesheet appended by the tenant.
    pub custom_css: Option<String>,
    /// Raw script appended by the tenant.
    pub custom_js: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainRestrictions {
    pub allowed_domains: Vec<String>,
    pub blocked_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorsPolicy {
    pub enabled: bool,
    pub origins: Vec<String>,
    pub methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub credentials: bool,
    /// Preflight cache lifetime in seconds; `0` omits the header.
    pub max_age: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimiting {
    pub enabled: bool,
    pub max_requests: u64,
    pub window_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityPolicy {
    pub domain_restrictions: DomainRestrictions,
    pub cors: CorsPolicy,
    pub rate_limiting: RateLimiting,
    /// Passed through verbatim as response headers.
    pub security_headers: BTreeMap<String, String>,
}

/// A node of the feature tree: either a flag or a nested group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureNode {
    Flag(bool),
    Group(BTreeMap<String, FeatureNode>),
}

/// Feature flags keyed by name.
///
/// Keys may themselves be dotted (`"reports.export": false`) or nested
/// (`"reports": {"export": false}`); both spellings resolve the same path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeMap<String, FeatureNode>);

impl FeatureSet {
    pub fn new(entries: BTreeMap<String, FeatureNode>) -> Self {
        Self(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve a path to its flag, if the path exists.
    ///
    /// A path that lands on a group resolves to the group's own `enabled` flag.
    pub fn lookup(&self, path: &FeaturePath) -> Option<bool> {
        let segments: Vec<&str> = path.segments().collect();
        lookup_in(&self.0, &segments)
    }
}

fn lookup_in(map: &BTreeMap<String, FeatureNode>, segments: &[&str]) -> Option<bool> {
    // Longest key first so an exact flat key beats a nested spelling.
    for split in (1..=segments.len()).rev() {
        let key = segments[..split].join(".");
        let Some(node) = map.get(&key) else {
            continue;
        };
        let rest = &segments[split..];
        let found = match (node, rest.is_empty()) {
            (FeatureNode::Flag(enabled), true) => Some(*enabled),
            (FeatureNode::Group(group), true) => match group.get("enabled") {
                Some(FeatureNode::Flag(enabled)) => Some(*enabled),
                _ => None,
            },
            (FeatureNode::Group(group), false) => lookup_in(group, rest),
            (FeatureNode::Flag(_), false) => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Quota for a named limit: a bare number or a structured record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitQuota {
    Count(u64),
    Structured {
        max: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        period: Option<String>,
    },
}

impl LimitQuota {
    pub fn max(&self) -> u64 {
        match self {
            LimitQuota::Count(max) => *max,
            LimitQuota::Structured { max, .. } => *max,
        }
    }
}

/// Compliance regime switch plus any regime-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSetting {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub settings: BTreeMap<String, serde_json::Value>,
}

/// Authoritative per-tenant configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfiguration {
    pub id: TenantId,
    pub name: String,
    pub status: TenantStatus,
    #[serde(default)]
    pub metadata: TenantMetadata,
    #[serde(default)]
    pub branding: Branding,
    #[serde(default)]
    pub security: SecurityPolicy,
    #[serde(default)]
    pub features: FeatureSet,
    #[serde(default)]
    pub limits: BTreeMap<LimitType, LimitQuota>,
    #[serde(default)]
    pub compliance: BTreeMap<ComplianceType, ComplianceSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TenantConfiguration {
    /// A configuration with every optional section empty.
    pub fn new(id: TenantId, name: impl Into<String>, status: TenantStatus) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            metadata: TenantMetadata::default(),
            branding: Branding::default(),
            security: SecurityPolicy::default(),
            features: FeatureSet::default(),
            limits: BTreeMap::new(),
            compliance: BTreeMap::new(),
            created_at: None,
            updated_at: None,
        }
    }
}
