//! Response header names and the ordered header set produced by the pipeline.

use std::collections::BTreeMap;

pub const TENANT_ID: &str = "X-Tenant-ID";
pub const TENANT_NAME: &str = "X-Tenant-Name";
pub const TENANT_PLAN: &str = "X-Tenant-Plan";
pub const TENANT_TIER: &str = "X-Tenant-Tier";

pub const PRIMARY_COLOR: &str = "X-Tenant-Primary-Color";
pub const SECONDARY_COLOR: &str = "X-Tenant-Secondary-Color";
pub const ACCENT_COLOR: &str = "X-Tenant-Accent-Color";
pub const FONT_FAMILY: &str = "X-Tenant-Font-Family";
pub const LOGO: &str = "X-Tenant-Logo";
pub const FAVICON: &str = "X-Tenant-Favicon";
pub const STYLESHEET: &str = "X-Tenant-Stylesheet";
pub const CUSTOM_CSS: &str = "X-Tenant-Custom-CSS";
pub const CUSTOM_JS: &str = "X-Tenant-Custom-JS";

pub const RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
pub const RATE_LIMIT_WINDOW: &str = "X-RateLimit-Window";
pub const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
pub const MAX_AGE: &str = "Access-Control-Max-Age";
pub const VARY: &str = "Vary";

/// Case-insensitive, deterministically ordered set of response headers.
///
/// Names are stored lower-cased; inserting the same name twice replaces the
/// value, so applying a set twice is the same as applying it once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: BTreeMap<String, String>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Insert only if `name` is not already present.
    pub fn insert_if_absent(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| value.into());
    }

    /// Insert `value` when it is present and non-empty.
    pub fn insert_opt(&mut self, name: &str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.insert(name, v);
        }
    }

    /// Merge `other` into `self`; entries already present win.
    pub fn extend_missing(&mut self, other: HeaderSet) {
        for (name, value) in other.entries {
            self.entries.entry(name).or_insert(value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let mut set = HeaderSet::new();
        set.insert(TENANT_ID, "acme");
        set.insert("x-tenant-id", "globex");
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("X-TENANT-ID"), Some("globex"));
    }

    #[test]
    fn insert_if_absent_keeps_first_value() {
        let mut set = HeaderSet::new();
        set.insert(TENANT_ID, "acme");
        set.insert_if_absent("X-Tenant-Id", "spoofed");
        assert_eq!(set.get(TENANT_ID), Some("acme"));
    }

    #[test]
    fn empty_optional_values_are_skipped() {
        let mut set = HeaderSet::new();
        set.insert_opt(TENANT_PLAN, Some(""));
        set.insert_opt(TENANT_TIER, None);
        assert!(set.is_empty());
    }
}
