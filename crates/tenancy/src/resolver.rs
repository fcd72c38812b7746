//! Tenant key extraction from request metadata (no I/O).

use campus_core::TenantKey;

use crate::InboundRequest;

/// Host labels that never name a tenant.
pub const RESERVED_LABELS: [&str; 2] = ["www", "localhost"];

/// Extracts a [`TenantKey`] from an inbound request.
///
/// Resolution order:
/// 1. the override header, when present and well-formed;
/// 2. the override query parameter, when present and well-formed;
/// 3. the left-most label of the host, unless it is reserved or the host is an
///    IP literal.
///
/// Malformed overrides are ignored rather than rejected. Absence of a key is a
/// normal result, never an error.
#[derive(Debug, Clone)]
pub struct TenantIdentityResolver {
    header: String,
    query_param: String,
}

impl TenantIdentityResolver {
    pub fn new(header: impl Into<String>, query_param: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            query_param: query_param.into(),
        }
    }

    pub fn resolve(&self, request: &InboundRequest) -> Option<TenantKey> {
        if let Some(key) = request.header(&self.header).and_then(parse_override) {
            return Some(key);
        }
        if let Some(key) = request
            .query_param(&self.query_param)
            .and_then(|raw| parse_override(&raw))
        {
            return Some(key);
        }
        key_from_host(request.host())
    }
}

impl Default for TenantIdentityResolver {
    fn default() -> Self {
        Self::new("x-tenant-id", "tenant")
    }
}

fn parse_override(raw: &str) -> Option<TenantKey> {
    TenantKey::parse(raw.trim()).ok()
}

/// Left-most label of `host`, or `None` for reserved labels and IP literals.
pub fn key_from_host(host: &str) -> Option<TenantKey> {
    let host = strip_port(host.trim())?;
    if host.is_empty() || is_ipv4(host) {
        return None;
    }
    let label = host.split('.').next()?;
    if RESERVED_LABELS
        .iter()
        .any(|reserved| label.eq_ignore_ascii_case(reserved))
    {
        return None;
    }
    TenantKey::parse(label).ok()
}

fn strip_port(host: &str) -> Option<&str> {
    // Bracketed IPv6 literal, with or without port.
    if host.starts_with('[') {
        return None;
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => Some(name),
        // A bare IPv6 address without brackets.
        Some(_) => None,
        None => Some(host),
    }
}

fn is_ipv4(host: &str) -> bool {
    host.split('.')
        .all(|label| !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()))
}
