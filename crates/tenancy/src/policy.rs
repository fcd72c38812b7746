//! Domain restrictions, CORS shaping and rate-limit annotation.
//!
//! The allow/deny decision ([`PolicyEnforcer::evaluate`]) is kept apart from
//! header construction ([`PolicyEnforcer::response_headers`]) so each can be
//! tested on its own.

use campus_core::{CorsPolicy, DomainRestrictions, TenantConfiguration};

use crate::headers::{self, HeaderSet};
use crate::{InboundRequest, ResolvedContext, TenantError};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DenyReason {
    DomainNotAllowed,
    DomainBlocked,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::DomainNotAllowed => "domain_not_allowed",
            DenyReason::DomainBlocked => "domain_blocked",
        }
    }
}

impl From<DenyReason> for TenantError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::DomainNotAllowed => TenantError::DomainNotAllowed,
            DenyReason::DomainBlocked => TenantError::DomainBlocked,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny(DenyReason),
}

/// Stateless evaluator of a tenant's security policy against a request.
#[derive(Debug, Default, Copy, Clone)]
pub struct PolicyEnforcer;

impl PolicyEnforcer {
    pub fn new() -> Self {
        Self
    }

    /// Domain rules, first applicable rule wins:
    /// 1. a non-empty allow-list must contain a substring of the host;
    /// 2. otherwise a block-list hit denies.
    ///
    /// When the allow-list matches, the block-list is never consulted.
    pub fn evaluate(&self, context: &ResolvedContext, request: &InboundRequest) -> PolicyDecision {
        evaluate_domains(
            &context.configuration().security.domain_restrictions,
            request.host(),
        )
    }

    /// Headers attached to an allowed response: tenant identity, rate-limit
    /// annotation, CORS, and the tenant's own security headers. Headers the
    /// pipeline owns are never overridden by tenant-supplied ones.
    pub fn response_headers(&self, context: &ResolvedContext, request: &InboundRequest) -> HeaderSet {
        let config = context.configuration();
        let mut set = identity_headers(config);

        let rate = &config.security.rate_limiting;
        if rate.enabled {
            // Annotation only; counting is done by a separate limiter, if any.
            set.insert(headers::RATE_LIMIT_LIMIT, rate.max_requests.to_string());
            set.insert(headers::RATE_LIMIT_WINDOW, rate.window_ms.to_string());
        }

        if config.security.cors.enabled {
            cors_headers(&config.security.cors, request.origin(), &mut set);
        }

        for (name, value) in &config.security.security_headers {
            set.insert_if_absent(name, value.as_str());
        }

        set
    }

    /// Decision and headers together: `Err` on deny, headers on allow.
    pub fn enforce(
        &self,
        context: &ResolvedContext,
        request: &InboundRequest,
    ) -> Result<HeaderSet, TenantError> {
        match self.evaluate(context, request) {
            PolicyDecision::Allow => Ok(self.response_headers(context, request)),
            PolicyDecision::Deny(reason) => {
                tracing::info!(
                    tenant_id = %context.tenant_id(),
                    host = request.host(),
                    reason = reason.as_str(),
                    "request denied by domain policy"
                );
                Err(reason.into())
            }
        }
    }
}

fn evaluate_domains(rules: &DomainRestrictions, host: &str) -> PolicyDecision {
    if !rules.allowed_domains.is_empty() {
        return if rules.allowed_domains.iter().any(|d| host.contains(d.as_str())) {
            PolicyDecision::Allow
        } else {
            PolicyDecision::Deny(DenyReason::DomainNotAllowed)
        };
    }
    if rules.blocked_domains.iter().any(|d| host.contains(d.as_str())) {
        return PolicyDecision::Deny(DenyReason::DomainBlocked);
    }
    PolicyDecision::Allow
}

fn identity_headers(config: &TenantConfiguration) -> HeaderSet {
    let mut set = HeaderSet::new();
    set.insert(headers::TENANT_ID, config.id.as_str());
    set.insert_opt(headers::TENANT_NAME, Some(config.name.as_str()));
    set.insert_opt(headers::TENANT_PLAN, config.metadata.plan.as_deref());
    set.insert_opt(headers::TENANT_TIER, config.metadata.tier.as_deref());
    set
}

fn cors_headers(cors: &CorsPolicy, origin: Option<&str>, set: &mut HeaderSet) {
    let wildcard = cors.origins.iter().any(|o| o == "*");
    match origin {
        Some(origin) if wildcard || cors.origins.iter().any(|o| o == origin) => {
            set.insert(headers::ALLOW_ORIGIN, origin);
            set.insert(headers::VARY, "Origin");
        }
        None if wildcard => set.insert(headers::ALLOW_ORIGIN, "*"),
        // Callers the policy does not admit get no CORS grant at all.
        _ => return,
    }
    if !cors.methods.is_empty() {
        set.insert(headers::ALLOW_METHODS, cors.methods.join(", "));
    }
    if !cors.allowed_headers.is_empty() {
        set.insert(headers::ALLOW_HEADERS, cors.allowed_headers.join(", "));
    }
    if cors.credentials {
        set.insert(headers::ALLOW_CREDENTIALS, "true");
    }
    if cors.max_age > 0 {
        set.insert(headers::MAX_AGE, cors.max_age.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(security: serde_json::Value) -> ResolvedContext {
        let config: TenantConfiguration = serde_json::from_value(json!({
            "id": "acme",
            "name": "Acme University",
            "status": "active",
            "metadata": { "plan": "enterprise", "tier": "gold" },
            "security": security,
        }))
        .unwrap();
        ResolvedContext::new(config)
    }

    fn request(host: &str) -> InboundRequest {
        InboundRequest::new(host, "/courses")
    }

    #[test]
    fn empty_rules_allow_everything() {
        let ctx = context(json!({}));
        assert_eq!(PolicyEnforcer.evaluate(&ctx, &request("anything.test")), PolicyDecision::Allow);
    }

    #[test]
    fn allow_list_requires_a_substring_match() {
        let ctx = context(json!({ "domainRestrictions": { "allowedDomains": ["acme.example.com"] } }));
        assert_eq!(
            PolicyEnforcer.evaluate(&ctx, &request("acme.example.com:443")),
            PolicyDecision::Allow
        );
        assert_eq!(
            PolicyEnforcer.evaluate(&ctx, &request("evil.test")),
            PolicyDecision::Deny(DenyReason::DomainNotAllowed)
        );
    }

    #[test]
    fn block_list_denies_matching_hosts() {
        let ctx = context(json!({ "domainRestrictions": { "blockedDomains": ["blocked.example.com"] } }));
        assert_eq!(
            PolicyEnforcer.evaluate(&ctx, &request("blocked.example.com")),
            PolicyDecision::Deny(DenyReason::DomainBlocked)
        );
        assert_eq!(PolicyEnforcer.evaluate(&ctx, &request("acme.example.com")), PolicyDecision::Allow);
    }

    #[test]
    fn allow_list_match_skips_block_list() {
        let ctx = context(json!({
            "domainRestrictions": {
                "allowedDomains": ["example.com"],
                "blockedDomains": ["blocked.example.com"]
            }
        }));
        assert_eq!(
            PolicyEnforcer.evaluate(&ctx, &request("blocked.example.com")),
            PolicyDecision::Allow
        );
    }

    #[test]
    fn enforce_maps_denials_to_errors() {
        let ctx = context(json!({ "domainRestrictions": { "blockedDomains": ["bad"] } }));
        let err = PolicyEnforcer.enforce(&ctx, &request("bad.test")).unwrap_err();
        assert_eq!(err, TenantError::DomainBlocked);
    }

    #[test]
    fn identity_and_rate_limit_headers() {
        let ctx = context(json!({ "rateLimiting": { "enabled": true, "maxRequests": 100, "windowMs": 60000 } }));
        let set = PolicyEnforcer.response_headers(&ctx, &request("acme.test"));
        assert_eq!(set.get(headers::TENANT_ID), Some("acme"));
        assert_eq!(set.get(headers::TENANT_NAME), Some("Acme University"));
        assert_eq!(set.get(headers::TENANT_PLAN), Some("enterprise"));
        assert_eq!(set.get(headers::TENANT_TIER), Some("gold"));
        assert_eq!(set.get(headers::RATE_LIMIT_LIMIT), Some("100"));
        assert_eq!(set.get(headers::RATE_LIMIT_WINDOW), Some("60000"));
    }

    #[test]
    fn disabled_rate_limiting_adds_nothing() {
        let ctx = context(json!({ "rateLimiting": { "enabled": false, "maxRequests": 100 } }));
        let set = PolicyEnforcer.response_headers(&ctx, &request("acme.test"));
        assert!(!set.contains(headers::RATE_LIMIT_LIMIT));
    }

    #[test]
    fn cors_echoes_listed_origin() {
        let ctx = context(json!({
            "cors": {
                "enabled": true,
                "origins": ["https://app.acme.test"],
                "methods": ["GET", "POST"],
                "allowedHeaders": ["Content-Type", "Authorization"],
                "credentials": true,
                "maxAge": 600
            }
        }));
        let req = request("acme.test").with_header("Origin", "https://app.acme.test");
        let set = PolicyEnforcer.response_headers(&ctx, &req);
        assert_eq!(set.get(headers::ALLOW_ORIGIN), Some("https://app.acme.test"));
        assert_eq!(set.get(headers::ALLOW_METHODS), Some("GET, POST"));
        assert_eq!(set.get(headers::ALLOW_HEADERS), Some("Content-Type, Authorization"));
        assert_eq!(set.get(headers::ALLOW_CREDENTIALS), Some("true"));
        assert_eq!(set.get(headers::MAX_AGE), Some("600"));
        assert_eq!(set.get(headers::VARY), Some("Origin"));
    }

    #[test]
    fn cors_grants_nothing_to_unlisted_callers() {
        let ctx = context(json!({
            "cors": {
                "enabled": true,
                "origins": ["https://app.acme.test"],
                "methods": ["GET"],
                "allowedHeaders": ["Content-Type"],
                "credentials": true,
                "maxAge": 600
            }
        }));
        let req = request("acme.test").with_header("Origin", "https://evil.test");
        let set = PolicyEnforcer.response_headers(&ctx, &req);
        for name in [
            headers::ALLOW_ORIGIN,
            headers::ALLOW_METHODS,
            headers::ALLOW_HEADERS,
            headers::ALLOW_CREDENTIALS,
            headers::MAX_AGE,
            headers::VARY,
        ] {
            assert!(!set.contains(name), "{name} should not be sent");
        }
        assert_eq!(set.get(headers::TENANT_ID), Some("acme"));
    }

    #[test]
    fn cors_without_origin_and_without_wildcard_grants_nothing() {
        let ctx = context(json!({
            "cors": { "enabled": true, "origins": ["https://app.acme.test"], "credentials": true }
        }));
        let set = PolicyEnforcer.response_headers(&ctx, &request("acme.test"));
        assert!(!set.contains(headers::ALLOW_CREDENTIALS));
    }

    #[test]
    fn cors_wildcard_without_origin() {
        let ctx = context(json!({ "cors": { "enabled": true, "origins": ["*"] } }));
        let set = PolicyEnforcer.response_headers(&ctx, &request("acme.test"));
        assert_eq!(set.get(headers::ALLOW_ORIGIN), Some("*"));
    }

    #[test]
    fn tenant_security_headers_cannot_override_identity() {
        let ctx = context(json!({
            "securityHeaders": { "X-Frame-Options": "DENY", "X-Tenant-ID": "spoofed" }
        }));
        let set = PolicyEnforcer.response_headers(&ctx, &request("acme.test"));
        assert_eq!(set.get("x-frame-options"), Some("DENY"));
        assert_eq!(set.get(headers::TENANT_ID), Some("acme"));
    }
}
