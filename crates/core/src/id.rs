//! Strongly-typed tenant identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Maximum length of a tenant key (one DNS label).
pub const MAX_TENANT_KEY_LEN: usize = 63;

/// Key identifying a tenant on an inbound request (subdomain or explicit override).
///
/// Case-sensitive. Always non-empty and at most one DNS label long, made of
/// ASCII alphanumerics, `-` or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantKey(String);

/// Identifier of a tenant record (multi-tenant boundary).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

macro_rules! impl_string_newtype {
    ($t:ident, $name:literal, $validate:path) => {
        impl $t {
            /// Parse and validate a raw value.
            pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
                let raw = raw.into();
                $validate(&raw).map_err(|reason| {
                    DomainError::invalid_id(format!("{}: {} ({:?})", $name, reason, raw))
                })?;
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

fn validate_key(raw: &str) -> Result<(), &'static str> {
    if raw.is_empty() {
        return Err("must not be empty");
    }
    if raw.len() > MAX_TENANT_KEY_LEN {
        return Err("longer than 63 characters");
    }
    if !raw
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err("only ASCII alphanumerics, '-' and '_' are allowed");
    }
    Ok(())
}

fn validate_id(raw: &str) -> Result<(), &'static str> {
    if raw.trim().is_empty() {
        return Err("must not be blank");
    }
    if raw.chars().any(char::is_control) {
        return Err("must not contain control characters");
    }
    Ok(())
}

impl_string_newtype!(TenantKey, "TenantKey", validate_key);
impl_string_newtype!(TenantId, "TenantId", validate_id);

impl TenantKey {
    /// Whether `raw` would parse as a key, without allocating.
    pub fn is_well_formed(raw: &str) -> bool {
        validate_key(raw).is_ok()
    }
}
