//! Validated names for feature, limit and compliance lookups.
//!
//! Tenant configuration indexes these sections by free-form strings. Routing
//! every lookup through a validated name means a typo such as `"reports..export"`
//! fails loudly at construction instead of silently reading as "disabled".
//!
//! The sets are open: any well-formed name is accepted. Well-known names are
//! exposed as constants.

use std::borrow::Cow;

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Dotted path into a tenant's feature map (e.g. `reports.export`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeaturePath(Cow<'static, str>);

/// Name of a tenant quota (e.g. `courses`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LimitType(Cow<'static, str>);

/// Compliance regime key (e.g. `ferpa`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplianceType(Cow<'static, str>);

fn validate_dotted(raw: &str) -> Result<(), String> {
    if raw.is_empty() {
        return Err("must not be empty".to_string());
    }
    for segment in raw.split('.') {
        if segment.is_empty() {
            return Err(format!("empty segment in {raw:?}"));
        }
        if !segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(format!("segment {segment:?} has characters outside [A-Za-z0-9_-]"));
        }
    }
    Ok(())
}

macro_rules! impl_name {
    ($t:ident, $name:literal) => {
        impl $t {
            pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
                let raw = raw.into();
                validate_dotted(&raw)
                    .map_err(|reason| DomainError::invalid_name(format!("{}: {}", $name, reason)))?;
                Ok(Self(Cow::Owned(raw)))
            }

            /// Build a name from a literal known to be well-formed.
            pub const fn from_static(raw: &'static str) -> Self {
                Self(Cow::Borrowed(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Dot-separated segments, outermost first.
            pub fn segments(&self) -> impl Iterator<Item = &str> {
                self.0.split('.')
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
                value.0.into_owned()
            }
        }
    };
}

impl_name!(FeaturePath, "FeaturePath");
impl_name!(LimitType, "LimitType");
impl_name!(ComplianceType, "ComplianceType");

impl LimitType {
    pub const USERS: LimitType = LimitType::from_static("users");
    pub const COURSES: LimitType = LimitType::from_static("courses");
    pub const STORAGE: LimitType = LimitType::from_static("storage");
}

impl ComplianceType {
    pub const GDPR: ComplianceType = ComplianceType::from_static("gdpr");
    pub const FERPA: ComplianceType = ComplianceType::from_static("ferpa");
    pub const COPPA: ComplianceType = ComplianceType::from_static("coppa");
    pub const HIPAA: ComplianceType = ComplianceType::from_static("hipaa");
    pub const SOC2: ComplianceType = ComplianceType::from_static("soc2");
}
