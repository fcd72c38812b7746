use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque `module.action` strings (e.g. "courses.read").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

pub const PROFILE_READ: Permission = Permission::from_static("profile.read");
pub const PROFILE_UPDATE: Permission = Permission::from_static("profile.update");
pub const COURSES_READ: Permission = Permission::from_static("courses.read");
pub const GROUPS_READ: Permission = Permission::from_static("groups.read");

pub const USERS_READ: Permission = Permission::from_static("users.read");
pub const USERS_INVITE: Permission = Permission::from_static("users.invite");
pub const USERS_MANAGE: Permission = Permission::from_static("users.manage");
pub const GROUPS_MANAGE: Permission = Permission::from_static("groups.manage");
pub const COURSES_MANAGE: Permission = Permission::from_static("courses.manage");
pub const ANALYTICS_VIEW: Permission = Permission::from_static("analytics.view");
pub const SETTINGS_MANAGE: Permission = Permission::from_static("settings.manage");

pub const TENANTS_READ: Permission = Permission::from_static("tenants.read");
pub const TENANTS_MANAGE: Permission = Permission::from_static("tenants.manage");
pub const BILLING_MANAGE: Permission = Permission::from_static("billing.manage");
pub const SYSTEM_AUDIT: Permission = Permission::from_static("system.audit");
