//! Static role → permission capability table.
//!
//! Each role's grant list is the concatenation of its own tier and every tier
//! below it, so `SUPER_ADMIN ⊇ ADMIN ⊇ USER` holds by construction.

use crate::permissions::*;
use crate::{Permission, Role};

const USER_TIER: &[Permission] = &[PROFILE_READ, PROFILE_UPDATE, COURSES_READ, GROUPS_READ];

const ADMIN_TIER: &[Permission] = &[
    USERS_READ,
    USERS_INVITE,
    USERS_MANAGE,
    GROUPS_MANAGE,
    COURSES_MANAGE,
    ANALYTICS_VIEW,
    SETTINGS_MANAGE,
];

const SUPER_ADMIN_TIER: &[Permission] =
    &[TENANTS_READ, TENANTS_MANAGE, BILLING_MANAGE, SYSTEM_AUDIT];

fn tiers(role: Role) -> &'static [&'static [Permission]] {
    match role {
        Role::User => &[USER_TIER],
        Role::Admin => &[USER_TIER, ADMIN_TIER],
        Role::SuperAdmin => &[USER_TIER, ADMIN_TIER, SUPER_ADMIN_TIER],
    }
}

/// Ordered permission set granted to `role` (lowest tier first).
pub fn permissions_for(role: Role) -> impl Iterator<Item = &'static Permission> {
    tiers(role).iter().flat_map(|tier| tier.iter())
}

/// Whether `role` carries `permission`.
pub fn has_permission(role: Role, permission: &Permission) -> bool {
    permissions_for(role).any(|p| p == permission)
}

/// String-typed variant for callers holding unparsed input.
///
/// Unknown roles and unknown permissions both yield `false`.
pub fn has_permission_str(role: &str, permission: &str) -> bool {
    match role.parse::<Role>() {
        Ok(role) => permissions_for(role).any(|p| p.as_str() == permission),
        Err(_) => false,
    }
}

pub fn can_manage_tenants(role: Role) -> bool {
    has_permission(role, &TENANTS_MANAGE)
}

pub fn can_invite_users(role: Role) -> bool {
    has_permission(role, &USERS_INVITE)
}

pub fn can_manage_users(role: Role) -> bool {
    has_permission(role, &USERS_MANAGE)
}

pub fn can_manage_groups(role: Role) -> bool {
    has_permission(role, &GROUPS_MANAGE)
}

pub fn can_manage_courses(role: Role) -> bool {
    has_permission(role, &COURSES_MANAGE)
}

pub fn can_view_analytics(role: Role) -> bool {
    has_permission(role, &ANALYTICS_VIEW)
}
