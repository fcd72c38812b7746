//! `campus-auth`: coarse-grained role based authorization.
//!
//! This crate is intentionally decoupled from HTTP, storage and tenancy: it
//! only knows which permissions each platform role carries.

pub mod capabilities;
pub mod permissions;
pub mod roles;

pub use capabilities::{
    can_manage_courses, can_manage_groups, can_manage_tenants, can_manage_users, can_invite_users,
    can_view_analytics, has_permission, has_permission_str, permissions_for,
};
pub use permissions::Permission;
pub use roles::{Role, UnknownRole};
