//! Role permissions
//!
//! A static table from role to the permissions it grants. The same table
//! backs the server checks and the client-side `has_permission`.

use crate::models::UserRole;

const ADMIN_PERMISSIONS: &[&str] = &[
    "view_routes",
    "view_alerts",
    "view_schedules",
    "manage_routes",
    "manage_alerts",
    "manage_schedules",
    "manage_users",
    "view_analytics",
    "send_messages",
];

const PARENT_PERMISSIONS: &[&str] = &[
    "view_routes",
    "view_alerts",
    "view_schedules",
    "track_children",
    "manage_carpool",
    "send_messages",
];

const CHILD_PERMISSIONS: &[&str] = &["view_routes", "view_alerts", "view_schedules", "send_messages"];

/// Permissions granted to a role
pub fn permissions_for(role: UserRole) -> &'static [&'static str] {
    match role {
        UserRole::Admin => ADMIN_PERMISSIONS,
        UserRole::Parent => PARENT_PERMISSIONS,
        UserRole::Child => CHILD_PERMISSIONS,
    }
}

/// Whether `role` grants `permission`. Unknown permissions are never granted.
pub fn has_permission(role: UserRole, permission: &str) -> bool {
    permissions_for(role).contains(&permission)
}
