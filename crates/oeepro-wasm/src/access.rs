//! Role and permission lookups for route guards and menus.

use oeepro_core::role::{Permission, Role};
use wasm_bindgen::prelude::*;

use crate::js_error;

/// Permission names (snake_case) granted to `role`.
#[wasm_bindgen]
pub fn role_permissions(role: &str) -> Result<Vec<String>, JsValue> {
    let role: Role = role.parse().map_err(js_error)?;
    Ok(permission_names(role))
}

/// Whether `role` grants `permission` (snake_case name). Unknown
/// permissions are never granted.
#[wasm_bindgen]
pub fn role_can(role: &str, permission: &str) -> Result<bool, JsValue> {
    let role: Role = role.parse().map_err(js_error)?;
    Ok(permission_names(role).iter().any(|p| p == permission))
}

fn permission_names(role: Role) -> Vec<String> {
    role.permissions()
        .iter()
        .map(|p| permission_name(*p).to_string())
        .collect()
}

fn permission_name(permission: Permission) -> &'static str {
    match permission {
        Permission::DataEntry => "data_entry",
        Permission::ViewAnalytics => "view_analytics",
        Permission::ApproveUsers => "approve_users",
        Permission::EditMasterData => "edit_master_data",
        Permission::ViewSystemHealth => "view_system_health",
    }
}
