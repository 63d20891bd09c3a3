use serde::{Deserialize, Serialize};

use crate::workflow::StaffRole;

/// Internal staff record for authentication — includes password hash.
#[derive(Debug, Clone)]
pub struct StaffUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub display_name: String,
    pub role: StaffRole,
}

/// Safe version for API responses — no password hash.
#[derive(Debug, Clone, Serialize)]
pub struct StaffUserDisplay {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub staff_role: StaffRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// New staff data for creation (hash already computed).
pub struct NewStaffUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub display_name: String,
    pub role: StaffRole,
}

/// JSON body for creating a staff account.
#[derive(Debug, Deserialize)]
pub struct StaffUserForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub display_name: String,
    pub staff_role: StaffRole,
}

/// JSON body for updating a staff account. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct StaffUserUpdateForm {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub staff_role: Option<StaffRole>,
    pub password: Option<String>,
}
