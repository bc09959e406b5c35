use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SessionSummary, UserResponse};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
}

/// A user row as seen by administrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub is_locked: bool,
    pub is_deleted: bool,
    pub locked_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub total_users: u64,
    pub members: u64,
    pub trainers: u64,
    pub search_term: Option<String>,
    pub users: Vec<AdminUserResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerDetailsResponse {
    pub trainer: AdminUserResponse,
    pub sessions: Vec<SessionSummary>,
    /// Roles an admin may assign.
    pub available_roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    #[serde(default)]
    pub role: String,
}
