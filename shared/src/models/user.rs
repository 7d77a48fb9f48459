//! User Model

use serde::{Deserialize, Serialize};

/// Account role, gates which navigation/actions a frontend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Customer,
}

/// Account status, enforced server-side only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    /// Wire string for the status update endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Status change payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusUpdate {
    pub status: UserStatus,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl User {
    /// Whether this account may use the admin area.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
