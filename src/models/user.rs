//! User models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub login_count: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Account as listed on the admin page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Entity for AdminUser {
    fn key(&self) -> Key {
        Key::server(self.user.id.clone())
    }

    fn label(&self) -> &str {
        &self.user.email
    }
}
