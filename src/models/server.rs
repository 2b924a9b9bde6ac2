//! Database server model

use serde::{Deserialize, Serialize};

use super::{Entity, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Psql,
    Mysql,
}

impl DbType {
    pub fn label(&self) -> &'static str {
        match self {
            DbType::Psql => "PostgreSQL",
            DbType::Mysql => "MySQL",
        }
    }
}

/// Database server connection shared with a group (read-only here)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbServer {
    pub id: String,
    pub name: String,
    pub db_type: DbType,
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

impl Entity for DbServer {
    fn key(&self) -> Key {
        Key::server(self.id.clone())
    }

    fn label(&self) -> &str {
        &self.name
    }
}
