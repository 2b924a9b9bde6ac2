//! Frontend Models
//!
//! Client-side shapes of backend entities.

mod entity;
mod tracked;
mod group;
mod server;
mod user;

pub use entity::{Entity, Key};
pub use tracked::Tracked;
pub use group::{Group, GroupFields, Membership, PublicGroup};
pub use server::{DbServer, DbType};
pub use user::{AdminUser, Role, User};

use serde::{Deserialize, Serialize};

/// Open Graph metadata of a linked page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OgMeta {
    pub image: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub site_name: Option<String>,
}

impl OgMeta {
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.title.is_none() && self.description.is_none() && self.site_name.is_none()
    }
}
