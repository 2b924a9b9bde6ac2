//! Group and Membership models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Key, Tracked};

/// Editable fields of a group
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupFields {
    pub name: String,
    pub description: String,
    pub is_private: bool,
}

/// Ties a user to a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub group_id: String,
    pub user_id: String,
    pub user_email: String,
    pub is_admin: bool,
    pub is_outdated: bool,
}

/// Client-side copy of a group
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub tracked: Tracked<GroupFields>,
    pub memberships: Vec<Membership>,
    /// Ids of the database servers shared in this group
    pub server_ids: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Group {
    /// Local group that was never saved
    pub fn draft(n: u32, defaults: GroupFields) -> Self {
        Self {
            tracked: Tracked::draft(n, defaults),
            memberships: Vec::new(),
            server_ids: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn fields(&self) -> &GroupFields {
        &self.tracked.current
    }

    pub fn fields_mut(&mut self) -> &mut GroupFields {
        &mut self.tracked.current
    }

    pub fn is_persisted(&self) -> bool {
        self.tracked.is_persisted()
    }

    pub fn is_dirty(&self) -> bool {
        self.tracked.is_dirty()
    }

    pub fn restore(&mut self) {
        self.tracked.restore();
    }

    pub fn toggle_private(&mut self) {
        let fields = self.fields_mut();
        fields.is_private = !fields.is_private;
    }

    pub fn membership(&self, user_id: &str) -> Option<&Membership> {
        self.memberships.iter().find(|m| m.user_id == user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.membership(user_id).is_some()
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.membership(user_id).is_some_and(|m| m.is_admin)
    }

    /// The viewing user's membership was flagged as outdated by the server
    pub fn is_outdated(&self, user_id: &str) -> bool {
        self.membership(user_id).is_some_and(|m| m.is_outdated)
    }

    pub fn admin_count(&self) -> usize {
        self.memberships.iter().filter(|m| m.is_admin).count()
    }

    /// Insert or replace a membership by user id
    pub fn put_membership(&mut self, membership: Membership) {
        match self.memberships.iter_mut().find(|m| m.user_id == membership.user_id) {
            Some(existing) => *existing = membership,
            None => self.memberships.push(membership),
        }
    }

    pub fn drop_membership(&mut self, user_id: &str) -> bool {
        let before = self.memberships.len();
        self.memberships.retain(|m| m.user_id != user_id);
        self.memberships.len() != before
    }
}

impl Entity for Group {
    fn key(&self) -> Key {
        self.tracked.key().clone()
    }

    fn label(&self) -> &str {
        &self.tracked.current.name
    }
}

/// Group listed by `GET /public_groups`, joinable by anyone
#[derive(Debug, Clone, PartialEq)]
pub struct PublicGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    pub member_count: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for PublicGroup {
    fn key(&self) -> Key {
        Key::server(self.id.clone())
    }

    fn label(&self) -> &str {
        &self.name
    }
}
