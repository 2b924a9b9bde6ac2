//! Group Endpoints
//!
//! Groups, memberships and the public group directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiResult, RestApi};
use crate::models::{DbServer, Group, GroupFields, Membership, PublicGroup, Tracked};

#[async_trait(?Send)]
pub trait GroupsApi {
    async fn list_groups(&self) -> ApiResult<GroupListing>;
    async fn list_public_groups(&self, offset: u32, limit: u32) -> ApiResult<Vec<PublicGroup>>;
    async fn create_group(&self, fields: &GroupFields) -> ApiResult<SavedGroup>;
    async fn update_group(&self, id: &str, fields: &GroupFields) -> ApiResult<SavedGroup>;
    async fn delete_group(&self, id: &str) -> ApiResult<()>;
    async fn add_member(&self, group_id: &str, user_id: &str) -> ApiResult<Membership>;
    async fn set_member_admin(&self, group_id: &str, user_id: &str, is_admin: bool) -> ApiResult<Membership>;
    async fn remove_member(&self, group_id: &str, user_id: &str) -> ApiResult<()>;
}

/// Groups of the signed-in user with the servers they reference
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupListing {
    pub groups: Vec<Group>,
    pub servers: Vec<DbServer>,
}

/// One group as returned by create or update, with its servers
#[derive(Debug, Clone, PartialEq)]
pub struct SavedGroup {
    pub group: Group,
    pub servers: Vec<DbServer>,
}

// ========================
// Wire Shapes
// ========================

#[derive(Deserialize)]
pub(crate) struct GroupPayload {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_private: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    members: Vec<MembershipPayload>,
    #[serde(default)]
    db_servers: Vec<DbServer>,
}

#[derive(Deserialize)]
pub(crate) struct MembershipPayload {
    group_id: String,
    user_id: String,
    #[serde(default)]
    user_email: String,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    is_outdated: bool,
}

#[derive(Deserialize)]
pub(crate) struct PublicGroupPayload {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    member_count: u32,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct UpdateGroupArgs<'a> {
    data: &'a GroupFields,
}

#[derive(Serialize)]
struct AddMemberArgs<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
struct MemberAdminArgs {
    is_admin: bool,
}

impl From<MembershipPayload> for Membership {
    fn from(p: MembershipPayload) -> Self {
        Membership {
            group_id: p.group_id,
            user_id: p.user_id,
            user_email: p.user_email,
            is_admin: p.is_admin,
            is_outdated: p.is_outdated,
        }
    }
}

impl GroupPayload {
    /// Split into the group and the servers it embeds
    pub(crate) fn into_parts(self) -> (Group, Vec<DbServer>) {
        let fields = GroupFields {
            name: self.name,
            description: self.description.unwrap_or_default(),
            is_private: self.is_private,
        };
        let server_ids = self.db_servers.iter().map(|s| s.id.clone()).collect();
        let group = Group {
            tracked: Tracked::persisted(self.id, fields),
            memberships: self.members.into_iter().map(Membership::from).collect(),
            server_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (group, self.db_servers)
    }
}

impl From<GroupPayload> for SavedGroup {
    fn from(payload: GroupPayload) -> Self {
        let (group, servers) = payload.into_parts();
        SavedGroup { group, servers }
    }
}

impl From<PublicGroupPayload> for PublicGroup {
    fn from(p: PublicGroupPayload) -> Self {
        PublicGroup {
            id: p.id,
            name: p.name,
            description: p.description.unwrap_or_default(),
            member_count: p.member_count,
            created_at: p.created_at,
        }
    }
}

pub(crate) fn listing(payloads: Vec<GroupPayload>) -> GroupListing {
    let mut out = GroupListing::default();
    for payload in payloads {
        let (group, servers) = payload.into_parts();
        out.groups.push(group);
        out.servers.extend(servers);
    }
    out
}

// ========================
// Endpoints
// ========================

#[async_trait(?Send)]
impl GroupsApi for RestApi {
    async fn list_groups(&self) -> ApiResult<GroupListing> {
        let payloads: Vec<GroupPayload> = self.fetch(self.request(Method::GET, self.url(&["groups"]))).await?;
        Ok(listing(payloads))
    }

    async fn list_public_groups(&self, offset: u32, limit: u32) -> ApiResult<Vec<PublicGroup>> {
        let url = format!("{}?offset={}&limit={}", self.url(&["public_groups"]), offset, limit);
        let payloads: Vec<PublicGroupPayload> = self.fetch(self.request(Method::GET, url)).await?;
        Ok(payloads.into_iter().map(PublicGroup::from).collect())
    }

    async fn create_group(&self, fields: &GroupFields) -> ApiResult<SavedGroup> {
        let builder = self.request(Method::POST, self.url(&["groups"])).json(fields);
        let payload: GroupPayload = self.fetch(builder).await?;
        Ok(payload.into())
    }

    async fn update_group(&self, id: &str, fields: &GroupFields) -> ApiResult<SavedGroup> {
        let builder = self
            .request(Method::PATCH, self.url(&["groups", id]))
            .json(&UpdateGroupArgs { data: fields });
        let payload: GroupPayload = self.fetch(builder).await?;
        Ok(payload.into())
    }

    async fn delete_group(&self, id: &str) -> ApiResult<()> {
        self.execute(self.request(Method::DELETE, self.url(&["groups", id]))).await
    }

    async fn add_member(&self, group_id: &str, user_id: &str) -> ApiResult<Membership> {
        let builder = self
            .request(Method::POST, self.url(&["groups", group_id, "members"]))
            .json(&AddMemberArgs { user_id });
        let payload: MembershipPayload = self.fetch(builder).await?;
        Ok(payload.into())
    }

    async fn set_member_admin(&self, group_id: &str, user_id: &str, is_admin: bool) -> ApiResult<Membership> {
        let builder = self
            .request(Method::PATCH, self.url(&["groups", group_id, "members", user_id]))
            .json(&MemberAdminArgs { is_admin });
        let payload: MembershipPayload = self.fetch(builder).await?;
        Ok(payload.into())
    }

    async fn remove_member(&self, group_id: &str, user_id: &str) -> ApiResult<()> {
        self.execute(self.request(Method::DELETE, self.url(&["groups", group_id, "members", user_id])))
            .await
    }
}
