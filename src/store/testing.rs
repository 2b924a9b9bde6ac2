//! In-memory gateway for store tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use leptos::prelude::*;
use tokio::sync::oneshot;

use super::{new_app_store, AppStateStoreFields, AppStore};
use crate::api::{
    AdminApi, ApiError, ApiResult, CancelToken, Credentials, GroupListing, GroupsApi, MetaApi, SavedGroup, SessionApi,
    SignupArgs,
};
use crate::models::{
    AdminUser, DbServer, DbType, Group, GroupFields, Membership, OgMeta, PublicGroup, Role, Tracked, User,
};

thread_local! {
    // Dropping the owner disposes the store; each test thread keeps its own.
    static OWNER: RefCell<Option<Owner>> = const { RefCell::new(None) };
}

pub fn setup_store() -> AppStore {
    let owner = Owner::new();
    owner.set();
    OWNER.with(|slot| *slot.borrow_mut() = Some(owner));
    new_app_store()
}

pub fn user(id: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        role,
        login_count: 1,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn signed_in(store: AppStore, id: &str) {
    store.session().update(|s| s.user = Some(user(id, Role::User)));
}

pub fn fake_group(id: &str, name: &str) -> Group {
    Group {
        tracked: Tracked::persisted(id, GroupFields { name: name.to_string(), ..Default::default() }),
        memberships: vec![],
        server_ids: vec![],
        created_at: None,
        updated_at: None,
    }
}

pub fn fake_server(id: &str, name: &str) -> DbServer {
    DbServer {
        id: id.to_string(),
        name: name.to_string(),
        db_type: DbType::Psql,
        host: "localhost".to_string(),
        port: 5432,
        username: "postgres".to_string(),
        database_name: None,
        group_id: None,
    }
}

pub fn public_group(id: &str, name: &str) -> PublicGroup {
    PublicGroup {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        member_count: 3,
        created_at: None,
    }
}

pub fn admin_user(id: &str, email: &str, logins: u32, day: u32) -> AdminUser {
    AdminUser {
        user: User {
            id: id.to_string(),
            email: email.to_string(),
            role: Role::User,
            login_count: logins,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        },
        last_login_at: None,
    }
}

/// Records every call and answers from queued responses
#[derive(Default)]
pub struct FakeApi {
    calls: RefCell<Vec<String>>,
    listings: RefCell<VecDeque<GroupListing>>,
    pending_listings: RefCell<VecDeque<oneshot::Receiver<GroupListing>>>,
    pending_updates: RefCell<VecDeque<oneshot::Receiver<()>>>,
    saved_servers: RefCell<Vec<DbServer>>,
    session: RefCell<CancelToken>,
    public_pages: RefCell<VecDeque<Vec<PublicGroup>>>,
    users: RefCell<Vec<AdminUser>>,
    fail: Cell<bool>,
    created: Cell<u32>,
}

impl FakeApi {
    pub fn membership(group_id: &str, user_id: &str, is_admin: bool) -> Membership {
        Membership {
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            user_email: format!("{}@example.com", user_id),
            is_admin,
            is_outdated: false,
        }
    }

    pub fn push_listing(&self, listing: GroupListing) {
        self.listings.borrow_mut().push_back(listing);
    }

    pub fn push_pending_listing(&self, rx: oneshot::Receiver<GroupListing>) {
        self.pending_listings.borrow_mut().push_back(rx);
    }

    /// Hold the next `update_group` until `rx` fires
    pub fn push_pending_update(&self, rx: oneshot::Receiver<()>) {
        self.pending_updates.borrow_mut().push_back(rx);
    }

    /// Servers embedded in the next create/update response
    pub fn embed_servers(&self, servers: Vec<DbServer>) {
        *self.saved_servers.borrow_mut() = servers;
    }

    fn saved(&self, group: Group) -> SavedGroup {
        SavedGroup { group, servers: self.saved_servers.borrow_mut().drain(..).collect() }
    }

    pub fn push_public_page(&self, page: Vec<PublicGroup>) {
        self.public_pages.borrow_mut().push_back(page);
    }

    pub fn set_users(&self, users: Vec<AdminUser>) {
        *self.users.borrow_mut() = users;
    }

    /// Make the next call fail with a server error
    pub fn fail_next(&self) {
        self.fail.set(true);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.borrow_mut().push(call);
        if self.fail.replace(false) {
            Err(ApiError::Rejected { status: 500, message: "boom".to_string() })
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl GroupsApi for FakeApi {
    async fn list_groups(&self) -> ApiResult<GroupListing> {
        self.record("list_groups".to_string())?;
        let session = self.session.borrow().clone();
        let pending = self.pending_listings.borrow_mut().pop_front();
        if let Some(rx) = pending {
            let listing = rx.await.map_err(|_| ApiError::Cancelled)?;
            if session.is_cancelled() {
                return Err(ApiError::Cancelled);
            }
            return Ok(listing);
        }
        Ok(self.listings.borrow_mut().pop_front().unwrap_or_default())
    }

    async fn list_public_groups(&self, offset: u32, limit: u32) -> ApiResult<Vec<PublicGroup>> {
        self.record(format!("list_public_groups {} {}", offset, limit))?;
        Ok(self.public_pages.borrow_mut().pop_front().unwrap_or_default())
    }

    async fn create_group(&self, fields: &GroupFields) -> ApiResult<SavedGroup> {
        self.record(format!("create_group {}", fields.name))?;
        let n = self.created.get() + 1;
        self.created.set(n);
        let server_ids = self.saved_servers.borrow().iter().map(|s| s.id.clone()).collect();
        Ok(self.saved(Group {
            tracked: Tracked::persisted(format!("new-{}", n), fields.clone()),
            memberships: vec![],
            server_ids,
            created_at: None,
            updated_at: None,
        }))
    }

    async fn update_group(&self, id: &str, fields: &GroupFields) -> ApiResult<SavedGroup> {
        self.record(format!("update_group {}", id))?;
        let pending = self.pending_updates.borrow_mut().pop_front();
        if let Some(rx) = pending {
            rx.await.map_err(|_| ApiError::Cancelled)?;
        }
        let server_ids = self.saved_servers.borrow().iter().map(|s| s.id.clone()).collect();
        Ok(self.saved(Group {
            tracked: Tracked::persisted(id, fields.clone()),
            memberships: vec![],
            server_ids,
            created_at: None,
            updated_at: None,
        }))
    }

    async fn delete_group(&self, id: &str) -> ApiResult<()> {
        self.record(format!("delete_group {}", id))
    }

    async fn add_member(&self, group_id: &str, user_id: &str) -> ApiResult<Membership> {
        self.record(format!("add_member {} {}", group_id, user_id))?;
        Ok(Self::membership(group_id, user_id, false))
    }

    async fn set_member_admin(&self, group_id: &str, user_id: &str, is_admin: bool) -> ApiResult<Membership> {
        self.record(format!("set_member_admin {} {} {}", group_id, user_id, is_admin))?;
        Ok(Self::membership(group_id, user_id, is_admin))
    }

    async fn remove_member(&self, group_id: &str, user_id: &str) -> ApiResult<()> {
        self.record(format!("remove_member {} {}", group_id, user_id))
    }
}

#[async_trait(?Send)]
impl AdminApi for FakeApi {
    async fn list_users(&self) -> ApiResult<Vec<AdminUser>> {
        self.record("list_users".to_string())?;
        Ok(self.users.borrow().clone())
    }

    async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.record(format!("delete_user {}", id))
    }
}

#[async_trait(?Send)]
impl SessionApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<User> {
        self.record(format!("login {}", credentials.email))?;
        if credentials.password == "secret" {
            Ok(user("me", Role::Admin))
        } else {
            Err(ApiError::Unauthorized(401))
        }
    }

    async fn logout(&self) -> ApiResult<()> {
        self.record("logout".to_string())
    }

    async fn signup(&self, args: &SignupArgs) -> ApiResult<()> {
        self.record(format!("signup {}", args.email))
    }

    async fn request_new_password(&self, email: &str) -> ApiResult<()> {
        self.record(format!("new_password {}", email))
    }

    fn end_session(&self) {
        self.calls.borrow_mut().push("end_session".to_string());
        let old = self.session.replace(CancelToken::new());
        old.cancel();
    }
}

#[async_trait(?Send)]
impl MetaApi for FakeApi {
    async fn og_meta(&self, url: &str) -> ApiResult<OgMeta> {
        self.record(format!("og_meta {}", url))?;
        Ok(OgMeta::default())
    }
}
