//! Public Group Directory
//!
//! Paged listing of groups anyone can join.

use std::ops::{Deref, DerefMut};

use leptos::prelude::*;

use super::{current_user_id, groups, AppStateStoreFields, AppStore, Collection, RequestState};
use crate::api::GroupsApi;
use crate::config::PUBLIC_GROUPS_PAGE;
use crate::models::{Key, PublicGroup};

#[derive(Debug, Clone)]
pub struct PublicGroupsState {
    collection: Collection<PublicGroup>,
    pub limit: u32,
    /// Items received so far; offset of the next page
    pub offset: u32,
    /// The last page came back short
    pub exhausted: bool,
}

impl Default for PublicGroupsState {
    fn default() -> Self {
        Self {
            collection: Collection::default(),
            limit: PUBLIC_GROUPS_PAGE,
            offset: 0,
            exhausted: false,
        }
    }
}

impl Deref for PublicGroupsState {
    type Target = Collection<PublicGroup>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

impl DerefMut for PublicGroupsState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.collection
    }
}

impl PublicGroupsState {
    fn apply_page(&mut self, page: Vec<PublicGroup>, first: bool) {
        let received = page.len() as u32;
        self.exhausted = received < self.limit;
        if first {
            self.offset = received;
            self.collection.replace_all(page);
        } else {
            self.offset += received;
            self.collection.merge(page);
        }
    }
}

pub async fn load_first_page<A: GroupsApi + ?Sized>(store: AppStore, api: &A) {
    fetch_page(store, api, true).await;
}

pub async fn load_more<A: GroupsApi + ?Sized>(store: AppStore, api: &A) {
    if store.public_groups().with_untracked(|p| p.exhausted) {
        return;
    }
    fetch_page(store, api, false).await;
}

async fn fetch_page<A: GroupsApi + ?Sized>(store: AppStore, api: &A, first: bool) {
    let (offset, limit) = store.public_groups().with_untracked(|p| (if first { 0 } else { p.offset }, p.limit));
    store.public_groups().update(|p| p.request = RequestState::Requested);
    match api.list_public_groups(offset, limit).await {
        Ok(page) => store.public_groups().update(|p| {
            p.apply_page(page, first);
            p.request = RequestState::Success;
        }),
        Err(e) => {
            log::warn!("[PUBLIC] page at {} failed: {}", offset, e);
            store.public_groups().update(|p| p.request = RequestState::failed(&e));
        }
    }
}

/// Join a public group, then reload the user's own groups
pub async fn join<A: GroupsApi + ?Sized>(store: AppStore, api: &A, group_id: &str) {
    let Some(user_id) = current_user_id(store) else {
        log::warn!("[PUBLIC] join without a session");
        return;
    };
    store.public_groups().update(|p| p.request = RequestState::Requested);
    match api.add_member(group_id, &user_id).await {
        Ok(_) => {
            log::info!("[PUBLIC] joined {}", group_id);
            store.public_groups().update(|p| {
                p.remove(&Key::server(group_id));
                p.request = RequestState::Success;
            });
            groups::refresh(store, api).await;
        }
        Err(e) => {
            log::warn!("[PUBLIC] join {} failed: {}", group_id, e);
            store.public_groups().update(|p| p.request = RequestState::failed(&e));
        }
    }
}
