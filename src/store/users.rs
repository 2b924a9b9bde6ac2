//! Admin Users Store

use std::ops::{Deref, DerefMut};

use leptos::prelude::*;

use super::collection::{by_label, TextFilter};
use super::{current_user_id, AppStateStoreFields, AppStore, Collection, RequestState};
use crate::api::AdminApi;
use crate::models::{AdminUser, Entity, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSort {
    #[default]
    Email,
    CreatedAt,
    LoginCount,
}

#[derive(Debug, Clone, Default)]
pub struct UsersState {
    collection: Collection<AdminUser>,
    pub sort: UserSort,
}

impl Deref for UsersState {
    type Target = Collection<AdminUser>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

impl DerefMut for UsersState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.collection
    }
}

impl UsersState {
    /// Accounts matching the email filter, in `sort` order
    ///
    /// Newest accounts and most logins come first.
    pub fn visible(&self) -> Vec<&AdminUser> {
        let filter = TextFilter::new(&self.collection.filter);
        let mut view: Vec<&AdminUser> = self.collection.items().iter().filter(|u| filter.matches(u.label())).collect();
        match self.sort {
            UserSort::Email => view.sort_by(by_label),
            UserSort::CreatedAt => view.sort_by(|a, b| b.user.created_at.cmp(&a.user.created_at).then_with(|| by_label(a, b))),
            UserSort::LoginCount => view.sort_by(|a, b| b.user.login_count.cmp(&a.user.login_count).then_with(|| by_label(a, b))),
        }
        view
    }

    pub fn admin_count(&self) -> usize {
        self.collection.items().iter().filter(|u| u.user.is_admin()).count()
    }
}

pub fn set_filter(store: AppStore, filter: String) {
    store.users().update(|u| u.filter = filter);
}

pub fn set_sort(store: AppStore, sort: UserSort) {
    store.users().update(|u| u.sort = sort);
}

pub async fn load<A: AdminApi + ?Sized>(store: AppStore, api: &A) {
    store.users().update(|u| u.request = RequestState::Requested);
    match api.list_users().await {
        Ok(users) => {
            log::debug!("[USERS] loaded {} accounts", users.len());
            store.users().update(|u| {
                u.replace_all(users);
                u.request = RequestState::Success;
            });
        }
        Err(e) => {
            log::warn!("[USERS] load failed: {}", e);
            store.users().update(|u| u.request = RequestState::failed(&e));
        }
    }
}

/// Delete an account; the signed-in admin cannot delete themselves
pub async fn destroy<A: AdminApi + ?Sized>(store: AppStore, api: &A, key: &Key) {
    let Some(id) = key.server_id() else {
        return;
    };
    if current_user_id(store).as_deref() == Some(id) {
        log::warn!("[USERS] refusing to delete the signed-in account");
        return;
    }
    store.users().update(|u| u.request = RequestState::Requested);
    match api.delete_user(id).await {
        Ok(()) => {
            log::info!("[USERS] deleted {}", key);
            store.users().update(|u| {
                u.remove(key);
                u.request = RequestState::Success;
            });
        }
        Err(e) => {
            log::warn!("[USERS] delete of {} failed: {}", key, e);
            store.users().update(|u| u.request = RequestState::failed(&e));
        }
    }
}
