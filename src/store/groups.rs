//! Groups Store
//!
//! Groups of the signed-in user, their memberships, and the create /
//! save / delete flows. Fields are edited locally and compared against
//! the last server snapshot; nothing is sent until `save`.

use std::ops::{Deref, DerefMut};

use leptos::prelude::*;

use super::{current_user_id, AppStateStoreFields, AppStore, Collection, RequestState};
use crate::api::{GroupsApi, SavedGroup};
use crate::models::{Entity, Group, GroupFields, Key};

#[derive(Debug, Clone, Default)]
pub struct GroupsState {
    collection: Collection<Group>,
    next_draft: u32,
}

impl Deref for GroupsState {
    type Target = Collection<Group>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

impl DerefMut for GroupsState {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.collection
    }
}

impl GroupsState {
    /// Add an unsaved group with `defaults` and select it
    ///
    /// Clears the name filter so the empty draft is visible.
    pub fn new_draft(&mut self, defaults: GroupFields) -> Key {
        self.collection.filter.clear();
        self.next_draft += 1;
        let draft = Group::draft(self.next_draft, defaults);
        let key = draft.key();
        self.collection.insert(draft);
        self.collection.select(Some(key.clone()));
        key
    }

    /// Drop an unsaved group; persisted groups are left alone
    pub fn discard_draft(&mut self, key: &Key) -> bool {
        if key.is_persisted() {
            return false;
        }
        self.collection.remove(key).is_some()
    }

    /// Default view: name filter applied, ordered by name
    pub fn visible(&self) -> Vec<&Group> {
        self.collection.filtered()
    }

    /// Selected group, falling back to the first of `visible()`
    pub fn selected(&self) -> Option<&Group> {
        self.collection.selected_in(&self.visible())
    }

    pub fn joined(&self, user_id: &str) -> Vec<&Group> {
        self.visible().into_iter().filter(|g| g.is_member(user_id)).collect()
    }

    pub fn administered(&self, user_id: &str) -> Vec<&Group> {
        self.visible().into_iter().filter(|g| g.is_admin(user_id)).collect()
    }

    pub fn outdated(&self, user_id: &str) -> Vec<&Group> {
        self.visible().into_iter().filter(|g| g.is_outdated(user_id)).collect()
    }

    pub fn dirty_count(&self) -> usize {
        self.collection.items().iter().filter(|g| g.is_dirty()).count()
    }
}

fn set_request(store: AppStore, state: RequestState) {
    store.groups().update(|g| g.request = state);
}

// ========================
// Local edits
// ========================

pub fn select(store: AppStore, key: Option<Key>) {
    store.groups().update(|g| g.select(key));
}

pub fn set_filter(store: AppStore, filter: String) {
    store.groups().update(|g| g.filter = filter);
}

pub fn new_draft(store: AppStore) -> Option<Key> {
    store.groups().try_update(|g| g.new_draft(GroupFields::default()))
}

pub fn discard_draft(store: AppStore, key: &Key) {
    store.groups().update(|g| {
        g.discard_draft(key);
    });
}

pub fn edit(store: AppStore, key: &Key, f: impl FnOnce(&mut GroupFields)) {
    store.groups().update(|g| {
        if let Some(group) = g.get_mut(key) {
            f(group.fields_mut());
        }
    });
}

pub fn restore(store: AppStore, key: &Key) {
    store.groups().update(|g| {
        if let Some(group) = g.get_mut(key) {
            group.restore();
        }
    });
}

pub fn toggle_private(store: AppStore, key: &Key) {
    store.groups().update(|g| {
        if let Some(group) = g.get_mut(key) {
            group.toggle_private();
        }
    });
}

// ========================
// Network operations
// ========================

/// Fetch all groups, clearing the selection
pub async fn load<A: GroupsApi + ?Sized>(store: AppStore, api: &A) {
    fetch_all(store, api, false).await;
}

/// Fetch all groups, keeping a selection that still exists
pub async fn refresh<A: GroupsApi + ?Sized>(store: AppStore, api: &A) {
    fetch_all(store, api, true).await;
}

async fn fetch_all<A: GroupsApi + ?Sized>(store: AppStore, api: &A, keep_selection: bool) {
    set_request(store, RequestState::Requested);
    match api.list_groups().await {
        Ok(listing) => {
            log::debug!("[GROUPS] loaded {} groups, {} servers", listing.groups.len(), listing.servers.len());
            store.servers().update(|s| s.merge(listing.servers));
            store.groups().update(|g| {
                if !keep_selection {
                    g.select(None);
                }
                g.replace_all(listing.groups);
                g.request = RequestState::Success;
            });
        }
        Err(e) => {
            log::warn!("[GROUPS] load failed: {}", e);
            set_request(store, RequestState::failed(&e));
        }
    }
}

/// Create a group on the server and select it
pub async fn create<A: GroupsApi + ?Sized>(store: AppStore, api: &A, fields: GroupFields) -> Option<Key> {
    set_request(store, RequestState::Requested);
    match api.create_group(&fields).await {
        Ok(SavedGroup { group, servers }) => {
            let key = group.key();
            log::info!("[GROUPS] created {}", key);
            store.servers().update(|s| s.merge(servers));
            store.groups().update(|g| {
                g.insert(group);
                g.select(Some(key.clone()));
                g.request = RequestState::Success;
            });
            Some(key)
        }
        Err(e) => {
            log::warn!("[GROUPS] create failed: {}", e);
            set_request(store, RequestState::failed(&e));
            None
        }
    }
}

/// Persist local edits of one group
///
/// Drafts go through the create endpoint, dirty persisted groups through
/// update. Clean groups are skipped without touching the request state.
pub async fn save<A: GroupsApi + ?Sized>(store: AppStore, api: &A, key: &Key) {
    let pending = store.groups().with_untracked(|g| {
        g.get(key).filter(|group| group.is_dirty()).map(|group| group.fields().clone())
    });
    let Some(fields) = pending else {
        return;
    };

    set_request(store, RequestState::Requested);
    let result = match key.server_id() {
        Some(id) => api.update_group(id, &fields).await,
        None => api.create_group(&fields).await,
    };
    match result {
        Ok(SavedGroup { group, servers }) => {
            let applied = store
                .groups()
                .try_update(|g| {
                    g.request = RequestState::Success;
                    g.replace(key, group)
                })
                .unwrap_or(false);
            if applied {
                log::info!("[GROUPS] saved {}", key);
                store.servers().update(|s| s.merge(servers));
            } else {
                // deleted or left while the request was in flight
                log::debug!("[GROUPS] saved {} is gone locally, dropping response", key);
            }
        }
        Err(e) => {
            log::warn!("[GROUPS] save of {} failed: {}", key, e);
            set_request(store, RequestState::failed(&e));
        }
    }
}

/// Delete a persisted group
pub async fn destroy<A: GroupsApi + ?Sized>(store: AppStore, api: &A, key: &Key) {
    let Some(id) = key.server_id() else {
        log::warn!("[GROUPS] refusing to delete unsaved group {}", key);
        return;
    };
    set_request(store, RequestState::Requested);
    match api.delete_group(id).await {
        Ok(()) => {
            log::info!("[GROUPS] deleted {}", key);
            store.groups().update(|g| {
                g.remove(key);
                g.request = RequestState::Success;
            });
        }
        Err(e) => {
            log::warn!("[GROUPS] delete of {} failed: {}", key, e);
            set_request(store, RequestState::failed(&e));
        }
    }
}

pub async fn add_member<A: GroupsApi + ?Sized>(store: AppStore, api: &A, group_id: &str, user_id: &str) {
    set_request(store, RequestState::Requested);
    match api.add_member(group_id, user_id).await {
        Ok(membership) => store.groups().update(|g| {
            if let Some(group) = g.get_mut(&Key::server(group_id)) {
                group.put_membership(membership);
            }
            g.request = RequestState::Success;
        }),
        Err(e) => {
            log::warn!("[GROUPS] adding {} to {} failed: {}", user_id, group_id, e);
            set_request(store, RequestState::failed(&e));
        }
    }
}

pub async fn set_member_admin<A: GroupsApi + ?Sized>(
    store: AppStore,
    api: &A,
    group_id: &str,
    user_id: &str,
    is_admin: bool,
) {
    set_request(store, RequestState::Requested);
    match api.set_member_admin(group_id, user_id, is_admin).await {
        Ok(membership) => store.groups().update(|g| {
            if let Some(group) = g.get_mut(&Key::server(group_id)) {
                group.put_membership(membership);
            }
            g.request = RequestState::Success;
        }),
        Err(e) => {
            log::warn!("[GROUPS] admin change for {} in {} failed: {}", user_id, group_id, e);
            set_request(store, RequestState::failed(&e));
        }
    }
}

/// Remove a member; removing yourself leaves the group
pub async fn remove_member<A: GroupsApi + ?Sized>(store: AppStore, api: &A, group_id: &str, user_id: &str) {
    set_request(store, RequestState::Requested);
    match api.remove_member(group_id, user_id).await {
        Ok(()) => {
            let leaving = current_user_id(store).as_deref() == Some(user_id);
            let key = Key::server(group_id);
            store.groups().update(|g| {
                if leaving {
                    g.remove(&key);
                } else if let Some(group) = g.get_mut(&key) {
                    group.drop_membership(user_id);
                }
                g.request = RequestState::Success;
            });
        }
        Err(e) => {
            log::warn!("[GROUPS] removing {} from {} failed: {}", user_id, group_id, e);
            set_request(store, RequestState::failed(&e));
        }
    }
}

/// Handle on one group inside the store
///
/// Holds only the store handle and the key, so it can be copied into
/// event handlers freely.
#[derive(Clone)]
pub struct GroupRef {
    store: AppStore,
    key: Key,
}

impl GroupRef {
    pub fn new(store: AppStore, key: Key) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Tracked read of the current value
    pub fn get(&self) -> Option<Group> {
        self.store.groups().with(|g| g.get(&self.key).cloned())
    }

    pub fn is_dirty(&self) -> bool {
        self.store.groups().with(|g| g.get(&self.key).is_some_and(Group::is_dirty))
    }

    pub fn is_persisted(&self) -> bool {
        self.key.is_persisted()
    }

    pub fn edit(&self, f: impl FnOnce(&mut GroupFields)) {
        edit(self.store, &self.key, f);
    }

    pub fn restore(&self) {
        restore(self.store, &self.key);
    }

    pub fn toggle_private(&self) {
        toggle_private(self.store, &self.key);
    }

    pub async fn save<A: GroupsApi + ?Sized>(&self, api: &A) {
        save(self.store, api, &self.key).await;
    }

    pub async fn destroy<A: GroupsApi + ?Sized>(&self, api: &A) {
        destroy(self.store, api, &self.key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GroupListing;
    use crate::store::testing::{fake_group, fake_server, setup_store, signed_in, FakeApi};
    use tokio::sync::oneshot;

    fn names(store: AppStore) -> Vec<String> {
        store
            .groups()
            .with_untracked(|g| g.visible().iter().map(|g| g.fields().name.clone()).collect())
    }

    fn request(store: AppStore) -> RequestState {
        store.groups().with_untracked(|g| g.request)
    }

    fn listing(groups: Vec<Group>) -> GroupListing {
        GroupListing { groups, servers: vec![] }
    }

    async fn loaded(groups: Vec<Group>) -> (AppStore, FakeApi) {
        let store = setup_store();
        let api = FakeApi::default();
        api.push_listing(listing(groups));
        load(store, &api).await;
        api.clear_calls();
        (store, api)
    }

    #[tokio::test]
    async fn test_load_replaces_groups_and_merges_servers() {
        let store = setup_store();
        let api = FakeApi::default();
        let mut alpha = fake_group("g1", "Alpha");
        alpha.server_ids = vec!["s1".to_string()];
        api.push_listing(GroupListing {
            groups: vec![alpha, fake_group("g2", "beta")],
            servers: vec![fake_server("s1", "pg"), fake_server("s1", "pg-renamed"), fake_server("s2", "my")],
        });

        load(store, &api).await;

        assert_eq!(names(store), vec!["Alpha", "beta"]);
        assert_eq!(request(store), RequestState::Success);
        store.servers().with_untracked(|s| {
            assert_eq!(s.len(), 2);
            assert_eq!(s.get(&Key::server("s1")).map(|s| s.name.as_str()), Some("pg-renamed"));
        });
    }

    #[tokio::test]
    async fn test_filter_scenario() {
        let (store, _api) = loaded(vec![fake_group("g1", "Alpha"), fake_group("g2", "beta")]).await;

        set_filter(store, "a".to_string());
        assert_eq!(names(store), vec!["Alpha", "beta"]);

        set_filter(store, "A.".to_string());
        assert!(names(store).is_empty());
    }

    #[tokio::test]
    async fn test_new_draft_clears_filter_and_is_selected() {
        let (store, _api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        set_filter(store, "alp".to_string());

        let key = new_draft(store).expect("store alive");

        store.groups().with_untracked(|g| {
            assert!(g.filter.is_empty());
            assert_eq!(g.selected().map(|group| group.key()), Some(key.clone()));
            assert_eq!(g.visible().len(), 2);
        });
    }

    #[tokio::test]
    async fn test_load_failure_sets_error_and_keeps_items() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        api.fail_next();

        refresh(store, &api).await;

        assert_eq!(request(store), RequestState::Error);
        assert_eq!(names(store), vec!["Alpha"]);
    }

    #[tokio::test]
    async fn test_save_clean_group_is_noop() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        let key = Key::server("g1");

        save(store, &api, &key).await;

        assert!(api.calls().is_empty());
        assert_eq!(request(store), RequestState::Success);
    }

    #[tokio::test]
    async fn test_save_dirty_group_updates_with_fresh_snapshot() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha"), fake_group("g2", "beta")]).await;
        let group = GroupRef::new(store, Key::server("g2"));
        group.edit(|f| f.name = "Beta2".to_string());
        group.toggle_private();
        assert!(group.is_dirty());

        group.save(&api).await;

        assert_eq!(api.calls(), vec!["update_group g2"]);
        assert_eq!(request(store), RequestState::Success);
        assert!(!group.is_dirty());
        store.groups().with_untracked(|g| {
            assert_eq!(g.items()[1].fields().name, "Beta2");
            assert!(g.items()[1].fields().is_private);
        });
    }

    #[tokio::test]
    async fn test_save_failure_keeps_edits() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        let group = GroupRef::new(store, Key::server("g1"));
        group.edit(|f| f.description = "notes".to_string());
        api.fail_next();

        group.save(&api).await;

        assert_eq!(request(store), RequestState::Error);
        assert!(group.is_dirty());
        assert_eq!(group.get().map(|g| g.fields().description.clone()), Some("notes".to_string()));

        group.restore();
        assert!(!group.is_dirty());
    }

    #[tokio::test]
    async fn test_save_draft_goes_through_create() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        let key = new_draft(store).expect("store alive");
        assert!(!key.is_persisted());
        edit(store, &key, |f| f.name = "Gamma".to_string());

        save(store, &api, &key).await;

        assert_eq!(api.calls(), vec!["create_group Gamma"]);
        store.groups().with_untracked(|g| {
            assert!(g.get(&key).is_none());
            let selected = g.selected().expect("new group selected");
            assert!(selected.is_persisted());
            assert!(!selected.is_dirty());
            assert_eq!(selected.fields().name, "Gamma");
        });
    }

    #[tokio::test]
    async fn test_save_merges_embedded_servers() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        let key = new_draft(store).expect("store alive");
        edit(store, &key, |f| f.name = "Ops".to_string());
        api.embed_servers(vec![fake_server("s7", "warehouse")]);

        save(store, &api, &key).await;

        let saved = store.groups().with_untracked(|g| g.selected().cloned()).expect("saved group selected");
        assert_eq!(saved.server_ids, vec!["s7".to_string()]);
        store.servers().with_untracked(|s| {
            assert_eq!(s.get(&Key::server("s7")).map(|srv| srv.name.as_str()), Some("warehouse"));
            assert_eq!(s.for_group(&saved).len(), 1);
        });
    }

    #[tokio::test]
    async fn test_save_response_for_removed_group_is_dropped() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        let key = Key::server("g1");
        edit(store, &key, |f| f.name = "Alpha2".to_string());
        let (tx, rx) = oneshot::channel();
        api.push_pending_update(rx);

        let remove_then_respond = async {
            while !api.calls().contains(&"update_group g1".to_string()) {
                tokio::task::yield_now().await;
            }
            store.groups().update(|g| {
                g.remove(&key);
            });
            let _ = tx.send(());
        };
        tokio::join!(save(store, &api, &key), remove_then_respond);

        assert!(names(store).is_empty());
        assert!(store.groups().with_untracked(|g| g.get(&key).is_none()));
    }

    #[tokio::test]
    async fn test_restore_draft_stays_dirty() {
        let store = setup_store();
        let key = new_draft(store).expect("store alive");
        edit(store, &key, |f| f.name = "x".to_string());
        restore(store, &key);
        restore(store, &key);
        store.groups().with_untracked(|g| {
            let draft = g.get(&key).unwrap();
            assert_eq!(draft.fields(), &GroupFields::default());
            assert_eq!(draft.is_dirty(), !draft.is_persisted());
        });
    }

    #[tokio::test]
    async fn test_create_inserts_only_on_success() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        api.fail_next();
        let fields = GroupFields { name: "New".to_string(), ..Default::default() };

        assert!(create(store, &api, fields.clone()).await.is_none());
        assert_eq!(request(store), RequestState::Error);
        assert_eq!(names(store), vec!["Alpha"]);

        let key = create(store, &api, fields).await.expect("created");
        assert_eq!(request(store), RequestState::Success);
        assert_eq!(names(store), vec!["Alpha", "New"]);
        assert_eq!(store.groups().with_untracked(|g| g.selected_key().cloned()), Some(key));
    }

    #[tokio::test]
    async fn test_destroy_removes_one_and_falls_back_selection() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha"), fake_group("g2", "beta"), fake_group("g3", "gamma")])
            .await;
        select(store, Some(Key::server("g2")));

        destroy(store, &api, &Key::server("g2")).await;

        assert_eq!(api.calls(), vec!["delete_group g2"]);
        assert_eq!(names(store), vec!["Alpha", "gamma"]);
        store.groups().with_untracked(|g| {
            assert_eq!(g.selected_key(), None);
            assert_eq!(g.selected().map(|g| g.key()), Some(Key::server("g1")));
        });
    }

    #[tokio::test]
    async fn test_destroy_last_group_leaves_no_selection() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        destroy(store, &api, &Key::server("g1")).await;
        assert!(store.groups().with_untracked(|g| g.selected().is_none()));
    }

    #[tokio::test]
    async fn test_destroy_draft_is_rejected() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        let key = new_draft(store).expect("store alive");

        destroy(store, &api, &key).await;

        assert!(api.calls().is_empty());
        assert_eq!(request(store), RequestState::Success);
        assert!(store.groups().with_untracked(|g| g.contains(&key)));

        discard_draft(store, &key);
        assert!(!store.groups().with_untracked(|g| g.contains(&key)));
    }

    #[tokio::test]
    async fn test_concurrent_refresh_later_response_wins() {
        let store = setup_store();
        let api = FakeApi::default();
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        api.push_pending_listing(first_rx);
        api.push_pending_listing(second_rx);

        let respond = async {
            tokio::task::yield_now().await;
            let _ = second_tx.send(listing(vec![fake_group("g2", "second")]));
            while names(store) != vec!["second"] {
                tokio::task::yield_now().await;
            }
            let _ = first_tx.send(listing(vec![fake_group("g1", "first")]));
        };
        tokio::join!(refresh(store, &api), refresh(store, &api), respond);

        assert_eq!(names(store), vec!["first"]);
        assert_eq!(request(store), RequestState::Success);
    }

    #[tokio::test]
    async fn test_membership_views_and_admin_toggle() {
        let mut alpha = fake_group("g1", "Alpha");
        alpha.put_membership(FakeApi::membership("g1", "me", true));
        let mut beta = fake_group("g2", "beta");
        beta.put_membership(FakeApi::membership("g2", "me", false));
        let (store, api) = loaded(vec![alpha, beta, fake_group("g3", "gamma")]).await;

        store.groups().with_untracked(|g| {
            assert_eq!(g.joined("me").len(), 2);
            assert_eq!(g.administered("me").len(), 1);
            assert!(g.outdated("me").is_empty());
        });

        set_member_admin(store, &api, "g2", "me", true).await;
        assert_eq!(api.calls(), vec!["set_member_admin g2 me true"]);
        store.groups().with_untracked(|g| {
            assert_eq!(g.administered("me").len(), 2);
            assert_eq!(g.dirty_count(), 0);
        });
    }

    #[tokio::test]
    async fn test_member_changes_keep_local_edits() {
        let (store, api) = loaded(vec![fake_group("g1", "Alpha")]).await;
        edit(store, &Key::server("g1"), |f| f.name = "Renamed".to_string());

        add_member(store, &api, "g1", "u9").await;

        store.groups().with_untracked(|g| {
            let group = g.get(&Key::server("g1")).unwrap();
            assert!(group.is_member("u9"));
            assert!(group.is_dirty());
            assert_eq!(group.fields().name, "Renamed");
        });
    }

    #[tokio::test]
    async fn test_leaving_group_removes_it() {
        let mut alpha = fake_group("g1", "Alpha");
        alpha.put_membership(FakeApi::membership("g1", "me", false));
        alpha.put_membership(FakeApi::membership("g1", "other", true));
        let (store, api) = loaded(vec![alpha, fake_group("g2", "beta")]).await;
        signed_in(store, "me");

        remove_member(store, &api, "g1", "other").await;
        assert!(store.groups().with_untracked(|g| !g.get(&Key::server("g1")).unwrap().is_member("other")));

        remove_member(store, &api, "g1", "me").await;
        assert_eq!(names(store), vec!["beta"]);
    }
}
