//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Each slice
//! mirrors one server collection; the async operations in the submodules
//! call the gateway and write the results back.

mod collection;
mod request;
mod servers;
pub mod groups;
pub mod public_groups;
pub mod users;
pub mod session;

#[cfg(test)]
mod testing;

use leptos::prelude::*;
use reactive_stores::Store;

pub use collection::Collection;
pub use request::{reset_after, RequestState};
pub use servers::ServersState;
pub use groups::{GroupRef, GroupsState};
pub use public_groups::PublicGroupsState;
pub use users::{UserSort, UsersState};
pub use session::SessionState;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Signed-in user
    pub session: SessionState,
    /// Groups the user is a member of
    pub groups: GroupsState,
    /// Servers referenced by `groups`, deduplicated by id
    pub servers: ServersState,
    /// Paged directory of joinable groups
    pub public_groups: PublicGroupsState,
    /// All accounts (admins only)
    pub users: UsersState,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

pub fn new_app_store() -> AppStore {
    Store::new(AppState::default())
}

/// Id of the signed-in user, read without tracking
pub fn current_user_id(store: AppStore) -> Option<String> {
    store.session().with_untracked(|s| s.user.as_ref().map(|u| u.id.clone()))
}

/// Drop every slice back to its initial state
pub fn clear_all(store: AppStore) {
    store.session().update(|s| *s = SessionState::default());
    store.groups().update(|g| *g = GroupsState::default());
    store.servers().update(|s| *s = ServersState::default());
    store.public_groups().update(|p| *p = PublicGroupsState::default());
    store.users().update(|u| *u = UsersState::default());
}
