//! Group List Component
//!
//! Left column: name filter, group rows and the "new group" button.

use leptos::prelude::*;

use crate::components::RequestBadge;
use crate::models::{Entity, Key};
use crate::store::{groups, AppStateStoreFields, AppStore};

#[derive(Clone, PartialEq)]
struct GroupRow {
    key: Key,
    name: String,
    is_dirty: bool,
    is_private: bool,
    is_admin: bool,
    is_outdated: bool,
}

#[component]
pub fn GroupList(store: AppStore) -> impl IntoView {
    let rows = Memo::new(move |_| {
        let me = store.session().with(|s| s.user.as_ref().map(|u| u.id.clone())).unwrap_or_default();
        store.groups().with(|g| {
            g.visible()
                .into_iter()
                .map(|group| GroupRow {
                    key: group.key(),
                    name: group.fields().name.clone(),
                    is_dirty: group.is_dirty(),
                    is_private: group.fields().is_private,
                    is_admin: group.is_admin(&me),
                    is_outdated: group.is_outdated(&me),
                })
                .collect::<Vec<_>>()
        })
    });
    let selected = Memo::new(move |_| store.groups().with(|g| g.selected().map(|group| group.key())));
    let filter = Memo::new(move |_| store.groups().with(|g| g.filter.clone()));
    let request = Signal::derive(move || store.groups().with(|g| g.request));
    let summary = Memo::new(move |_| {
        let me = store.session().with(|s| s.user.as_ref().map(|u| u.id.clone())).unwrap_or_default();
        store.groups().with(|g| (g.dirty_count(), g.outdated(&me).len()))
    });

    view! {
        <aside class="group-list">
            <div class="group-list-header">
                <input
                    type="search"
                    placeholder="Filter groups"
                    prop:value=move || filter.get()
                    on:input=move |ev| groups::set_filter(store, event_target_value(&ev))
                />
                <button
                    class="new-group-btn"
                    on:click=move |_| {
                        groups::new_draft(store);
                    }
                >
                    "+ New group"
                </button>
                <RequestBadge state=request />
            </div>
            <ul>
                <For
                    each=move || rows.get()
                    key=|row| (row.key.clone(), row.name.clone(), row.is_dirty, row.is_admin, row.is_outdated, row.is_private)
                    children=move |row| {
                        let key = row.key.clone();
                        let is_active = {
                            let key = key.clone();
                            move || selected.get().as_ref() == Some(&key)
                        };
                        let name = if row.name.is_empty() { "(unnamed)".to_string() } else { row.name.clone() };
                        view! {
                            <li
                                class=move || if is_active() { "group-row active" } else { "group-row" }
                                on:click=move |_| groups::select(store, Some(key.clone()))
                            >
                                <span class="group-name">{name}</span>
                                {row.is_private.then(|| view! { <span class="badge" title="private">"private"</span> })}
                                {row.is_admin.then(|| view! { <span class="badge">"admin"</span> })}
                                {row.is_outdated.then(|| view! { <span class="badge warn" title="Access needs to be renewed">"outdated"</span> })}
                                {row.is_dirty.then(|| view! { <span class="dirty-dot" title="unsaved changes">"*"</span> })}
                            </li>
                        }
                    }
                />
            </ul>
            <p class="group-summary">
                {move || {
                    let (unsaved, outdated) = summary.get();
                    let mut parts = Vec::new();
                    if unsaved > 0 {
                        parts.push(format!("{} unsaved", unsaved));
                    }
                    if outdated > 0 {
                        parts.push(format!("{} outdated", outdated));
                    }
                    parts.join(", ")
                }}
            </p>
        </aside>
    }
}
