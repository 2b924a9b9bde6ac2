//! Group Editor Column
//!
//! Edits the selected group. Changes stay local until "Save"; "Restore"
//! brings back the last saved values.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::RestApi;
use crate::components::link_preview::first_url;
use crate::components::{DeleteConfirmButton, LinkPreview, MemberList, RequestBadge};
use crate::config::REQUEST_STATE_RESET_MS;
use crate::models::Entity;
use crate::store::{groups, reset_after, AppStateStoreFields, AppStore, GroupRef, RequestState};

/// Editor for whichever group is selected
#[component]
pub fn GroupEditor(store: AppStore, api: RestApi) -> impl IntoView {
    let selected = Memo::new(move |_| store.groups().with(|g| g.selected().map(|group| group.key())));

    view! {
        <section class="group-editor">
            {move || match selected.get() {
                Some(key) => view! {
                    <GroupForm store=store api=api.clone() group=GroupRef::new(store, key) />
                }.into_any(),
                None => view! { <p class="empty-hint">"No group selected."</p> }.into_any(),
            }}
        </section>
    }
}

#[component]
fn GroupForm(store: AppStore, api: RestApi, group: GroupRef) -> impl IntoView {
    let fields = Memo::new({
        let group = group.clone();
        move |_| group.get().map(|g| g.fields().clone()).unwrap_or_default()
    });
    let is_dirty = Memo::new({
        let group = group.clone();
        move |_| group.is_dirty()
    });
    let request = Signal::derive(move || store.groups().with(|g| g.request));
    let servers = Memo::new({
        let group = group.clone();
        move |_| {
            let Some(current) = group.get() else {
                return Vec::new();
            };
            store.servers().with(|s| {
                s.for_group(&current)
                    .into_iter()
                    .map(|srv| format!("{} ({}, {}:{})", srv.name, srv.db_type.label(), srv.host, srv.port))
                    .collect::<Vec<_>>()
            })
        }
    });
    let preview_url = Memo::new(move |_| first_url(&fields.get().description));
    let persisted = group.is_persisted();

    let on_save = {
        let group = group.clone();
        let api = api.clone();
        move |_| {
            let group = group.clone();
            let api = api.clone();
            spawn_local(async move {
                group.save(&api).await;
                if store.groups().with_untracked(|g| g.request) == RequestState::Success {
                    reset_after(REQUEST_STATE_RESET_MS, move || {
                        store.groups().update(|g| {
                            if g.request == RequestState::Success {
                                g.request = RequestState::Idle;
                            }
                        });
                    })
                    .await;
                }
            });
        }
    };

    let on_delete = {
        let group = group.clone();
        let api = api.clone();
        Callback::new(move |_| {
            let group = group.clone();
            let api = api.clone();
            spawn_local(async move { group.destroy(&api).await });
        })
    };

    let on_restore = {
        let group = group.clone();
        move |_| group.restore()
    };
    let on_discard = {
        let key = group.key().clone();
        move |_| groups::discard_draft(store, &key)
    };
    let on_name = {
        let group = group.clone();
        move |ev: web_sys::Event| {
            let value = event_target_value(&ev);
            group.edit(|f| f.name = value);
        }
    };
    let on_description = {
        let group = group.clone();
        move |ev: web_sys::Event| {
            let value = event_target_value(&ev);
            group.edit(|f| f.description = value);
        }
    };
    let on_private = {
        let group = group.clone();
        move |_| group.toggle_private()
    };

    let preview_api = api.clone();
    let member_api = api.clone();
    let member_group = group.clone();

    view! {
        <div class="group-form">
            <label>
                "Name"
                <input type="text" prop:value=move || fields.get().name on:input=on_name />
            </label>
            <label>
                "Description"
                <textarea prop:value=move || fields.get().description on:input=on_description></textarea>
            </label>
            <label class="checkbox">
                <input type="checkbox" prop:checked=move || fields.get().is_private on:change=on_private />
                "Private group"
            </label>

            <div class="form-actions">
                <button
                    class="save-btn"
                    disabled=move || !is_dirty.get() || request.get().is_pending()
                    on:click=on_save
                >
                    {if persisted { "Save" } else { "Create" }}
                </button>
                <button disabled=move || !is_dirty.get() on:click=on_restore>
                    "Restore"
                </button>
                {if persisted {
                    view! {
                        <DeleteConfirmButton
                            label="Delete group"
                            disabled=Signal::derive(move || request.get().is_pending())
                            on_confirm=on_delete
                        />
                    }.into_any()
                } else {
                    view! { <button on:click=on_discard>"Discard"</button> }.into_any()
                }}
                <RequestBadge state=request />
            </div>

            {move || preview_url.get().map(|url| view! { <LinkPreview api=preview_api.clone() url=url /> })}

            <h3>"Servers"</h3>
            <ul class="server-list">
                {move || servers.get().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
            </ul>

            {persisted.then(|| view! { <MemberList store=store api=member_api group=member_group /> })}
        </div>
    }
}
