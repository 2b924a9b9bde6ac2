//! Member List Component
//!
//! Memberships of one group. Group admins can promote, demote, add and
//! remove members; everyone can leave.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::RestApi;
use crate::models::Membership;
use crate::store::{current_user_id, groups, AppStateStoreFields, AppStore, GroupRef};

#[component]
pub fn MemberList(store: AppStore, api: RestApi, group: GroupRef) -> impl IntoView {
    let group_id = group.key().to_string();
    let me = Memo::new(move |_| store.session().with(|s| s.user.as_ref().map(|u| u.id.clone())).unwrap_or_default());
    let members = Memo::new({
        let group = group.clone();
        move |_| {
            let mut list: Vec<Membership> = group.get().map(|g| g.memberships).unwrap_or_default();
            list.sort_by(|a, b| a.user_email.to_lowercase().cmp(&b.user_email.to_lowercase()));
            list
        }
    });
    let i_am_admin = Memo::new({
        let group = group.clone();
        move |_| group.get().is_some_and(|g| g.is_admin(&me.get()))
    });
    let (new_member, set_new_member) = signal(String::new());

    let on_add = {
        let api = api.clone();
        let group_id = group_id.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let user_id = new_member.get().trim().to_string();
            if user_id.is_empty() {
                return;
            }
            let api = api.clone();
            let group_id = group_id.clone();
            spawn_local(async move { groups::add_member(store, &api, &group_id, &user_id).await });
            set_new_member.set(String::new());
        }
    };

    view! {
        <h3>"Members"</h3>
        <ul class="member-list">
            <For
                each=move || members.get()
                key=|m| (m.user_id.clone(), m.is_admin, m.is_outdated)
                children=move |m| {
                    let is_me = current_user_id(store).as_deref() == Some(m.user_id.as_str());
                    let toggle_api = api.clone();
                    let remove_api = api.clone();
                    let toggle_ids = (group_id.clone(), m.user_id.clone());
                    let remove_ids = toggle_ids.clone();
                    let make_admin = !m.is_admin;
                    view! {
                        <li class="member-row">
                            <span class="member-email">{m.user_email.clone()}</span>
                            {m.is_admin.then(|| view! { <span class="badge">"admin"</span> })}
                            {m.is_outdated.then(|| view! { <span class="badge warn">"outdated"</span> })}
                            <Show when=move || i_am_admin.get() && !is_me>
                                <button on:click={
                                    let api = toggle_api.clone();
                                    let (gid, uid) = toggle_ids.clone();
                                    move |_| {
                                        let api = api.clone();
                                        let (gid, uid) = (gid.clone(), uid.clone());
                                        spawn_local(async move {
                                            groups::set_member_admin(store, &api, &gid, &uid, make_admin).await
                                        });
                                    }
                                }>
                                    {if make_admin { "Make admin" } else { "Revoke admin" }}
                                </button>
                            </Show>
                            <Show when=move || i_am_admin.get() || is_me>
                                <button on:click={
                                    let api = remove_api.clone();
                                    let (gid, uid) = remove_ids.clone();
                                    move |_| {
                                        let api = api.clone();
                                        let (gid, uid) = (gid.clone(), uid.clone());
                                        spawn_local(async move { groups::remove_member(store, &api, &gid, &uid).await });
                                    }
                                }>
                                    {if is_me { "Leave" } else { "Remove" }}
                                </button>
                            </Show>
                        </li>
                    }
                }
            />
        </ul>
        <Show when=move || i_am_admin.get()>
            <form class="add-member-form" on:submit=on_add.clone()>
                <input
                    type="text"
                    placeholder="User id"
                    prop:value=move || new_member.get()
                    on:input=move |ev| set_new_member.set(event_target_value(&ev))
                />
                <button type="submit">"Add member"</button>
            </form>
        </Show>
    }
}
