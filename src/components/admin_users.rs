//! Admin Users Page
//!
//! Account list for administrators with filter, sort and delete.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::RestApi;
use crate::components::{DeleteConfirmButton, RequestBadge};
use crate::models::{AdminUser, Entity};
use crate::store::{current_user_id, users, AppStateStoreFields, AppStore, UserSort};

const SORTS: &[(UserSort, &str, &str)] = &[
    (UserSort::Email, "email", "Email"),
    (UserSort::CreatedAt, "created", "Newest"),
    (UserSort::LoginCount, "logins", "Most logins"),
];

#[component]
pub fn AdminUsers(store: AppStore, api: RestApi) -> impl IntoView {
    let mount_api = api.clone();
    Effect::new(move |_| {
        let api = mount_api.clone();
        spawn_local(async move { users::load(store, &api).await });
    });

    let rows = Memo::new(move |_| {
        store
            .users()
            .with(|u| u.visible().into_iter().cloned().collect::<Vec<AdminUser>>())
    });
    let counts = Memo::new(move |_| store.users().with(|u| (u.len(), u.admin_count())));
    let filter = Memo::new(move |_| store.users().with(|u| u.filter.clone()));
    let sort = Memo::new(move |_| store.users().with(|u| u.sort));
    let request = Signal::derive(move || store.users().with(|u| u.request));

    let on_sort = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        if let Some((s, _, _)) = SORTS.iter().find(|(_, v, _)| *v == value) {
            users::set_sort(store, *s);
        }
    };

    view! {
        <section class="admin-users">
            <div class="admin-users-header">
                <input
                    type="search"
                    placeholder="Filter by email"
                    prop:value=move || filter.get()
                    on:input=move |ev| users::set_filter(store, event_target_value(&ev))
                />
                <select on:change=on_sort>
                    {SORTS.iter().map(|(s, value, label)| {
                        let s = *s;
                        view! { <option value=*value selected=move || sort.get() == s>{*label}</option> }
                    }).collect_view()}
                </select>
                <span class="user-count">
                    {move || { let (total, admins) = counts.get(); format!("{} accounts, {} admins", total, admins) }}
                </span>
                <RequestBadge state=request />
            </div>
            <table>
                <thead>
                    <tr><th>"Email"</th><th>"Role"</th><th>"Logins"</th><th>"Created"</th><th></th></tr>
                </thead>
                <tbody>
                    <For
                        each=move || rows.get()
                        key=|u| u.user.id.clone()
                        children=move |u| {
                            let key = u.key();
                            let is_me = current_user_id(store).as_deref() == Some(u.user.id.as_str());
                            let api = api.clone();
                            let on_delete = Callback::new(move |_| {
                                let api = api.clone();
                                let key = key.clone();
                                spawn_local(async move { users::destroy(store, &api, &key).await });
                            });
                            view! {
                                <tr>
                                    <td>{u.user.email.clone()}</td>
                                    <td>{if u.user.is_admin() { "admin" } else { "user" }}</td>
                                    <td>{u.user.login_count}</td>
                                    <td>{u.user.created_at.format("%Y-%m-%d").to_string()}</td>
                                    <td>
                                        {(!is_me).then(|| view! {
                                            <DeleteConfirmButton label="Delete" on_confirm=on_delete />
                                        })}
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </section>
    }
}
