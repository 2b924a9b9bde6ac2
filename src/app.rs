//! QueryDesk Frontend App
//!
//! Login gate, then a two-column groups view plus the public directory
//! and (for admins) the account list.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::RestApi;
use crate::components::{AdminUsers, GroupEditor, GroupList, LoginForm, PublicGroupList};
use crate::config::ApiConfig;
use crate::store::{new_app_store, session, AppStateStoreFields};

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Groups,
    Public,
    Admin,
}

#[component]
pub fn App() -> impl IntoView {
    let config = ApiConfig::from_env();
    log::info!("[APP] starting against {} ({:?})", config.base_url, config.mode);

    let store = new_app_store();
    let api = RestApi::new(&config);
    let (tab, set_tab) = signal(Tab::Groups);

    let logged_in = Memo::new(move |_| store.session().with(|s| s.is_logged_in()));
    let is_admin = Memo::new(move |_| store.session().with(|s| s.is_admin()));
    let email = Memo::new(move |_| store.session().with(|s| s.user.as_ref().map(|u| u.email.clone()).unwrap_or_default()));

    // Leave the admin tab when the role goes away (logout)
    Effect::new(move |_| {
        if !is_admin.get() && tab.get_untracked() == Tab::Admin {
            set_tab.set(Tab::Groups);
        }
    });

    let login_api = api.clone();
    let on_logout = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            spawn_local(async move { session::logout(store, &api).await });
        }
    };

    let tab_button = move |target: Tab, label: &'static str| {
        view! {
            <button
                class=move || if tab.get() == target { "tab active" } else { "tab" }
                on:click=move |_| set_tab.set(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <Show
            when=move || logged_in.get()
            fallback=move || view! { <LoginForm store=store api=login_api.clone() /> }
        >
            <header class="app-header">
                <nav>
                    {tab_button(Tab::Groups, "My groups")}
                    {tab_button(Tab::Public, "Public groups")}
                    <Show when=move || is_admin.get()>
                        {tab_button(Tab::Admin, "Users")}
                    </Show>
                </nav>
                <span class="user-email">{move || email.get()}</span>
                <button class="logout-btn" on:click=on_logout.clone()>"Sign out"</button>
            </header>
            {
                let api = api.clone();
                move || match tab.get() {
                    Tab::Groups => view! {
                        <div class="app-layout">
                            <GroupList store=store />
                            <GroupEditor store=store api=api.clone() />
                        </div>
                    }.into_any(),
                    Tab::Public => view! { <PublicGroupList store=store api=api.clone() /> }.into_any(),
                    Tab::Admin => view! { <AdminUsers store=store api=api.clone() /> }.into_any(),
                }
            }
        </Show>
    }
}
