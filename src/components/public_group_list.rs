//! Public Group Directory Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::RestApi;
use crate::components::RequestBadge;
use crate::models::PublicGroup;
use crate::store::{public_groups, AppStateStoreFields, AppStore};

#[component]
pub fn PublicGroupList(store: AppStore, api: RestApi) -> impl IntoView {
    // Load first page on mount
    let mount_api = api.clone();
    Effect::new(move |_| {
        let api = mount_api.clone();
        spawn_local(async move { public_groups::load_first_page(store, &api).await });
    });

    let rows = Memo::new(move |_| {
        store
            .public_groups()
            .with(|p| p.filtered().into_iter().cloned().collect::<Vec<PublicGroup>>())
    });
    let filter = Memo::new(move |_| store.public_groups().with(|p| p.filter.clone()));
    let exhausted = Memo::new(move |_| store.public_groups().with(|p| p.exhausted));
    let request = Signal::derive(move || store.public_groups().with(|p| p.request));

    let on_more = {
        let api = api.clone();
        move |_| {
            let api = api.clone();
            spawn_local(async move { public_groups::load_more(store, &api).await });
        }
    };

    view! {
        <section class="public-groups">
            <div class="public-groups-header">
                <input
                    type="search"
                    placeholder="Filter public groups"
                    prop:value=move || filter.get()
                    on:input=move |ev| store.public_groups().update(|p| p.filter = event_target_value(&ev))
                />
                <RequestBadge state=request />
            </div>
            <ul>
                <For
                    each=move || rows.get()
                    key=|g| g.id.clone()
                    children=move |g| {
                        let api = api.clone();
                        let id = g.id.clone();
                        view! {
                            <li class="public-group-row">
                                <strong>{g.name.clone()}</strong>
                                <span class="member-count">{format!("{} members", g.member_count)}</span>
                                <p>{g.description.clone()}</p>
                                <button
                                    disabled=move || request.get().is_pending()
                                    on:click=move |_| {
                                        let api = api.clone();
                                        let id = id.clone();
                                        spawn_local(async move { public_groups::join(store, &api, &id).await });
                                    }
                                >
                                    "Join"
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
            <Show when=move || !exhausted.get()>
                <button class="load-more-btn" on:click=on_more.clone()>"Load more"</button>
            </Show>
        </section>
    }
}
