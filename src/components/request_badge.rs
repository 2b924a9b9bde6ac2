//! Request state indicator

use leptos::prelude::*;

use crate::store::RequestState;

#[component]
pub fn RequestBadge(#[prop(into)] state: Signal<RequestState>) -> impl IntoView {
    view! {
        <span class=move || format!("request-badge {}", state.get().css_class())>
            {move || match state.get() {
                RequestState::Idle => "",
                RequestState::Requested => "Working...",
                RequestState::Success => "Done",
                RequestState::Error => "Something went wrong",
            }}
        </span>
    }
}
