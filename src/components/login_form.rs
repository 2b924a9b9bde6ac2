//! Login Form Component
//!
//! Sign in, sign up and password reset share one form.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{RestApi, SignupArgs};
use crate::components::RequestBadge;
use crate::store::{session, AppStateStoreFields, AppStore};

#[derive(Clone, Copy, PartialEq)]
enum FormMode {
    Login,
    Signup,
    Reset,
}

#[component]
pub fn LoginForm(store: AppStore, api: RestApi) -> impl IntoView {
    let (mode, set_mode) = signal(FormMode::Login);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirmation, set_confirmation) = signal(String::new());

    let request = Signal::derive(move || {
        store.session().with(|s| match mode.get() {
            FormMode::Login => s.request,
            FormMode::Signup => s.signup,
            FormMode::Reset => s.password_reset,
        })
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let api = api.clone();
        let email = email.get();
        match mode.get() {
            FormMode::Login => {
                let password = password.get();
                spawn_local(async move { session::login(store, &api, email, password).await });
            }
            FormMode::Signup => {
                let args = SignupArgs {
                    email,
                    password: password.get(),
                    password_confirmation: confirmation.get(),
                };
                spawn_local(async move { session::signup(store, &api, args).await });
            }
            FormMode::Reset => {
                spawn_local(async move { session::request_new_password(store, &api, email).await });
            }
        }
        set_password.set(String::new());
        set_confirmation.set(String::new());
    };

    let tab = move |target: FormMode, label: &'static str| {
        view! {
            <button
                type="button"
                class=move || if mode.get() == target { "mode-btn active" } else { "mode-btn" }
                on:click=move |_| set_mode.set(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <form class="login-form" on:submit=on_submit>
            <div class="mode-row">
                {tab(FormMode::Login, "Sign in")}
                {tab(FormMode::Signup, "Sign up")}
                {tab(FormMode::Reset, "Forgot password")}
            </div>
            <input
                type="email"
                placeholder="Email"
                prop:value=move || email.get()
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <Show when=move || mode.get() != FormMode::Reset>
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
            </Show>
            <Show when=move || mode.get() == FormMode::Signup>
                <input
                    type="password"
                    placeholder="Repeat password"
                    prop:value=move || confirmation.get()
                    on:input=move |ev| set_confirmation.set(event_target_value(&ev))
                />
            </Show>
            <button type="submit" disabled=move || request.get().is_pending()>
                {move || match mode.get() {
                    FormMode::Login => "Sign in",
                    FormMode::Signup => "Create account",
                    FormMode::Reset => "Send reset link",
                }}
            </button>
            <RequestBadge state=request />
        </form>
    }
}
