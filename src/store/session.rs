//! Session Store
//!
//! Signed-in user plus login, logout, signup and password reset flows.

use leptos::prelude::*;

use super::{clear_all, groups, AppStateStoreFields, AppStore, RequestState};
use crate::api::{Credentials, GroupsApi, SessionApi, SignupArgs};
use crate::models::User;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    /// Login request
    pub request: RequestState,
    pub signup: RequestState,
    pub password_reset: RequestState,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// Sign in, then load the user's groups
pub async fn login<A>(store: AppStore, api: &A, email: String, password: String)
where
    A: SessionApi + GroupsApi + ?Sized,
{
    store.session().update(|s| s.request = RequestState::Requested);
    let credentials = Credentials { email: email.trim().to_string(), password };
    match api.login(&credentials).await {
        Ok(user) => {
            log::info!("[SESSION] signed in as {}", user.email);
            store.session().update(|s| {
                s.user = Some(user);
                s.request = RequestState::Success;
            });
            groups::load(store, api).await;
        }
        Err(e) => {
            log::warn!("[SESSION] login failed: {}", e);
            store.session().update(|s| s.request = RequestState::failed(&e));
        }
    }
}

/// Sign out and forget everything loaded during the session
///
/// Local state is cleared even when the server call fails.
pub async fn logout<A: SessionApi + ?Sized>(store: AppStore, api: &A) {
    if let Err(e) = api.logout().await {
        log::debug!("[SESSION] logout request failed: {}", e);
    }
    api.end_session();
    clear_all(store);
    log::info!("[SESSION] signed out");
}

fn signup_is_valid(args: &SignupArgs) -> bool {
    !args.email.trim().is_empty() && !args.password.is_empty() && args.password == args.password_confirmation
}

pub async fn signup<A: SessionApi + ?Sized>(store: AppStore, api: &A, args: SignupArgs) {
    if !signup_is_valid(&args) {
        log::debug!("[SESSION] signup rejected locally");
        store.session().update(|s| s.signup = RequestState::Error);
        return;
    }
    store.session().update(|s| s.signup = RequestState::Requested);
    let state = match api.signup(&args).await {
        Ok(()) => RequestState::Success,
        Err(e) => {
            log::warn!("[SESSION] signup failed: {}", e);
            RequestState::failed(&e)
        }
    };
    store.session().update(|s| s.signup = state);
}

pub async fn request_new_password<A: SessionApi + ?Sized>(store: AppStore, api: &A, email: String) {
    store.session().update(|s| s.password_reset = RequestState::Requested);
    let state = match api.request_new_password(email.trim()).await {
        Ok(()) => RequestState::Success,
        Err(e) => {
            log::warn!("[SESSION] password reset failed: {}", e);
            RequestState::failed(&e)
        }
    };
    store.session().update(|s| s.password_reset = state);
}
