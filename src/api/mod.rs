//! REST Gateway
//!
//! Frontend bindings to backend endpoints, organized by domain.
//! Each trait method performs exactly one request.

mod error;
mod groups;
mod admin;
mod session;
mod meta;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;

pub use error::{ApiError, ApiResult};
pub use groups::{GroupListing, GroupsApi, SavedGroup};
pub use admin::AdminApi;
pub use session::{Credentials, SessionApi, SignupArgs};
pub use meta::MetaApi;

/// Everything the UI needs from the backend
pub trait Api: GroupsApi + AdminApi + SessionApi + MetaApi {}

impl<T: GroupsApi + AdminApi + SessionApi + MetaApi> Api for T {}

/// Characters left unescaped in a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Session-scoped cancellation flag shared by every call of a session
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> ApiResult<()> {
        if self.is_cancelled() {
            Err(ApiError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// `reqwest` implementation of the gateway traits
#[derive(Clone)]
pub struct RestApi {
    client: reqwest::Client,
    base_url: Arc<str>,
    auth: Arc<RwLock<Option<String>>>,
    session: Arc<RwLock<CancelToken>>,
}

impl RestApi {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::from(config.base_url.as_str()),
            auth: Arc::new(RwLock::new(None)),
            session: Arc::new(RwLock::new(CancelToken::new())),
        }
    }

    /// Full URL for the given path segments, each percent-encoded
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.to_string();
        for segment in segments {
            url.push('/');
            url.extend(utf8_percent_encode(segment, SEGMENT));
        }
        url
    }

    pub fn token(&self) -> Option<String> {
        match self.auth.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn set_token(&self, token: Option<String>) {
        match self.auth.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    /// Token shared by every call issued until the session ends
    pub fn session_token(&self) -> CancelToken {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Cancel all calls of the current session and start a new one
    pub fn cancel_session(&self) {
        let fresh = CancelToken::new();
        let old = match self.session.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, fresh),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), fresh),
        };
        old.cancel();
        self.set_token(None);
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.token() {
            Some(token) => builder.header(AUTHORIZATION, token),
            None => builder,
        }
    }

    /// Send a request and map non-success statuses to errors
    async fn send(&self, builder: RequestBuilder, cancel: &CancelToken) -> ApiResult<Response> {
        cancel.check()?;
        let response = builder.send().await?;
        cancel.check()?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status.as_u16(), message))
        }
    }

    /// Request whose response body is JSON
    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let cancel = self.session_token();
        let response = self.send(builder, &cancel).await?;
        let body = response.text().await?;
        cancel.check()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Request whose response body is ignored
    async fn execute(&self, builder: RequestBuilder) -> ApiResult<()> {
        let cancel = self.session_token();
        self.send(builder, &cancel).await?;
        Ok(())
    }
}
