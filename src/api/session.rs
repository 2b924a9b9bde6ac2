//! Session Endpoints
//!
//! Login, logout, signup and password reset.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::Serialize;

use super::{ApiError, ApiResult, RestApi};
use crate::models::User;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupArgs {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Serialize)]
struct EmailArgs<'a> {
    email: &'a str,
}

#[async_trait(?Send)]
pub trait SessionApi {
    /// Sign in; the gateway keeps the returned token for later calls
    async fn login(&self, credentials: &Credentials) -> ApiResult<User>;
    async fn logout(&self) -> ApiResult<()>;
    async fn signup(&self, args: &SignupArgs) -> ApiResult<()>;
    async fn request_new_password(&self, email: &str) -> ApiResult<()>;

    /// Cancel every in-flight call of the current session and drop the token
    fn end_session(&self);
}

#[async_trait(?Send)]
impl SessionApi for RestApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<User> {
        let cancel = self.session_token();
        let builder = self.request(Method::POST, self.url(&["login"])).json(credentials);
        let response = self.send(builder, &cancel).await?;
        let token = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        let user: User = serde_json::from_str(&body)?;
        self.set_token(token);
        Ok(user)
    }

    async fn logout(&self) -> ApiResult<()> {
        self.execute(self.request(Method::POST, self.url(&["logout"]))).await
    }

    async fn signup(&self, args: &SignupArgs) -> ApiResult<()> {
        self.execute(self.request(Method::POST, self.url(&["user", "signup"])).json(args))
            .await
    }

    async fn request_new_password(&self, email: &str) -> ApiResult<()> {
        self.execute(self.request(Method::POST, self.url(&["user", "new_password"])).json(&EmailArgs { email }))
            .await
    }

    fn end_session(&self) {
        self.cancel_session();
    }
}
