//! Admin Endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{ApiResult, RestApi};
use crate::models::AdminUser;

#[async_trait(?Send)]
pub trait AdminApi {
    async fn list_users(&self) -> ApiResult<Vec<AdminUser>>;
    async fn delete_user(&self, id: &str) -> ApiResult<()>;
}

#[async_trait(?Send)]
impl AdminApi for RestApi {
    async fn list_users(&self) -> ApiResult<Vec<AdminUser>> {
        self.fetch(self.request(Method::GET, self.url(&["admin", "users"]))).await
    }

    async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.execute(self.request(Method::DELETE, self.url(&["admin", "users", id]))).await
    }
}
