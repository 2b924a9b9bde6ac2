//! Link Preview Endpoint

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::{ApiResult, RestApi};
use crate::models::OgMeta;

#[derive(Serialize)]
struct OgMetaArgs<'a> {
    url: &'a str,
}

#[async_trait(?Send)]
pub trait MetaApi {
    async fn og_meta(&self, url: &str) -> ApiResult<OgMeta>;
}

#[async_trait(?Send)]
impl MetaApi for RestApi {
    async fn og_meta(&self, url: &str) -> ApiResult<OgMeta> {
        let builder = self.request(Method::POST, self.url(&["og_meta"])).json(&OgMetaArgs { url });
        self.fetch(builder).await
    }
}
