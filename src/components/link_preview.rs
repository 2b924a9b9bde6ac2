//! Link Preview Component
//!
//! Shows Open Graph data for the first link in a text.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{MetaApi, RestApi};
use crate::models::OgMeta;

/// First `http(s)://` word in `text`
pub fn first_url(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|w| w.starts_with("http://") || w.starts_with("https://"))
        .map(|w| w.trim_end_matches(|c: char| matches!(c, ')' | ',' | '.' | ';')).to_string())
}

#[component]
pub fn LinkPreview(api: RestApi, url: String) -> impl IntoView {
    let (meta, set_meta) = signal(None::<OgMeta>);

    let target = url.clone();
    Effect::new(move |_| {
        let api = api.clone();
        let target = target.clone();
        spawn_local(async move {
            match api.og_meta(&target).await {
                Ok(found) if !found.is_empty() => set_meta.set(Some(found)),
                Ok(_) => {}
                Err(e) => log::debug!("[PREVIEW] no metadata for {}: {}", target, e),
            }
        });
    });

    view! {
        {move || meta.get().map(|m| {
            let href = url.clone();
            view! {
                <a class="link-preview" href=href target="_blank" rel="noopener">
                    {m.image.map(|src| view! { <img class="link-preview-image" src=src /> })}
                    <div class="link-preview-text">
                        <strong>{m.title.unwrap_or_default()}</strong>
                        <p>{m.description.unwrap_or_default()}</p>
                        <small>{m.site_name.unwrap_or_default()}</small>
                    </div>
                </a>
            }
        })}
    }
}
