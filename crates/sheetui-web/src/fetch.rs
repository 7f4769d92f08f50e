#![forbid(unsafe_code)]

//! `window.fetch` content loader. Only compiled on `wasm32` targets.

use std::future::Future;

use sheetui_stack::content::is_success_status;
use sheetui_stack::{ContentLoadError, ContentLoader};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

/// Loads sheet HTML with the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct FetchLoader {
    window: Window,
}

impl FetchLoader {
    /// Loader bound to the global window, if there is one.
    #[must_use]
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl ContentLoader for FetchLoader {
    fn load(&self, url: &str) -> impl Future<Output = Result<String, ContentLoadError>> {
        let window = self.window.clone();
        let url = url.to_owned();
        async move { fetch_text(&window, &url).await }
    }
}

async fn fetch_text(window: &Window, url: &str) -> Result<String, ContentLoadError> {
    let transport = |err: JsValue| ContentLoadError::transport(url, js_message(&err));

    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(transport)?;
    let response: Response = response.dyn_into().map_err(transport)?;
    if !is_success_status(response.status()) {
        return Err(ContentLoadError::status(url, response.status()));
    }

    let body = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    body.as_string()
        .ok_or_else(|| ContentLoadError::transport(url, "response body is not text"))
}

/// Best-effort message from a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}
