//! Browser capability bridge used by the `panel_host_web` service adapters.
//!
//! Organized by host domain (`http` for API calls, `delivery` for downloads and clipboard) over
//! one shared wasm/non-wasm interop layer.

mod delivery;
mod http;
mod interop;

use crate::transport::{BinaryResponse, HttpRequest, HttpResponse, UploadForm};

pub async fn fetch_text(request: &HttpRequest) -> Result<HttpResponse, String> {
    http::fetch_text(request).await
}

pub async fn fetch_bytes(request: &HttpRequest) -> Result<BinaryResponse, String> {
    http::fetch_bytes(request).await
}

pub async fn upload_form(
    form: &UploadForm<'_>,
    progress: &dyn Fn(u8),
) -> Result<HttpResponse, String> {
    http::upload_form(form, progress).await
}

pub async fn save_bytes(file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), String> {
    delivery::save_bytes(file_name, mime_type, bytes).await
}

pub async fn open_download(url: &str) -> Result<(), String> {
    delivery::open_download(url).await
}

pub async fn copy_text(text: &str) -> Result<(), String> {
    delivery::copy_text(text).await
}
