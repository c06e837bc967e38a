//! Shared transport interop for browser bridge domains.
//!
//! Routes calls to the target-specific implementation behind one API for the domain modules.

use crate::transport::{BinaryResponse, HttpRequest, HttpResponse, UploadForm};

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub async fn fetch_text(request: &HttpRequest) -> Result<HttpResponse, String> {
    imp::fetch_text(request).await
}

pub async fn fetch_bytes(request: &HttpRequest) -> Result<BinaryResponse, String> {
    imp::fetch_bytes(request).await
}

pub async fn upload_form(
    form: &UploadForm<'_>,
    progress: &dyn Fn(u8),
) -> Result<HttpResponse, String> {
    imp::upload_form(form, progress).await
}

pub async fn save_bytes(file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), String> {
    imp::save_bytes(file_name, mime_type, bytes).await
}

pub async fn open_download(url: &str) -> Result<(), String> {
    imp::open_download(url).await
}

pub async fn copy_text(text: &str) -> Result<(), String> {
    imp::copy_text(text).await
}
