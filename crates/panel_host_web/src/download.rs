//! Browser download and clipboard adapter.

use panel_host::{DownloadFuture, DownloadService};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Saves blobs through a temporary anchor, opens download links, and writes the clipboard.
pub struct WebDownloadService;

impl DownloadService for WebDownloadService {
    fn save_bytes<'a>(
        &'a self,
        file_name: &'a str,
        mime_type: &'a str,
        bytes: &'a [u8],
    ) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::save_bytes(file_name, mime_type, bytes).await })
    }

    fn open_url<'a>(&'a self, url: &'a str) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::open_download(url).await })
    }

    fn copy_text<'a>(&'a self, text: &'a str) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::copy_text(text).await })
    }
}
