//! Local delivery of downloads and clipboard text.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// MIME type used when saving zip archives.
pub const ZIP_MIME_TYPE: &str = "application/zip";

/// Object-safe boxed future used by [`DownloadService`] async methods.
pub type DownloadFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that hands bytes and links to the user.
pub trait DownloadService {
    /// Saves bytes as a local file named `file_name`.
    fn save_bytes<'a>(
        &'a self,
        file_name: &'a str,
        mime_type: &'a str,
        bytes: &'a [u8],
    ) -> DownloadFuture<'a, Result<(), String>>;

    /// Starts a browser-managed download of `url`.
    fn open_url<'a>(&'a self, url: &'a str) -> DownloadFuture<'a, Result<(), String>>;

    /// Writes text to the clipboard.
    fn copy_text<'a>(&'a self, text: &'a str) -> DownloadFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Download service for hosts without file save or clipboard access.
pub struct NoopDownloadService;

impl DownloadService for NoopDownloadService {
    fn save_bytes<'a>(
        &'a self,
        _file_name: &'a str,
        _mime_type: &'a str,
        _bytes: &'a [u8],
    ) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async { Err("saving files is unavailable on this host".to_string()) })
    }

    fn open_url<'a>(&'a self, _url: &'a str) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async { Err("downloads are unavailable on this host".to_string()) })
    }

    fn copy_text<'a>(&'a self, _text: &'a str) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async { Err("clipboard is unavailable on this host".to_string()) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A file handed to [`MemoryDownloadService::save_bytes`].
pub struct SavedDownload {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Saved content.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct MemoryDownloads {
    saved: Vec<SavedDownload>,
    opened: Vec<String>,
    clipboard: Vec<String>,
}

#[derive(Debug, Clone, Default)]
/// Recording download service; clones share one record.
pub struct MemoryDownloadService {
    inner: Rc<RefCell<MemoryDownloads>>,
}

impl MemoryDownloadService {
    /// Files saved so far.
    pub fn saved(&self) -> Vec<SavedDownload> {
        self.inner.borrow().saved.clone()
    }

    /// URLs opened so far.
    pub fn opened(&self) -> Vec<String> {
        self.inner.borrow().opened.clone()
    }

    /// Most recent clipboard text.
    pub fn clipboard(&self) -> Option<String> {
        self.inner.borrow().clipboard.last().cloned()
    }
}

impl DownloadService for MemoryDownloadService {
    fn save_bytes<'a>(
        &'a self,
        file_name: &'a str,
        mime_type: &'a str,
        bytes: &'a [u8],
    ) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().saved.push(SavedDownload {
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
                bytes: bytes.to_vec(),
            });
            Ok(())
        })
    }

    fn open_url<'a>(&'a self, url: &'a str) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().opened.push(url.to_string());
            Ok(())
        })
    }

    fn copy_text<'a>(&'a self, text: &'a str) -> DownloadFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().clipboard.push(text.to_string());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_service_records_everything() {
        let service = MemoryDownloadService::default();
        let service_obj: &dyn DownloadService = &service;

        block_on(service_obj.save_bytes("download.zip", ZIP_MIME_TYPE, b"PK")).expect("save");
        block_on(service_obj.open_url("/api/files/download?path=%2Fa.txt")).expect("open");
        block_on(service_obj.copy_text("https://files.example.com/a.txt")).expect("copy");

        assert_eq!(
            service.saved(),
            vec![SavedDownload {
                file_name: "download.zip".to_string(),
                mime_type: ZIP_MIME_TYPE.to_string(),
                bytes: b"PK".to_vec(),
            }]
        );
        assert_eq!(service.opened().len(), 1);
        assert_eq!(
            service.clipboard().as_deref(),
            Some("https://files.example.com/a.txt")
        );
    }

    #[test]
    fn noop_service_fails() {
        let service = NoopDownloadService;
        assert!(block_on(service.copy_text("x")).is_err());
    }
}
