//! File-hosting service contract.

use std::{future::Future, pin::Pin};

use super::{
    path::encode_query_component,
    types::{FileListing, FileMetadata, LocalFile, SortDirection, SortKey},
};
use crate::{ActivityLogPage, ApiError, PanelSettings, SettingsUpdate};

/// Default API prefix of the file-hosting server.
pub const DEFAULT_API_BASE: &str = "/api";

/// Object-safe boxed future used by [`FileStoreService`] async methods.
pub type FileStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Remote file-hosting API consumed by the interaction runtime.
///
/// Every mutating call is validated server-side; implementations report rejections as
/// [`ApiError::Server`] carrying the server's message.
pub trait FileStoreService {
    /// Lists a directory.
    fn list<'a>(
        &'a self,
        path: &'a str,
        sort: SortKey,
        direction: SortDirection,
    ) -> FileStoreFuture<'a, Result<FileListing, ApiError>>;

    /// Uploads one file into `directory`, reporting whole-percent progress.
    fn upload<'a>(
        &'a self,
        file: &'a LocalFile,
        directory: &'a str,
        overwrite: bool,
        progress: &'a dyn Fn(u8),
    ) -> FileStoreFuture<'a, Result<(), ApiError>>;

    /// Renames an entry inside its current directory.
    fn rename<'a>(
        &'a self,
        path: &'a str,
        new_name: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>>;

    /// Moves an entry into another directory.
    fn move_entry<'a>(
        &'a self,
        path: &'a str,
        destination: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>>;

    /// Replaces the content of an existing file.
    fn replace<'a>(
        &'a self,
        path: &'a str,
        file: &'a LocalFile,
        progress: &'a dyn Fn(u8),
    ) -> FileStoreFuture<'a, Result<(), ApiError>>;

    /// Deletes an entry; `confirm_filename` must equal the entry's name.
    fn delete<'a>(
        &'a self,
        path: &'a str,
        confirm_filename: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>>;

    /// Creates directory `name` under `parent`.
    fn mkdir<'a>(
        &'a self,
        parent: &'a str,
        name: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>>;

    /// Loads detailed metadata for a file.
    fn metadata<'a>(&'a self, path: &'a str) -> FileStoreFuture<'a, Result<FileMetadata, ApiError>>;

    /// Builds a zip archive of the given paths and returns its bytes.
    fn zip<'a>(&'a self, paths: &'a [String]) -> FileStoreFuture<'a, Result<Vec<u8>, ApiError>>;

    /// Loads one page of the activity log, newest first.
    fn logs<'a>(
        &'a self,
        limit: u32,
        offset: u32,
    ) -> FileStoreFuture<'a, Result<ActivityLogPage, ApiError>>;

    /// Loads the server settings.
    fn settings<'a>(&'a self) -> FileStoreFuture<'a, Result<PanelSettings, ApiError>>;

    /// Applies a partial settings update and returns the resulting settings.
    fn update_settings<'a>(
        &'a self,
        update: &'a SettingsUpdate,
    ) -> FileStoreFuture<'a, Result<PanelSettings, ApiError>>;

    /// URL that streams `path` as a browser download.
    fn download_url(&self, path: &str) -> String {
        format!(
            "{DEFAULT_API_BASE}/files/download?path={}",
            encode_query_component(path)
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Service for hosts without a file-hosting backend.
///
/// Reads return empty results; mutations fail with [`ApiError::Host`].
pub struct NoopFileStoreService;

fn unavailable<T>() -> Result<T, ApiError> {
    Err(ApiError::Host(
        "file hosting is unavailable on this host".to_string(),
    ))
}

impl FileStoreService for NoopFileStoreService {
    fn list<'a>(
        &'a self,
        path: &'a str,
        _sort: SortKey,
        _direction: SortDirection,
    ) -> FileStoreFuture<'a, Result<FileListing, ApiError>> {
        Box::pin(async move {
            Ok(FileListing {
                path: path.to_string(),
                files: Vec::new(),
            })
        })
    }

    fn upload<'a>(
        &'a self,
        _file: &'a LocalFile,
        _directory: &'a str,
        _overwrite: bool,
        _progress: &'a dyn Fn(u8),
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async { unavailable() })
    }

    fn rename<'a>(
        &'a self,
        _path: &'a str,
        _new_name: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async { unavailable() })
    }

    fn move_entry<'a>(
        &'a self,
        _path: &'a str,
        _destination: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async { unavailable() })
    }

    fn replace<'a>(
        &'a self,
        _path: &'a str,
        _file: &'a LocalFile,
        _progress: &'a dyn Fn(u8),
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async { unavailable() })
    }

    fn delete<'a>(
        &'a self,
        _path: &'a str,
        _confirm_filename: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async { unavailable() })
    }

    fn mkdir<'a>(
        &'a self,
        _parent: &'a str,
        _name: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async { unavailable() })
    }

    fn metadata<'a>(&'a self, _path: &'a str) -> FileStoreFuture<'a, Result<FileMetadata, ApiError>> {
        Box::pin(async { unavailable() })
    }

    fn zip<'a>(&'a self, _paths: &'a [String]) -> FileStoreFuture<'a, Result<Vec<u8>, ApiError>> {
        Box::pin(async { unavailable() })
    }

    fn logs<'a>(
        &'a self,
        limit: u32,
        offset: u32,
    ) -> FileStoreFuture<'a, Result<ActivityLogPage, ApiError>> {
        Box::pin(async move {
            Ok(ActivityLogPage {
                logs: Vec::new(),
                limit,
                offset,
            })
        })
    }

    fn settings<'a>(&'a self) -> FileStoreFuture<'a, Result<PanelSettings, ApiError>> {
        Box::pin(async { Ok(PanelSettings::default()) })
    }

    fn update_settings<'a>(
        &'a self,
        _update: &'a SettingsUpdate,
    ) -> FileStoreFuture<'a, Result<PanelSettings, ApiError>> {
        Box::pin(async { unavailable() })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn noop_service_lists_empty_and_rejects_mutations() {
        let service = NoopFileStoreService;
        let service_obj: &dyn FileStoreService = &service;

        let listing =
            block_on(service_obj.list("/docs", SortKey::Name, SortDirection::Asc)).expect("list");
        assert_eq!(listing.path, "/docs");
        assert!(listing.files.is_empty());

        let err = block_on(service_obj.rename("/a.txt", "b.txt")).expect_err("rename rejected");
        assert!(matches!(err, ApiError::Host(_)));
    }

    #[test]
    fn download_urls_encode_the_path() {
        assert_eq!(
            NoopFileStoreService.download_url("/My Docs/a&b.txt"),
            "/api/files/download?path=%2FMy%20Docs%2Fa%26b.txt"
        );
    }
}
