//! Typed contracts and shared models for the file-hosting console.
//!
//! This crate is the boundary between the interaction runtime (`files_runtime`) and concrete
//! hosts. It exposes the wire models of the file-hosting API, the object-safe service traits the
//! runtime calls through, path/activity/settings helpers, and in-memory adapters used by tests
//! and headless composition. Browser adapters live in `panel_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod activity;
pub mod download;
pub mod error;
pub mod files;
pub mod host;
pub mod settings;
pub mod storage;
pub mod time;

pub use activity::{
    clamp_log_page_size, file_name_of, folder_of, format_relative_time, normalize_log_path,
    ActivityLogEntry, ActivityLogPage, LogPager, LogPath, DEFAULT_LOG_PAGE_SIZE,
    MAX_LOG_PAGE_SIZE,
};
pub use download::{
    DownloadFuture, DownloadService, MemoryDownloadService, NoopDownloadService, SavedDownload,
    ZIP_MIME_TYPE,
};
pub use error::ApiError;
pub use files::memory::{MemoryFileStoreService, StoreCall, StoreOp};
pub use files::path::{
    base_name, breadcrumb_trail, encode_query_component, join_path, normalize_virtual_path,
    parent_path, Breadcrumb, ROOT_PATH,
};
pub use files::service::{
    FileStoreFuture, FileStoreService, NoopFileStoreService, DEFAULT_API_BASE,
};
pub use files::types::{
    FileBrowserPrefs, FileEntry, FileListing, FileMetadata, LocalFile, LocalFileHandle,
    SortDirection, SortKey, ViewMode, FILE_BROWSER_PREFS_KEY,
};
pub use host::HostServices;
pub use settings::{
    is_valid_extension, normalize_extension, public_url, ExtensionError, PanelSettings,
    SettingsUpdate, COMMON_EXECUTABLE_EXTENSIONS, DEFAULT_BLOCKED_EXTENSIONS,
};
pub use storage::prefs::{
    load_browser_prefs, load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore,
    PrefsStore, PrefsStoreFuture,
};
pub use time::{datetime_from_unix_ms, unix_time_ms_now, utc_now};
