//! Browser (`wasm32`) implementations of [`panel_host`] service contracts.
//!
//! This crate wires the file-hosting console to the browser: the JSON/multipart HTTP transport
//! with CSRF handling, blob downloads and clipboard access, and `localStorage` preferences.
//!
//! Bridge bindings are split by domain under `bridge/`:
//! - `bridge::http`
//! - `bridge::delivery`
//! - `bridge::interop` (shared wasm/non-wasm transport glue)

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod adapters;
mod bridge;
pub mod config;
pub mod download;
#[cfg(target_arch = "wasm32")]
pub mod file_registry;
pub mod files;
pub mod storage;
mod transport;

pub use adapters::browser_host_services;
pub use config::{ApiConfig, DEFAULT_CSRF_HEADER, DEFAULT_CSRF_PATH};
pub use download::WebDownloadService;
pub use files::WebFileStoreService;
pub use storage::local_prefs::WebPrefsStore;
