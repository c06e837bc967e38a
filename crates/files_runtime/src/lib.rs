//! Interaction runtime for the file-hosting console's directory browser.
//!
//! The leaf models ([`PathHistory`], [`SelectionModel`], [`project_entries`], [`UploadQueue`],
//! [`BulkActionCoordinator`]) are plain state machines. [`reduce_browser`] wires them together as
//! the directory controller: user gestures and remote completions arrive as [`BrowserAction`]s,
//! remote calls leave as [`BrowserEffect`]s, and [`run_effect`] executes those against the
//! injected [`panel_host::HostServices`]. [`FileBrowserRuntime`] drives the loop headlessly.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod bulk;
pub mod executor;
pub mod history;
pub mod model;
pub mod projection;
pub mod reducer;
pub mod runtime;
pub mod selection;
mod trace;
pub mod upload;

pub use bulk::{
    zip_file_name, BulkActionCoordinator, BulkActionError, BulkFailure, BulkKind, BulkOutcome,
    ConfirmTarget, DeleteConfirmation, DeleteJob, DeleteStep, ZipJob, BULK_DELETE_CONFIRMATION,
    GENERIC_ZIP_NAME,
};
pub use executor::run_effect;
pub use history::PathHistory;
pub use model::{
    DetailsPanel, FileBrowserState, Notice, NoticeLevel, OperationKind, MAX_NOTICES,
};
pub use projection::{compare_entries, compare_names, next_sort, project_entries};
pub use reducer::{reduce_browser, BrowserAction, BrowserEffect, BrowserError, Shortcut};
pub use runtime::FileBrowserRuntime;
pub use selection::SelectionModel;
pub use upload::{
    DropZone, UploadItem, UploadJob, UploadQueue, UploadQueueError, UploadStatus, UploadStep,
};
