//! Reducer actions, side-effect intents, and transition logic for the file browser.

use panel_host::{
    normalize_virtual_path, parent_path, public_url, ApiError, FileBrowserPrefs, FileEntry,
    FileListing, FileMetadata, LocalFile, PanelSettings, SortDirection, SortKey, ViewMode,
};
use thiserror::Error;

use crate::{
    bulk::{BulkActionError, ConfirmTarget, DeleteJob, DeleteStep, ZipJob},
    model::{DetailsPanel, FileBrowserState, NoticeLevel, OperationKind},
    projection::next_sort,
    trace,
    upload::{UploadJob, UploadQueueError, UploadStep},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Keyboard shortcuts handled by the listing surface.
pub enum Shortcut {
    /// Ctrl/Cmd+A.
    SelectAll,
    /// Escape.
    Escape,
    /// Delete.
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_browser`].
pub enum BrowserAction {
    /// Load preferences and settings, then list the initial directory.
    Initialize,
    /// Open a directory (row, breadcrumb, or typed path).
    OpenFolder {
        /// Target directory.
        path: String,
    },
    /// Step back in history.
    GoBack,
    /// Step forward in history.
    GoForward,
    /// Open the parent directory.
    GoUp,
    /// Re-fetch the current directory.
    Reload,
    /// A listing request finished.
    ListingLoaded {
        /// Generation the request was issued with.
        generation: u64,
        /// Directory that was requested.
        path: String,
        /// Listing or failure.
        result: Result<FileListing, ApiError>,
    },
    /// Replace the name filter.
    SetSearchQuery {
        /// Filter text.
        query: String,
    },
    /// Set sort column and direction.
    SetSort {
        /// Sort column.
        sort_by: SortKey,
        /// Sort direction.
        direction: SortDirection,
    },
    /// Column header click.
    ToggleSortColumn {
        /// Clicked column.
        column: SortKey,
    },
    /// Switch list/grid presentation.
    SetViewMode {
        /// New presentation.
        mode: ViewMode,
    },
    /// Set the default overwrite flag for uploads.
    SetOverwriteUploads {
        /// Whether uploads replace existing files.
        enabled: bool,
    },
    /// Stored preferences were read.
    PrefsLoaded {
        /// Stored preferences, if any.
        prefs: Option<FileBrowserPrefs>,
    },
    /// Server settings were read.
    SettingsLoaded {
        /// Settings or failure.
        result: Result<PanelSettings, ApiError>,
    },
    /// Plain click on a row.
    ClickEntry {
        /// Clicked row.
        path: String,
    },
    /// Checkbox or modifier click on a row.
    ToggleEntry {
        /// Clicked row.
        path: String,
    },
    /// Shift-click on a row.
    ShiftClickEntry {
        /// Clicked row.
        path: String,
    },
    /// Range-select displayed rows `from..=to`.
    SelectRange {
        /// One end of the range.
        from: usize,
        /// Other end of the range.
        to: usize,
    },
    /// Select-all toggle.
    SelectAll,
    /// Empty the selection.
    ClearSelection,
    /// Keyboard shortcut.
    Shortcut(Shortcut),
    /// Show the detail panel for a file without changing the selection.
    ShowDetails {
        /// File to show.
        path: String,
    },
    /// Close the detail panel.
    CloseDetails,
    /// A metadata request finished.
    MetadataLoaded {
        /// File the request was for.
        path: String,
        /// Metadata or failure.
        result: Result<FileMetadata, ApiError>,
    },
    /// A drag entered the listing surface or one of its children.
    DragEnter {
        /// Whether the drag carries files.
        carries_files: bool,
    },
    /// A drag left the listing surface or one of its children.
    DragLeave,
    /// Files were dropped on the listing surface.
    DropFiles {
        /// Dropped files.
        files: Vec<LocalFile>,
    },
    /// Files were chosen through the picker.
    PickFiles {
        /// Chosen files.
        files: Vec<LocalFile>,
    },
    /// Append files to the existing queue.
    AddUploadFiles {
        /// Files to append.
        files: Vec<LocalFile>,
    },
    /// Remove a queued file by name.
    RemoveUpload {
        /// File name.
        name: String,
    },
    /// Upload the pending files into the current directory.
    StartUpload,
    /// Close the upload panel and discard the queue.
    CloseUploadPanel,
    /// Progress report for the in-flight upload.
    UploadProgress {
        /// Run the transfer belongs to.
        session: u64,
        /// Queue index.
        index: usize,
        /// Whole percent.
        percent: u8,
    },
    /// An upload finished.
    UploadFinished {
        /// Run the transfer belongs to.
        session: u64,
        /// Queue index.
        index: usize,
        /// Outcome.
        result: Result<(), ApiError>,
    },
    /// Open the delete dialog for the selection.
    OpenBulkDelete,
    /// Row delete action: select only `path` and open the delete dialog.
    OpenDeleteEntry {
        /// File to delete.
        path: String,
    },
    /// Keystroke in the delete dialog.
    SetDeleteConfirmation {
        /// Current input text.
        text: String,
    },
    /// Confirm the delete dialog.
    ConfirmDelete,
    /// Dismiss the delete dialog.
    CancelDelete,
    /// One delete call finished.
    DeleteFinished {
        /// Bulk operation id.
        operation: u64,
        /// Position in the snapshot.
        index: usize,
        /// Outcome.
        result: Result<(), ApiError>,
    },
    /// Download the selection as a zip archive.
    DownloadZip,
    /// The zip request finished.
    ZipFinished {
        /// Bulk operation id.
        operation: u64,
        /// Outcome of the request and the local save.
        result: Result<(), ApiError>,
    },
    /// Rename an entry of the current listing.
    Rename {
        /// Entry to rename.
        path: String,
        /// New name.
        new_name: String,
    },
    /// Move an entry of the current listing.
    Move {
        /// Entry to move.
        path: String,
        /// Destination directory.
        destination: String,
    },
    /// Create a folder in the current directory.
    CreateFolder {
        /// Folder name.
        name: String,
    },
    /// Replace a file's content.
    ReplaceFile {
        /// File to replace.
        path: String,
        /// New content.
        file: LocalFile,
    },
    /// A rename, move, mkdir, or replace call finished.
    MutationFinished {
        /// Which operation.
        kind: OperationKind,
        /// Path or name the notice refers to.
        subject: String,
        /// Outcome.
        result: Result<(), ApiError>,
    },
    /// Copy the public URL of an entry.
    CopyPublicUrl {
        /// Entry path.
        path: String,
    },
    /// Download one file through the browser.
    DownloadEntry {
        /// File path.
        path: String,
    },
    /// A local host action (clipboard, download, prefs) finished.
    HostActionFinished {
        /// Which operation.
        kind: OperationKind,
        /// Outcome.
        result: Result<(), String>,
    },
    /// Dismiss a toast.
    DismissNotice {
        /// Notice id.
        id: u64,
    },
}

impl BrowserAction {
    /// Short variant name for trace fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::OpenFolder { .. } => "open-folder",
            Self::GoBack => "go-back",
            Self::GoForward => "go-forward",
            Self::GoUp => "go-up",
            Self::Reload => "reload",
            Self::ListingLoaded { .. } => "listing-loaded",
            Self::SetSearchQuery { .. } => "set-search-query",
            Self::SetSort { .. } => "set-sort",
            Self::ToggleSortColumn { .. } => "toggle-sort-column",
            Self::SetViewMode { .. } => "set-view-mode",
            Self::SetOverwriteUploads { .. } => "set-overwrite-uploads",
            Self::PrefsLoaded { .. } => "prefs-loaded",
            Self::SettingsLoaded { .. } => "settings-loaded",
            Self::ClickEntry { .. } => "click-entry",
            Self::ToggleEntry { .. } => "toggle-entry",
            Self::ShiftClickEntry { .. } => "shift-click-entry",
            Self::SelectRange { .. } => "select-range",
            Self::SelectAll => "select-all",
            Self::ClearSelection => "clear-selection",
            Self::Shortcut(_) => "shortcut",
            Self::ShowDetails { .. } => "show-details",
            Self::CloseDetails => "close-details",
            Self::MetadataLoaded { .. } => "metadata-loaded",
            Self::DragEnter { .. } => "drag-enter",
            Self::DragLeave => "drag-leave",
            Self::DropFiles { .. } => "drop-files",
            Self::PickFiles { .. } => "pick-files",
            Self::AddUploadFiles { .. } => "add-upload-files",
            Self::RemoveUpload { .. } => "remove-upload",
            Self::StartUpload => "start-upload",
            Self::CloseUploadPanel => "close-upload-panel",
            Self::UploadProgress { .. } => "upload-progress",
            Self::UploadFinished { .. } => "upload-finished",
            Self::OpenBulkDelete => "open-bulk-delete",
            Self::OpenDeleteEntry { .. } => "open-delete-entry",
            Self::SetDeleteConfirmation { .. } => "set-delete-confirmation",
            Self::ConfirmDelete => "confirm-delete",
            Self::CancelDelete => "cancel-delete",
            Self::DeleteFinished { .. } => "delete-finished",
            Self::DownloadZip => "download-zip",
            Self::ZipFinished { .. } => "zip-finished",
            Self::Rename { .. } => "rename",
            Self::Move { .. } => "move",
            Self::CreateFolder { .. } => "create-folder",
            Self::ReplaceFile { .. } => "replace-file",
            Self::MutationFinished { .. } => "mutation-finished",
            Self::CopyPublicUrl { .. } => "copy-public-url",
            Self::DownloadEntry { .. } => "download-entry",
            Self::HostActionFinished { .. } => "host-action-finished",
            Self::DismissNotice { .. } => "dismiss-notice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_browser`] for the executor.
pub enum BrowserEffect {
    /// List a directory.
    FetchListing {
        /// Request generation; only the latest is applied.
        generation: u64,
        /// Directory to list.
        path: String,
        /// Sort column sent to the server.
        sort_by: SortKey,
        /// Sort direction sent to the server.
        direction: SortDirection,
    },
    /// Load metadata for the detail panel.
    FetchMetadata {
        /// File path.
        path: String,
    },
    /// Load server settings.
    FetchSettings,
    /// Read stored preferences.
    LoadPrefs,
    /// Store preferences.
    PersistPrefs(FileBrowserPrefs),
    /// Send one file.
    Upload(UploadJob),
    /// Issue one delete call.
    Delete(DeleteJob),
    /// Request and save a zip archive.
    Zip(ZipJob),
    /// Rename an entry.
    Rename {
        /// Entry path.
        path: String,
        /// New name.
        new_name: String,
    },
    /// Move an entry.
    Move {
        /// Entry path.
        path: String,
        /// Destination directory.
        destination: String,
    },
    /// Create a directory.
    CreateFolder {
        /// Parent directory.
        parent: String,
        /// Folder name.
        name: String,
    },
    /// Replace a file's content.
    Replace {
        /// File path.
        path: String,
        /// New content.
        file: LocalFile,
    },
    /// Write text to the clipboard.
    CopyText {
        /// Text to copy.
        text: String,
    },
    /// Start a browser download of one file.
    OpenDownload {
        /// File path.
        path: String,
    },
    /// An upload run finished without errors.
    UploadsCompleted {
        /// Files uploaded in the run.
        uploaded: usize,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Local precondition failures; no request is issued when one is returned.
pub enum BrowserError {
    /// The path is not in the current listing.
    #[error("`{0}` is not in the current listing")]
    EntryNotFound(String),
    /// A name was blank after trimming.
    #[error("name cannot be empty")]
    EmptyName,
    /// A move destination was blank.
    #[error("destination cannot be empty")]
    EmptyDestination,
    /// A move destination equals the entry's current directory.
    #[error("entry is already in `{0}`")]
    SameDestination(String),
    /// Public links need a configured hostname.
    #[error("Public hostname not configured. Set it in Configuration.")]
    PublicHostnameMissing,
    /// Directories cannot be replaced or downloaded directly.
    #[error("`{0}` is a directory")]
    IsDirectory(String),
    /// The selection cannot be cleared while a bulk operation runs.
    #[error("selection is locked while a bulk operation is running")]
    SelectionLocked,
    /// Upload queue rejection.
    #[error(transparent)]
    Upload(#[from] UploadQueueError),
    /// Bulk action rejection.
    #[error(transparent)]
    Bulk(#[from] BulkActionError),
}

/// Applies a [`BrowserAction`] to the browser state and collects the resulting effects.
///
/// Every remote call is described by a returned [`BrowserEffect`]; the state never changes in
/// anticipation of a server result. Results tagged with an outdated generation, session, or
/// operation id are dropped.
///
/// # Errors
///
/// Returns a [`BrowserError`] when a local precondition fails; no effect is emitted and nothing
/// reaches the server in that case.
pub fn reduce_browser(
    state: &mut FileBrowserState,
    action: BrowserAction,
) -> Result<Vec<BrowserEffect>, BrowserError> {
    let mut effects = Vec::new();
    match action {
        BrowserAction::Initialize => {
            effects.push(BrowserEffect::LoadPrefs);
            effects.push(BrowserEffect::FetchSettings);
            change_directory(state, &mut effects);
        }
        BrowserAction::OpenFolder { path } => {
            // Reopening the current folder only refreshes it.
            state.history.open_folder(&path);
            change_directory(state, &mut effects);
        }
        BrowserAction::GoBack => {
            if state.history.go_back() {
                change_directory(state, &mut effects);
            }
        }
        BrowserAction::GoForward => {
            if state.history.go_forward() {
                change_directory(state, &mut effects);
            }
        }
        BrowserAction::GoUp => {
            if state.history.go_up() {
                change_directory(state, &mut effects);
            }
        }
        BrowserAction::Reload => request_listing(state, &mut effects),
        BrowserAction::ListingLoaded {
            generation,
            path,
            result,
        } => apply_listing(state, generation, &path, result),
        BrowserAction::SetSearchQuery { query } => state.query = query,
        BrowserAction::SetSort { sort_by, direction } => {
            update_prefs(state, &mut effects, |prefs| {
                prefs.sort_by = sort_by;
                prefs.sort_direction = direction;
            });
        }
        BrowserAction::ToggleSortColumn { column } => {
            let (sort_by, direction) =
                next_sort(state.prefs.sort_by, state.prefs.sort_direction, column);
            update_prefs(state, &mut effects, |prefs| {
                prefs.sort_by = sort_by;
                prefs.sort_direction = direction;
            });
        }
        BrowserAction::SetViewMode { mode } => {
            update_prefs(state, &mut effects, |prefs| prefs.view_mode = mode);
        }
        BrowserAction::SetOverwriteUploads { enabled } => {
            update_prefs(state, &mut effects, |prefs| prefs.overwrite_uploads = enabled);
        }
        BrowserAction::PrefsLoaded { prefs } => {
            if let Some(prefs) = prefs {
                state.prefs = prefs;
            }
            state.inline_errors.remove(&OperationKind::Prefs);
        }
        BrowserAction::SettingsLoaded { result } => match result {
            Ok(settings) => {
                let hostname = settings.public_hostname.trim();
                state.public_hostname = (!hostname.is_empty()).then(|| hostname.to_string());
                state.inline_errors.remove(&OperationKind::Settings);
            }
            Err(err) => {
                state
                    .inline_errors
                    .insert(OperationKind::Settings, err.message());
            }
        },
        BrowserAction::ClickEntry { path } => {
            let entry = listed(state, &path)?;
            if entry.is_dir {
                state.history.open_folder(&entry.path);
                change_directory(state, &mut effects);
            } else if clicks_toggle(state) {
                state.selection.toggle_in_selection(&entry);
            } else if state.selection.select_for_details(&entry) {
                open_details(state, &mut effects, entry);
            } else {
                state.details = None;
            }
        }
        BrowserAction::ToggleEntry { path } => {
            let entry = listed(state, &path)?;
            state.selection.toggle_in_selection(&entry);
        }
        BrowserAction::ShiftClickEntry { path } => {
            let displayed = state.displayed();
            let target = displayed
                .iter()
                .position(|entry| entry.path == path)
                .ok_or(BrowserError::EntryNotFound(path))?;
            state.selection.extend_to(&displayed, target);
        }
        BrowserAction::SelectRange { from, to } => {
            let displayed = state.displayed();
            state.selection.select_range(&displayed, from, to);
        }
        BrowserAction::SelectAll | BrowserAction::Shortcut(Shortcut::SelectAll) => {
            let displayed = state.displayed();
            state.selection.select_all(&displayed);
        }
        BrowserAction::ClearSelection => {
            if !state.bulk.can_clear_selection() {
                return Err(BrowserError::SelectionLocked);
            }
            state.selection.clear();
        }
        BrowserAction::Shortcut(Shortcut::Escape) => {
            if !state.selection.is_empty() && state.bulk.can_clear_selection() {
                state.selection.clear();
            }
        }
        BrowserAction::Shortcut(Shortcut::Delete) => {
            if !state.selection.is_empty() {
                state
                    .bulk
                    .open_delete(state.selection.entries(), ConfirmTarget::Literal)?;
            }
        }
        BrowserAction::ShowDetails { path } => {
            let entry = listed(state, &path)?;
            if entry.is_dir {
                return Err(BrowserError::IsDirectory(path));
            }
            open_details(state, &mut effects, entry);
        }
        BrowserAction::CloseDetails => state.details = None,
        BrowserAction::MetadataLoaded { path, result } => match state.details.as_mut() {
            Some(details) if details.entry.path == path => {
                details.loading = false;
                match result {
                    Ok(metadata) => {
                        details.metadata = Some(metadata);
                        details.error = None;
                    }
                    Err(err) => details.error = Some(err.message()),
                }
            }
            _ => trace::trace_stale_result("metadata"),
        },
        BrowserAction::DragEnter { carries_files } => state.drop_zone.enter(carries_files),
        BrowserAction::DragLeave => state.drop_zone.leave(),
        BrowserAction::DropFiles { files } => {
            state.drop_zone.drop_files();
            enqueue_uploads(state, files)?;
        }
        BrowserAction::PickFiles { files } => enqueue_uploads(state, files)?,
        BrowserAction::AddUploadFiles { files } => {
            state.uploads.add(files)?;
            state.upload_panel_open = true;
        }
        BrowserAction::RemoveUpload { name } => {
            state.uploads.remove(&name)?;
        }
        BrowserAction::StartUpload => {
            let directory = state.current_path().to_string();
            let job = state
                .uploads
                .start(&directory, state.prefs.overwrite_uploads)?;
            state.inline_errors.remove(&OperationKind::Upload);
            trace::trace_upload_started(job.session, job.index, &job.file.name, &job.directory);
            effects.push(BrowserEffect::Upload(job));
        }
        BrowserAction::CloseUploadPanel => {
            state.uploads.clear()?;
            state.upload_panel_open = false;
        }
        BrowserAction::UploadProgress {
            session,
            index,
            percent,
        } => {
            if !state.uploads.record_progress(session, index, percent) {
                trace::trace_stale_result("upload-progress");
            }
        }
        BrowserAction::UploadFinished {
            session,
            index,
            result,
        } => {
            trace::trace_upload_finished(session, index, result.is_ok());
            let result = result.map_err(|err| err.message());
            match state.uploads.finish_item(session, index, result) {
                None => trace::trace_stale_result("upload"),
                Some(UploadStep::Next(job)) => {
                    trace::trace_upload_started(
                        job.session,
                        job.index,
                        &job.file.name,
                        &job.directory,
                    );
                    effects.push(BrowserEffect::Upload(job));
                }
                Some(UploadStep::Completed { uploaded }) => {
                    state.upload_panel_open = false;
                    state.push_notice(NoticeLevel::Success, "Upload complete");
                    effects.push(BrowserEffect::UploadsCompleted { uploaded });
                    request_listing(state, &mut effects);
                }
                Some(UploadStep::FinishedWithErrors { uploaded, failed }) => {
                    state.inline_errors.insert(
                        OperationKind::Upload,
                        format!("{failed} {} failed to upload", plural(failed, "file")),
                    );
                    if uploaded > 0 {
                        request_listing(state, &mut effects);
                    }
                }
            }
        }
        BrowserAction::OpenBulkDelete => {
            state
                .bulk
                .open_delete(state.selection.entries(), ConfirmTarget::Literal)?;
        }
        BrowserAction::OpenDeleteEntry { path } => {
            let entry = listed(state, &path)?;
            if entry.is_dir {
                return Err(BrowserError::IsDirectory(path));
            }
            if state.bulk.is_busy() {
                return Err(BulkActionError::Busy.into());
            }
            state.selection.clear();
            state.selection.toggle_in_selection(&entry);
            let target = ConfirmTarget::FileName(entry.name.clone());
            state.bulk.open_delete(state.selection.entries(), target)?;
        }
        BrowserAction::SetDeleteConfirmation { text } => {
            state.bulk.set_confirmation_input(&text)?;
        }
        BrowserAction::ConfirmDelete => {
            let job = state.bulk.begin_delete(state.selection.entries())?;
            state.inline_errors.remove(&OperationKind::Delete);
            effects.push(BrowserEffect::Delete(job));
        }
        BrowserAction::CancelDelete => state.bulk.cancel_delete()?,
        BrowserAction::DeleteFinished {
            operation,
            index,
            result,
        } => {
            trace::trace_bulk_step(operation, "delete", index, result.is_ok());
            let result = result.map_err(|err| err.message());
            match state.bulk.finish_delete(operation, index, result) {
                None => trace::trace_stale_result("delete"),
                Some(DeleteStep::Next(job)) => effects.push(BrowserEffect::Delete(job)),
                Some(DeleteStep::Finished(outcome)) => {
                    if outcome.is_success() {
                        state.selection.clear();
                        state.details = None;
                        state.push_notice(
                            NoticeLevel::Success,
                            format!(
                                "{} {} deleted",
                                outcome.succeeded,
                                plural(outcome.succeeded, "item")
                            ),
                        );
                    } else {
                        let message = outcome.last_error().unwrap_or("Delete failed").to_string();
                        state
                            .inline_errors
                            .insert(OperationKind::Delete, message.clone());
                        state.push_notice(NoticeLevel::Error, message);
                    }
                    request_listing(state, &mut effects);
                }
            }
        }
        BrowserAction::DownloadZip => {
            let job = state.bulk.begin_zip(state.selection.entries())?;
            state.inline_errors.remove(&OperationKind::Zip);
            effects.push(BrowserEffect::Zip(job));
        }
        BrowserAction::ZipFinished { operation, result } => {
            trace::trace_bulk_step(operation, "zip", 0, result.is_ok());
            let result = result.map_err(|err| err.message());
            match state.bulk.finish_zip(operation, result) {
                None => trace::trace_stale_result("zip"),
                Some(outcome) if outcome.is_success() => {
                    state.push_notice(
                        NoticeLevel::Success,
                        format!(
                            "ZIP download started ({} {})",
                            outcome.attempted,
                            plural(outcome.attempted, "item")
                        ),
                    );
                }
                Some(outcome) => {
                    let message = outcome
                        .last_error()
                        .unwrap_or("Failed to create ZIP")
                        .to_string();
                    state.inline_errors.insert(OperationKind::Zip, message.clone());
                    state.push_notice(NoticeLevel::Error, message);
                }
            }
        }
        BrowserAction::Rename { path, new_name } => {
            let entry = listed(state, &path)?;
            let new_name = non_empty(&new_name)?;
            if new_name != entry.name {
                state.inline_errors.remove(&OperationKind::Rename);
                effects.push(BrowserEffect::Rename {
                    path: entry.path,
                    new_name,
                });
            }
        }
        BrowserAction::Move { path, destination } => {
            let entry = listed(state, &path)?;
            if destination.trim().is_empty() {
                return Err(BrowserError::EmptyDestination);
            }
            let destination = normalize_virtual_path(destination.trim());
            if parent_path(&entry.path).as_deref() == Some(destination.as_str()) {
                return Err(BrowserError::SameDestination(destination));
            }
            state.inline_errors.remove(&OperationKind::Move);
            effects.push(BrowserEffect::Move {
                path: entry.path,
                destination,
            });
        }
        BrowserAction::CreateFolder { name } => {
            let name = non_empty(&name)?;
            state.inline_errors.remove(&OperationKind::Mkdir);
            effects.push(BrowserEffect::CreateFolder {
                parent: state.current_path().to_string(),
                name,
            });
        }
        BrowserAction::ReplaceFile { path, file } => {
            let entry = listed(state, &path)?;
            if entry.is_dir {
                return Err(BrowserError::IsDirectory(path));
            }
            state.inline_errors.remove(&OperationKind::Replace);
            effects.push(BrowserEffect::Replace {
                path: entry.path,
                file,
            });
        }
        BrowserAction::MutationFinished {
            kind,
            subject,
            result,
        } => {
            trace::trace_mutation_finished(kind.as_str(), &subject, result.is_ok());
            match result {
                Ok(()) => {
                    state.inline_errors.remove(&kind);
                    state.push_notice(NoticeLevel::Success, mutation_notice(kind, &subject));
                    request_listing(state, &mut effects);
                }
                Err(err) => {
                    state.inline_errors.insert(kind, err.message());
                }
            }
        }
        BrowserAction::CopyPublicUrl { path } => {
            let hostname = state
                .public_hostname
                .as_deref()
                .ok_or(BrowserError::PublicHostnameMissing)?;
            let text = public_url(hostname, &path).ok_or(BrowserError::PublicHostnameMissing)?;
            effects.push(BrowserEffect::CopyText { text });
        }
        BrowserAction::DownloadEntry { path } => {
            let entry = listed(state, &path)?;
            if entry.is_dir {
                return Err(BrowserError::IsDirectory(path));
            }
            state.push_notice(NoticeLevel::Success, format!("Downloading {}", entry.name));
            effects.push(BrowserEffect::OpenDownload { path: entry.path });
        }
        BrowserAction::HostActionFinished { kind, result } => match result {
            Ok(()) => {
                state.inline_errors.remove(&kind);
                if kind == OperationKind::CopyUrl {
                    state.push_notice(NoticeLevel::Success, "URL copied to clipboard");
                }
            }
            Err(message) => {
                state.inline_errors.insert(kind, message);
            }
        },
        BrowserAction::DismissNotice { id } => {
            state.dismiss_notice(id);
        }
    }
    Ok(effects)
}

fn listed(state: &FileBrowserState, path: &str) -> Result<FileEntry, BrowserError> {
    state
        .find_listed(path)
        .cloned()
        .ok_or_else(|| BrowserError::EntryNotFound(path.to_string()))
}

fn non_empty(name: &str) -> Result<String, BrowserError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BrowserError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

fn mutation_notice(kind: OperationKind, subject: &str) -> String {
    match kind {
        OperationKind::Rename => format!("Renamed to \"{subject}\""),
        OperationKind::Move => format!("Moved to \"{subject}\""),
        OperationKind::Mkdir => format!("Folder \"{subject}\" created"),
        OperationKind::Replace => format!("Replaced {subject}"),
        other => format!("{} finished", other.as_str()),
    }
}

/// Leaves the displayed directory: selection, details, and rows belong to the old one.
fn change_directory(state: &mut FileBrowserState, effects: &mut Vec<BrowserEffect>) {
    state.selection.clear();
    state.details = None;
    state.listing.clear();
    state.error = None;
    state.inline_errors.remove(&OperationKind::Listing);
    request_listing(state, effects);
}

fn request_listing(state: &mut FileBrowserState, effects: &mut Vec<BrowserEffect>) {
    state.listing_generation += 1;
    state.loading = true;
    let path = state.current_path().to_string();
    trace::trace_listing_requested(state.listing_generation, &path);
    effects.push(BrowserEffect::FetchListing {
        generation: state.listing_generation,
        path,
        sort_by: state.prefs.sort_by,
        direction: state.prefs.sort_direction,
    });
}

fn apply_listing(
    state: &mut FileBrowserState,
    generation: u64,
    path: &str,
    result: Result<FileListing, ApiError>,
) {
    if generation != state.listing_generation {
        trace::trace_listing_dropped_stale(generation, state.listing_generation, path);
        return;
    }
    state.loading = false;
    match result {
        Ok(listing) => {
            state.listing = listing.files;
            state.error = None;
            state.inline_errors.remove(&OperationKind::Listing);
            let pruned = state.selection.retain_listed(&state.listing);
            let refreshed = state
                .details
                .as_ref()
                .map(|details| state.find_listed(&details.entry.path).cloned());
            match refreshed {
                Some(Some(entry)) => {
                    if let Some(details) = state.details.as_mut() {
                        details.entry = entry;
                    }
                }
                Some(None) => state.details = None,
                None => {}
            }
            trace::trace_listing_applied(generation, path, state.listing.len(), pruned);
        }
        Err(err) => {
            let message = match &err {
                ApiError::Server { message, .. } => message.clone(),
                _ => "Failed to load files".to_string(),
            };
            state.listing.clear();
            state.selection.clear();
            state.details = None;
            state.error = Some(message);
            state
                .inline_errors
                .insert(OperationKind::Listing, err.message());
        }
    }
}

/// Plain row clicks toggle once the selection holds more than the file shown in details.
fn clicks_toggle(state: &FileBrowserState) -> bool {
    match state.selection.entries() {
        [] => false,
        [only] => state
            .details
            .as_ref()
            .map_or(true, |details| details.entry.path != only.path),
        _ => true,
    }
}

fn open_details(state: &mut FileBrowserState, effects: &mut Vec<BrowserEffect>, entry: FileEntry) {
    let path = entry.path.clone();
    state.details = Some(DetailsPanel::loading(entry));
    state.inline_errors.remove(&OperationKind::Metadata);
    effects.push(BrowserEffect::FetchMetadata { path });
}

fn enqueue_uploads(state: &mut FileBrowserState, files: Vec<LocalFile>) -> Result<(), BrowserError> {
    if files.is_empty() {
        return Ok(());
    }
    state.uploads.enqueue(files)?;
    state.upload_panel_open = true;
    state.inline_errors.remove(&OperationKind::Upload);
    Ok(())
}

fn update_prefs(
    state: &mut FileBrowserState,
    effects: &mut Vec<BrowserEffect>,
    edit: impl FnOnce(&mut FileBrowserPrefs),
) {
    let before = state.prefs;
    edit(&mut state.prefs);
    if state.prefs != before {
        effects.push(BrowserEffect::PersistPrefs(state.prefs));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{bulk::BulkKind, upload::UploadStatus};

    fn listing(path: &str, files: Vec<FileEntry>) -> FileListing {
        FileListing {
            path: path.to_string(),
            files,
        }
    }

    fn fetch_generation(effects: &[BrowserEffect]) -> u64 {
        effects
            .iter()
            .find_map(|effect| match effect {
                BrowserEffect::FetchListing { generation, .. } => Some(*generation),
                _ => None,
            })
            .expect("listing fetch")
    }

    fn loaded(state: &mut FileBrowserState, generation: u64, files: Vec<FileEntry>) {
        let path = state.current_path().to_string();
        reduce_browser(
            state,
            BrowserAction::ListingLoaded {
                generation,
                path: path.clone(),
                result: Ok(listing(&path, files)),
            },
        )
        .expect("listing applied");
    }

    fn docs_state() -> FileBrowserState {
        let mut state = FileBrowserState::new("/docs");
        let effects = reduce_browser(&mut state, BrowserAction::Reload).expect("reload");
        let generation = fetch_generation(&effects);
        loaded(
            &mut state,
            generation,
            vec![
                FileEntry::dir("/docs/sub"),
                FileEntry::file("/docs/a.txt", 1),
                FileEntry::file("/docs/b.txt", 2),
                FileEntry::file("/docs/c.txt", 3),
            ],
        );
        state
    }

    fn act(state: &mut FileBrowserState, action: BrowserAction) -> Vec<BrowserEffect> {
        reduce_browser(state, action).expect("action accepted")
    }

    #[test]
    fn initialize_loads_prefs_settings_and_listing() {
        let mut state = FileBrowserState::default();
        let effects = act(&mut state, BrowserAction::Initialize);
        assert_eq!(
            effects,
            vec![
                BrowserEffect::LoadPrefs,
                BrowserEffect::FetchSettings,
                BrowserEffect::FetchListing {
                    generation: 1,
                    path: "/".to_string(),
                    sort_by: SortKey::Name,
                    direction: SortDirection::Asc,
                },
            ]
        );
        assert!(state.loading);
    }

    #[test]
    fn stale_listing_never_overwrites_newer_directory() {
        let mut state = FileBrowserState::default();
        let old = fetch_generation(&act(
            &mut state,
            BrowserAction::OpenFolder {
                path: "/old".to_string(),
            },
        ));
        let new = fetch_generation(&act(
            &mut state,
            BrowserAction::OpenFolder {
                path: "/new".to_string(),
            },
        ));

        loaded(&mut state, new, vec![FileEntry::file("/new/n.txt", 1)]);
        loaded(&mut state, old, vec![FileEntry::file("/old/o.txt", 1)]);

        assert_eq!(state.current_path(), "/new");
        assert_eq!(state.listing, vec![FileEntry::file("/new/n.txt", 1)]);
        assert!(!state.loading);
    }

    #[test]
    fn path_change_clears_selection_and_details() {
        let mut state = docs_state();
        let effects = act(
            &mut state,
            BrowserAction::ClickEntry {
                path: "/docs/a.txt".to_string(),
            },
        );
        assert_eq!(
            effects,
            vec![BrowserEffect::FetchMetadata {
                path: "/docs/a.txt".to_string()
            }]
        );
        assert!(state.details.is_some());

        act(
            &mut state,
            BrowserAction::ClickEntry {
                path: "/docs/sub".to_string(),
            },
        );
        assert_eq!(state.current_path(), "/docs/sub");
        assert!(state.selection.is_empty());
        assert!(state.details.is_none());
        assert!(state.listing.is_empty());
        assert!(state.history.can_go_back());
    }

    #[test]
    fn multi_select_mode_turns_clicks_into_toggles() {
        let mut state = docs_state();
        act(
            &mut state,
            BrowserAction::ToggleEntry {
                path: "/docs/a.txt".to_string(),
            },
        );
        let effects = act(
            &mut state,
            BrowserAction::ClickEntry {
                path: "/docs/b.txt".to_string(),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(state.selection.paths(), vec!["/docs/a.txt", "/docs/b.txt"]);
        assert!(state.details.is_none());
        assert!(state.some_selected());
    }

    #[test]
    fn plain_clicks_replace_selection_and_reclick_closes_details() {
        let mut state = docs_state();
        act(
            &mut state,
            BrowserAction::ClickEntry {
                path: "/docs/a.txt".to_string(),
            },
        );
        let effects = act(
            &mut state,
            BrowserAction::ClickEntry {
                path: "/docs/b.txt".to_string(),
            },
        );
        assert_eq!(
            effects,
            vec![BrowserEffect::FetchMetadata {
                path: "/docs/b.txt".to_string()
            }]
        );
        assert_eq!(state.selection.paths(), vec!["/docs/b.txt"]);
        assert_eq!(
            state.details.as_ref().map(|d| d.entry.path.as_str()),
            Some("/docs/b.txt")
        );

        let effects = act(
            &mut state,
            BrowserAction::ClickEntry {
                path: "/docs/b.txt".to_string(),
            },
        );
        assert!(effects.is_empty());
        assert!(state.selection.is_empty());
        assert!(state.details.is_none());
    }

    #[test]
    fn toggle_beside_details_turns_clicks_into_toggles() {
        let mut state = docs_state();
        act(
            &mut state,
            BrowserAction::ClickEntry {
                path: "/docs/a.txt".to_string(),
            },
        );
        act(
            &mut state,
            BrowserAction::ToggleEntry {
                path: "/docs/b.txt".to_string(),
            },
        );
        let effects = act(
            &mut state,
            BrowserAction::ClickEntry {
                path: "/docs/c.txt".to_string(),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(
            state.selection.paths(),
            vec!["/docs/a.txt", "/docs/b.txt", "/docs/c.txt"]
        );
    }

    #[test]
    fn metadata_for_a_replaced_panel_is_ignored() {
        let mut state = docs_state();
        for path in ["/docs/a.txt", "/docs/b.txt"] {
            act(
                &mut state,
                BrowserAction::ShowDetails {
                    path: path.to_string(),
                },
            );
        }
        let effects = act(
            &mut state,
            BrowserAction::MetadataLoaded {
                path: "/docs/a.txt".to_string(),
                result: Ok(FileMetadata {
                    name: "a.txt".to_string(),
                    path: "/docs/a.txt".to_string(),
                    size: 1,
                    mime_type: "text/plain".to_string(),
                    sha256: String::new(),
                    created: None,
                    modified: None,
                    public_url: String::new(),
                }),
            },
        );
        assert!(effects.is_empty());
        let details = state.details.as_ref().expect("panel open");
        assert_eq!(details.entry.path, "/docs/b.txt");
        assert!(details.loading);
        assert_eq!(details.metadata, None);
    }

    #[test]
    fn listing_refresh_prunes_selection_and_details() {
        let mut state = docs_state();
        act(
            &mut state,
            BrowserAction::ClickEntry {
                path: "/docs/a.txt".to_string(),
            },
        );
        act(
            &mut state,
            BrowserAction::ToggleEntry {
                path: "/docs/b.txt".to_string(),
            },
        );
        let generation = fetch_generation(&act(&mut state, BrowserAction::Reload));
        loaded(&mut state, generation, vec![FileEntry::file("/docs/b.txt", 9)]);

        assert_eq!(state.selection.paths(), vec!["/docs/b.txt"]);
        assert_eq!(state.selection.entries()[0].size, 9);
        assert!(state.details.is_none());
    }

    #[test]
    fn failed_listing_sets_error_and_keeps_navigation() {
        let mut state = docs_state();
        let generation = fetch_generation(&act(&mut state, BrowserAction::Reload));
        act(
            &mut state,
            BrowserAction::ListingLoaded {
                generation,
                path: "/docs".to_string(),
                result: Err(ApiError::server(404, "Directory not found")),
            },
        );
        assert_eq!(state.error.as_deref(), Some("Directory not found"));
        assert!(state.listing.is_empty());
        assert!(state.history.can_go_up());
        assert_eq!(act(&mut state, BrowserAction::Reload).len(), 1);
    }

    #[test]
    fn select_all_and_shortcuts() {
        let mut state = docs_state();
        act(&mut state, BrowserAction::Shortcut(Shortcut::SelectAll));
        assert!(state.all_selected());
        assert_eq!(state.selection.len(), 3);

        act(&mut state, BrowserAction::Shortcut(Shortcut::Delete));
        assert_eq!(
            state.bulk.confirmation().map(|c| c.expected()),
            Some("DELETE")
        );

        act(&mut state, BrowserAction::Shortcut(Shortcut::Escape));
        assert!(state.selection.is_empty());
    }

    #[test]
    fn shift_click_uses_display_order() {
        let mut state = docs_state();
        act(
            &mut state,
            BrowserAction::SetSort {
                sort_by: SortKey::Size,
                direction: SortDirection::Desc,
            },
        );
        act(
            &mut state,
            BrowserAction::ToggleEntry {
                path: "/docs/c.txt".to_string(),
            },
        );
        act(
            &mut state,
            BrowserAction::ShiftClickEntry {
                path: "/docs/a.txt".to_string(),
            },
        );
        assert_eq!(
            state.selection.paths(),
            vec!["/docs/c.txt", "/docs/b.txt", "/docs/a.txt"]
        );
    }

    #[test]
    fn sort_changes_persist_prefs_once() {
        let mut state = docs_state();
        let effects = act(
            &mut state,
            BrowserAction::ToggleSortColumn {
                column: SortKey::Name,
            },
        );
        let mut expected = FileBrowserPrefs::default();
        expected.sort_direction = SortDirection::Desc;
        assert_eq!(effects, vec![BrowserEffect::PersistPrefs(expected)]);

        let effects = act(
            &mut state,
            BrowserAction::SetSort {
                sort_by: SortKey::Name,
                direction: SortDirection::Desc,
            },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn bulk_delete_reloads_even_on_failure() {
        let mut state = docs_state();
        act(&mut state, BrowserAction::SelectAll);
        act(&mut state, BrowserAction::OpenBulkDelete);
        act(
            &mut state,
            BrowserAction::SetDeleteConfirmation {
                text: "delete".to_string(),
            },
        );
        let effects = act(&mut state, BrowserAction::ConfirmDelete);
        let BrowserEffect::Delete(first) = &effects[0] else {
            panic!("expected delete");
        };
        assert_eq!(
            reduce_browser(&mut state, BrowserAction::ClearSelection),
            Err(BrowserError::SelectionLocked)
        );

        let operation = first.operation;
        act(
            &mut state,
            BrowserAction::DeleteFinished {
                operation,
                index: 0,
                result: Ok(()),
            },
        );
        act(
            &mut state,
            BrowserAction::DeleteFinished {
                operation,
                index: 1,
                result: Err(ApiError::server(403, "Permission denied")),
            },
        );
        let effects = act(
            &mut state,
            BrowserAction::DeleteFinished {
                operation,
                index: 2,
                result: Ok(()),
            },
        );
        assert!(matches!(effects[0], BrowserEffect::FetchListing { .. }));
        assert_eq!(
            state.inline_error(OperationKind::Delete),
            Some("Permission denied")
        );
        assert_eq!(state.selection.len(), 3);
    }

    #[test]
    fn bulk_delete_of_one_checked_file_takes_the_literal() {
        let mut state = docs_state();
        act(
            &mut state,
            BrowserAction::ToggleEntry {
                path: "/docs/a.txt".to_string(),
            },
        );
        act(&mut state, BrowserAction::OpenBulkDelete);
        assert_eq!(
            state.bulk.confirmation().map(|c| c.expected()),
            Some("DELETE")
        );
        act(
            &mut state,
            BrowserAction::SetDeleteConfirmation {
                text: "delete".to_string(),
            },
        );
        let effects = act(&mut state, BrowserAction::ConfirmDelete);
        let [BrowserEffect::Delete(job)] = effects.as_slice() else {
            panic!("expected one delete call");
        };
        assert_eq!(job.path, "/docs/a.txt");
        assert_eq!(job.confirm_filename, "a.txt");
    }

    #[test]
    fn row_delete_selects_single_file_and_expects_its_name() {
        let mut state = docs_state();
        act(&mut state, BrowserAction::SelectAll);
        act(
            &mut state,
            BrowserAction::OpenDeleteEntry {
                path: "/docs/b.txt".to_string(),
            },
        );
        assert_eq!(state.selection.paths(), vec!["/docs/b.txt"]);
        assert_eq!(
            state.bulk.confirmation().map(|c| c.expected()),
            Some("b.txt")
        );
        assert_eq!(
            reduce_browser(&mut state, BrowserAction::ConfirmDelete),
            Err(BrowserError::Bulk(BulkActionError::ConfirmationMismatch {
                expected: "b.txt".to_string()
            }))
        );
    }

    #[test]
    fn zip_keeps_selection() {
        let mut state = docs_state();
        act(
            &mut state,
            BrowserAction::ToggleEntry {
                path: "/docs/a.txt".to_string(),
            },
        );
        let effects = act(&mut state, BrowserAction::DownloadZip);
        let BrowserEffect::Zip(job) = &effects[0] else {
            panic!("expected zip");
        };
        assert_eq!(job.file_name, "a.txt.zip");
        assert_eq!(state.bulk.in_flight_kind(), Some(BulkKind::Zip));
        let operation = job.operation;
        act(
            &mut state,
            BrowserAction::ZipFinished {
                operation,
                result: Ok(()),
            },
        );
        assert_eq!(state.selection.paths(), vec!["/docs/a.txt"]);
        assert_eq!(state.bulk.in_flight_kind(), None);
    }

    #[test]
    fn mutations_check_preconditions_locally() {
        let mut state = docs_state();
        assert_eq!(
            reduce_browser(
                &mut state,
                BrowserAction::Rename {
                    path: "/docs/a.txt".to_string(),
                    new_name: "   ".to_string(),
                }
            ),
            Err(BrowserError::EmptyName)
        );
        assert_eq!(
            reduce_browser(
                &mut state,
                BrowserAction::Move {
                    path: "/docs/a.txt".to_string(),
                    destination: "/docs/".to_string(),
                }
            ),
            Err(BrowserError::SameDestination("/docs".to_string()))
        );
        assert_eq!(
            reduce_browser(
                &mut state,
                BrowserAction::ReplaceFile {
                    path: "/docs/sub".to_string(),
                    file: LocalFile::from_bytes("x", b"x".to_vec()),
                }
            ),
            Err(BrowserError::IsDirectory("/docs/sub".to_string()))
        );
        assert_eq!(
            reduce_browser(
                &mut state,
                BrowserAction::Rename {
                    path: "/docs/zzz".to_string(),
                    new_name: "y".to_string(),
                }
            ),
            Err(BrowserError::EntryNotFound("/docs/zzz".to_string()))
        );
        assert_eq!(
            act(
                &mut state,
                BrowserAction::CreateFolder {
                    name: " reports ".to_string()
                }
            ),
            vec![BrowserEffect::CreateFolder {
                parent: "/docs".to_string(),
                name: "reports".to_string(),
            }]
        );
    }

    #[test]
    fn mutation_failure_is_inline_and_success_reloads() {
        let mut state = docs_state();
        let effects = act(
            &mut state,
            BrowserAction::MutationFinished {
                kind: OperationKind::Rename,
                subject: "b.txt".to_string(),
                result: Err(ApiError::server(409, "A file with this name already exists")),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(
            state.inline_error(OperationKind::Rename),
            Some("A file with this name already exists")
        );

        let effects = act(
            &mut state,
            BrowserAction::MutationFinished {
                kind: OperationKind::Rename,
                subject: "c2.txt".to_string(),
                result: Ok(()),
            },
        );
        assert!(matches!(effects[0], BrowserEffect::FetchListing { .. }));
        assert_eq!(state.inline_error(OperationKind::Rename), None);
        assert_eq!(
            state.notices.back().map(|n| n.message.as_str()),
            Some("Renamed to \"c2.txt\"")
        );
    }

    #[test]
    fn copy_url_needs_hostname() {
        let mut state = docs_state();
        assert_eq!(
            reduce_browser(
                &mut state,
                BrowserAction::CopyPublicUrl {
                    path: "/docs/a.txt".to_string()
                }
            ),
            Err(BrowserError::PublicHostnameMissing)
        );
        act(
            &mut state,
            BrowserAction::SettingsLoaded {
                result: Ok(PanelSettings {
                    public_hostname: "files.example.com".to_string(),
                    ..PanelSettings::default()
                }),
            },
        );
        assert_eq!(
            act(
                &mut state,
                BrowserAction::CopyPublicUrl {
                    path: "/docs/a.txt".to_string()
                }
            ),
            vec![BrowserEffect::CopyText {
                text: "https://files.example.com/docs/a.txt".to_string()
            }]
        );
    }

    #[test]
    fn upload_flow_reloads_and_closes_panel() {
        let mut state = docs_state();
        act(
            &mut state,
            BrowserAction::DragEnter {
                carries_files: true,
            },
        );
        assert!(state.drop_zone.is_active());
        act(
            &mut state,
            BrowserAction::DropFiles {
                files: vec![LocalFile::from_bytes("n.txt", b"n".to_vec())],
            },
        );
        assert!(!state.drop_zone.is_active());
        assert!(state.upload_panel_open);

        let effects = act(&mut state, BrowserAction::StartUpload);
        let BrowserEffect::Upload(job) = &effects[0] else {
            panic!("expected upload");
        };
        assert_eq!(job.directory, "/docs");
        let (session, index) = (job.session, job.index);
        assert_eq!(
            reduce_browser(&mut state, BrowserAction::CloseUploadPanel),
            Err(BrowserError::Upload(UploadQueueError::Busy))
        );

        act(
            &mut state,
            BrowserAction::UploadProgress {
                session,
                index,
                percent: 60,
            },
        );
        assert_eq!(state.uploads.items()[0].status, UploadStatus::Uploading);
        assert_eq!(state.uploads.overall_progress(), 60);

        let effects = act(
            &mut state,
            BrowserAction::UploadFinished {
                session,
                index,
                result: Ok(()),
            },
        );
        assert_eq!(effects[0], BrowserEffect::UploadsCompleted { uploaded: 1 });
        assert!(matches!(effects[1], BrowserEffect::FetchListing { .. }));
        assert!(!state.upload_panel_open);
        assert!(state.uploads.is_empty());
    }
}
