//! File-browser state owned by the reducer.

use std::collections::{BTreeMap, VecDeque};

use panel_host::{FileBrowserPrefs, FileEntry, FileMetadata};

use crate::{
    bulk::BulkActionCoordinator,
    history::PathHistory,
    projection::project_entries,
    selection::SelectionModel,
    upload::{DropZone, UploadQueue},
};

/// Notices kept before the oldest is dropped.
pub const MAX_NOTICES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Operation that can surface an inline error next to its control.
pub enum OperationKind {
    /// Directory listing fetch.
    Listing,
    /// Detail-panel metadata fetch.
    Metadata,
    /// Rename of one entry.
    Rename,
    /// Move of one entry.
    Move,
    /// Folder creation.
    Mkdir,
    /// File content replacement.
    Replace,
    /// Single or bulk delete.
    Delete,
    /// Zip download.
    Zip,
    /// Upload run.
    Upload,
    /// Public URL copy.
    CopyUrl,
    /// Direct file download.
    Download,
    /// Preference load or save.
    Prefs,
    /// Server settings load.
    Settings,
}

impl OperationKind {
    /// Stable lowercase token for trace fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Metadata => "metadata",
            Self::Rename => "rename",
            Self::Move => "move",
            Self::Mkdir => "mkdir",
            Self::Replace => "replace",
            Self::Delete => "delete",
            Self::Zip => "zip",
            Self::Upload => "upload",
            Self::CopyUrl => "copy-url",
            Self::Download => "download",
            Self::Prefs => "prefs",
            Self::Settings => "settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Toast severity.
pub enum NoticeLevel {
    /// Completed operation.
    Success,
    /// Failed operation.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A toast message.
pub struct Notice {
    /// Id used to dismiss the notice.
    pub id: u64,
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Detail panel for one file.
pub struct DetailsPanel {
    /// Listing row the panel was opened for.
    pub entry: FileEntry,
    /// Metadata once loaded.
    pub metadata: Option<FileMetadata>,
    /// Whether the metadata request is outstanding.
    pub loading: bool,
    /// Metadata load failure.
    pub error: Option<String>,
}

impl DetailsPanel {
    pub(crate) fn loading(entry: FileEntry) -> Self {
        Self {
            entry,
            metadata: None,
            loading: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Complete interaction state of one file-browser view.
pub struct FileBrowserState {
    /// Current directory and back/forward stacks.
    pub history: PathHistory,
    /// Raw rows of the last applied listing.
    pub listing: Vec<FileEntry>,
    /// Whether a listing request is outstanding.
    pub loading: bool,
    /// Listing failure for the current directory.
    pub error: Option<String>,
    /// Generation of the most recently issued listing request.
    pub listing_generation: u64,
    /// Name filter typed into the search box.
    pub query: String,
    /// Sort, view, and upload preferences.
    pub prefs: FileBrowserPrefs,
    /// Selected files.
    pub selection: SelectionModel,
    /// Open detail panel.
    pub details: Option<DetailsPanel>,
    /// Upload queue.
    pub uploads: UploadQueue,
    /// Whether the upload panel is shown.
    pub upload_panel_open: bool,
    /// Drag-over overlay.
    pub drop_zone: DropZone,
    /// Delete/zip coordination.
    pub bulk: BulkActionCoordinator,
    /// Hostname used for public links, from the server settings.
    pub public_hostname: Option<String>,
    /// Latest failure per operation, shown beside its control.
    pub inline_errors: BTreeMap<OperationKind, String>,
    /// Toasts, oldest first.
    pub notices: VecDeque<Notice>,
    next_notice_id: u64,
}

impl Default for FileBrowserState {
    fn default() -> Self {
        Self::new(panel_host::ROOT_PATH)
    }
}

impl FileBrowserState {
    /// Fresh state positioned at `initial_path`.
    pub fn new(initial_path: &str) -> Self {
        Self {
            history: PathHistory::new(initial_path),
            listing: Vec::new(),
            loading: false,
            error: None,
            listing_generation: 0,
            query: String::new(),
            prefs: FileBrowserPrefs::default(),
            selection: SelectionModel::default(),
            details: None,
            uploads: UploadQueue::default(),
            upload_panel_open: false,
            drop_zone: DropZone::default(),
            bulk: BulkActionCoordinator::default(),
            public_hostname: None,
            inline_errors: BTreeMap::new(),
            notices: VecDeque::new(),
            next_notice_id: 0,
        }
    }

    /// Directory on display.
    pub fn current_path(&self) -> &str {
        self.history.current()
    }

    /// Rows in display order after filtering and sorting.
    pub fn displayed(&self) -> Vec<FileEntry> {
        project_entries(
            &self.listing,
            &self.query,
            self.prefs.sort_by,
            self.prefs.sort_direction,
        )
    }

    /// Listing row by path.
    pub fn find_listed(&self, path: &str) -> Option<&FileEntry> {
        self.listing.iter().find(|entry| entry.path == path)
    }

    /// Whether any file is selected, which shows the bulk toolbar.
    pub fn is_multi_select_mode(&self) -> bool {
        self.selection.is_multi_select_mode()
    }

    /// Whether every displayed file is selected.
    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(&self.displayed())
    }

    /// Whether some, but not all, displayed files are selected.
    pub fn some_selected(&self) -> bool {
        self.selection.some_selected(&self.displayed())
    }

    /// Inline error for `kind`.
    pub fn inline_error(&self, kind: OperationKind) -> Option<&str> {
        self.inline_errors.get(&kind).map(String::as_str)
    }

    /// Appends a toast, dropping the oldest past [`MAX_NOTICES`]. Returns its id.
    pub fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.next_notice_id += 1;
        self.notices.push_back(Notice {
            id: self.next_notice_id,
            level,
            message: message.into(),
        });
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
        self.next_notice_id
    }

    /// Removes a toast; returns whether it existed.
    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        self.notices.len() != before
    }
}
