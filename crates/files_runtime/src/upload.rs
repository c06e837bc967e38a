//! Sequential upload queue and drag-over tracking.

use panel_host::LocalFile;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Lifecycle of one queued file.
pub enum UploadStatus {
    /// Waiting for its turn.
    Pending,
    /// Transfer in flight.
    Uploading,
    /// Accepted by the server.
    Done,
    /// Rejected or failed; see [`UploadItem::error`].
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One file in the queue, keyed by file name.
pub struct UploadItem {
    /// Source file.
    pub file: LocalFile,
    /// Current status.
    pub status: UploadStatus,
    /// Whole-percent progress in `0..=100`.
    pub progress: u8,
    /// Failure message for [`UploadStatus::Error`].
    pub error: Option<String>,
}

impl UploadItem {
    fn pending(file: LocalFile) -> Self {
        Self {
            file,
            status: UploadStatus::Pending,
            progress: 0,
            error: None,
        }
    }

    /// File name.
    pub fn name(&self) -> &str {
        &self.file.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single transfer handed to the host.
pub struct UploadJob {
    /// Run the job belongs to; results from other runs are ignored.
    pub session: u64,
    /// Queue index of the item.
    pub index: usize,
    /// File to send.
    pub file: LocalFile,
    /// Target directory captured when the run started.
    pub directory: String,
    /// Overwrite flag captured when the run started.
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What follows a finished item.
pub enum UploadStep {
    /// Start this transfer next.
    Next(UploadJob),
    /// Every item succeeded; the queue has been cleared.
    Completed {
        /// Files uploaded in this run.
        uploaded: usize,
    },
    /// The run ended with failures; items stay queued with their errors.
    FinishedWithErrors {
        /// Files uploaded in this run.
        uploaded: usize,
        /// Items in the error state.
        failed: usize,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Rejected queue edits.
pub enum UploadQueueError {
    /// The queue cannot change while a run is active.
    #[error("an upload is already in progress")]
    Busy,
    /// [`UploadQueue::start`] found nothing pending.
    #[error("no files are waiting to upload")]
    NothingPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveRun {
    index: usize,
    directory: String,
    overwrite: bool,
    uploaded: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Files waiting for, undergoing, or finished with upload.
///
/// Runs process pending items strictly one at a time in queue order. A failure marks its item
/// and moves on to the next.
pub struct UploadQueue {
    items: Vec<UploadItem>,
    session: u64,
    active: Option<ActiveRun>,
}

impl UploadQueue {
    /// Queued items in order.
    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    /// Item by file name.
    pub fn item(&self, name: &str) -> Option<&UploadItem> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Current run counter.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Whether any item is in the error state.
    pub fn has_errors(&self) -> bool {
        self.count(UploadStatus::Error) > 0
    }

    /// Items with `status`.
    pub fn count(&self, status: UploadStatus) -> usize {
        self.items.iter().filter(|item| item.status == status).count()
    }

    /// Mean progress across items.
    pub fn overall_progress(&self) -> u8 {
        if self.items.is_empty() {
            return 0;
        }
        let total: usize = self.items.iter().map(|item| usize::from(item.progress)).sum();
        (total / self.items.len()) as u8
    }

    /// Replaces the queue; every file starts pending at 0%.
    pub fn enqueue(&mut self, files: Vec<LocalFile>) -> Result<(), UploadQueueError> {
        self.ensure_idle()?;
        self.items.clear();
        self.push_files(files);
        Ok(())
    }

    /// Appends files; a name already queued is replaced in place and reset to pending.
    pub fn add(&mut self, files: Vec<LocalFile>) -> Result<(), UploadQueueError> {
        self.ensure_idle()?;
        self.push_files(files);
        Ok(())
    }

    /// Removes an item by file name; returns whether it was queued.
    pub fn remove(&mut self, name: &str) -> Result<bool, UploadQueueError> {
        self.ensure_idle()?;
        let before = self.items.len();
        self.items.retain(|item| item.name() != name);
        Ok(self.items.len() != before)
    }

    /// Drops every item.
    pub fn clear(&mut self) -> Result<(), UploadQueueError> {
        self.ensure_idle()?;
        self.items.clear();
        Ok(())
    }

    /// Begins a run into `directory` and returns the first transfer.
    pub fn start(&mut self, directory: &str, overwrite: bool) -> Result<UploadJob, UploadQueueError> {
        self.ensure_idle()?;
        let index = self
            .next_pending(0)
            .ok_or(UploadQueueError::NothingPending)?;
        self.session += 1;
        self.active = Some(ActiveRun {
            index,
            directory: directory.to_string(),
            overwrite,
            uploaded: 0,
        });
        Ok(self.begin_item(index))
    }

    /// Records a progress report; stale reports return `false`.
    pub fn record_progress(&mut self, session: u64, index: usize, percent: u8) -> bool {
        if !self.is_current(session, index) {
            return false;
        }
        match self.items.get_mut(index) {
            Some(item) => {
                item.progress = percent.min(100);
                true
            }
            None => false,
        }
    }

    /// Settles the in-flight item and advances the run; stale results return `None`.
    pub fn finish_item(
        &mut self,
        session: u64,
        index: usize,
        result: Result<(), String>,
    ) -> Option<UploadStep> {
        if !self.is_current(session, index) {
            return None;
        }
        let item = self.items.get_mut(index)?;
        let succeeded = result.is_ok();
        match result {
            Ok(()) => {
                item.status = UploadStatus::Done;
                item.progress = 100;
                item.error = None;
            }
            Err(message) => {
                item.status = UploadStatus::Error;
                item.error = Some(message);
            }
        }

        if succeeded {
            if let Some(run) = self.active.as_mut() {
                run.uploaded += 1;
            }
        }
        if let Some(next) = self.next_pending(index + 1) {
            if let Some(run) = self.active.as_mut() {
                run.index = next;
            }
            return Some(UploadStep::Next(self.begin_item(next)));
        }

        let uploaded = self.active.take().map_or(0, |run| run.uploaded);
        let failed = self.count(UploadStatus::Error);
        if failed == 0 {
            self.items.clear();
            Some(UploadStep::Completed { uploaded })
        } else {
            Some(UploadStep::FinishedWithErrors { uploaded, failed })
        }
    }

    fn ensure_idle(&self) -> Result<(), UploadQueueError> {
        if self.is_running() {
            Err(UploadQueueError::Busy)
        } else {
            Ok(())
        }
    }

    fn push_files(&mut self, files: Vec<LocalFile>) {
        for file in files {
            match self.items.iter().position(|item| item.name() == file.name) {
                Some(idx) => self.items[idx] = UploadItem::pending(file),
                None => self.items.push(UploadItem::pending(file)),
            }
        }
    }

    fn next_pending(&self, from: usize) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, item)| item.status == UploadStatus::Pending)
            .map(|(idx, _)| idx)
    }

    fn is_current(&self, session: u64, index: usize) -> bool {
        session == self.session
            && self
                .active
                .as_ref()
                .is_some_and(|run| run.index == index)
    }

    fn begin_item(&mut self, index: usize) -> UploadJob {
        let item = &mut self.items[index];
        item.status = UploadStatus::Uploading;
        item.progress = 0;
        item.error = None;
        let file = item.file.clone();
        let (directory, overwrite) = self
            .active
            .as_ref()
            .map(|run| (run.directory.clone(), run.overwrite))
            .unwrap_or_default();
        UploadJob {
            session: self.session,
            index,
            file,
            directory,
            overwrite,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Drag-over state of the listing surface.
///
/// Nested elements fire enter/leave pairs, so the overlay tracks depth and hides only when the
/// pointer has left the outermost element.
pub struct DropZone {
    depth: u32,
    active: bool,
}

impl DropZone {
    /// A drag entered an element; `carries_files` shows the overlay.
    pub fn enter(&mut self, carries_files: bool) {
        self.depth += 1;
        if carries_files {
            self.active = true;
        }
    }

    /// A drag left an element.
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.active = false;
        }
    }

    /// Files were dropped; the overlay resets.
    pub fn drop_files(&mut self) {
        self.depth = 0;
        self.active = false;
    }

    /// Whether the overlay is visible.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
