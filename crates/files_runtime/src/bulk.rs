//! Delete confirmation and sequential bulk delete / zip coordination.

use panel_host::{base_name, FileEntry};
use thiserror::Error;

/// Literal the operator types to confirm a bulk delete.
pub const BULK_DELETE_CONFIRMATION: &str = "DELETE";
/// Archive name used when more than one path is zipped.
pub const GENERIC_ZIP_NAME: &str = "download.zip";

/// Archive name for a zip of `paths`: `<basename>.zip` for one path, otherwise
/// [`GENERIC_ZIP_NAME`].
pub fn zip_file_name(paths: &[String]) -> String {
    match paths {
        [only] => format!("{}.zip", base_name(only)),
        _ => GENERIC_ZIP_NAME.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Text a delete confirmation must match.
pub enum ConfirmTarget {
    /// [`BULK_DELETE_CONFIRMATION`], compared after uppercasing the input.
    Literal,
    /// The exact file name of a single target.
    FileName(String),
}

impl ConfirmTarget {
    /// Whether a dialog opened with this target may delete `selection`.
    ///
    /// A file-name dialog only covers the one file it names.
    pub fn covers(&self, selection: &[FileEntry]) -> bool {
        match self {
            Self::Literal => !selection.is_empty(),
            Self::FileName(name) => matches!(selection, [only] if &only.name == name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Open delete dialog and the text typed into it so far.
pub struct DeleteConfirmation {
    target: ConfirmTarget,
    input: String,
}

impl DeleteConfirmation {
    /// Empty dialog expecting `target`.
    pub fn new(target: ConfirmTarget) -> Self {
        Self {
            target,
            input: String::new(),
        }
    }

    /// What the input must match.
    pub fn target(&self) -> &ConfirmTarget {
        &self.target
    }

    /// Text the operator must type.
    pub fn expected(&self) -> &str {
        match &self.target {
            ConfirmTarget::Literal => BULK_DELETE_CONFIRMATION,
            ConfirmTarget::FileName(name) => name,
        }
    }

    /// Input as displayed; the literal form is uppercased as typed.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the input and returns whether the confirm button is now enabled.
    pub fn set_input(&mut self, text: &str) -> bool {
        self.input = match self.target {
            ConfirmTarget::Literal => text.to_uppercase(),
            ConfirmTarget::FileName(_) => text.to_string(),
        };
        self.is_satisfied()
    }

    /// Whether the input matches.
    pub fn is_satisfied(&self) -> bool {
        self.input == self.expected()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Aggregate operation over the selection.
pub enum BulkKind {
    /// Sequential per-entry delete.
    Delete,
    /// Single archive request.
    Zip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One delete call handed to the host.
pub struct DeleteJob {
    /// Operation the call belongs to.
    pub operation: u64,
    /// Position in the snapshot.
    pub index: usize,
    /// Path to delete.
    pub path: String,
    /// Name sent as server-side confirmation.
    pub confirm_filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The archive request handed to the host.
pub struct ZipJob {
    /// Operation the request belongs to.
    pub operation: u64,
    /// Paths to archive.
    pub paths: Vec<String>,
    /// Local file name for the saved archive.
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One failed entry of a bulk operation.
pub struct BulkFailure {
    /// Affected path.
    pub path: String,
    /// Error message.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a finished bulk operation.
pub struct BulkOutcome {
    /// Which operation ran.
    pub kind: BulkKind,
    /// Entries in the snapshot.
    pub attempted: usize,
    /// Entries that succeeded.
    pub succeeded: usize,
    /// Failures in issue order.
    pub failures: Vec<BulkFailure>,
}

impl BulkOutcome {
    /// Whether every entry succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Most recent failure message.
    pub fn last_error(&self) -> Option<&str> {
        self.failures.last().map(|failure| failure.message.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What follows a finished delete call.
pub enum DeleteStep {
    /// Issue this call next.
    Next(DeleteJob),
    /// The snapshot is exhausted.
    Finished(BulkOutcome),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Rejected bulk-action requests.
pub enum BulkActionError {
    /// The selection is empty.
    #[error("nothing is selected")]
    EmptySelection,
    /// Another bulk operation is in flight.
    #[error("another bulk operation is still running")]
    Busy,
    /// No delete dialog is open.
    #[error("no delete confirmation is open")]
    NoConfirmationOpen,
    /// The typed text does not match.
    #[error("type {expected} to confirm")]
    ConfirmationMismatch {
        /// Text the operator must type.
        expected: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingBulkOperation {
    id: u64,
    kind: BulkKind,
    targets: Vec<FileEntry>,
    cursor: usize,
    failures: Vec<BulkFailure>,
}

impl PendingBulkOperation {
    fn job(&self) -> Option<DeleteJob> {
        let target = self.targets.get(self.cursor)?;
        Some(DeleteJob {
            operation: self.id,
            index: self.cursor,
            path: target.path.clone(),
            confirm_filename: target.name.clone(),
        })
    }

    fn outcome(self) -> BulkOutcome {
        let attempted = self.targets.len();
        BulkOutcome {
            kind: self.kind,
            attempted,
            succeeded: attempted - self.failures.len(),
            failures: self.failures,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Gatekeeper for delete and zip over a snapshot of the selection.
///
/// At most one operation runs at a time; while it does, the other bulk action and clearing the
/// selection are disabled.
pub struct BulkActionCoordinator {
    confirmation: Option<DeleteConfirmation>,
    in_flight: Option<PendingBulkOperation>,
    next_operation: u64,
    last_outcome: Option<BulkOutcome>,
}

impl BulkActionCoordinator {
    /// Whether an operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Kind of the in-flight operation.
    pub fn in_flight_kind(&self) -> Option<BulkKind> {
        self.in_flight.as_ref().map(|op| op.kind)
    }

    /// Paths of the in-flight snapshot.
    pub fn in_flight_paths(&self) -> Vec<String> {
        self.in_flight
            .as_ref()
            .map(|op| op.targets.iter().map(|entry| entry.path.clone()).collect())
            .unwrap_or_default()
    }

    /// Whether the delete action is enabled for a selection of `selected` files.
    pub fn can_delete(&self, selected: usize) -> bool {
        selected > 0 && !self.is_busy()
    }

    /// Whether the zip action is enabled for a selection of `selected` files.
    pub fn can_zip(&self, selected: usize) -> bool {
        selected > 0 && !self.is_busy()
    }

    /// Whether clearing the selection is enabled.
    pub fn can_clear_selection(&self) -> bool {
        !self.is_busy()
    }

    /// Open delete dialog, if any.
    pub fn confirmation(&self) -> Option<&DeleteConfirmation> {
        self.confirmation.as_ref()
    }

    /// Outcome of the most recently finished operation.
    pub fn last_outcome(&self) -> Option<&BulkOutcome> {
        self.last_outcome.as_ref()
    }

    /// Opens the delete dialog for `selection`, confirmed by typing `target`.
    ///
    /// The bulk toolbar always asks for the literal; a row action asks for the file name.
    pub fn open_delete(
        &mut self,
        selection: &[FileEntry],
        target: ConfirmTarget,
    ) -> Result<(), BulkActionError> {
        if self.is_busy() {
            return Err(BulkActionError::Busy);
        }
        if selection.is_empty() {
            return Err(BulkActionError::EmptySelection);
        }
        self.confirmation = Some(DeleteConfirmation::new(target));
        Ok(())
    }

    /// Updates the dialog input; returns whether confirming is enabled.
    pub fn set_confirmation_input(&mut self, text: &str) -> Result<bool, BulkActionError> {
        let confirmation = self
            .confirmation
            .as_mut()
            .ok_or(BulkActionError::NoConfirmationOpen)?;
        Ok(confirmation.set_input(text))
    }

    /// Closes the dialog; refused while a delete is running.
    pub fn cancel_delete(&mut self) -> Result<(), BulkActionError> {
        if self.in_flight_kind() == Some(BulkKind::Delete) {
            return Err(BulkActionError::Busy);
        }
        self.confirmation = None;
        Ok(())
    }

    /// Snapshots `selection` and returns the first delete call.
    ///
    /// The dialog must be open, satisfied, and its target must cover `selection`.
    pub fn begin_delete(&mut self, selection: &[FileEntry]) -> Result<DeleteJob, BulkActionError> {
        if self.is_busy() {
            return Err(BulkActionError::Busy);
        }
        if selection.is_empty() {
            return Err(BulkActionError::EmptySelection);
        }
        let confirmation = self
            .confirmation
            .as_ref()
            .ok_or(BulkActionError::NoConfirmationOpen)?;
        if !confirmation.is_satisfied() || !confirmation.target().covers(selection) {
            return Err(BulkActionError::ConfirmationMismatch {
                expected: confirmation.expected().to_string(),
            });
        }

        let op = PendingBulkOperation {
            id: self.allocate_id(),
            kind: BulkKind::Delete,
            targets: selection.to_vec(),
            cursor: 0,
            failures: Vec::new(),
        };
        let job = op.job().ok_or(BulkActionError::EmptySelection)?;
        self.in_flight = Some(op);
        Ok(job)
    }

    /// Records one delete result and returns the next call or the outcome.
    ///
    /// Failures never stop the remaining calls. Results for another operation or index return
    /// `None`.
    pub fn finish_delete(
        &mut self,
        operation: u64,
        index: usize,
        result: Result<(), String>,
    ) -> Option<DeleteStep> {
        let op = self.in_flight.as_mut()?;
        if op.kind != BulkKind::Delete || op.id != operation || op.cursor != index {
            return None;
        }
        if let Err(message) = result {
            op.failures.push(BulkFailure {
                path: op.targets[index].path.clone(),
                message,
            });
        }
        op.cursor += 1;
        if let Some(job) = op.job() {
            return Some(DeleteStep::Next(job));
        }

        let outcome = self.in_flight.take()?.outcome();
        if outcome.is_success() {
            self.confirmation = None;
        }
        self.last_outcome = Some(outcome.clone());
        Some(DeleteStep::Finished(outcome))
    }

    /// Snapshots `selection` and returns the archive request.
    pub fn begin_zip(&mut self, selection: &[FileEntry]) -> Result<ZipJob, BulkActionError> {
        if self.is_busy() {
            return Err(BulkActionError::Busy);
        }
        if selection.is_empty() {
            return Err(BulkActionError::EmptySelection);
        }
        let paths: Vec<String> = selection.iter().map(|entry| entry.path.clone()).collect();
        let operation = self.allocate_id();
        self.in_flight = Some(PendingBulkOperation {
            id: operation,
            kind: BulkKind::Zip,
            targets: selection.to_vec(),
            cursor: 0,
            failures: Vec::new(),
        });
        Ok(ZipJob {
            operation,
            file_name: zip_file_name(&paths),
            paths,
        })
    }

    /// Records the archive result; results for another operation return `None`.
    pub fn finish_zip(&mut self, operation: u64, result: Result<(), String>) -> Option<BulkOutcome> {
        let op = self.in_flight.as_ref()?;
        if op.kind != BulkKind::Zip || op.id != operation {
            return None;
        }
        let mut op = self.in_flight.take()?;
        if let Err(message) = result {
            // One request covers every path; the failure is reported once.
            op.failures.push(BulkFailure {
                path: String::new(),
                message,
            });
            op.cursor = op.targets.len();
            let outcome = BulkOutcome {
                kind: BulkKind::Zip,
                attempted: op.targets.len(),
                succeeded: 0,
                failures: op.failures,
            };
            self.last_outcome = Some(outcome.clone());
            return Some(outcome);
        }
        let outcome = op.outcome();
        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_operation += 1;
        self.next_operation
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn files(paths: &[&str]) -> Vec<FileEntry> {
        paths.iter().map(|path| FileEntry::file(path, 1)).collect()
    }

    #[test]
    fn zip_names_follow_selection_size() {
        assert_eq!(zip_file_name(&["/docs/q3.pdf".to_string()]), "q3.pdf.zip");
        assert_eq!(
            zip_file_name(&["/a".to_string(), "/b".to_string()]),
            GENERIC_ZIP_NAME
        );
    }

    #[test]
    fn literal_confirmation_uppercases_every_keystroke() {
        let mut confirmation = DeleteConfirmation::new(ConfirmTarget::Literal);
        assert!(!confirmation.set_input("del"));
        assert_eq!(confirmation.input(), "DEL");
        assert!(confirmation.set_input("delete"));
        assert!(!confirmation.set_input("delete "));
    }

    #[test]
    fn single_file_confirmation_is_exact() {
        let mut confirmation =
            DeleteConfirmation::new(ConfirmTarget::FileName("Report.PDF".to_string()));
        assert_eq!(confirmation.expected(), "Report.PDF");
        assert!(!confirmation.set_input("report.pdf"));
        assert!(confirmation.set_input("Report.PDF"));
    }

    #[test]
    fn delete_runs_every_call_and_reports_failure() {
        let selection = files(&["/a", "/b", "/c"]);
        let mut bulk = BulkActionCoordinator::default();
        bulk.open_delete(&selection, ConfirmTarget::Literal).expect("open");
        assert!(bulk.set_confirmation_input("DELETE").expect("input"));

        let first = bulk.begin_delete(&selection).expect("begin");
        assert_eq!(first.path, "/a");
        assert!(bulk.is_busy());
        assert!(!bulk.can_zip(3));
        assert!(!bulk.can_clear_selection());

        let Some(DeleteStep::Next(second)) = bulk.finish_delete(first.operation, 0, Ok(())) else {
            panic!("expected second call");
        };
        let Some(DeleteStep::Next(third)) =
            bulk.finish_delete(second.operation, 1, Err("locked".to_string()))
        else {
            panic!("expected third call");
        };
        assert_eq!(third.path, "/c");

        let Some(DeleteStep::Finished(outcome)) = bulk.finish_delete(third.operation, 2, Ok(()))
        else {
            panic!("expected outcome");
        };
        assert_eq!(outcome.succeeded, 2);
        assert!(!outcome.is_success());
        assert_eq!(outcome.last_error(), Some("locked"));
        assert!(!bulk.is_busy());
        assert!(bulk.confirmation().is_some());
    }

    #[test]
    fn successful_delete_closes_dialog() {
        let selection = files(&["/only.txt"]);
        let mut bulk = BulkActionCoordinator::default();
        bulk.open_delete(&selection, ConfirmTarget::FileName("only.txt".to_string()))
            .expect("open");
        bulk.set_confirmation_input("only.txt").expect("input");
        let job = bulk.begin_delete(&selection).expect("begin");
        assert_eq!(job.confirm_filename, "only.txt");
        let step = bulk.finish_delete(job.operation, 0, Ok(()));
        assert!(matches!(step, Some(DeleteStep::Finished(ref outcome)) if outcome.is_success()));
        assert!(bulk.confirmation().is_none());
    }

    #[test]
    fn unconfirmed_delete_is_rejected_locally() {
        let selection = files(&["/a", "/b"]);
        let mut bulk = BulkActionCoordinator::default();
        assert_eq!(
            bulk.begin_delete(&selection),
            Err(BulkActionError::NoConfirmationOpen)
        );
        bulk.open_delete(&selection, ConfirmTarget::Literal).expect("open");
        bulk.set_confirmation_input("DELET").expect("input");
        assert_eq!(
            bulk.begin_delete(&selection),
            Err(BulkActionError::ConfirmationMismatch {
                expected: "DELETE".to_string()
            })
        );
        assert_eq!(bulk.begin_delete(&[]), Err(BulkActionError::EmptySelection));
    }

    #[test]
    fn file_name_dialog_only_covers_its_file() {
        let mut bulk = BulkActionCoordinator::default();
        bulk.open_delete(&files(&["/a"]), ConfirmTarget::FileName("a".to_string()))
            .expect("open");
        assert!(bulk.set_confirmation_input("a").expect("input"));
        assert_eq!(
            bulk.begin_delete(&files(&["/b"])),
            Err(BulkActionError::ConfirmationMismatch {
                expected: "a".to_string()
            })
        );
        assert_eq!(
            bulk.begin_delete(&files(&["/a", "/b"])),
            Err(BulkActionError::ConfirmationMismatch {
                expected: "a".to_string()
            })
        );
        assert!(bulk.begin_delete(&files(&["/a"])).is_ok());
    }

    #[test]
    fn bulk_dialog_with_one_file_still_takes_the_literal() {
        let selection = files(&["/notes.txt"]);
        let mut bulk = BulkActionCoordinator::default();
        bulk.open_delete(&selection, ConfirmTarget::Literal).expect("open");
        assert_eq!(
            bulk.confirmation().map(|c| c.expected()),
            Some(BULK_DELETE_CONFIRMATION)
        );
        assert!(!bulk.set_confirmation_input("notes.txt").expect("input"));
        assert!(bulk.set_confirmation_input("delete").expect("input"));
        let job = bulk.begin_delete(&selection).expect("begin");
        assert_eq!(job.path, "/notes.txt");
        assert_eq!(job.confirm_filename, "notes.txt");
    }

    #[test]
    fn zip_blocks_delete_and_keeps_snapshot() {
        let selection = files(&["/a", "/b"]);
        let mut bulk = BulkActionCoordinator::default();
        let job = bulk.begin_zip(&selection).expect("zip");
        assert_eq!(job.file_name, GENERIC_ZIP_NAME);
        assert_eq!(bulk.in_flight_paths(), vec!["/a", "/b"]);
        assert_eq!(
            bulk.open_delete(&selection, ConfirmTarget::Literal),
            Err(BulkActionError::Busy)
        );
        assert_eq!(bulk.begin_zip(&selection), Err(BulkActionError::Busy));

        assert_eq!(bulk.finish_zip(job.operation + 1, Ok(())), None);
        let outcome = bulk.finish_zip(job.operation, Ok(())).expect("outcome");
        assert!(outcome.is_success());
        assert!(bulk.can_delete(2));
    }

    #[test]
    fn zip_failure_is_one_failure() {
        let mut bulk = BulkActionCoordinator::default();
        let job = bulk.begin_zip(&files(&["/a", "/b"])).expect("zip");
        let outcome = bulk
            .finish_zip(job.operation, Err("No paths specified".to_string()))
            .expect("outcome");
        assert_eq!(outcome.succeeded, 0);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(bulk.last_outcome(), Some(&outcome));
    }

    #[test]
    fn stale_delete_results_are_ignored() {
        let selection = files(&["/a", "/b"]);
        let mut bulk = BulkActionCoordinator::default();
        bulk.open_delete(&selection, ConfirmTarget::Literal).expect("open");
        bulk.set_confirmation_input("DELETE").expect("input");
        let job = bulk.begin_delete(&selection).expect("begin");
        assert_eq!(bulk.finish_delete(job.operation, 1, Ok(())), None);
        assert_eq!(bulk.finish_delete(job.operation + 1, 0, Ok(())), None);
        assert!(bulk.is_busy());
        assert_eq!(bulk.cancel_delete(), Err(BulkActionError::Busy));
    }
}
