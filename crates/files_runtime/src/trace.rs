//! Structured trace events; no-ops without the `tracing` feature.

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

#[cfg(feature = "tracing")]
pub(crate) fn trace_listing_requested(generation: u64, path: &str) {
    trace!(
        event = "listing.requested",
        generation, path, "listing requested"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_listing_requested(_generation: u64, _path: &str) {}

#[cfg(feature = "tracing")]
pub(crate) fn trace_listing_applied(generation: u64, path: &str, entries: usize, pruned: usize) {
    trace!(
        event = "listing.applied",
        generation, path, entries, pruned, "listing applied"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_listing_applied(_generation: u64, _path: &str, _entries: usize, _pruned: usize) {
}

#[cfg(feature = "tracing")]
pub(crate) fn trace_listing_dropped_stale(generation: u64, current_generation: u64, path: &str) {
    debug!(
        event = "listing.dropped_stale",
        generation, current_generation, path, "stale listing dropped"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_listing_dropped_stale(_generation: u64, _current_generation: u64, _path: &str) {
}

#[cfg(feature = "tracing")]
pub(crate) fn trace_upload_started(session: u64, index: usize, name: &str, directory: &str) {
    trace!(
        event = "upload.started",
        session, index, name, directory, "upload started"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_upload_started(_session: u64, _index: usize, _name: &str, _directory: &str) {}

#[cfg(feature = "tracing")]
pub(crate) fn trace_upload_finished(session: u64, index: usize, ok: bool) {
    trace!(
        event = "upload.finished",
        session, index, ok, "upload item finished"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_upload_finished(_session: u64, _index: usize, _ok: bool) {}

#[cfg(feature = "tracing")]
pub(crate) fn trace_uploads_completed(uploaded: usize) {
    debug!(event = "upload.completed", uploaded, "upload run completed");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_uploads_completed(_uploaded: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn trace_bulk_step(operation: u64, kind: &'static str, index: usize, ok: bool) {
    trace!(
        event = "bulk.step",
        operation, kind, index, ok, "bulk step finished"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_bulk_step(_operation: u64, _kind: &'static str, _index: usize, _ok: bool) {}

#[cfg(feature = "tracing")]
pub(crate) fn trace_mutation_finished(kind: &'static str, subject: &str, ok: bool) {
    debug!(
        event = "mutation.finished",
        kind, subject, ok, "mutation finished"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_mutation_finished(_kind: &'static str, _subject: &str, _ok: bool) {}

#[cfg(feature = "tracing")]
pub(crate) fn trace_stale_result(source: &'static str) {
    debug!(event = "result.stale", source, "stale result ignored");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_stale_result(_source: &'static str) {}

#[cfg(feature = "tracing")]
pub(crate) fn trace_follow_up_rejected(action: &'static str, error: &str) {
    warn!(
        event = "action.rejected",
        action, error, "follow-up action rejected"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn trace_follow_up_rejected(_action: &'static str, _error: &str) {}
