//! Browser-backed preference storage.

pub mod local_prefs;
