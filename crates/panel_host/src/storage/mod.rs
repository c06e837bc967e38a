//! Preference persistence contracts.

pub mod prefs;
