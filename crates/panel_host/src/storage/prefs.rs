//! Key/value preference storage holding JSON text per key.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

use crate::files::types::{FileBrowserPrefs, FILE_BROWSER_PREFS_KEY};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for small preference values.
pub trait PrefsStore {
    /// Loads the raw JSON stored under `key`.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Stores raw JSON under `key`.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Removes `key`.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store that remembers nothing.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store; clones share one map.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Raw JSON currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.raw(key)) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed value.
///
/// # Errors
///
/// Returns an error when the store read or JSON decoding fails.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| format!("invalid preference `{key}`: {e}"))
}

/// Serializes and saves a typed value.
///
/// # Errors
///
/// Returns an error when JSON encoding or the store write fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw).await
}

/// Loads [`FileBrowserPrefs`]; undecodable values read as absent.
pub async fn load_browser_prefs<S: PrefsStore + ?Sized>(
    store: &S,
) -> Result<Option<FileBrowserPrefs>, String> {
    match load_pref_with(store, FILE_BROWSER_PREFS_KEY).await {
        Ok(prefs) => Ok(prefs),
        Err(err) if err.starts_with("invalid preference") => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::files::types::{SortDirection, SortKey, ViewMode};

    #[test]
    fn memory_store_round_trip_and_delete() {
        let store = MemoryPrefsStore::default();
        let store_obj: &dyn PrefsStore = &store;

        block_on(store_obj.save_pref("panel.key", "{\"k\":1}")).expect("save");
        assert_eq!(
            block_on(store_obj.load_pref("panel.key")).expect("load"),
            Some("{\"k\":1}".to_string())
        );
        block_on(store_obj.delete_pref("panel.key")).expect("delete");
        assert_eq!(block_on(store_obj.load_pref("panel.key")).expect("load"), None);
    }

    #[test]
    fn browser_prefs_round_trip() {
        let store = MemoryPrefsStore::default();
        let prefs = FileBrowserPrefs {
            sort_by: SortKey::Size,
            sort_direction: SortDirection::Desc,
            view_mode: ViewMode::Grid,
            overwrite_uploads: true,
        };
        block_on(save_pref_with(&store, FILE_BROWSER_PREFS_KEY, &prefs)).expect("save prefs");
        assert_eq!(block_on(load_browser_prefs(&store)).expect("load"), Some(prefs));
    }

    #[test]
    fn corrupt_browser_prefs_read_as_absent() {
        let store = MemoryPrefsStore::default();
        block_on(store.save_pref(FILE_BROWSER_PREFS_KEY, "not json")).expect("save raw");
        assert_eq!(block_on(load_browser_prefs(&store)).expect("load"), None);

        let strict: Result<Option<FileBrowserPrefs>, String> =
            block_on(load_pref_with(&store, FILE_BROWSER_PREFS_KEY));
        assert!(strict.is_err());
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopPrefsStore;
        let store_obj: &dyn PrefsStore = &store;
        assert_eq!(block_on(store_obj.load_pref("k")).expect("load"), None);
        block_on(store_obj.save_pref("k", "{}")).expect("save");
        block_on(store_obj.delete_pref("k")).expect("delete");
    }
}
