//! Host service bundle injected into the interaction runtime.

use std::rc::Rc;

use crate::{
    DownloadService, FileStoreService, MemoryDownloadService, MemoryFileStoreService,
    MemoryPrefsStore, NoopDownloadService, NoopFileStoreService, NoopPrefsStore, PrefsStore,
};

/// Runtime-selected services.
///
/// Hosts pick concrete adapters before this bundle reaches `files_runtime`, which keeps the
/// runtime free of browser-specific types.
#[derive(Clone)]
pub struct HostServices {
    /// File-hosting API.
    pub files: Rc<dyn FileStoreService>,
    /// Local file save, download links, and clipboard.
    pub downloads: Rc<dyn DownloadService>,
    /// View preference storage.
    pub prefs: Rc<dyn PrefsStore>,
}

impl HostServices {
    /// Bundles the given services.
    pub fn new(
        files: Rc<dyn FileStoreService>,
        downloads: Rc<dyn DownloadService>,
        prefs: Rc<dyn PrefsStore>,
    ) -> Self {
        Self {
            files,
            downloads,
            prefs,
        }
    }

    /// Services that do nothing; listings are empty and mutations fail.
    pub fn noop() -> Self {
        Self::new(
            Rc::new(NoopFileStoreService),
            Rc::new(NoopDownloadService),
            Rc::new(NoopPrefsStore),
        )
    }

    /// In-memory services sharing state with the passed handles.
    pub fn memory(
        files: &MemoryFileStoreService,
        downloads: &MemoryDownloadService,
        prefs: &MemoryPrefsStore,
    ) -> Self {
        Self::new(
            Rc::new(files.clone()),
            Rc::new(downloads.clone()),
            Rc::new(prefs.clone()),
        )
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}
