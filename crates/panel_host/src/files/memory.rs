//! In-memory [`FileStoreService`] with server-side validation, a call log, and failure
//! injection.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use chrono::{DateTime, Utc};

use super::path::{base_name, join_path, normalize_virtual_path, parent_path, ROOT_PATH};
use super::service::{FileStoreFuture, FileStoreService};
use super::types::{FileEntry, FileListing, FileMetadata, LocalFile, SortDirection, SortKey};
use crate::activity::clamp_log_page_size;
use crate::{
    ActivityLogEntry, ActivityLogPage, ApiError, PanelSettings, SettingsUpdate,
    DEFAULT_BLOCKED_EXTENSIONS,
};

/// 2024-01-01T00:00:00Z; the store clock advances one second per mutation from here.
const CLOCK_ORIGIN_SECS: i64 = 1_704_067_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Operation kind used to target injected failures.
pub enum StoreOp {
    /// [`FileStoreService::list`].
    List,
    /// [`FileStoreService::upload`].
    Upload,
    /// [`FileStoreService::rename`].
    Rename,
    /// [`FileStoreService::move_entry`].
    Move,
    /// [`FileStoreService::replace`].
    Replace,
    /// [`FileStoreService::delete`].
    Delete,
    /// [`FileStoreService::mkdir`].
    Mkdir,
    /// [`FileStoreService::metadata`].
    Metadata,
    /// [`FileStoreService::zip`].
    Zip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One recorded service call, in arrival order.
pub enum StoreCall {
    /// Directory listing.
    List {
        /// Listed directory.
        path: String,
    },
    /// File upload.
    Upload {
        /// Target directory.
        directory: String,
        /// Uploaded file name.
        name: String,
        /// Overwrite flag.
        overwrite: bool,
    },
    /// Rename.
    Rename {
        /// Source path.
        path: String,
        /// New name.
        new_name: String,
    },
    /// Move.
    Move {
        /// Source path.
        path: String,
        /// Destination directory.
        destination: String,
    },
    /// Content replacement.
    Replace {
        /// Replaced path.
        path: String,
    },
    /// Delete.
    Delete {
        /// Deleted path.
        path: String,
        /// Confirmation name sent along.
        confirm_filename: String,
    },
    /// Directory creation.
    Mkdir {
        /// Parent directory.
        parent: String,
        /// New directory name.
        name: String,
    },
    /// Metadata load.
    Metadata {
        /// Inspected path.
        path: String,
    },
    /// Archive build.
    Zip {
        /// Archived paths.
        paths: Vec<String>,
    },
    /// Activity-log page load.
    Logs {
        /// Requested page size.
        limit: u32,
        /// Requested offset.
        offset: u32,
    },
    /// Settings load.
    Settings,
    /// Settings update.
    UpdateSettings,
}

#[derive(Debug, Clone)]
struct Node {
    is_dir: bool,
    content: Rc<[u8]>,
    modified: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct InjectedFailure {
    op: StoreOp,
    path: Option<String>,
    error: ApiError,
}

#[derive(Debug)]
struct Inner {
    nodes: BTreeMap<String, Node>,
    settings: PanelSettings,
    logs: Vec<ActivityLogEntry>,
    calls: Vec<StoreCall>,
    failures: Vec<InjectedFailure>,
    clock: i64,
}

impl Inner {
    fn now(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        DateTime::from_timestamp(CLOCK_ORIGIN_SECS + self.clock, 0).unwrap_or_default()
    }

    fn check_failure(&self, op: StoreOp, path: &str) -> Result<(), ApiError> {
        match self.failures.iter().find(|failure| {
            failure.op == op && failure.path.as_deref().map_or(true, |target| target == path)
        }) {
            Some(failure) => Err(failure.error.clone()),
            None => Ok(()),
        }
    }

    fn log(&mut self, action: &str, file_path: String) {
        let timestamp = self.now().format("%Y-%m-%d %H:%M:%S").to_string();
        let id = self.logs.len() as i64 + 1;
        self.logs.push(ActivityLogEntry {
            id,
            timestamp,
            action: action.to_string(),
            file_path,
            source_ip: Some("127.0.0.1".to_string()),
        });
    }

    fn node(&self, path: &str) -> Result<&Node, ApiError> {
        self.nodes
            .get(path)
            .ok_or_else(|| ApiError::server(404, "File not found"))
    }

    fn directory(&self, path: &str) -> Result<&Node, ApiError> {
        let node = self
            .nodes
            .get(path)
            .ok_or_else(|| ApiError::server(404, "Directory not found"))?;
        if !node.is_dir {
            return Err(ApiError::server(400, "Path is not a directory"));
        }
        Ok(node)
    }

    fn insert(&mut self, path: &str, is_dir: bool, content: Rc<[u8]>) {
        let mut ancestor = parent_path(path);
        while let Some(dir) = ancestor {
            if !self.nodes.contains_key(&dir) {
                let modified = self.now();
                self.nodes.insert(
                    dir.clone(),
                    Node {
                        is_dir: true,
                        content: Rc::from(Vec::new()),
                        modified,
                    },
                );
            }
            ancestor = parent_path(&dir);
        }
        let modified = self.now();
        self.nodes.insert(
            path.to_string(),
            Node {
                is_dir,
                content,
                modified,
            },
        );
    }

    fn subtree_keys(&self, root: &str) -> Vec<String> {
        let prefix = format!("{root}/");
        self.nodes
            .keys()
            .filter(|key| *key == root || key.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn rekey(&mut self, from: &str, to: &str) {
        for key in self.subtree_keys(from) {
            if let Some(node) = self.nodes.remove(&key) {
                let suffix = &key[from.len()..];
                self.nodes.insert(format!("{to}{suffix}"), node);
            }
        }
    }

    fn upload(&mut self, file: &LocalFile, directory: &str, overwrite: bool) -> Result<(), ApiError> {
        self.directory(directory)?;
        if self.settings.is_blocked_file(&file.name) {
            let ext = file.name.rsplit('.').next().unwrap_or_default().to_lowercase();
            return Err(ApiError::server(400, format!("File type not allowed: .{ext}")));
        }
        if self.settings.max_upload_size > 0 && file.size > self.settings.max_upload_size {
            return Err(ApiError::server(413, "File too large"));
        }
        let target = join_path(directory, &file.name);
        if let Some(existing) = self.nodes.get(&target) {
            if existing.is_dir {
                return Err(ApiError::server(409, "A directory with this name already exists"));
            }
            if !overwrite {
                return Err(ApiError::server(409, "File already exists"));
            }
        }
        let content: Rc<[u8]> = Rc::from(file.bytes().unwrap_or_default());
        self.insert(&target, false, content);
        self.log("upload", target);
        Ok(())
    }

    fn rename(&mut self, path: &str, new_name: &str) -> Result<(), ApiError> {
        if path == ROOT_PATH {
            return Err(ApiError::server(400, "Cannot rename root directory"));
        }
        if !is_valid_name(new_name) {
            return Err(ApiError::server(400, "Invalid file name"));
        }
        self.node(path)?;
        let parent = parent_path(path).unwrap_or_else(|| ROOT_PATH.to_string());
        let target = join_path(&parent, new_name);
        if self.nodes.contains_key(&target) {
            return Err(ApiError::server(409, "A file with this name already exists"));
        }
        self.rekey(path, &target);
        self.log("rename", format!("{path} -> {target}"));
        Ok(())
    }

    fn move_entry(&mut self, path: &str, destination: &str) -> Result<(), ApiError> {
        if path == ROOT_PATH {
            return Err(ApiError::server(400, "Cannot move root directory"));
        }
        self.node(path)?;
        let destination_node = self
            .nodes
            .get(destination)
            .ok_or_else(|| ApiError::server(404, "Destination not found"))?;
        if !destination_node.is_dir {
            return Err(ApiError::server(400, "Destination is not a directory"));
        }
        if destination == path || destination.starts_with(&format!("{path}/")) {
            return Err(ApiError::server(400, "Cannot move a directory into itself"));
        }
        let target = join_path(destination, base_name(path));
        if self.nodes.contains_key(&target) {
            return Err(ApiError::server(409, "File already exists at destination"));
        }
        self.rekey(path, &target);
        self.log("move", format!("{path} -> {target}"));
        Ok(())
    }

    fn replace(&mut self, path: &str, file: &LocalFile) -> Result<(), ApiError> {
        if self.node(path)?.is_dir {
            return Err(ApiError::server(400, "Cannot replace a directory"));
        }
        let modified = self.now();
        if let Some(node) = self.nodes.get_mut(path) {
            node.content = Rc::from(file.bytes().unwrap_or_default());
            node.modified = modified;
        }
        self.log("replace", path.to_string());
        Ok(())
    }

    fn delete(&mut self, path: &str, confirm_filename: &str) -> Result<(), ApiError> {
        if path == ROOT_PATH {
            return Err(ApiError::server(400, "Cannot delete root directory"));
        }
        self.node(path)?;
        if confirm_filename != base_name(path) {
            return Err(ApiError::server(400, "Filename confirmation does not match"));
        }
        for key in self.subtree_keys(path) {
            self.nodes.remove(&key);
        }
        self.log("delete", path.to_string());
        Ok(())
    }

    fn mkdir(&mut self, parent: &str, name: &str) -> Result<(), ApiError> {
        self.directory(parent)?;
        if !is_valid_name(name) {
            return Err(ApiError::server(400, "Invalid directory name"));
        }
        let target = join_path(parent, name);
        if self.nodes.contains_key(&target) {
            return Err(ApiError::server(409, "Directory already exists"));
        }
        self.insert(&target, true, Rc::from(Vec::new()));
        self.log("mkdir", target);
        Ok(())
    }

    fn list(&self, path: &str, sort: SortKey, direction: SortDirection) -> Result<FileListing, ApiError> {
        self.directory(path)?;
        let mut files: Vec<FileEntry> = self
            .nodes
            .iter()
            .filter(|(key, _)| key.as_str() != ROOT_PATH && parent_path(key).as_deref() == Some(path))
            .map(|(key, node)| FileEntry {
                name: base_name(key).to_string(),
                path: key.clone(),
                is_dir: node.is_dir,
                size: node.content.len() as u64,
                modified: Some(node.modified),
                mime_type: (!node.is_dir).then(|| guess_mime_type(key).to_string()),
            })
            .collect();
        files.sort_by(|a, b| {
            let ord = match sort {
                SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortKey::Size => a.size.cmp(&b.size),
                SortKey::Modified => a.modified.cmp(&b.modified),
            };
            let ord = match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            b.is_dir.cmp(&a.is_dir).then(ord)
        });
        Ok(FileListing {
            path: path.to_string(),
            files,
        })
    }

    fn metadata(&self, path: &str) -> Result<FileMetadata, ApiError> {
        let node = self.node(path)?;
        if node.is_dir {
            return Err(ApiError::server(400, "Path is a directory"));
        }
        Ok(FileMetadata {
            name: base_name(path).to_string(),
            path: path.to_string(),
            size: node.content.len() as u64,
            mime_type: guess_mime_type(path).to_string(),
            sha256: String::new(),
            created: None,
            modified: Some(node.modified),
            public_url: self.settings.public_url_for(path).unwrap_or_default(),
        })
    }

    fn zip(&self, paths: &[String]) -> Result<Vec<u8>, ApiError> {
        if paths.is_empty() {
            return Err(ApiError::server(400, "No paths specified"));
        }
        if let Some(missing) = paths.iter().find(|path| !self.nodes.contains_key(*path)) {
            return Err(ApiError::server(404, format!("File not found: {missing}")));
        }
        // Not a real archive; the payload names its members so callers can assert on it.
        Ok(format!("zip:{}", paths.join(",")).into_bytes())
    }

    fn logs(&self, limit: u32, offset: u32) -> ActivityLogPage {
        let limit = clamp_log_page_size(limit);
        let logs = self
            .logs
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        ActivityLogPage {
            logs,
            limit,
            offset,
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

fn guess_mime_type(path: &str) -> &'static str {
    match base_name(path).rsplit_once('.').map(|(_, ext)| ext.to_lowercase()) {
        Some(ext) if ext == "txt" || ext == "md" => "text/plain",
        Some(ext) if ext == "pdf" => "application/pdf",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "json" => "application/json",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
/// Shared in-memory file store; clones observe the same tree.
pub struct MemoryFileStoreService {
    inner: Rc<RefCell<Inner>>,
}

impl Default for MemoryFileStoreService {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileStoreService {
    /// Empty store holding only the root directory and the default blocked extensions.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            ROOT_PATH.to_string(),
            Node {
                is_dir: true,
                content: Rc::from(Vec::new()),
                modified: DateTime::from_timestamp(CLOCK_ORIGIN_SECS, 0).unwrap_or_default(),
            },
        );
        let settings = PanelSettings {
            base_directory: "/srv/files".to_string(),
            max_upload_size: 0,
            blocked_extensions: DEFAULT_BLOCKED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            public_hostname: String::new(),
        };
        Self {
            inner: Rc::new(RefCell::new(Inner {
                nodes,
                settings,
                logs: Vec::new(),
                calls: Vec::new(),
                failures: Vec::new(),
                clock: 0,
            })),
        }
    }

    /// Adds a directory (and missing ancestors).
    pub fn with_dir(self, path: &str) -> Self {
        self.insert_dir(path);
        self
    }

    /// Adds a file (and missing ancestors).
    pub fn with_file(self, path: &str, bytes: &[u8]) -> Self {
        self.insert_file(path, bytes);
        self
    }

    /// Replaces the server settings.
    pub fn with_settings(self, settings: PanelSettings) -> Self {
        self.inner.borrow_mut().settings = settings;
        self
    }

    /// Adds a directory without recording a call.
    pub fn insert_dir(&self, path: &str) {
        let path = normalize_virtual_path(path);
        self.inner
            .borrow_mut()
            .insert(&path, true, Rc::from(Vec::new()));
    }

    /// Adds a file without recording a call.
    pub fn insert_file(&self, path: &str, bytes: &[u8]) {
        let path = normalize_virtual_path(path);
        self.inner.borrow_mut().insert(&path, false, Rc::from(bytes));
    }

    /// Makes every `op` call on `path` fail with `error` until cleared.
    ///
    /// Uploads and directory creation match on the joined target path.
    pub fn fail_on(&self, op: StoreOp, path: &str, error: ApiError) {
        self.inner.borrow_mut().failures.push(InjectedFailure {
            op,
            path: Some(normalize_virtual_path(path)),
            error,
        });
    }

    /// Makes every `op` call fail with `error` until cleared.
    pub fn fail_all(&self, op: StoreOp, error: ApiError) {
        self.inner.borrow_mut().failures.push(InjectedFailure {
            op,
            path: None,
            error,
        });
    }

    /// Removes every injected failure.
    pub fn clear_failures(&self) {
        self.inner.borrow_mut().failures.clear();
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.borrow().calls.clone()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Whether a path exists.
    pub fn exists(&self, path: &str) -> bool {
        self.inner
            .borrow()
            .nodes
            .contains_key(&normalize_virtual_path(path))
    }

    /// File content, if the path is a file.
    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        let inner = self.inner.borrow();
        let node = inner.nodes.get(&normalize_virtual_path(path))?;
        (!node.is_dir).then(|| node.content.to_vec())
    }

    /// Current settings.
    pub fn current_settings(&self) -> PanelSettings {
        self.inner.borrow().settings.clone()
    }

    fn begin(&self, call: StoreCall, op: StoreOp, target: &str) -> Result<(), ApiError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(call);
        inner.check_failure(op, target)
    }
}

impl FileStoreService for MemoryFileStoreService {
    fn list<'a>(
        &'a self,
        path: &'a str,
        sort: SortKey,
        direction: SortDirection,
    ) -> FileStoreFuture<'a, Result<FileListing, ApiError>> {
        Box::pin(async move {
            let path = normalize_virtual_path(path);
            self.begin(StoreCall::List { path: path.clone() }, StoreOp::List, &path)?;
            self.inner.borrow().list(&path, sort, direction)
        })
    }

    fn upload<'a>(
        &'a self,
        file: &'a LocalFile,
        directory: &'a str,
        overwrite: bool,
        progress: &'a dyn Fn(u8),
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let directory = normalize_virtual_path(directory);
            let target = join_path(&directory, &file.name);
            self.begin(
                StoreCall::Upload {
                    directory: directory.clone(),
                    name: file.name.clone(),
                    overwrite,
                },
                StoreOp::Upload,
                &target,
            )?;
            progress(0);
            progress(50);
            self.inner.borrow_mut().upload(file, &directory, overwrite)?;
            progress(100);
            Ok(())
        })
    }

    fn rename<'a>(
        &'a self,
        path: &'a str,
        new_name: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let path = normalize_virtual_path(path);
            self.begin(
                StoreCall::Rename {
                    path: path.clone(),
                    new_name: new_name.to_string(),
                },
                StoreOp::Rename,
                &path,
            )?;
            self.inner.borrow_mut().rename(&path, new_name)
        })
    }

    fn move_entry<'a>(
        &'a self,
        path: &'a str,
        destination: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let path = normalize_virtual_path(path);
            let destination = normalize_virtual_path(destination);
            self.begin(
                StoreCall::Move {
                    path: path.clone(),
                    destination: destination.clone(),
                },
                StoreOp::Move,
                &path,
            )?;
            self.inner.borrow_mut().move_entry(&path, &destination)
        })
    }

    fn replace<'a>(
        &'a self,
        path: &'a str,
        file: &'a LocalFile,
        progress: &'a dyn Fn(u8),
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let path = normalize_virtual_path(path);
            self.begin(StoreCall::Replace { path: path.clone() }, StoreOp::Replace, &path)?;
            progress(0);
            self.inner.borrow_mut().replace(&path, file)?;
            progress(100);
            Ok(())
        })
    }

    fn delete<'a>(
        &'a self,
        path: &'a str,
        confirm_filename: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let path = normalize_virtual_path(path);
            self.begin(
                StoreCall::Delete {
                    path: path.clone(),
                    confirm_filename: confirm_filename.to_string(),
                },
                StoreOp::Delete,
                &path,
            )?;
            self.inner.borrow_mut().delete(&path, confirm_filename)
        })
    }

    fn mkdir<'a>(
        &'a self,
        parent: &'a str,
        name: &'a str,
    ) -> FileStoreFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            let parent = normalize_virtual_path(parent);
            let target = join_path(&parent, name);
            self.begin(
                StoreCall::Mkdir {
                    parent: parent.clone(),
                    name: name.to_string(),
                },
                StoreOp::Mkdir,
                &target,
            )?;
            self.inner.borrow_mut().mkdir(&parent, name)
        })
    }

    fn metadata<'a>(&'a self, path: &'a str) -> FileStoreFuture<'a, Result<FileMetadata, ApiError>> {
        Box::pin(async move {
            let path = normalize_virtual_path(path);
            self.begin(StoreCall::Metadata { path: path.clone() }, StoreOp::Metadata, &path)?;
            self.inner.borrow().metadata(&path)
        })
    }

    fn zip<'a>(&'a self, paths: &'a [String]) -> FileStoreFuture<'a, Result<Vec<u8>, ApiError>> {
        Box::pin(async move {
            let first = paths.first().cloned().unwrap_or_default();
            self.begin(
                StoreCall::Zip {
                    paths: paths.to_vec(),
                },
                StoreOp::Zip,
                &first,
            )?;
            self.inner.borrow().zip(paths)
        })
    }

    fn logs<'a>(
        &'a self,
        limit: u32,
        offset: u32,
    ) -> FileStoreFuture<'a, Result<ActivityLogPage, ApiError>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .calls
                .push(StoreCall::Logs { limit, offset });
            Ok(self.inner.borrow().logs(limit, offset))
        })
    }

    fn settings<'a>(&'a self) -> FileStoreFuture<'a, Result<PanelSettings, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.calls.push(StoreCall::Settings);
            Ok(inner.settings.clone())
        })
    }

    fn update_settings<'a>(
        &'a self,
        update: &'a SettingsUpdate,
    ) -> FileStoreFuture<'a, Result<PanelSettings, ApiError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.calls.push(StoreCall::UpdateSettings);
            update.apply_to(&mut inner.settings);
            Ok(inner.settings.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn seeded() -> MemoryFileStoreService {
        MemoryFileStoreService::new()
            .with_dir("/docs")
            .with_file("/docs/a.txt", b"alpha")
            .with_file("/docs/b.txt", b"beta")
            .with_dir("/archive")
    }

    fn names(listing: &FileListing) -> Vec<&str> {
        listing.files.iter().map(|entry| entry.name.as_str()).collect()
    }

    #[test]
    fn listing_puts_directories_first() {
        let store = seeded().with_file("/z.txt", b"z");
        let listing =
            block_on(store.list("/", SortKey::Name, SortDirection::Asc)).expect("list root");
        assert_eq!(names(&listing), vec!["archive", "docs", "z.txt"]);
        assert_eq!(store.calls(), vec![StoreCall::List { path: "/".to_string() }]);
    }

    #[test]
    fn upload_conflicts_unless_overwrite() {
        let store = seeded();
        let file = LocalFile::from_bytes("a.txt", b"new".to_vec());
        let seen = RefCell::new(Vec::new());
        let progress = |percent: u8| seen.borrow_mut().push(percent);

        let err = block_on(store.upload(&file, "/docs", false, &progress)).expect_err("conflict");
        assert_eq!(err, ApiError::server(409, "File already exists"));

        block_on(store.upload(&file, "/docs", true, &progress)).expect("overwrite");
        assert_eq!(store.read("/docs/a.txt"), Some(b"new".to_vec()));
        assert_eq!(seen.borrow().last(), Some(&100));
    }

    #[test]
    fn blocked_extensions_are_rejected() {
        let store = seeded();
        let file = LocalFile::from_bytes("setup.EXE", b"MZ".to_vec());
        let err = block_on(store.upload(&file, "/docs", false, &|_: u8| {})).expect_err("blocked");
        assert_eq!(err, ApiError::server(400, "File type not allowed: .exe"));
    }

    #[test]
    fn rename_and_move_rekey_subtrees_and_log_transitions() {
        let store = seeded();
        block_on(store.rename("/docs", "papers")).expect("rename");
        assert!(store.exists("/papers/a.txt"));
        assert!(!store.exists("/docs"));

        block_on(store.move_entry("/papers/b.txt", "/archive")).expect("move");
        assert!(store.exists("/archive/b.txt"));

        let err = block_on(store.move_entry("/papers/a.txt", "/papers/a.txt")).expect_err("not dir");
        assert_eq!(err, ApiError::server(400, "Destination is not a directory"));

        let page = block_on(store.logs(10, 0)).expect("logs");
        let paths: Vec<_> = page.logs.iter().map(|log| log.file_path.as_str()).collect();
        assert_eq!(paths, vec!["/papers/b.txt -> /archive/b.txt", "/docs -> /papers"]);
    }

    #[test]
    fn delete_requires_matching_confirmation() {
        let store = seeded();
        let err = block_on(store.delete("/docs/a.txt", "A.TXT")).expect_err("mismatch");
        assert_eq!(err, ApiError::server(400, "Filename confirmation does not match"));
        block_on(store.delete("/docs/a.txt", "a.txt")).expect("delete");
        assert!(!store.exists("/docs/a.txt"));
    }

    #[test]
    fn mkdir_conflicts_on_existing_directory() {
        let store = seeded();
        let err = block_on(store.mkdir("/", "docs")).expect_err("exists");
        assert_eq!(err, ApiError::server(409, "Directory already exists"));
        block_on(store.mkdir("/docs", "drafts")).expect("mkdir");
        assert!(store.exists("/docs/drafts"));
    }

    #[test]
    fn injected_failures_target_one_path() {
        let store = seeded();
        store.fail_on(StoreOp::Delete, "/docs/b.txt", ApiError::server(500, "disk error"));
        block_on(store.delete("/docs/a.txt", "a.txt")).expect("delete a");
        let err = block_on(store.delete("/docs/b.txt", "b.txt")).expect_err("injected");
        assert_eq!(err.message(), "disk error");
        store.clear_failures();
        block_on(store.delete("/docs/b.txt", "b.txt")).expect("delete b");
    }

    #[test]
    fn metadata_includes_public_url_when_configured() {
        let store = seeded().with_settings(PanelSettings {
            public_hostname: "files.example.com".to_string(),
            ..PanelSettings::default()
        });
        let metadata = block_on(store.metadata("/docs/a.txt")).expect("metadata");
        assert_eq!(metadata.size, 5);
        assert_eq!(metadata.mime_type, "text/plain");
        assert_eq!(metadata.public_url, "https://files.example.com/docs/a.txt");
        let err = block_on(store.metadata("/docs")).expect_err("dir");
        assert_eq!(err.status(), Some(400));
    }
}
