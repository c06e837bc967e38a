//! Wire models for directory listings, metadata, and local upload sources.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::path::base_name;

/// Preference key for persisted file-browser view settings.
pub const FILE_BROWSER_PREFS_KEY: &str = "panel.files.prefs.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One row of a directory listing.
pub struct FileEntry {
    /// Final path segment.
    pub name: String,
    /// Server-relative path; unique within a listing.
    pub path: String,
    /// Whether the entry is a directory.
    #[serde(default)]
    pub is_dir: bool,
    /// Size in bytes; meaningless for directories.
    #[serde(default)]
    pub size: u64,
    /// Last-modified instant.
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    /// MIME type reported for files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileEntry {
    /// Builds a file entry, deriving the name from the path.
    pub fn file(path: &str, size: u64) -> Self {
        Self {
            name: base_name(path).to_string(),
            path: path.to_string(),
            is_dir: false,
            size,
            modified: None,
            mime_type: None,
        }
    }

    /// Builds a directory entry, deriving the name from the path.
    pub fn dir(path: &str) -> Self {
        Self {
            name: base_name(path).to_string(),
            path: path.to_string(),
            is_dir: true,
            size: 0,
            modified: None,
            mime_type: None,
        }
    }

    /// Sets the modification time.
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Response of a directory listing call.
pub struct FileListing {
    /// Directory that was listed.
    pub path: String,
    /// Entries in server order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<FileEntry>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Detailed metadata for a single file.
pub struct FileMetadata {
    /// File name.
    #[serde(default)]
    pub name: String,
    /// Server-relative path.
    #[serde(default)]
    pub path: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Detected MIME type.
    #[serde(default)]
    pub mime_type: String,
    /// Hex-encoded SHA-256 of the content.
    #[serde(default)]
    pub sha256: String,
    /// Creation instant, when the host filesystem reports one.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Last-modified instant.
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    /// Public URL when a public hostname is configured.
    #[serde(default)]
    pub public_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Column a listing is ordered by.
pub enum SortKey {
    /// Case-insensitive natural name order.
    #[default]
    Name,
    /// Byte size.
    Size,
    /// Modification time.
    Modified,
}

impl SortKey {
    /// Query-string token sent to the listing endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Modified => "modified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Sort direction.
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Query-string token sent to the listing endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Returns the opposite direction.
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Listing presentation.
pub enum ViewMode {
    /// Table rows.
    #[default]
    List,
    /// Thumbnail grid.
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Persisted file-browser view preferences.
pub struct FileBrowserPrefs {
    /// Active sort column.
    pub sort_by: SortKey,
    /// Active sort direction.
    pub sort_direction: SortDirection,
    /// Active presentation.
    pub view_mode: ViewMode,
    /// Whether uploads replace existing files by default.
    pub overwrite_uploads: bool,
}

impl Default for FileBrowserPrefs {
    fn default() -> Self {
        Self {
            sort_by: SortKey::Name,
            sort_direction: SortDirection::Asc,
            view_mode: ViewMode::List,
            overwrite_uploads: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the bytes of a [`LocalFile`] live.
pub enum LocalFileHandle {
    /// Bytes already held in memory.
    Bytes(Rc<[u8]>),
    /// Opaque token for a host-side handle (a browser `File`).
    Host(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A file chosen by the user for upload or replace.
pub struct LocalFile {
    /// File name; uniqueness key inside an upload queue.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Content location.
    pub handle: LocalFileHandle,
}

impl LocalFile {
    /// Wraps in-memory bytes.
    pub fn from_bytes(name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Rc<[u8]> = Rc::from(bytes.into());
        Self {
            name: name.to_string(),
            size: bytes.len() as u64,
            handle: LocalFileHandle::Bytes(bytes),
        }
    }

    /// Wraps a host handle token.
    pub fn from_host(name: &str, size: u64, token: u64) -> Self {
        Self {
            name: name.to_string(),
            size,
            handle: LocalFileHandle::Host(token),
        }
    }

    /// Returns the in-memory bytes, if any.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.handle {
            LocalFileHandle::Bytes(bytes) => Some(&**bytes),
            LocalFileHandle::Host(_) => None,
        }
    }
}
