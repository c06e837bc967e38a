//! Server settings model and blocked-extension editing helpers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extensions blocked by a fresh install.
pub const DEFAULT_BLOCKED_EXTENSIONS: [&str; 14] = [
    "php", "exe", "sh", "bat", "cmd", "ps1", "vbs", "js", "jar", "msi", "dll", "scr", "pif", "com",
];

/// Preset offered as a one-click "block executables" action.
pub const COMMON_EXECUTABLE_EXTENSIONS: [&str; 8] =
    ["exe", "bat", "cmd", "com", "msi", "scr", "ps1", "sh"];

const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
/// Server configuration as exposed by the settings endpoint.
pub struct PanelSettings {
    /// Directory served as `/`.
    pub base_directory: String,
    /// Largest accepted upload in bytes; `0` disables the limit.
    pub max_upload_size: u64,
    /// Lowercase extensions without dots.
    pub blocked_extensions: Vec<String>,
    /// Hostname used to build public URLs; empty when not configured.
    pub public_hostname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Partial settings update; absent fields are left unchanged.
pub struct SettingsUpdate {
    /// New base directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<String>,
    /// New upload limit in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_upload_size: Option<u64>,
    /// New blocked-extension list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_extensions: Option<Vec<String>>,
    /// New public hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_hostname: Option<String>,
}

impl SettingsUpdate {
    /// Builds an update carrying only the fields that differ between `before` and `after`.
    pub fn diff(before: &PanelSettings, after: &PanelSettings) -> Self {
        fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
            (before != after).then(|| after.clone())
        }
        Self {
            base_directory: changed(&before.base_directory, &after.base_directory),
            max_upload_size: changed(&before.max_upload_size, &after.max_upload_size),
            blocked_extensions: changed(&before.blocked_extensions, &after.blocked_extensions),
            public_hostname: changed(&before.public_hostname, &after.public_hostname),
        }
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.base_directory.is_none()
            && self.max_upload_size.is_none()
            && self.blocked_extensions.is_none()
            && self.public_hostname.is_none()
    }

    /// Applies the update in place.
    pub fn apply_to(&self, settings: &mut PanelSettings) {
        if let Some(base_directory) = &self.base_directory {
            settings.base_directory = base_directory.clone();
        }
        if let Some(max_upload_size) = self.max_upload_size {
            settings.max_upload_size = max_upload_size;
        }
        if let Some(blocked_extensions) = &self.blocked_extensions {
            settings.blocked_extensions = blocked_extensions.clone();
        }
        if let Some(public_hostname) = &self.public_hostname {
            settings.public_hostname = public_hostname.clone();
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Rejection of a blocked-extension edit.
pub enum ExtensionError {
    /// Not 1-10 lowercase ASCII letters or digits after normalization.
    #[error("\"{0}\" is not a valid extension")]
    Invalid(String),
    /// Already present in the list.
    #[error("\"{0}\" is already blocked")]
    AlreadyBlocked(String),
}

/// Trims, lowercases, and strips leading dots.
pub fn normalize_extension(raw: &str) -> String {
    raw.trim().to_lowercase().trim_start_matches('.').to_string()
}

/// Whether a normalized extension is acceptable.
pub fn is_valid_extension(ext: &str) -> bool {
    !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext
            .bytes()
            .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit())
}

impl PanelSettings {
    /// Adds one extension; blank input is ignored and yields `Ok(None)`.
    pub fn block_extension(&mut self, raw: &str) -> Result<Option<String>, ExtensionError> {
        let ext = normalize_extension(raw);
        if ext.is_empty() {
            return Ok(None);
        }
        if !is_valid_extension(&ext) {
            return Err(ExtensionError::Invalid(ext));
        }
        if self.blocked_extensions.contains(&ext) {
            return Err(ExtensionError::AlreadyBlocked(ext));
        }
        self.blocked_extensions.push(ext.clone());
        Ok(Some(ext))
    }

    /// Adds every comma- or whitespace-separated extension in `input`.
    ///
    /// Valid entries are added even when others fail; the failures are returned.
    pub fn block_extensions_from_input(&mut self, input: &str) -> Vec<ExtensionError> {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(|raw| self.block_extension(raw).err())
            .collect()
    }

    /// Removes an extension; returns whether it was present.
    pub fn unblock_extension(&mut self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        let before = self.blocked_extensions.len();
        self.blocked_extensions.retain(|blocked| *blocked != ext);
        self.blocked_extensions.len() != before
    }

    /// Adds every preset extension not yet blocked.
    pub fn block_preset(&mut self, preset: &[&str]) {
        for ext in preset {
            if !self.blocked_extensions.iter().any(|blocked| blocked == ext) {
                self.blocked_extensions.push((*ext).to_string());
            }
        }
    }

    /// Restores [`DEFAULT_BLOCKED_EXTENSIONS`].
    pub fn reset_blocked_extensions(&mut self) {
        self.blocked_extensions = DEFAULT_BLOCKED_EXTENSIONS
            .iter()
            .map(|ext| (*ext).to_string())
            .collect();
    }

    /// Whether a file name ends in a blocked extension.
    pub fn is_blocked_file(&self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.blocked_extensions.iter().any(|blocked| *blocked == ext)
    }

    /// Upload limit in mebibytes, for display.
    pub fn max_upload_size_mb(&self) -> f64 {
        self.max_upload_size as f64 / (1024.0 * 1024.0)
    }

    /// Public URL for a path, when a hostname is configured.
    pub fn public_url_for(&self, path: &str) -> Option<String> {
        public_url(&self.public_hostname, path)
    }
}

/// Builds `https://{hostname}{path}`; `None` for a blank hostname.
pub fn public_url(hostname: &str, path: &str) -> Option<String> {
    let hostname = hostname.trim();
    if hostname.is_empty() {
        return None;
    }
    if path.starts_with('/') {
        Some(format!("https://{hostname}{path}"))
    } else {
        Some(format!("https://{hostname}/{path}"))
    }
}
