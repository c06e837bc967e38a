//! Activity-log models and presentation helpers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not pick one.
pub const DEFAULT_LOG_PAGE_SIZE: u32 = 50;
/// Largest page size the server honors.
pub const MAX_LOG_PAGE_SIZE: u32 = 100;

const TRANSITION_SEPARATOR: &str = " -> ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One recorded server action.
pub struct ActivityLogEntry {
    /// Row id.
    pub id: i64,
    /// Server timestamp, RFC 3339 or `YYYY-MM-DD HH:MM:SS` in UTC.
    pub timestamp: String,
    /// Action name (`upload`, `delete`, `rename`, `move`, ...).
    pub action: String,
    /// Affected path; `old -> new` for rename and move.
    pub file_path: String,
    /// Client address, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One page of the activity log.
pub struct ActivityLogPage {
    /// Entries, newest first.
    #[serde(default)]
    pub logs: Vec<ActivityLogEntry>,
    /// Page size the server applied.
    #[serde(default)]
    pub limit: u32,
    /// Offset the server applied.
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Display split of an entry's `file_path`.
pub enum LogPath {
    /// A single affected path.
    Single {
        /// Normalized path.
        path: String,
        /// Final segment.
        file_name: String,
        /// Containing folder.
        folder: String,
    },
    /// A rename or move from one path to another.
    Transition {
        /// Normalized source path.
        from: String,
        /// Normalized destination path.
        to: String,
        /// Source file name.
        from_name: String,
        /// Destination file name.
        to_name: String,
        /// Source folder.
        from_folder: String,
        /// Destination folder.
        to_folder: String,
    },
}

impl ActivityLogEntry {
    /// Whether the action records a source and destination.
    pub fn is_transition(&self) -> bool {
        matches!(self.action.as_str(), "rename" | "move")
    }

    /// Splits `file_path` for display.
    pub fn parsed_path(&self) -> LogPath {
        if self.is_transition() {
            if let Some((from, to)) = self.file_path.split_once(TRANSITION_SEPARATOR) {
                let from = normalize_log_path(from);
                let to = normalize_log_path(to);
                return LogPath::Transition {
                    from_name: file_name_of(&from).to_string(),
                    to_name: file_name_of(&to).to_string(),
                    from_folder: folder_of(&from),
                    to_folder: folder_of(&to),
                    from,
                    to,
                };
            }
        }
        let path = normalize_log_path(&self.file_path);
        LogPath::Single {
            file_name: file_name_of(&path).to_string(),
            folder: folder_of(&path),
            path,
        }
    }

    /// Parses the server timestamp.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Converts backslash separators to `/`.
pub fn normalize_log_path(raw: &str) -> String {
    raw.trim().replace('\\', "/")
}

/// Returns the text after the last `/`.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns the text before the last `/`, or `/` when that is empty.
pub fn folder_of(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) if idx > 0 => path[..idx].to_string(),
        _ => "/".to_string(),
    }
}

/// Formats an instant relative to `now`.
///
/// Under a minute reads `Just now`; minutes, hours, and days follow up to a week, after which
/// the absolute date and time is shown.
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min{} ago", plural(minutes))
    } else if hours < 24 {
        format!("{hours} hour{} ago", plural(hours))
    } else if days < 7 {
        format!("{days} day{} ago", plural(days))
    } else {
        at.format("%Y-%m-%d %H:%M").to_string()
    }
}

fn plural(count: i64) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Clamps a requested page size to what the server accepts.
pub fn clamp_log_page_size(limit: u32) -> u32 {
    if limit == 0 || limit > MAX_LOG_PAGE_SIZE {
        DEFAULT_LOG_PAGE_SIZE
    } else {
        limit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Offset/limit cursor over the activity log.
pub struct LogPager {
    /// Page size.
    pub limit: u32,
    /// Index of the first row on the current page.
    pub offset: u32,
}

impl Default for LogPager {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LOG_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl LogPager {
    /// Cursor starting at the first page.
    pub fn new(limit: u32) -> Self {
        Self {
            limit: clamp_log_page_size(limit),
            offset: 0,
        }
    }

    /// Whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// Whether a page of `rows_on_page` rows may be followed by another.
    pub fn has_next(&self, rows_on_page: usize) -> bool {
        rows_on_page >= self.limit as usize
    }

    /// Cursor for the next page.
    pub fn next(self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            ..self
        }
    }

    /// Cursor for the previous page.
    pub fn previous(self) -> Self {
        Self {
            offset: self.offset.saturating_sub(self.limit),
            ..self
        }
    }
}
