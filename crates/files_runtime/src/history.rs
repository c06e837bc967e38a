//! Back/forward history over visited directories.

use std::collections::VecDeque;

use panel_host::{breadcrumb_trail, normalize_virtual_path, parent_path, Breadcrumb, ROOT_PATH};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Current directory plus the back and forward stacks.
///
/// `past` holds the most recent directory last; `future` holds the next directory first. Every
/// path change other than back/forward goes through [`PathHistory::open_folder`].
pub struct PathHistory {
    current: String,
    past: Vec<String>,
    future: VecDeque<String>,
}

impl Default for PathHistory {
    fn default() -> Self {
        Self::new(ROOT_PATH)
    }
}

impl PathHistory {
    /// Starts at `initial` with empty stacks.
    pub fn new(initial: &str) -> Self {
        Self {
            current: normalize_virtual_path(initial),
            past: Vec::new(),
            future: VecDeque::new(),
        }
    }

    /// Directory on display.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Back stack, oldest first.
    pub fn past(&self) -> &[String] {
        &self.past
    }

    /// Forward stack, next first.
    pub fn future(&self) -> Vec<&str> {
        self.future.iter().map(String::as_str).collect()
    }

    /// Whether the back control is enabled.
    pub fn can_go_back(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether the forward control is enabled.
    pub fn can_go_forward(&self) -> bool {
        !self.future.is_empty()
    }

    /// Whether the up control is enabled.
    pub fn can_go_up(&self) -> bool {
        self.current != ROOT_PATH
    }

    /// Moves to `path`, pushing the current directory onto `past` and clearing `future`.
    ///
    /// Returns `false` (and leaves both stacks alone) when `path` is already current.
    pub fn open_folder(&mut self, path: &str) -> bool {
        let target = normalize_virtual_path(path);
        if target == self.current {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, target);
        self.past.push(previous);
        self.future.clear();
        true
    }

    /// Returns to the previous directory; `false` when `past` is empty.
    pub fn go_back(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let left = std::mem::replace(&mut self.current, previous);
        self.future.push_front(left);
        true
    }

    /// Re-enters the directory left by the last [`PathHistory::go_back`]; `false` when `future`
    /// is empty.
    pub fn go_forward(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let left = std::mem::replace(&mut self.current, next);
        self.past.push(left);
        true
    }

    /// Opens the parent directory; `false` at the root.
    pub fn go_up(&mut self) -> bool {
        match parent_path(&self.current) {
            Some(parent) => self.open_folder(&parent),
            None => false,
        }
    }

    /// Root-first location bar segments for the current directory.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumb_trail(&self.current)
    }

    /// Display name of the current directory; `Root` for `/`.
    pub fn folder_name(&self) -> &str {
        if self.current == ROOT_PATH {
            return "Root";
        }
        self.current.rsplit('/').next().unwrap_or(ROOT_PATH)
    }
}
