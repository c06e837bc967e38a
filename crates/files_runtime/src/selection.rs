//! Selected files and the click, toggle, range, and select-all transitions over them.

use panel_host::FileEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Ordered set of selected files keyed by path.
///
/// Directories are never admitted; transitions that would add one ignore it. Mode flags are
/// derived from the set on every read.
pub struct SelectionModel {
    entries: Vec<FileEntry>,
    anchor: Option<String>,
}

fn selectable(displayed: &[FileEntry]) -> impl Iterator<Item = &FileEntry> {
    displayed.iter().filter(|entry| !entry.is_dir)
}

impl SelectionModel {
    /// Selected entries in insertion order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Selected paths in insertion order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.path.clone()).collect()
    }

    /// Number of selected files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `path` is selected.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|entry| entry.path == path)
    }

    /// Path of the last explicitly clicked or toggled row.
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Whether any file is selected.
    pub fn is_multi_select_mode(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Whether every selectable row of `displayed` is selected.
    pub fn all_selected(&self, displayed: &[FileEntry]) -> bool {
        let mut rows = selectable(displayed).peekable();
        rows.peek().is_some() && rows.all(|entry| self.contains(&entry.path))
    }

    /// Whether some, but not all, selectable rows of `displayed` are selected.
    pub fn some_selected(&self, displayed: &[FileEntry]) -> bool {
        selectable(displayed).any(|entry| self.contains(&entry.path)) && !self.all_selected(displayed)
    }

    /// Plain click that opens details: selects exactly `entry`.
    ///
    /// Clicking the sole selected file again clears the selection. Returns whether `entry` is
    /// selected afterwards.
    pub fn select_for_details(&mut self, entry: &FileEntry) -> bool {
        if entry.is_dir {
            return false;
        }
        if self.entries.len() == 1 && self.entries[0].path == entry.path {
            self.clear();
            return false;
        }
        self.entries = vec![entry.clone()];
        self.anchor = Some(entry.path.clone());
        true
    }

    /// Checkbox or modifier click: adds or removes `entry`, keeping the rest.
    ///
    /// Returns whether `entry` is selected afterwards.
    pub fn toggle_in_selection(&mut self, entry: &FileEntry) -> bool {
        if entry.is_dir {
            return false;
        }
        self.anchor = Some(entry.path.clone());
        match self.entries.iter().position(|item| item.path == entry.path) {
            Some(idx) => {
                self.entries.remove(idx);
                false
            }
            None => {
                self.entries.push(entry.clone());
                true
            }
        }
    }

    /// Unions the files of `displayed[min(a, b)..=max(a, b)]` into the selection.
    ///
    /// Indices past the end are clamped. Already selected files stay where they are; new ones
    /// are appended in display order. Returns how many were added.
    pub fn select_range(&mut self, displayed: &[FileEntry], a: usize, b: usize) -> usize {
        let Some(last) = displayed.len().checked_sub(1) else {
            return 0;
        };
        let lo = a.min(b).min(last);
        let hi = a.max(b).min(last);
        let mut added = 0;
        for entry in selectable(&displayed[lo..=hi]) {
            if !self.contains(&entry.path) {
                self.entries.push(entry.clone());
                added += 1;
            }
        }
        added
    }

    /// Shift-click: range-selects from the anchor row to `target`, which becomes the anchor.
    ///
    /// Without a visible anchor this behaves like a toggle of `target`.
    pub fn extend_to(&mut self, displayed: &[FileEntry], target: usize) -> usize {
        let anchor_idx = self
            .anchor
            .as_deref()
            .and_then(|anchor| displayed.iter().position(|entry| entry.path == anchor));
        match anchor_idx {
            Some(anchor_idx) => {
                let added = self.select_range(displayed, anchor_idx, target);
                if let Some(entry) = displayed.get(target) {
                    self.anchor = Some(entry.path.clone());
                }
                added
            }
            None => match displayed.get(target) {
                Some(entry) => usize::from(self.toggle_in_selection(entry)),
                None => 0,
            },
        }
    }

    /// Selects every file of `displayed`, or clears when they already are all selected.
    ///
    /// Returns whether everything is selected afterwards.
    pub fn select_all(&mut self, displayed: &[FileEntry]) -> bool {
        if self.all_selected(displayed) {
            self.clear();
            return false;
        }
        let rows: Vec<FileEntry> = selectable(displayed).cloned().collect();
        if rows.is_empty() {
            return false;
        }
        self.entries = rows;
        true
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.anchor = None;
    }

    /// Drops entries absent from a fresh listing and refreshes the survivors.
    ///
    /// Returns how many were dropped.
    pub fn retain_listed(&mut self, listing: &[FileEntry]) -> usize {
        let before = self.entries.len();
        self.entries = self
            .entries
            .iter()
            .filter_map(|selected| {
                listing
                    .iter()
                    .find(|entry| entry.path == selected.path && !entry.is_dir)
                    .cloned()
            })
            .collect();
        if let Some(anchor) = &self.anchor {
            if !listing.iter().any(|entry| &entry.path == anchor) {
                self.anchor = None;
            }
        }
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn display() -> Vec<FileEntry> {
        vec![
            FileEntry::dir("/d0"),
            FileEntry::file("/f1.txt", 1),
            FileEntry::file("/f2.txt", 2),
            FileEntry::dir("/d3"),
            FileEntry::file("/f4.txt", 4),
            FileEntry::file("/f5.txt", 5),
        ]
    }

    #[test]
    fn plain_click_selects_one_and_reclick_clears() {
        let rows = display();
        let mut selection = SelectionModel::default();
        assert!(selection.select_for_details(&rows[1]));
        assert_eq!(selection.paths(), vec!["/f1.txt"]);
        assert!(selection.is_multi_select_mode());

        assert!(selection.select_for_details(&rows[2]));
        assert_eq!(selection.paths(), vec!["/f2.txt"]);

        assert!(!selection.select_for_details(&rows[2]));
        assert!(selection.is_empty());
        assert!(!selection.is_multi_select_mode());
    }

    #[test]
    fn toggles_preserve_the_rest() {
        let rows = display();
        let mut selection = SelectionModel::default();
        selection.toggle_in_selection(&rows[1]);
        selection.toggle_in_selection(&rows[4]);
        selection.toggle_in_selection(&rows[1]);
        assert_eq!(selection.paths(), vec!["/f4.txt"]);
        assert_eq!(selection.anchor(), Some("/f1.txt"));
    }

    #[test]
    fn directories_are_silently_ignored() {
        let rows = display();
        let mut selection = SelectionModel::default();
        assert!(!selection.toggle_in_selection(&rows[0]));
        assert!(!selection.select_for_details(&rows[3]));
        assert!(selection.is_empty());
        assert_eq!(selection.anchor(), None);
    }

    #[test]
    fn range_select_unions_files_in_display_order() {
        let rows = display();
        let mut selection = SelectionModel::default();
        selection.toggle_in_selection(&rows[1]);

        let added = selection.select_range(&rows, 5, 2);
        assert_eq!(added, 3);
        assert_eq!(
            selection.paths(),
            vec!["/f1.txt", "/f2.txt", "/f4.txt", "/f5.txt"]
        );

        assert_eq!(selection.select_range(&rows, 2, 5), 0);
        assert_eq!(selection.select_range(&rows, 4, 99), 0);
        assert_eq!(selection.select_range(&[], 0, 3), 0);
    }

    #[test]
    fn shift_click_extends_from_anchor() {
        let rows = display();
        let mut selection = SelectionModel::default();
        selection.toggle_in_selection(&rows[5]);
        assert_eq!(selection.extend_to(&rows, 1), 3);
        assert_eq!(
            selection.paths(),
            vec!["/f5.txt", "/f1.txt", "/f2.txt", "/f4.txt"]
        );
    }

    #[test]
    fn chained_shift_clicks_extend_from_last_clicked_row() {
        let rows = display();
        let mut selection = SelectionModel::default();
        selection.toggle_in_selection(&rows[1]);
        assert_eq!(selection.extend_to(&rows, 2), 1);
        assert_eq!(selection.anchor(), Some("/f2.txt"));

        // Re-sorted display: the range starts at f2, not at the first toggled f1.
        let resorted = vec![
            rows[2].clone(),
            rows[5].clone(),
            rows[4].clone(),
            rows[1].clone(),
        ];
        assert_eq!(selection.extend_to(&resorted, 1), 1);
        assert_eq!(selection.anchor(), Some("/f5.txt"));
        assert_eq!(selection.paths(), vec!["/f1.txt", "/f2.txt", "/f5.txt"]);
    }

    #[test]
    fn shift_click_without_anchor_toggles_target() {
        let rows = display();
        let mut selection = SelectionModel::default();
        assert_eq!(selection.extend_to(&rows, 2), 1);
        assert_eq!(selection.paths(), vec!["/f2.txt"]);
    }

    #[test]
    fn select_all_toggles_on_file_subset() {
        let rows = vec![
            FileEntry::file("/a", 1),
            FileEntry::dir("/dir"),
            FileEntry::file("/b", 1),
            FileEntry::file("/c", 1),
        ];
        let mut selection = SelectionModel::default();
        assert!(selection.select_all(&rows));
        assert_eq!(selection.paths(), vec!["/a", "/b", "/c"]);
        assert!(selection.all_selected(&rows));
        assert!(!selection.some_selected(&rows));

        assert!(!selection.select_all(&rows));
        assert!(selection.is_empty());

        for idx in [0, 2, 3] {
            selection.toggle_in_selection(&rows[idx]);
        }
        assert!(selection.all_selected(&rows));
        assert!(!selection.select_all(&rows));
        assert!(selection.is_empty());
    }

    #[test]
    fn partial_selection_reports_some_selected() {
        let rows = display();
        let mut selection = SelectionModel::default();
        selection.toggle_in_selection(&rows[2]);
        assert!(selection.some_selected(&rows));
        assert!(!selection.all_selected(&rows));
        assert!(!selection.all_selected(&[FileEntry::dir("/only-dir")]));
    }

    #[test]
    fn retain_listed_drops_vanished_entries() {
        let rows = display();
        let mut selection = SelectionModel::default();
        selection.toggle_in_selection(&rows[1]);
        selection.toggle_in_selection(&rows[2]);

        let mut refreshed = rows.clone();
        refreshed.remove(2);
        refreshed[1].size = 99;
        assert_eq!(selection.retain_listed(&refreshed), 1);
        assert_eq!(selection.entries(), &[refreshed[1].clone()]);
        assert_eq!(selection.anchor(), None);
    }
}
