//! Filter and sort projection from a raw listing to the rows on display.

use std::cmp::Ordering;

use panel_host::{FileEntry, SortDirection, SortKey};

/// Projects `entries` into display order without touching the input.
///
/// Keeps names containing `query` (case-insensitive), then stable-sorts with directories ahead
/// of files. Descending order reverses the comparator, so ties keep their relative order and
/// projecting an already projected list is a no-op.
pub fn project_entries(
    entries: &[FileEntry],
    query: &str,
    sort_by: SortKey,
    direction: SortDirection,
) -> Vec<FileEntry> {
    let needle = query.to_lowercase();
    let mut rows: Vec<FileEntry> = entries
        .iter()
        .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    rows.sort_by(|a, b| compare_entries(a, b, sort_by, direction));
    rows
}

/// Display-order comparator.
pub fn compare_entries(
    a: &FileEntry,
    b: &FileEntry,
    sort_by: SortKey,
    direction: SortDirection,
) -> Ordering {
    if a.is_dir != b.is_dir {
        return b.is_dir.cmp(&a.is_dir);
    }
    let ord = match sort_by {
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::Size if a.is_dir => Ordering::Equal,
        SortKey::Size => a.size.cmp(&b.size),
        SortKey::Modified => a.modified.cmp(&b.modified),
    };
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// Case-insensitive natural name order; case breaks remaining ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    natural_cmp(&a.to_lowercase(), &b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Compares strings treating runs of ASCII digits as numbers (`file2` < `file10`).
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (ab, bb) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let a_end = digit_run_end(ab, i);
            let b_end = digit_run_end(bb, j);
            let a_digits = trim_leading_zeros(&ab[i..a_end]);
            let b_digits = trim_leading_zeros(&bb[j..b_end]);

            let ord = a_digits
                .len()
                .cmp(&b_digits.len())
                .then_with(|| a_digits.cmp(b_digits))
                // Equal values: fewer leading zeros first.
                .then_with(|| (a_end - i).cmp(&(b_end - j)));
            if ord != Ordering::Equal {
                return ord;
            }
            i = a_end;
            j = b_end;
            continue;
        }

        if ab[i] != bb[j] {
            return ab[i].cmp(&bb[j]);
        }
        i += 1;
        j += 1;
    }

    (ab.len() - i).cmp(&(bb.len() - j))
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|byte| !byte.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset)
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let first_non_zero = digits
        .iter()
        .position(|byte| *byte != b'0')
        .unwrap_or(digits.len());
    &digits[first_non_zero..]
}

/// Column-header click: flips direction on the active column, otherwise switches to `clicked`
/// ascending.
pub fn next_sort(
    current: SortKey,
    direction: SortDirection,
    clicked: SortKey,
) -> (SortKey, SortDirection) {
    if current == clicked {
        (current, direction.flipped())
    } else {
        (clicked, SortDirection::Asc)
    }
}
