//! Registry of browser `File` objects picked or dropped by the user.
//!
//! [`LocalFile`] only carries an opaque token for host files; the transport resolves the token
//! here when the upload actually starts.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use panel_host::LocalFile;

thread_local! {
    static FILES: RefCell<HashMap<u64, web_sys::File>> = RefCell::new(HashMap::new());
    static NEXT_TOKEN: Cell<u64> = const { Cell::new(1) };
}

/// Registers a picked file and returns its upload source.
pub fn register_file(file: web_sys::File) -> LocalFile {
    let token = NEXT_TOKEN.with(|next| {
        let token = next.get();
        next.set(token + 1);
        token
    });
    let local = LocalFile::from_host(&file.name(), file.size().max(0.0) as u64, token);
    FILES.with(|files| files.borrow_mut().insert(token, file));
    local
}

/// Registers every file of an `<input type="file">` selection or drop payload.
pub fn register_file_list(list: &web_sys::FileList) -> Vec<LocalFile> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .map(register_file)
        .collect()
}

/// Forgets the file behind `token`; later uploads of it fail.
pub fn release_file(token: u64) {
    FILES.with(|files| files.borrow_mut().remove(&token));
}

pub(crate) fn lookup(token: u64) -> Option<web_sys::File> {
    FILES.with(|files| files.borrow().get(&token).cloned())
}
