//! Location of the credential store.

use std::path::{Path, PathBuf};

const STORE_DIR: &str = ".otpkeep";
const STORE_FILE: &str = "accounts.json";

/// Pick the store file: an explicit path first, otherwise
/// `$HOME/.otpkeep/accounts.json`, relative to the working directory when
/// there is no home.
pub fn resolve_store_path(explicit: Option<&Path>, home: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match home {
        Some(home) => home.join(STORE_DIR).join(STORE_FILE),
        None => Path::new(STORE_DIR).join(STORE_FILE),
    }
}

/// The user's home directory from `HOME`, ignoring an empty value.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
