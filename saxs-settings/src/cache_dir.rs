use std::env;
use std::path::PathBuf;

/// Resolves the per-user cache directory this process should store downloaded
/// residue-topology tables under (spec.md §6 "Environment").
///
/// `LOCALAPPDATA` on Windows, `HOME/Library/Caches` on macOS, otherwise
/// `XDG_CACHE_HOME` or `HOME/.cache` on Linux/other Unix. Falls back to the
/// current directory's `.saxs-cache` if none of those are set, so callers never
/// have to handle a missing cache directory as an error.
pub fn cache_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        if let Ok(local) = env::var("LOCALAPPDATA") {
            return PathBuf::from(local).join("saxs");
        }
    } else if cfg!(target_os = "macos") {
        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(home).join("Library").join("Caches").join("saxs");
        }
    } else {
        if let Ok(xdg) = env::var("XDG_CACHE_HOME") {
            return PathBuf::from(xdg).join("saxs");
        }
        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(home).join(".cache").join("saxs");
        }
    }
    PathBuf::from(".saxs-cache")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir_is_nonempty() {
        let dir = cache_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
