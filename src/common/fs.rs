use std::fs;
use std::path::Path;

use crate::error::Result;

/// Create the parent directory of `path` if it doesn't exist.
pub fn ensure_parent_dir_exists(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::ensure_parent_dir_exists;

    #[test]
    fn creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("maps/alpine/tiles.json");
        ensure_parent_dir_exists(&target).unwrap();
        assert!(target.parent().unwrap().is_dir());
        ensure_parent_dir_exists(std::path::Path::new("tiles.json")).unwrap();
    }
}
