//! Filesystem helpers
//!
//! Writes are atomic (tempfile in the destination directory, then
//! rename) so a rebuild interrupted mid-write never leaves a truncated
//! artifact for the templating host to pick up.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::ThemeResult;

/// Create a directory and its parents; existing directories are fine
pub fn ensure_dir(path: &Path) -> ThemeResult<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Write `content` to `path` atomically via tempfile + rename
pub fn atomic_write(path: &Path, content: &str) -> ThemeResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.css");
        atomic_write(&path, "body{color:red}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "body{color:red}");
    }

    #[test]
    fn test_atomic_write_overwrites_wholesale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.liquid");
        atomic_write(&path, "first, much longer content").unwrap();
        atomic_write(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
