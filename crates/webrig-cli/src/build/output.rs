//! Output directory preparation.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{BuildError, Result};

/// Remove everything inside `out_dir`, keeping the directory itself.
/// Creates it when absent.
pub fn clean_output_dir(out_dir: &Path) -> Result<()> {
    if !out_dir.exists() {
        fs::create_dir_all(out_dir)?;
        return Ok(());
    }
    if !out_dir.is_dir() {
        return Err(BuildError::OutputNotDirectory(out_dir.to_path_buf()).into());
    }

    for entry in fs::read_dir(out_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Recursively copy `static_dir` into `out_dir`, dereferencing symlinks.
///
/// Returns the number of files copied. A missing static directory copies
/// nothing.
pub fn copy_static(static_dir: &Path, out_dir: &Path) -> Result<usize> {
    if !static_dir.is_dir() {
        debug!("no static directory at {}", static_dir.display());
        return Ok(0);
    }

    let copy_error = |message: String| BuildError::StaticCopy {
        source_dir: static_dir.to_path_buf(),
        message,
    };

    let mut copied = 0;
    for entry in WalkDir::new(static_dir).follow_links(true) {
        let entry = entry.map_err(|e| copy_error(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(static_dir)
            .map_err(|e| copy_error(e.to_string()))?;
        let target = out_dir.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| copy_error(e.to_string()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| copy_error(e.to_string()))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| copy_error(e.to_string()))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn clean_keeps_directory_but_empties_it() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("dist");
        fs::create_dir_all(out.join("static/js")).unwrap();
        fs::write(out.join("index.html"), "old").unwrap();
        fs::write(out.join("static/js/old.js"), "old").unwrap();

        clean_output_dir(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn clean_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("build/dist");
        clean_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn clean_rejects_file() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("dist");
        fs::write(&out, "not a dir").unwrap();
        assert!(clean_output_dir(&out).is_err());
    }

    #[test]
    fn copy_preserves_layout_and_contents() {
        let temp = TempDir::new().unwrap();
        let static_dir = temp.path().join("static");
        fs::create_dir_all(static_dir.join("img")).unwrap();
        fs::write(static_dir.join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        fs::write(static_dir.join("img/a.svg"), "<svg/>").unwrap();
        let out = temp.path().join("out");

        assert_eq!(copy_static(&static_dir, &out).unwrap(), 2);
        assert_eq!(fs::read(out.join("logo.png")).unwrap(), [0x89, b'P', b'N', b'G']);
        assert_eq!(fs::read_to_string(out.join("img/a.svg")).unwrap(), "<svg/>");
    }

    #[test]
    fn missing_static_dir_copies_nothing() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            copy_static(&temp.path().join("static"), &temp.path().join("out")).unwrap(),
            0
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_dereferenced() {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared.txt");
        fs::write(&shared, "shared").unwrap();
        let static_dir = temp.path().join("static");
        fs::create_dir_all(&static_dir).unwrap();
        std::os::unix::fs::symlink(&shared, static_dir.join("link.txt")).unwrap();
        let out = temp.path().join("out");

        copy_static(&static_dir, &out).unwrap();
        let copied = out.join("link.txt");
        assert!(!fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(copied).unwrap(), "shared");
    }
}
