//! Safe writing of emitted files.
//!
//! Every path is validated against directory traversal before anything is
//! written. Files are written to temporaries first and renamed into place once
//! all writes succeeded; on failure the temporaries are removed.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::warn;

use crate::bundler::EmittedFile;
use crate::{Error, Result};

/// Write `files` under `dir`, creating directories as needed.
pub fn write_files(files: &[EmittedFile], dir: &Path) -> Result<()> {
    let dir = dir.clean();
    fs::create_dir_all(&dir).map_err(|e| {
        Error::WriteFailure(format!(
            "failed to create output directory '{}': {e}",
            dir.display()
        ))
    })?;

    let operations = files
        .iter()
        .map(|f| Ok((validate_output_path(&dir, &f.path)?, f.contents.as_slice())))
        .collect::<Result<Vec<_>>>()?;

    write_files_atomic(&operations)
}

/// Resolve `filename` under `base_dir`, refusing anything that escapes it.
pub fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();
    if !full_path.starts_with(base_dir) {
        return Err(Error::InvalidOutputPath(format!(
            "'{filename}' escapes output directory '{}'",
            base_dir.display()
        )));
    }

    Ok(full_path)
}

fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files = Vec::with_capacity(operations.len());

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                Error::WriteFailure(format!(
                    "failed to create directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }

        let mut temp_name = target_path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        fs::write(&temp_path, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "failed to write temporary file '{}': {e}",
                temp_path.display()
            ))
        })?;

        temp_files.push((temp_path, target_path.clone()));
    }

    for (temp_path, target_path) in &temp_files {
        fs::rename(temp_path, target_path).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "failed to rename '{}' to '{}': {e}",
                temp_path.display(),
                target_path.display()
            ))
        })?;
    }

    Ok(())
}

fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                warn!("failed to clean up '{}': {e}", temp_path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn nested_paths_are_created() {
        let temp = TempDir::new().unwrap();
        let files = vec![
            EmittedFile::new("index.html", "<html></html>"),
            EmittedFile::new("static/js/index.js", "console.log(1)"),
        ];
        write_files(&files, temp.path()).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("static/js/index.js")).unwrap(),
            "console.log(1)"
        );
        assert!(temp.path().join("index.html").is_file());
        assert!(!temp.path().join("index.html.tmp").exists());
    }

    #[test]
    fn traversal_is_rejected_before_writing() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("dist");
        let files = vec![
            EmittedFile::new("ok.js", "1"),
            EmittedFile::new("../escape.js", "2"),
        ];
        let err = write_files(&files, &out).unwrap_err();
        assert!(matches!(err, Error::InvalidOutputPath(_)));
        assert!(!out.join("ok.js").exists());
        assert!(!temp.path().join("escape.js").exists());
    }

    #[test]
    fn validate_output_path_cases() {
        let base = Path::new("/tmp/output");
        assert_eq!(
            validate_output_path(base, "./static/js/a.js").unwrap(),
            Path::new("/tmp/output/static/js/a.js")
        );
        assert!(validate_output_path(base, "safe/../../../../etc/passwd").is_err());
        assert!(validate_output_path(base, "file\0name.js").is_err());
    }
}
