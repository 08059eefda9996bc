use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::WriteError;
use crate::object::AlObject;

/// Write `object` to `dir/<file name>` and return the path written.
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn write_object(object: &AlObject, dir: &Path, overwrite: bool) -> Result<PathBuf, WriteError> {
    fs::create_dir_all(dir).map_err(|source| WriteError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(object.file_name());
    if path.exists() && !overwrite {
        return Err(WriteError::AlreadyExists(path));
    }

    fs::write(&path, object.serialize()).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    info!("Wrote {} {} to {}", object.kind(), object.name(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Codeunit;

    fn codeunit() -> AlObject {
        Codeunit::new(50100, "Worker Sync").unwrap().into()
    }

    #[test]
    fn test_writes_crlf_text() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("src");

        let path = write_object(&codeunit(), &out, false).unwrap();
        assert_eq!(path, out.join("WorkerSync.codeunit.al"));

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, codeunit().serialize());
        assert!(written.contains("\r\n"));
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        write_object(&codeunit(), dir.path(), false).unwrap();

        let err = write_object(&codeunit(), dir.path(), false).unwrap_err();
        assert!(matches!(err, WriteError::AlreadyExists(_)));

        assert!(write_object(&codeunit(), dir.path(), true).is_ok());
    }
}
