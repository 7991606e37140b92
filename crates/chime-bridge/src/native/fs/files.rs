use std::io;
use std::path::{Component, Path, PathBuf};

use chime_common::BridgeError;

/// Names of the files (or directories) directly under `root/relative`, sorted.
///
/// A missing directory lists as empty.
pub(super) fn list(root: &Path, relative: &str, directories: bool) -> Result<Vec<String>, BridgeError> {
    let dir = resolve(root, relative)?;
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() != directories {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Join `relative` onto `root`, refusing anything that could leave it.
fn resolve(root: &Path, relative: &str) -> Result<PathBuf, BridgeError> {
    let mut path = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => {
                return Err(BridgeError::NativeCall {
                    method: "listFiles",
                    message: format!("path escapes data directory: {relative:?}"),
                })
            }
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_stays_under_root() {
        let root = Path::new("/data");
        assert_eq!(resolve(root, "").unwrap(), Path::new("/data"));
        assert_eq!(resolve(root, "./a/b").unwrap(), Path::new("/data/a/b"));
        assert!(resolve(root, "../etc").is_err());
        assert!(resolve(root, "a/../../etc").is_err());
        assert!(resolve(root, "/etc/passwd").is_err());
    }
}
