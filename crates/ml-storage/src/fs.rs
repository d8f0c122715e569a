//! Filesystem resource provider.
//!
//! Provides [`FsResources`], which exposes every file below a root directory
//! as a resource named by its relative path with `.` as the separator:
//! `Lessons/Intro.ru.xml` becomes `"Lessons.Intro.ru.xml"`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::storage::{ResourceProvider, ResourceStream, StorageError, StorageErrorKind, validate_name};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem-backed resources.
///
/// Hidden files and directories (leading `.`) are skipped. The name → path
/// map is refreshed by every [`names`](ResourceProvider::names) call and on
/// a miss in [`open`](ResourceProvider::open).
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use ml_storage::{FsResources, ResourceProvider};
///
/// let resources = FsResources::new(PathBuf::from("content"));
/// for name in resources.names()? {
///     println!("{name}");
/// }
/// ```
#[derive(Debug)]
pub struct FsResources {
    /// Root directory of the resource tree.
    root: PathBuf,
    /// Resource name → file path from the last scan.
    paths: Mutex<HashMap<String, PathBuf>>,
}

impl FsResources {
    /// Create a provider over `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            paths: Mutex::new(HashMap::new()),
        }
    }

    /// Root directory of the resource tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root directory and rebuild the name map.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    fn scan(&self) -> Result<Vec<String>, StorageError> {
        let mut found = HashMap::new();
        if self.root.exists() {
            scan_directory(&self.root, "", &mut found)?;
        }

        let mut names: Vec<String> = found.keys().cloned().collect();
        names.sort();
        tracing::debug!(root = %self.root.display(), count = names.len(), "Scanned resources");

        *self.paths.lock().unwrap() = found;
        Ok(names)
    }

    fn lookup(&self, name: &str) -> Option<PathBuf> {
        self.paths.lock().unwrap().get(name).cloned()
    }
}

/// Collect files below `dir`, naming them `<prefix><relative.dotted.path>`.
fn scan_directory(
    dir: &Path,
    prefix: &str,
    found: &mut HashMap<String, PathBuf>,
) -> Result<(), StorageError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        StorageError::io(e, None)
            .with_name(dir.display().to_string())
            .with_backend(BACKEND)
    })?;

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            tracing::debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }

        let name = format!("{prefix}{file_name}");
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            scan_directory(&entry.path(), &format!("{name}."), found)?;
        } else if validate_name(&name).is_ok() {
            found.insert(name, entry.path());
        }
    }
    Ok(())
}

impl ResourceProvider for FsResources {
    fn names(&self) -> Result<Vec<String>, StorageError> {
        self.scan()
    }

    fn open(&self, name: &str) -> Result<ResourceStream, StorageError> {
        validate_name(name).map_err(|e| e.with_backend(BACKEND))?;

        let path = match self.lookup(name) {
            Some(path) => path,
            None => {
                self.scan()?;
                self.lookup(name).ok_or_else(|| {
                    StorageError::new(StorageErrorKind::NotFound)
                        .with_name(name)
                        .with_backend(BACKEND)
                })?
            }
        };

        let file = fs::File::open(&path)
            .map_err(|e| StorageError::io(e, Some(name)).with_backend(BACKEND))?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_resources_is_send_sync() {
        assert_send_sync::<FsResources>();
    }

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_names_empty_dir() {
        let temp_dir = create_test_dir();

        let resources = FsResources::new(temp_dir.path().to_path_buf());

        assert!(resources.names().unwrap().is_empty());
    }

    #[test]
    fn test_names_missing_dir() {
        let resources = FsResources::new(PathBuf::from("/nonexistent"));

        assert!(resources.names().unwrap().is_empty());
    }

    #[test]
    fn test_names_join_directories_with_dots() {
        let temp_dir = create_test_dir();
        let lessons = temp_dir.path().join("Lessons");
        fs::create_dir(&lessons).unwrap();
        fs::write(lessons.join("Intro.xml"), "<Lesson/>").unwrap();
        fs::write(lessons.join("Intro.ru.xml"), "<Lesson/>").unwrap();
        fs::write(temp_dir.path().join("Courses.xml"), "<Courses/>").unwrap();

        let resources = FsResources::new(temp_dir.path().to_path_buf());

        assert_eq!(
            resources.names().unwrap(),
            vec!["Courses.xml", "Lessons.Intro.ru.xml", "Lessons.Intro.xml"]
        );
    }

    #[test]
    fn test_names_skip_hidden() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join(".draft.xml"), "").unwrap();
        fs::create_dir(temp_dir.path().join(".git")).unwrap();
        fs::write(temp_dir.path().join(".git").join("HEAD"), "").unwrap();
        fs::write(temp_dir.path().join("Courses.xml"), "").unwrap();

        let resources = FsResources::new(temp_dir.path().to_path_buf());

        assert_eq!(resources.names().unwrap(), vec!["Courses.xml"]);
    }

    #[test]
    fn test_read_flat_and_nested_names() {
        let temp_dir = create_test_dir();
        let lessons = temp_dir.path().join("Lessons");
        fs::create_dir(&lessons).unwrap();
        fs::write(lessons.join("Intro.xml"), "nested").unwrap();
        fs::write(temp_dir.path().join("Lessons.Basics.xml"), "flat").unwrap();

        let resources = FsResources::new(temp_dir.path().to_path_buf());

        assert_eq!(resources.read("Lessons.Intro.xml").unwrap(), b"nested");
        assert_eq!(resources.read("Lessons.Basics.xml").unwrap(), b"flat");
    }

    #[test]
    fn test_open_sees_files_added_after_scan() {
        let temp_dir = create_test_dir();
        let resources = FsResources::new(temp_dir.path().to_path_buf());
        assert!(resources.names().unwrap().is_empty());

        fs::write(temp_dir.path().join("Courses.xml"), "<Courses/>").unwrap();

        assert_eq!(resources.read("Courses.xml").unwrap(), b"<Courses/>");
    }

    #[test]
    fn test_open_missing() {
        let temp_dir = create_test_dir();
        let resources = FsResources::new(temp_dir.path().to_path_buf());

        let err = resources.open("Lessons.Missing.xml").err().unwrap();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
        assert_eq!(err.name.as_deref(), Some("Lessons.Missing.xml"));
    }

    #[test]
    fn test_open_rejects_paths() {
        let temp_dir = create_test_dir();
        let resources = FsResources::new(temp_dir.path().to_path_buf());

        let err = resources.open("../etc/passwd").err().unwrap();

        assert_eq!(err.kind, StorageErrorKind::InvalidName);
        assert_eq!(err.backend, Some("Fs"));
    }
}
