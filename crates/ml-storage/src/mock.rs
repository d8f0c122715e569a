//! Mock resource provider for testing.
//!
//! Provides [`MockResources`] for unit testing without filesystem access.
//! Every call is counted so tests can assert how often a consumer hits the
//! provider.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use std::thread;
use std::time::Duration;

use crate::storage::{ResourceProvider, ResourceStream, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// In-memory resources with call counters.
///
/// # Example
///
/// ```ignore
/// use ml_storage::{MockResources, ResourceProvider};
///
/// let resources = MockResources::new()
///     .with_text("Lessons.Intro.xml", "<Lesson Id='...'/>")
///     .with_unreadable("Lessons.Intro.ru.xml");
///
/// assert_eq!(resources.names().unwrap().len(), 2);
/// assert!(resources.open("Lessons.Intro.ru.xml").is_err());
/// assert_eq!(resources.open_calls("Lessons.Intro.ru.xml"), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockResources {
    resources: RwLock<BTreeMap<String, Vec<u8>>>,
    unreadable: RwLock<BTreeSet<String>>,
    names_delay: RwLock<Option<Duration>>,
    names_calls: AtomicUsize,
    open_calls: Mutex<HashMap<String, usize>>,
}

impl MockResources {
    /// Create a new empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource with raw bytes.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_resource(self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.resources
            .write()
            .unwrap()
            .insert(name.into(), bytes.into());
        self
    }

    /// Add a UTF-8 text resource.
    #[must_use]
    pub fn with_text(self, name: impl Into<String>, text: &str) -> Self {
        self.with_resource(name, text.as_bytes())
    }

    /// Add a resource that is listed but fails to open.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_unreadable(self, name: impl Into<String>) -> Self {
        self.unreadable.write().unwrap().insert(name.into());
        self
    }

    /// Sleep in every [`names`](ResourceProvider::names) call.
    ///
    /// Widens the window in which concurrent callers overlap.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_names_delay(self, delay: Duration) -> Self {
        *self.names_delay.write().unwrap() = Some(delay);
        self
    }

    /// Number of [`names`](ResourceProvider::names) calls so far.
    #[must_use]
    pub fn names_calls(&self) -> usize {
        self.names_calls.load(Ordering::SeqCst)
    }

    /// Number of [`open`](ResourceProvider::open) calls for `name` so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn open_calls(&self, name: &str) -> usize {
        self.open_calls
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// Number of [`open`](ResourceProvider::open) calls across all names.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_open_calls(&self) -> usize {
        self.open_calls.lock().unwrap().values().sum()
    }
}

impl ResourceProvider for MockResources {
    fn names(&self) -> Result<Vec<String>, StorageError> {
        self.names_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = *self.names_delay.read().unwrap() {
            thread::sleep(delay);
        }

        let resources = self.resources.read().unwrap();
        let unreadable = self.unreadable.read().unwrap();
        let mut names: Vec<String> = resources.keys().chain(unreadable.iter()).cloned().collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn open(&self, name: &str) -> Result<ResourceStream, StorageError> {
        *self
            .open_calls
            .lock()
            .unwrap()
            .entry(name.to_owned())
            .or_insert(0) += 1;

        if self.unreadable.read().unwrap().contains(name) {
            return Err(StorageError::new(StorageErrorKind::Other)
                .with_name(name)
                .with_backend(BACKEND));
        }

        self.resources
            .read()
            .unwrap()
            .get(name)
            .map(|bytes| Box::new(Cursor::new(bytes.clone())) as ResourceStream)
            .ok_or_else(|| StorageError::not_found(name).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_sorted_and_include_unreadable() {
        let resources = MockResources::new()
            .with_text("b.xml", "")
            .with_text("a.xml", "")
            .with_unreadable("c.xml");

        assert_eq!(resources.names().unwrap(), vec!["a.xml", "b.xml", "c.xml"]);
        assert_eq!(resources.names_calls(), 1);
    }

    #[test]
    fn test_read() {
        let resources = MockResources::new().with_text("a.xml", "<a/>");

        assert_eq!(resources.read("a.xml").unwrap(), b"<a/>");
        assert_eq!(resources.open_calls("a.xml"), 1);
    }

    #[test]
    fn test_unreadable_fails_to_open() {
        let resources = MockResources::new().with_unreadable("a.xml");

        let err = resources.open("a.xml").err().unwrap();

        assert_eq!(err.kind, StorageErrorKind::Other);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_missing() {
        let resources = MockResources::new();

        let err = resources.open("a.xml").err().unwrap();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(resources.open_calls("a.xml"), 1);
        assert_eq!(resources.total_open_calls(), 1);
    }
}
