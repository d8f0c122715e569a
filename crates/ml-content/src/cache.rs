//! Decoded resource text cache.

use std::collections::HashMap;
use std::sync::RwLock;

use ml_storage::{ResourceProvider, StorageError};

use crate::decode::decode_text;

/// Resource name → decoded text, never evicted.
///
/// Keys are matched case-insensitively. A miss reads and decodes the resource
/// without holding the lock; two concurrent misses on the same name may both
/// read it, and both store the same text.
#[derive(Debug, Default)]
pub struct TextCache {
    entries: RwLock<HashMap<String, String>>,
}

impl TextCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of `name`, read through `provider` on a miss.
    ///
    /// Failed reads are not cached.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the resource can't be opened or read.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn get_or_load(
        &self,
        provider: &dyn ResourceProvider,
        name: &str,
    ) -> Result<String, StorageError> {
        let key = name.to_lowercase();
        if let Some(text) = self.entries.read().unwrap().get(&key) {
            return Ok(text.clone());
        }

        tracing::trace!(resource = %name, "Text cache miss");
        let text = decode_text(&provider.read(name)?);

        self.entries
            .write()
            .unwrap()
            .insert(key, text.clone());
        Ok(text)
    }

    /// Number of cached resources.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
