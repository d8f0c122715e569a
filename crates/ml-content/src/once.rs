//! Build-once cell with a blocking gate.

use std::sync::{Mutex, OnceLock};

/// A value built at most once, on first use.
///
/// The first caller runs the build while holding the gate; concurrent
/// callers block on the gate and then see the finished value. After that,
/// reads don't lock. A failed build stores nothing, so the next caller
/// tries again.
#[derive(Debug)]
pub(crate) struct BuildOnce<T> {
    value: OnceLock<T>,
    gate: Mutex<()>,
}

impl<T> BuildOnce<T> {
    pub(crate) fn new() -> Self {
        Self {
            value: OnceLock::new(),
            gate: Mutex::new(()),
        }
    }

    /// Built value, if any.
    pub(crate) fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Get the value, running `build` if nobody has yet.
    ///
    /// # Panics
    ///
    /// Panics if the gate is poisoned.
    pub(crate) fn get_or_try_build<E>(
        &self,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<&T, E> {
        // Fast path: already built
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let _guard = self.gate.lock().unwrap();

        // Double-check after acquiring the gate
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let value = build()?;
        Ok(self.value.get_or_init(|| value))
    }
}
