//! Resource provider trait and error types.
//!
//! Resources are addressed by **names**, not file paths: a flat, dotted
//! identifier such as `"Lessons.Intro.ru.xml"`. The set of names is closed
//! and enumerable; providers map names to their own storage format.

use std::io::Read;

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Malformed resource name.
    InvalidName,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Resource name context (if applicable).
    pub name: Option<String>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            name: None,
            backend: None,
            source: None,
        }
    }

    /// Attach resource name context.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error for a resource name.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_name(name)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, name: Option<&str>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(name) = name {
            error = error.with_name(name);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (resource: name)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidName => "Invalid resource name",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(name) = &self.name {
            write!(f, " (resource: {name})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Byte stream returned by [`ResourceProvider::open`].
pub type ResourceStream = Box<dyn Read + Send>;

/// Byte-stream-by-name provider over a closed set of resources.
///
/// Implementations must be safe to call from many threads at once.
pub trait ResourceProvider: Send + Sync {
    /// List every available resource name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the listing itself cannot be produced.
    fn names(&self) -> Result<Vec<String>, StorageError>;

    /// Open a resource for reading.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the resource doesn't exist or can't be opened.
    fn open(&self, name: &str) -> Result<ResourceStream, StorageError>;

    /// Read a whole resource into memory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if opening or reading fails.
    fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let mut stream = self.open(name)?;
        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .map_err(|e| StorageError::io(e, Some(name)))?;
        Ok(bytes)
    }
}

/// Check a resource name: non-empty, no path separators, no empty segments.
///
/// # Errors
///
/// Returns [`StorageError`] of kind [`StorageErrorKind::InvalidName`].
pub fn validate_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && !name.contains(['/', '\\'])
        && name.split('.').all(|segment| !segment.is_empty());
    if valid {
        Ok(())
    } else {
        Err(StorageError::new(StorageErrorKind::InvalidName).with_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_new() {
        let err = StorageError::new(StorageErrorKind::NotFound);

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert!(err.name.is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_storage_error_with_name_and_backend() {
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_name("Lessons.Intro.xml")
            .with_backend("Fs");

        assert_eq!(err.name.as_deref(), Some("Lessons.Intro.xml"));
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_storage_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound).with_source(io_err);

        assert!(err.downcast_source::<std::io::Error>().is_some());
    }

    #[test]
    fn test_storage_error_io_kinds() {
        let err = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
            None,
        );
        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);

        let err = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated"),
            Some("Courses.xml"),
        );
        assert_eq!(err.kind, StorageErrorKind::Other);
        assert_eq!(err.name.as_deref(), Some("Courses.xml"));
    }

    #[test]
    fn test_storage_error_display_simple() {
        let err = StorageError::new(StorageErrorKind::NotFound);

        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn test_storage_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_backend("Fs")
            .with_name("Lessons.Intro.xml")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (resource: Lessons.Intro.xml)"
        );
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Lessons.Intro.ru-RU.xml").is_ok());
        assert!(validate_name("Courses.xml").is_ok());

        for bad in ["", "Lessons/Intro.xml", "..\\secret", "Lessons..xml", ".hidden"] {
            let err = validate_name(bad).unwrap_err();
            assert_eq!(err.kind, StorageErrorKind::InvalidName, "{bad:?}");
        }
    }

    #[test]
    fn test_default_read_uses_open() {
        struct One;

        impl ResourceProvider for One {
            fn names(&self) -> Result<Vec<String>, StorageError> {
                Ok(vec!["a.xml".to_owned()])
            }

            fn open(&self, name: &str) -> Result<ResourceStream, StorageError> {
                if name == "a.xml" {
                    Ok(Box::new(std::io::Cursor::new(b"<a/>".to_vec())))
                } else {
                    Err(StorageError::not_found(name))
                }
            }
        }

        assert_eq!(One.read("a.xml").unwrap(), b"<a/>");
        assert_eq!(One.read("b.xml").unwrap_err().kind, StorageErrorKind::NotFound);
    }
}
