//! Content resolution errors.

use ml_storage::StorageError;

use crate::index::ContentId;

/// Error returned by [`LessonRepository`](crate::LessonRepository) and
/// [`CourseCatalog`](crate::CourseCatalog).
///
/// A lesson that exists but has no readable text is not an error; it comes
/// back as `None`.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// No indexed lesson has this id.
    #[error("Lesson not found: {0}")]
    NotFound(ContentId),
    /// The set of available resources couldn't be listed or read.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A catalogue resource isn't well-formed XML.
    #[error("Malformed resource {resource}: {message}")]
    Malformed { resource: String, message: String },
}
