//! Lesson repository: content by id and locale.
//!
//! [`LessonRepository`] ties the pieces together. An id is looked up in the
//! [`ResourceIndex`] (built once, on first use), the best localized variant
//! of its base resource is picked by locale fallback, and the text is read
//! through the [`TextCache`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use ml_content::{LessonRepository, Locale, RepositoryConfig};
//! use ml_storage::FsResources;
//!
//! let resources = Arc::new(FsResources::new(PathBuf::from("content")));
//! let repository = LessonRepository::new(resources, RepositoryConfig::default());
//!
//! let locale: Locale = "ru-RU".parse()?;
//! for lesson in repository.lessons(&locale)? {
//!     println!("{}: {} bytes", lesson.id, lesson.text.len());
//! }
//! ```

use std::sync::Arc;

use ml_storage::ResourceProvider;

use crate::cache::TextCache;
use crate::course::{CourseCatalog, CourseId};
use crate::error::ContentError;
use crate::fallback::find_localized;
use crate::index::{ContentId, ResourceIndex};
use crate::locale::{EnvLocale, Locale, LocaleSource};
use crate::once::BuildOnce;

/// Resource naming for a [`LessonRepository`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Prefix shared by every lesson resource name (matched case-insensitively).
    pub lessons_prefix: String,
    /// Name of the course catalogue resource.
    pub courses: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            lessons_prefix: "Lessons.".to_owned(),
            courses: "Courses.xml".to_owned(),
        }
    }
}

/// Lesson text resolved for one locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lesson {
    pub id: ContentId,
    /// Decoded markup text of the lesson.
    pub text: String,
}

/// Localized lesson content over a [`ResourceProvider`].
///
/// # Thread Safety
///
/// Safe to share between threads:
/// - The index is built once under a gate; later lookups don't lock
/// - Text reads happen outside the cache lock
pub struct LessonRepository {
    provider: Arc<dyn ResourceProvider>,
    lessons_prefix: String,
    index: BuildOnce<ResourceIndex>,
    texts: TextCache,
    courses: CourseCatalog,
    locale_source: Box<dyn LocaleSource>,
}

impl LessonRepository {
    /// Create a repository. Nothing is read until the first query.
    ///
    /// The current locale comes from the process environment unless
    /// replaced with [`with_locale_source`](Self::with_locale_source).
    #[must_use]
    pub fn new(provider: Arc<dyn ResourceProvider>, config: RepositoryConfig) -> Self {
        let courses = CourseCatalog::new(Arc::clone(&provider), config.courses);
        Self {
            provider,
            lessons_prefix: config.lessons_prefix,
            index: BuildOnce::new(),
            texts: TextCache::new(),
            courses,
            locale_source: Box::new(EnvLocale::new()),
        }
    }

    /// Replace the source of the current locale.
    #[must_use]
    pub fn with_locale_source(mut self, source: impl LocaleSource + 'static) -> Self {
        self.locale_source = Box::new(source);
        self
    }

    /// The course catalogue read from the same provider.
    #[must_use]
    pub fn courses(&self) -> &CourseCatalog {
        &self.courses
    }

    /// Build the resource index on first call; return it.
    ///
    /// Concurrent first callers block until the single scan finishes and all
    /// get the same index. A failed scan is not remembered.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Storage`] if the resource names can't be listed.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn ensure_index(&self) -> Result<&ResourceIndex, ContentError> {
        self.index.get_or_try_build(|| {
            ResourceIndex::build(self.provider.as_ref(), &self.lessons_prefix).map_err(ContentError::from)
        })
    }

    /// Text of lesson `id` for `locale`.
    ///
    /// Tries localized variants from most to least specific, then the base
    /// resource. If the chosen variant can't be read, the base is tried once.
    /// `Ok(None)` means the lesson is indexed but has no readable text.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] if no lesson has this id, or
    /// [`ContentError::Storage`] if the index can't be built.
    pub fn content_by_id(&self, id: &ContentId, locale: &Locale) -> Result<Option<String>, ContentError> {
        let index = self.ensure_index()?;
        let base = index.base_name(id).ok_or(ContentError::NotFound(*id))?;
        let chosen = find_localized(index, base, locale).unwrap_or(base);

        if let Some(text) = self.load_text(chosen) {
            return Ok(Some(text));
        }
        if chosen.eq_ignore_ascii_case(base) {
            return Ok(None);
        }
        tracing::debug!(%id, variant = %chosen, base = %base, "Falling back to base resource");
        Ok(self.load_text(base))
    }

    /// Text of lesson `id` for the current locale.
    ///
    /// # Errors
    ///
    /// Same as [`content_by_id`](Self::content_by_id).
    pub fn content_for_current_locale(&self, id: &ContentId) -> Result<Option<String>, ContentError> {
        self.content_by_id(id, &self.locale_source.current())
    }

    /// Current locale as reported by the locale source.
    #[must_use]
    pub fn current_locale(&self) -> Locale {
        self.locale_source.current()
    }

    /// Lesson `id` for `locale`, or `None` if it has no readable text.
    ///
    /// # Errors
    ///
    /// Same as [`content_by_id`](Self::content_by_id).
    pub fn lesson_by_id(&self, id: &ContentId, locale: &Locale) -> Result<Option<Lesson>, ContentError> {
        Ok(self
            .content_by_id(id, locale)?
            .map(|text| Lesson { id: *id, text }))
    }

    /// Every indexed lesson with readable text, in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Storage`] if the index can't be built.
    pub fn lessons(&self, locale: &Locale) -> Result<Vec<Lesson>, ContentError> {
        let index = self.ensure_index()?;
        let mut lessons = Vec::with_capacity(index.len());
        for id in index.ids() {
            lessons.extend(self.lesson_by_id(&id, locale)?);
        }
        Ok(lessons)
    }

    /// Lessons of a course, in course order.
    ///
    /// An unknown course yields no lessons. Lesson ids the index doesn't
    /// know, and lessons without readable text, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError`] if the index or the catalogue can't be read.
    pub fn lessons_by_course(&self, course_id: &CourseId, locale: &Locale) -> Result<Vec<Lesson>, ContentError> {
        let Some(course) = self.courses.course_by_id(course_id)? else {
            return Ok(Vec::new());
        };

        let mut lessons = Vec::with_capacity(course.lesson_ids.len());
        for id in &course.lesson_ids {
            match self.lesson_by_id(id, locale) {
                Ok(lesson) => lessons.extend(lesson),
                Err(ContentError::NotFound(_)) => {
                    tracing::debug!(course = %course_id, lesson = %id, "Course lists unknown lesson");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(lessons)
    }

    fn load_text(&self, name: &str) -> Option<String> {
        match self.texts.get_or_load(self.provider.as_ref(), name) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!(resource = %name, error = %e, "Resource text unavailable");
                None
            }
        }
    }
}

impl std::fmt::Debug for LessonRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LessonRepository")
            .field("lessons_prefix", &self.lessons_prefix)
            .field("indexed", &self.index.get().map(ResourceIndex::len))
            .field("cached_texts", &self.texts.len())
            .finish_non_exhaustive()
    }
}
