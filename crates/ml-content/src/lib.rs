//! Localized lesson content.
//!
//! Lessons are bundled as resources named `<prefix><base>.xml`, with optional
//! localized variants `<prefix><base>.<culture>.xml` (`Lessons.Intro.ru.xml`,
//! `Lessons.Intro.en-us.xml`). Each base resource declares a stable id on its
//! root element: `<Lesson Id="{6f9619ff-...}">`.
//!
//! # Architecture
//!
//! - [`ResourceIndex`]: content id → base resource name, built once per repository
//! - [`candidate_names`] / [`find_localized`]: locale fallback over resource names
//! - [`TextCache`]: BOM-aware decoded text, read outside the lock
//! - [`LessonRepository`]: content by id and locale, lesson enumeration
//! - [`CourseCatalog`]: courses and their ordered lesson ids
//! - [`LocaleSource`]: current UI locale ([`EnvLocale`], [`FixedLocale`])

mod cache;
mod course;
mod decode;
mod error;
mod fallback;
mod index;
mod loader;
mod locale;
mod once;

pub use cache::TextCache;
pub use course::{Course, CourseCatalog, CourseId};
pub use decode::{TextEncoding, decode_text};
pub use error::ContentError;
pub use fallback::{candidate_names, find_localized};
pub use index::{ContentId, ResourceIndex};
pub use loader::{Lesson, LessonRepository, RepositoryConfig};
pub use locale::{EnvLocale, FixedLocale, Locale, LocaleError, LocaleSource, looks_like_localized_variant};
