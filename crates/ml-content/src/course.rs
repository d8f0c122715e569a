//! Course catalogue.
//!
//! The catalogue is a single resource:
//!
//! ```xml
//! <Courses>
//!   <Course Id="{...}" Title="Basics" Description="..." ImageName="basics.png">
//!     <Lesson Id="{...}"/>
//!     <Lesson Id="{...}"/>
//!   </Course>
//! </Courses>
//! ```
//!
//! Lesson ids are read from direct `Lesson` children of a `Course` only.

use std::sync::Arc;

use ml_storage::{ResourceProvider, StorageErrorKind};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::decode::decode_text;
use crate::error::ContentError;
use crate::index::{ContentId, HeaderError, attribute, parse_id};
use crate::once::BuildOnce;

/// Stable identifier of a course.
pub type CourseId = uuid::Uuid;

/// A course: metadata plus its lessons in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub image_name: String,
    pub lesson_ids: Vec<ContentId>,
}

/// Lazily parsed course catalogue.
///
/// The resource is read and parsed on first use; the result is kept for the
/// lifetime of the catalogue.
pub struct CourseCatalog {
    provider: Arc<dyn ResourceProvider>,
    resource: String,
    courses: BuildOnce<Vec<Course>>,
}

impl CourseCatalog {
    /// Create a catalogue over the resource named `resource`.
    #[must_use]
    pub fn new(provider: Arc<dyn ResourceProvider>, resource: impl Into<String>) -> Self {
        Self {
            provider,
            resource: resource.into(),
            courses: BuildOnce::new(),
        }
    }

    /// Name of the catalogue resource.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Every valid course, in document order.
    ///
    /// A missing catalogue resource, or one whose root isn't `<Courses>`,
    /// yields no courses.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Storage`] if the resource exists but can't be
    /// read, or [`ContentError::Malformed`] if it isn't well-formed XML.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn courses(&self) -> Result<&[Course], ContentError> {
        self.courses
            .get_or_try_build(|| self.load())
            .map(Vec::as_slice)
    }

    /// Course with the given id.
    ///
    /// # Errors
    ///
    /// Same as [`courses`](Self::courses).
    pub fn course_by_id(&self, id: &CourseId) -> Result<Option<&Course>, ContentError> {
        Ok(self.courses()?.iter().find(|course| course.id == *id))
    }

    fn load(&self) -> Result<Vec<Course>, ContentError> {
        let bytes = match self.provider.read(&self.resource) {
            Ok(bytes) => bytes,
            Err(e) if e.kind == StorageErrorKind::NotFound => {
                tracing::debug!(resource = %self.resource, "Course catalogue not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let courses = parse_courses(&decode_text(&bytes)).map_err(|e| ContentError::Malformed {
            resource: self.resource.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(resource = %self.resource, count = courses.len(), "Loaded courses");
        Ok(courses)
    }
}

impl std::fmt::Debug for CourseCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseCatalog")
            .field("resource", &self.resource)
            .field("loaded", &self.courses.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Parse catalogue text. Depth 0 is the root, 1 a course, 2 a course child.
fn parse_courses(text: &str) -> Result<Vec<Course>, HeaderError> {
    let mut reader = Reader::from_str(text);
    let mut depth = 0usize;
    let mut courses = Vec::new();
    let mut current: Option<Course> = None;

    loop {
        let (element, is_empty) = match reader
            .read_event()
            .map_err(|e| HeaderError::Xml(e.to_string()))?
        {
            Event::Start(e) => (e, false),
            Event::Empty(e) => (e, true),
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    courses.extend(current.take());
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        match (depth, element.name().as_ref()) {
            (0, b"Courses") => {}
            (0, _) => return Ok(Vec::new()),
            (1, b"Course") => current = read_course(&element)?,
            (2, b"Lesson") => {
                if let Some(course) = current.as_mut() {
                    course.lesson_ids.extend(read_lesson_ref(&element)?);
                }
            }
            _ => {}
        }

        if !is_empty {
            depth += 1;
        } else if depth == 1 {
            courses.extend(current.take());
        }
    }

    Ok(courses)
}

fn read_course(element: &BytesStart<'_>) -> Result<Option<Course>, HeaderError> {
    let (Some(id), Some(title), Some(description), Some(image_name)) = (
        attribute(element, "Id")?,
        attribute(element, "Title")?,
        attribute(element, "Description")?,
        attribute(element, "ImageName")?,
    ) else {
        tracing::debug!("Skipping course with missing attributes");
        return Ok(None);
    };

    let Ok(id) = parse_id(&id) else {
        tracing::debug!(id = %id, "Skipping course with invalid id");
        return Ok(None);
    };

    Ok(Some(Course {
        id,
        title,
        description,
        image_name,
        lesson_ids: Vec::new(),
    }))
}

fn read_lesson_ref(element: &BytesStart<'_>) -> Result<Option<ContentId>, HeaderError> {
    Ok(attribute(element, "Id")?.and_then(|id| parse_id(&id).ok()))
}
