//! `ml lessons` command implementation.

use clap::Args;

use super::{ContentArgs, parse_id};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the lessons command.
#[derive(Args)]
pub(crate) struct LessonsArgs {
    #[command(flatten)]
    content: ContentArgs,

    /// Only list lessons of this course, in course order.
    #[arg(long)]
    course: Option<String>,
}

impl LessonsArgs {
    /// Execute the lessons command.
    ///
    /// # Errors
    ///
    /// Returns an error if the content can't be read or the course id is invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let content = self.content.open()?;
        let repository = &content.repository;

        let lessons = match self.course.as_deref() {
            Some(raw) => {
                let course_id = parse_id(raw)?;
                let course = repository.courses().course_by_id(&course_id)?.ok_or_else(|| {
                    CliError::Validation(format!("course not found: {course_id}"))
                })?;
                output.heading(&course.title);
                repository.lessons_by_course(&course_id, &content.locale)?
            }
            None => repository.lessons(&content.locale)?,
        };

        for lesson in &lessons {
            output.lesson(&lesson.id, &ml_markup::parse(&lesson.text));
        }
        output.summary(&format!("{} lessons ({})", lessons.len(), locale_label(&content.locale)));
        Ok(())
    }
}

pub(crate) fn locale_label(locale: &ml_content::Locale) -> String {
    if locale.is_invariant() {
        "invariant locale".to_owned()
    } else {
        locale.to_string()
    }
}
