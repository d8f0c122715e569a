//! `ml courses` command implementation.

use clap::Args;

use super::ContentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the courses command.
#[derive(Args)]
pub(crate) struct CoursesArgs {
    #[command(flatten)]
    content: ContentArgs,
}

impl CoursesArgs {
    /// Execute the courses command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or the catalogue can't be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let content = self.content.open()?;
        let catalog = content.repository.courses();

        let courses = catalog.courses()?;
        if courses.is_empty() {
            output.nothing(&format!("No courses in {}", catalog.resource()));
            return Ok(());
        }

        for course in courses {
            output.course(course);
        }
        Ok(())
    }
}
