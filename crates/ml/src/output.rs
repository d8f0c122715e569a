//! Terminal rendering of command results.
//!
//! Rows a command produces (courses, lessons, tree lines) go to stdout so they
//! can be piped; headings, counts and diagnostics go to stderr.

use std::fmt::Display;
use std::path::Path;

use console::{Term, style};
use ml_content::{ContentId, Course};
use ml_markup::{MarkupError, Node};

pub(crate) struct Output {
    stdout: Term,
    stderr: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    /// `<id>  <title> (<n> lessons)`
    pub(crate) fn course(&self, course: &Course) {
        self.row(&course_row(course));
    }

    /// `<id>  <n> nodes`, or the parse error of an invalid lesson in red.
    pub(crate) fn lesson(&self, id: &ContentId, parsed: &Result<Node, MarkupError>) {
        match parsed {
            Ok(root) => self.row(&format!("{id}  {} nodes", root.subtree_len())),
            Err(err) => self.row(&format!("{id}  {}", style(format!("invalid: {err}")).red())),
        }
    }

    /// One line of a rendered tree or a JSON document.
    pub(crate) fn row(&self, line: &str) {
        let _ = self.stdout.write_line(line);
    }

    /// Title above a listing.
    pub(crate) fn heading(&self, text: &str) {
        let _ = self
            .stderr
            .write_line(&style(text).cyan().bold().to_string());
    }

    /// Count line below a listing.
    pub(crate) fn summary(&self, text: &str) {
        let _ = self.stderr.write_line(text);
    }

    /// A listing with nothing in it.
    pub(crate) fn nothing(&self, text: &str) {
        let _ = self.stderr.write_line(&style(text).yellow().to_string());
    }

    pub(crate) fn check_passed(&self, path: &Path, nodes: usize) {
        let _ = self.stderr.write_line(&format!(
            "{} {}: {nodes} nodes",
            style("ok").green(),
            path.display()
        ));
    }

    pub(crate) fn check_failed(&self, path: &Path, err: &dyn Display) {
        let _ = self.stderr.write_line(&format!(
            "{} {}: {err}",
            style("FAIL").red().bold(),
            path.display()
        ));
    }

    /// Error that ends the command.
    pub(crate) fn fatal(&self, err: &dyn Display) {
        let _ = self
            .stderr
            .write_line(&style(format!("Error: {err}")).red().to_string());
    }
}

fn course_row(course: &Course) -> String {
    let count = course.lesson_ids.len();
    let noun = if count == 1 { "lesson" } else { "lessons" };
    format!("{}  {} ({count} {noun})", course.id, course.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_row() {
        let mut course = Course {
            id: "11111111-1111-4111-8111-111111111111".parse().unwrap(),
            title: "Basics".to_owned(),
            description: String::new(),
            image_name: "basics.png".to_owned(),
            lesson_ids: vec!["6f9619ff-8b86-d011-b42d-00c04fc964ff".parse().unwrap()],
        };
        assert_eq!(
            course_row(&course),
            "11111111-1111-4111-8111-111111111111  Basics (1 lesson)"
        );

        course.lesson_ids.clear();
        assert!(course_row(&course).ends_with("Basics (0 lessons)"));
    }
}
