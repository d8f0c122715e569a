//! `ml check` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use ml_markup::Node;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Markup files to parse.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Every file is parsed and reported on its own line.
    ///
    /// # Errors
    ///
    /// Returns a summary error if any file can't be read or doesn't parse.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let mut failed = 0usize;

        for path in &self.files {
            match check_file(path) {
                Ok(root) => output.check_passed(path, root.subtree_len()),
                Err(err) => {
                    output.check_failed(path, &err);
                    failed += 1;
                }
            }
        }

        if failed == 0 {
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "{failed} of {} files failed to parse",
                self.files.len()
            )))
        }
    }
}

fn check_file(path: &Path) -> Result<Node, CliError> {
    let bytes = std::fs::read(path)?;
    let text = ml_content::decode_text(&bytes);
    Ok(ml_markup::parse(&text)?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_check_file_counts_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Lesson.xml");
        fs::write(&path, "<StackPanel><TextBlock Text=\"a\"/><P>b</P></StackPanel>").unwrap();

        let root = check_file(&path).unwrap();

        assert_eq!(root.subtree_len(), 3);
    }

    #[test]
    fn test_check_file_reports_markup_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Lesson.xml");
        fs::write(&path, "<StackPanel><Script/></StackPanel>").unwrap();

        assert!(matches!(check_file(&path), Err(CliError::Markup(_))));
    }

    #[test]
    fn test_execute_summarizes_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("Good.xml");
        let bad = dir.path().join("Bad.xml");
        fs::write(&good, "<TextBlock Text=\"a\"/>").unwrap();
        fs::write(&bad, "<TextBlock>").unwrap();

        let err = CheckArgs { files: vec![good.clone(), bad] }.execute().unwrap_err();

        assert_eq!(err.to_string(), "1 of 2 files failed to parse");
        assert!(CheckArgs { files: vec![good] }.execute().is_ok());
    }

    #[test]
    fn test_check_file_missing() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            check_file(&dir.path().join("missing.xml")),
            Err(CliError::Io(_))
        ));
    }
}
