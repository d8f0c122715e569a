//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod courses;
pub(crate) mod lessons;
pub(crate) mod show;

pub(crate) use check::CheckArgs;
pub(crate) use courses::CoursesArgs;
pub(crate) use lessons::LessonsArgs;
pub(crate) use show::ShowArgs;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use ml_config::{CliSettings, Config};
use ml_content::{FixedLocale, LessonRepository, Locale};
use ml_storage::FsResources;

use crate::error::CliError;

/// Content source arguments shared by every repository command.
#[derive(Args)]
pub(crate) struct ContentArgs {
    /// Path to configuration file (default: auto-discover ml.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content root directory (overrides config).
    #[arg(short = 'd', long, env = "ML_CONTENT_DIR")]
    content_dir: Option<PathBuf>,

    /// UI locale tag, e.g. `ru-RU` (overrides config and environment).
    #[arg(short, long)]
    locale: Option<String>,
}

/// Loaded configuration and the repository it describes.
pub(crate) struct Content {
    pub(crate) repository: LessonRepository,
    pub(crate) locale: Locale,
}

impl ContentArgs {
    /// Load config and open the lesson repository over the content root.
    pub(crate) fn open(&self) -> Result<Content, CliError> {
        let cli_settings = CliSettings {
            content_dir: self.content_dir.clone(),
            locale: self.locale.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let root = &config.content_resolved.root;
        if !root.is_dir() {
            return Err(CliError::Validation(format!(
                "content directory not found: {}",
                root.display()
            )));
        }
        tracing::info!(root = %root.display(), "Opening content");

        let resources = Arc::new(FsResources::new(root.clone()));
        let mut repository = LessonRepository::new(resources, config.content_resolved.repository_config());
        if let Some(locale) = config.ui_locale()? {
            repository = repository.with_locale_source(FixedLocale(locale));
        }
        let locale = repository.current_locale();

        Ok(Content { repository, locale })
    }
}

/// Parse a lesson or course id argument, braces optional.
pub(crate) fn parse_id(raw: &str) -> Result<uuid::Uuid, CliError> {
    uuid::Uuid::parse_str(raw.trim_matches(['{', '}']))
        .map_err(|e| CliError::Validation(format!("invalid id '{raw}': {e}")))
}
