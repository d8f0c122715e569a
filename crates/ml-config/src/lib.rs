//! Configuration management for the lesson content tools.
//!
//! Parses `ml.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `content.root`
//! - `content.lessons_prefix`
//! - `content.courses`
//! - `locale.ui`

mod expand;

use expand::{Lookup, Setting, expand_setting};
use ml_content::{Locale, RepositoryConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content root directory.
    pub content_dir: Option<PathBuf>,
    /// Override UI locale tag.
    pub locale: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ml.toml";

/// Default lesson resource prefix.
const DEFAULT_LESSONS_PREFIX: &str = "Lessons.";

/// Default course catalogue resource.
const DEFAULT_COURSES: &str = "Courses.xml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (root is a relative string from TOML).
    content: ContentConfigRaw,
    /// Locale configuration.
    pub locale: LocaleConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
    lessons_prefix: Option<String>,
    courses: Option<String>,
}

/// Resolved content configuration with an absolute root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    /// Directory holding the bundled resources.
    pub root: PathBuf,
    /// Resource-name prefix of lesson documents.
    pub lessons_prefix: String,
    /// Resource name of the course catalogue.
    pub courses: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content"),
            lessons_prefix: DEFAULT_LESSONS_PREFIX.to_owned(),
            courses: DEFAULT_COURSES.to_owned(),
        }
    }
}

impl ContentConfig {
    /// Resource naming for a lesson repository.
    #[must_use]
    pub fn repository_config(&self) -> RepositoryConfig {
        RepositoryConfig {
            lessons_prefix: self.lessons_prefix.clone(),
            courses: self.courses.clone(),
        }
    }
}

/// Locale configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// UI locale tag. When unset, the process environment decides.
    pub ui: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("{message} (in ml.toml key `{field}`)")]
    EnvVar {
        /// Config field path (e.g., "`content.root`").
        field: String,
        /// Error message (e.g., "${`CONTENT_ROOT`} is not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `ml.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_dir) = &settings.content_dir {
            self.content_resolved.root.clone_from(content_dir);
        }
        if let Some(locale) = &settings.locale {
            self.locale.ui = Some(locale.clone());
        }
    }

    /// Configured UI locale, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `locale.ui` is not a locale tag.
    pub fn ui_locale(&self) -> Result<Option<Locale>, ConfigError> {
        self.locale
            .ui
            .as_deref()
            .map(|tag| {
                Locale::parse(tag).map_err(|e| ConfigError::Validation(format!("locale.ui: {e}")))
            })
            .transpose()
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            locale: LocaleConfig::default(),
            content_resolved: ContentConfig {
                root: base.join("content"),
                ..ContentConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars(&expand::process_env)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_content()?;
        self.ui_locale()?;
        Ok(())
    }

    /// Validate content configuration.
    fn validate_content(&self) -> Result<(), ConfigError> {
        let content = &self.content_resolved;
        require_non_empty(&content.lessons_prefix, "content.lessons_prefix")?;
        require_non_empty(&content.courses, "content.courses")?;

        let has_xml_extension = content
            .courses
            .len()
            .checked_sub(4)
            .and_then(|split| content.courses.get(split..))
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".xml"));
        if !has_xml_extension {
            return Err(ConfigError::Validation(
                "content.courses must name an .xml resource".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self, lookup: Lookup<'_>) -> Result<(), ConfigError> {
        let settings = [
            (Setting::ContentRoot, &mut self.content.root),
            (Setting::LessonsPrefix, &mut self.content.lessons_prefix),
            (Setting::Courses, &mut self.content.courses),
            (Setting::UiLocale, &mut self.locale.ui),
        ];
        for (setting, value) in settings {
            if let Some(raw) = value.as_deref() {
                *value = Some(expand_setting(setting, raw, lookup)?);
            }
        }
        Ok(())
    }

    /// Resolve the content root against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.content;
        self.content_resolved = ContentConfig {
            root: config_dir.join(raw.root.as_deref().unwrap_or("content")),
            lessons_prefix: raw
                .lessons_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_LESSONS_PREFIX.to_owned()),
            courses: raw
                .courses
                .clone()
                .unwrap_or_else(|| DEFAULT_COURSES.to_owned()),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(
            config.content_resolved,
            ContentConfig {
                root: PathBuf::from("/test/content"),
                lessons_prefix: "Lessons.".to_owned(),
                courses: "Courses.xml".to_owned(),
            }
        );
        assert!(config.locale.ui.is_none());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.content.root.is_none());
        assert!(config.locale.ui.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[content]
root = "bundle"
lessons_prefix = "Data.Lessons."
courses = "Data.Courses.xml"

[locale]
ui = "ru-RU"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.content_resolved.root, PathBuf::from("/project/bundle"));
        assert_eq!(config.content_resolved.lessons_prefix, "Data.Lessons.");
        assert_eq!(config.content_resolved.courses, "Data.Courses.xml");
        assert_eq!(config.ui_locale().unwrap().unwrap().to_string(), "ru-RU");
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("[locale]\n").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.content_resolved.root, PathBuf::from("/project/content"));
        assert_eq!(config.content_resolved.lessons_prefix, "Lessons.");
    }

    #[test]
    fn test_repository_config() {
        let config = Config::default_with_base(Path::new("/test"));

        let repository = config.content_resolved.repository_config();

        assert_eq!(repository, RepositoryConfig::default());
    }

    #[test]
    fn test_apply_cli_settings_overrides_values() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let settings = CliSettings {
            content_dir: Some(PathBuf::from("/elsewhere")),
            locale: Some("de".to_owned()),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.content_resolved.root, PathBuf::from("/elsewhere"));
        assert_eq!(config.locale.ui.as_deref(), Some("de"));
    }

    #[test]
    fn test_apply_cli_settings_none_preserves_values() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.content_resolved.root, PathBuf::from("/test/content"));
        assert!(config.locale.ui.is_none());
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_lessons_prefix() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.content_resolved.lessons_prefix = String::new();

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("content.lessons_prefix"));
    }

    #[test]
    fn test_validate_courses_extension() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.content_resolved.courses = "Courses.XML".to_owned();
        assert!(config.validate().is_ok());

        config.content_resolved.courses = "Courses.json".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("content.courses"));

        config.content_resolved.courses = "xml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_locale() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.locale.ui = Some("ru_RU".to_owned());
        assert!(config.validate().is_ok());

        config.locale.ui = Some("Russian".to_owned());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("locale.ui"));
    }

    fn env_table(name: &str) -> Option<String> {
        match name {
            "ML_CONTENT_ROOT" => Some("/srv/lessons".to_owned()),
            "ML_UI_LOCALE" => Some("fr-FR".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_env_vars_content_and_locale() {
        let toml = r#"
[content]
root = "${ML_CONTENT_ROOT}"
courses = "${ML_COURSES:-Catalog.xml}"

[locale]
ui = "${ML_UI_LOCALE}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars(&env_table).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.content_resolved.root, PathBuf::from("/srv/lessons"));
        assert_eq!(config.content_resolved.courses, "Catalog.xml");
        assert_eq!(config.locale.ui.as_deref(), Some("fr-FR"));
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        let toml = r#"
[locale]
ui = "${ML_MISSING_LOCALE}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars(&env_table).unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "${ML_MISSING_LOCALE} is not set (in ml.toml key `locale.ui`)"
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[content]\nroot = \"lessons\"\n\n[locale]\nui = \"ru\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.content_resolved.root, temp_dir.path().join("lessons"));
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.locale.ui.as_deref(), Some("ru"));
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let err = Config::load(Some(Path::new("/nonexistent/ml.toml")), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[content\nroot = 1").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_invalid_cli_locale() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            content_dir: None,
            locale: Some("not a locale".to_owned()),
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
