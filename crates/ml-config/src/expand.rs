//! `${NAME}` references in `ml.toml` string settings.

use std::borrow::Cow;

use crate::ConfigError;

/// String settings of `ml.toml` that may reference environment variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Setting {
    ContentRoot,
    LessonsPrefix,
    Courses,
    UiLocale,
}

impl Setting {
    /// Dotted key as written in `ml.toml`.
    pub(crate) fn key(self) -> &'static str {
        match self {
            Self::ContentRoot => "content.root",
            Self::LessonsPrefix => "content.lessons_prefix",
            Self::Courses => "content.courses",
            Self::UiLocale => "locale.ui",
        }
    }
}

/// Variable lookup: the process environment, or a fixed table in tests.
pub(crate) type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub(crate) fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Expand `${NAME}` and `${NAME:-fallback}` in the value of `setting`.
///
/// Values without `${` are returned as is, so a bare `$` in a resource
/// prefix or path survives untouched.
pub(crate) fn expand_setting(
    setting: Setting,
    value: &str,
    lookup: Lookup<'_>,
) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| {
        lookup(name)
            .map(Some)
            .ok_or_else(|| Unset(name.to_owned()))
    })
    .map(Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: setting.key().to_owned(),
        message: format!("${{{}}} is not set", e.cause.0),
    })
}

struct Unset(String);
