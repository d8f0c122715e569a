//! Locale tags and the current-locale capability.
//!
//! A [`Locale`] is a small BCP 47 subset: a language subtag, an optional
//! script subtag and an optional region subtag. Both `-` and `_` separate
//! subtags on input; output always uses `-` with canonical casing
//! (`ru-RU`, `zh-Hant-TW`).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Error returned when a locale tag cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid locale tag '{tag}'")]
pub struct LocaleError {
    /// The rejected input.
    pub tag: String,
}

/// A culture tag, or the invariant culture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Locale {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl Locale {
    /// The invariant culture. It has no tokens and ends every fallback chain.
    #[must_use]
    pub fn invariant() -> Self {
        Self::default()
    }

    /// Parse a tag such as `ru`, `ru-RU`, `ru_ru` or `zh-Hant-TW`.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError`] if the tag doesn't have the
    /// `language[-Script][-REGION]` shape.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let invalid = || LocaleError {
            tag: tag.to_owned(),
        };

        let mut parts = tag.split(['-', '_']);
        let language = parts
            .next()
            .filter(|s| (2..=3).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphabetic()))
            .ok_or_else(invalid)?
            .to_ascii_lowercase();

        let mut locale = Self {
            language,
            script: None,
            region: None,
        };

        let mut next = parts.next();
        if let Some(script) = next.filter(|s| s.len() == 4 && s.bytes().all(|b| b.is_ascii_alphabetic())) {
            let mut canonical = script.to_ascii_lowercase();
            canonical[..1].make_ascii_uppercase();
            locale.script = Some(canonical);
            next = parts.next();
        }

        if let Some(region) = next {
            let alpha = region.len() == 2 && region.bytes().all(|b| b.is_ascii_alphabetic());
            let numeric = region.len() == 3 && region.bytes().all(|b| b.is_ascii_digit());
            if !(alpha || numeric) {
                return Err(invalid());
            }
            locale.region = Some(region.to_ascii_uppercase());
        }

        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(locale)
    }

    #[must_use]
    pub fn is_invariant(&self) -> bool {
        self.language.is_empty()
    }

    /// Language subtag, lowercase. Empty for the invariant culture.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The next more general culture: the last subtag is dropped, and a bare
    /// language falls back to the invariant culture.
    #[must_use]
    pub fn parent(&self) -> Self {
        if self.region.is_some() {
            Self {
                region: None,
                ..self.clone()
            }
        } else if self.script.is_some() {
            Self {
                script: None,
                ..self.clone()
            }
        } else {
            Self::invariant()
        }
    }

    /// Resource-name tokens to try, most specific first.
    ///
    /// For each culture in the chain from `self` up to (not including) the
    /// invariant culture, the full lowercase tag is followed by the bare
    /// language. Tokens already produced are skipped, so `ru-RU` yields
    /// `["ru-ru", "ru"]`.
    #[must_use]
    pub fn fallback_tokens(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tokens = Vec::new();

        let mut culture = self.clone();
        while !culture.is_invariant() {
            for token in [culture.to_string().to_ascii_lowercase(), culture.language.clone()] {
                if seen.insert(token.clone()) {
                    tokens.push(token);
                }
            }
            culture = culture.parent();
        }
        tokens
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{script}")?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{region}")?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Source of the current UI locale.
pub trait LocaleSource: Send + Sync {
    fn current(&self) -> Locale;
}

/// Always reports the same locale.
#[derive(Debug, Clone, Default)]
pub struct FixedLocale(pub Locale);

impl LocaleSource for FixedLocale {
    fn current(&self) -> Locale {
        self.0.clone()
    }
}

/// Environment variables consulted by [`EnvLocale`], highest priority first.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Reads the locale from POSIX environment variables.
///
/// The first non-empty of `LC_ALL`, `LC_MESSAGES` and `LANG` wins. Codeset
/// and modifier suffixes are dropped (`ru_RU.UTF-8@euro` → `ru-RU`); `C`,
/// `POSIX` and unparsable values mean the invariant culture.
#[derive(Debug, Clone, Copy)]
pub struct EnvLocale {
    lookup: fn(&str) -> Option<String>,
}

impl EnvLocale {
    /// Read from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lookup: |key| std::env::var(key).ok(),
        }
    }

    /// Read through a custom variable lookup.
    #[must_use]
    pub fn with_lookup(lookup: fn(&str) -> Option<String>) -> Self {
        Self { lookup }
    }
}

impl Default for EnvLocale {
    fn default() -> Self {
        Self::new()
    }
}

impl LocaleSource for EnvLocale {
    fn current(&self) -> Locale {
        let Some(raw) = LOCALE_VARS
            .iter()
            .filter_map(|key| (self.lookup)(key))
            .find(|value| !value.is_empty())
        else {
            return Locale::invariant();
        };

        let tag = raw
            .split(['.', '@'])
            .next()
            .unwrap_or_default();
        if tag.is_empty() || tag == "C" || tag == "POSIX" {
            return Locale::invariant();
        }

        Locale::parse(tag).unwrap_or_else(|e| {
            tracing::debug!(value = %raw, error = %e, "Ignoring unparsable locale");
            Locale::invariant()
        })
    }
}

/// Whether a resource name looks like a localized variant of another.
///
/// True when the segment right before a `.xml` extension is two ASCII
/// letters (`Intro.ru.xml`) or `ll-ll` (`Intro.en-us.xml`).
#[must_use]
pub fn looks_like_localized_variant(name: &str) -> bool {
    let Some(stem) = strip_xml_extension(name) else {
        return false;
    };
    let Some((_, token)) = stem.rsplit_once('.') else {
        return false;
    };

    match token.as_bytes() {
        [a, b] => a.is_ascii_alphabetic() && b.is_ascii_alphabetic(),
        [a, b, b'-', c, d] => [a, b, c, d].iter().all(|ch| ch.is_ascii_alphabetic()),
        _ => false,
    }
}

/// `name` without a trailing `.xml` (any case), or `None` if it has no such suffix.
pub(crate) fn strip_xml_extension(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(4)?;
    let (stem, ext) = (name.get(..split)?, name.get(split..)?);
    ext.eq_ignore_ascii_case(".xml").then_some(stem)
}
