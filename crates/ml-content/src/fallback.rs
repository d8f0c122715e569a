//! Locale fallback over resource names.
//!
//! A lesson `Lessons.Intro.xml` may ship variants named
//! `Lessons.Intro.<token>.xml`, where `<token>` is a lowercase culture tag
//! (`ru`, `en-us`). Candidates are tried from the most specific culture down
//! to the bare language of each parent, then the base itself.

use crate::index::ResourceIndex;
use crate::locale::{Locale, strip_xml_extension};

/// Candidate resource names for `base_name` under `locale`, in order.
///
/// The last candidate is always `base_name` itself. A base without an
/// `.xml` extension has no variants.
#[must_use]
pub fn candidate_names(base_name: &str, locale: &Locale) -> Vec<String> {
    let mut candidates: Vec<String> = match strip_xml_extension(base_name) {
        Some(stem) => locale
            .fallback_tokens()
            .into_iter()
            .map(|token| format!("{stem}.{token}.xml"))
            .collect(),
        None => Vec::new(),
    };
    candidates.push(base_name.to_owned());
    candidates
}

/// The best available localized variant of `base_name`, if any.
///
/// Returns the actual (case-preserved) name of the first candidate the index
/// knows about, excluding the base itself.
#[must_use]
pub fn find_localized<'a>(index: &'a ResourceIndex, base_name: &str, locale: &Locale) -> Option<&'a str> {
    let mut candidates = candidate_names(base_name, locale);
    candidates.pop();
    candidates
        .iter()
        .find_map(|candidate| index.resolve_name(candidate))
}
