//! Content id → base resource name index.
//!
//! Built by scanning every lesson resource once and reading just enough of
//! each document to find the `Id` attribute on its `Lesson` root element.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use ml_storage::{ResourceProvider, StorageError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::decode::decode_text;
use crate::locale::{looks_like_localized_variant, strip_xml_extension};

/// Stable, locale-independent identifier of one lesson.
pub type ContentId = uuid::Uuid;

/// Why a resource was left out of the id map.
#[derive(Debug, thiserror::Error)]
pub(crate) enum HeaderError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed XML: {0}")]
    Xml(String),
    #[error("root element is not <{expected}>")]
    UnexpectedRoot { expected: &'static str },
    #[error("missing Id attribute")]
    MissingId,
    #[error("invalid Id: {0}")]
    InvalidId(#[from] uuid::Error),
}

/// Immutable view of the available lesson resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIndex {
    /// Content id → base resource name, ordered by id.
    base_names: BTreeMap<ContentId, String>,
    /// Lowercased resource name → actual resource name, over every resource.
    names: HashMap<String, String>,
}

impl ResourceIndex {
    /// Scan `provider` and index every `<prefix>*.xml` resource.
    ///
    /// Resources whose header can't be read are skipped; they stay reachable
    /// through [`resolve_name`](Self::resolve_name) as localized variants.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only if the list of names can't be produced.
    pub fn build(provider: &dyn ResourceProvider, prefix: &str) -> Result<Self, StorageError> {
        let start = Instant::now();
        let all_names = provider.names()?;

        let mut names = HashMap::with_capacity(all_names.len());
        for name in &all_names {
            names
                .entry(name.to_lowercase())
                .or_insert_with(|| name.clone());
        }

        let mut base_names: BTreeMap<ContentId, String> = BTreeMap::new();
        for name in all_names.iter().filter(|name| is_lesson_resource(name, prefix)) {
            let id = match read_lesson_id(provider, name) {
                Ok(id) => id,
                Err(e) => {
                    tracing::debug!(resource = %name, error = %e, "Skipping resource without lesson id");
                    continue;
                }
            };

            match base_names.get(&id) {
                None => {
                    base_names.insert(id, name.clone());
                }
                Some(existing) => {
                    if looks_like_localized_variant(existing) && !looks_like_localized_variant(name) {
                        tracing::debug!(%id, base = %name, variant = %existing, "Replacing localized base");
                        base_names.insert(id, name.clone());
                    }
                }
            }
        }

        tracing::info!(
            resource_count = all_names.len(),
            lesson_count = base_names.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Built lesson index"
        );

        Ok(Self { base_names, names })
    }

    /// Base resource name of a lesson.
    #[must_use]
    pub fn base_name(&self, id: &ContentId) -> Option<&str> {
        self.base_names.get(id).map(String::as_str)
    }

    /// Actual name of an available resource, matched case-insensitively.
    #[must_use]
    pub fn resolve_name(&self, candidate: &str) -> Option<&str> {
        self.names
            .get(&candidate.to_lowercase())
            .map(String::as_str)
    }

    /// Indexed lesson ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ContentId> + '_ {
        self.base_names.keys().copied()
    }

    /// Number of indexed lessons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base_names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base_names.is_empty()
    }
}

fn is_lesson_resource(name: &str, prefix: &str) -> bool {
    let has_prefix = name
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
    has_prefix && strip_xml_extension(name).is_some()
}

fn read_lesson_id(provider: &dyn ResourceProvider, name: &str) -> Result<ContentId, HeaderError> {
    let text = decode_text(&provider.read(name)?);
    let root = read_root(&text, "Lesson")?;
    let id = attribute(&root, "Id")?.ok_or(HeaderError::MissingId)?;
    parse_id(&id)
}

/// Parse a GUID, with or without surrounding braces.
pub(crate) fn parse_id(raw: &str) -> Result<ContentId, HeaderError> {
    Ok(uuid::Uuid::parse_str(raw.trim_matches(['{', '}']))?)
}

/// Read up to the root element and check its local name (case-insensitive).
fn read_root<'a>(text: &'a str, expected: &'static str) -> Result<BytesStart<'a>, HeaderError> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event().map_err(|e| HeaderError::Xml(e.to_string()))? {
            Event::Start(e) | Event::Empty(e) => {
                return if e.local_name().as_ref().eq_ignore_ascii_case(expected.as_bytes()) {
                    Ok(e)
                } else {
                    Err(HeaderError::UnexpectedRoot { expected })
                };
            }
            Event::Text(e) if e.iter().all(u8::is_ascii_whitespace) => {}
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => return Err(HeaderError::Xml("no root element".to_owned())),
            other => return Err(HeaderError::Xml(format!("unexpected {other:?} before root"))),
        }
    }
}

/// Value of the attribute named exactly `key`, unescaped.
pub(crate) fn attribute(element: &BytesStart<'_>, key: &str) -> Result<Option<String>, HeaderError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| HeaderError::Xml(e.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| HeaderError::Xml(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
