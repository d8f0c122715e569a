//! Markup interpretation errors.

use std::fmt;

use crate::coerce::CoerceError;

/// Category of a [`MarkupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MarkupErrorKind {
    /// Malformed input: bad XML, dotted tags, DTDs, stray end tags.
    ParseSyntax,
    /// Tag is not in the allowlist.
    UnknownType,
    /// Attribute does not name a declared property of the element.
    UnknownProperty,
    /// `Owner.Property` where the owner or the property is not declared.
    UnknownAttachedProperty,
    /// Containment rule of a structural kind was violated.
    Structure,
    /// Attribute value does not convert to the declared type.
    Coercion,
    /// Unknown or invalid `{...}` expression.
    MarkupExtension,
    /// Non-blank text outside any element.
    RootText,
    /// No root element.
    EmptyDocument,
    /// Input ended with open elements.
    UnterminatedElement,
}

impl fmt::Display for MarkupErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParseSyntax => "syntax error",
            Self::UnknownType => "unknown type",
            Self::UnknownProperty => "unknown property",
            Self::UnknownAttachedProperty => "unknown attached property",
            Self::Structure => "structure error",
            Self::Coercion => "invalid value",
            Self::MarkupExtension => "markup extension error",
            Self::RootText => "text at document root",
            Self::EmptyDocument => "empty document",
            Self::UnterminatedElement => "unterminated element",
        };
        f.write_str(name)
    }
}

/// Fatal error for one `parse` call. No partial tree accompanies it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {position}: {message}")]
pub struct MarkupError {
    pub kind: MarkupErrorKind,
    /// Byte offset in the document where the failing construct was read.
    pub position: u64,
    pub message: String,
    #[source]
    coercion: Option<CoerceError>,
}

impl MarkupError {
    #[must_use]
    pub fn new(kind: MarkupErrorKind, position: u64, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
            coercion: None,
        }
    }

    pub(crate) fn syntax(position: u64, message: impl Into<String>) -> Self {
        Self::new(MarkupErrorKind::ParseSyntax, position, message)
    }

    pub(crate) fn coercion(position: u64, property: &str, source: CoerceError) -> Self {
        Self {
            kind: MarkupErrorKind::Coercion,
            position,
            message: format!("property '{property}': {source}"),
            coercion: Some(source),
        }
    }

    /// Underlying conversion failure for [`MarkupErrorKind::Coercion`].
    #[must_use]
    pub fn coerce_error(&self) -> Option<&CoerceError> {
        self.coercion.as_ref()
    }
}
