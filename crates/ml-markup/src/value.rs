//! Typed property values.
//!
//! Every property declared in the [`Allowlist`](crate::Allowlist) carries a
//! [`ValueKind`]. Raw attribute strings are converted into a [`Value`] of that
//! kind by [`coerce`](crate::coerce), or produced by a markup extension.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

use crate::extension::Command;

/// Closed set of semantic value types a property can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Bool,
    Int,
    Double,
    Float,
    Thickness,
    CornerRadius,
    GridLength,
    Color,
    Brush,
    Uri,
    Enum(&'static EnumType),
    /// Deferred operation; only a markup extension can supply it.
    Command,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::Float => "float",
            Self::Thickness => "Thickness",
            Self::CornerRadius => "CornerRadius",
            Self::GridLength => "GridLength",
            Self::Color => "Color",
            Self::Brush => "Brush",
            Self::Uri => "Uri",
            Self::Enum(ty) => ty.name,
            Self::Command => "Command",
        };
        f.write_str(name)
    }
}

/// Enumeration type with a fixed member list.
///
/// Member names are matched case-insensitively; the stored value always
/// uses the declared spelling.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: &'static str,
    pub members: &'static [&'static str],
}

impl EnumType {
    /// Find a member by case-insensitive name.
    #[must_use]
    pub fn parse(&'static self, s: &str) -> Option<EnumValue> {
        let s = s.trim();
        self.members
            .iter()
            .find(|member| member.eq_ignore_ascii_case(s))
            .map(|&member| EnumValue { ty: self, member })
    }
}

/// A member of an [`EnumType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub ty: &'static EnumType,
    pub member: &'static str,
}

#[cfg(feature = "serde")]
impl Serialize for EnumValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.member)
    }
}

/// Four-sided spacing (margin, padding, border thickness).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Parse `"4"`, `"4,8"` (horizontal, vertical) or `"1,2,3,4"` (left, top, right, bottom).
    pub(crate) fn parse(s: &str) -> Result<Self, &'static str> {
        match parse_numbers(s)?.as_slice() {
            [all] => Ok(Self::uniform(*all)),
            [horizontal, vertical] => Ok(Self::new(*horizontal, *vertical, *horizontal, *vertical)),
            [left, top, right, bottom] => Ok(Self::new(*left, *top, *right, *bottom)),
            _ => Err("expected 1, 2 or 4 numbers"),
        }
    }
}

/// Per-corner radius.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CornerRadius {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadius {
    /// Parse `"4"` or `"1,2,3,4"` (top-left, top-right, bottom-right, bottom-left).
    pub(crate) fn parse(s: &str) -> Result<Self, &'static str> {
        match parse_numbers(s)?.as_slice() {
            [all] => Ok(Self {
                top_left: *all,
                top_right: *all,
                bottom_right: *all,
                bottom_left: *all,
            }),
            [top_left, top_right, bottom_right, bottom_left] => Ok(Self {
                top_left: *top_left,
                top_right: *top_right,
                bottom_right: *bottom_right,
                bottom_left: *bottom_left,
            }),
            _ => Err("expected 1 or 4 numbers"),
        }
    }
}

/// Unit of a [`GridLength`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum GridUnit {
    Auto,
    Pixel,
    Star,
}

/// Size of a layout row or column: `Auto`, fixed pixels, or a weighted `*` share.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GridLength {
    pub value: f64,
    pub unit: GridUnit,
}

impl GridLength {
    pub const AUTO: Self = Self {
        value: 1.0,
        unit: GridUnit::Auto,
    };

    #[must_use]
    pub fn pixels(value: f64) -> Self {
        Self {
            value,
            unit: GridUnit::Pixel,
        }
    }

    #[must_use]
    pub fn star(value: f64) -> Self {
        Self {
            value,
            unit: GridUnit::Star,
        }
    }

    pub(crate) fn parse(s: &str) -> Result<Self, &'static str> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::AUTO);
        }
        let length = if let Some(weight) = s.strip_suffix('*') {
            if weight.is_empty() {
                Self::star(1.0)
            } else {
                Self::star(parse_number(weight)?)
            }
        } else {
            Self::pixels(parse_number(s)?)
        };
        if length.value < 0.0 {
            return Err("length cannot be negative");
        }
        Ok(length)
    }

    /// Parse a row/column definition list such as `"Auto,*,2*,120"`.
    pub(crate) fn parse_list(s: &str) -> Result<Vec<Self>, &'static str> {
        let lengths = split_tokens(s)
            .map(Self::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if lengths.is_empty() {
            return Err("expected at least one definition");
        }
        Ok(lengths)
    }
}

/// 32-bit ARGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self { a, r, g, b }
    }

    /// Parse `#RGB`, `#ARGB`, `#RRGGBB`, `#AARRGGBB` or a known color name.
    pub(crate) fn parse(s: &str) -> Result<Self, &'static str> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        crate::colors::by_name(s).ok_or("unknown color name")
    }

    fn parse_hex(hex: &str) -> Result<Self, &'static str> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err("invalid hex digit");
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| "invalid hex color")?;
        let expand = |nibble: u32| (nibble & 0xF) * 0x11;
        match hex.len() {
            3 => Ok(Self::from_argb(
                0xFF00_0000 | expand(value >> 8) << 16 | expand(value >> 4) << 8 | expand(value),
            )),
            4 => Ok(Self::from_argb(
                expand(value >> 12) << 24
                    | expand(value >> 8) << 16
                    | expand(value >> 4) << 8
                    | expand(value),
            )),
            6 => Ok(Self::from_argb(0xFF00_0000 | value)),
            8 => Ok(Self::from_argb(value)),
            _ => Err("expected 3, 4, 6 or 8 hex digits"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

/// Paint reference. Only solid colors can be expressed in markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Brush {
    Solid(Color),
}

/// Whether a [`Uri`] carries a scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum UriKind {
    Absolute,
    Relative,
}

/// Relative or absolute resource locator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Uri {
    pub value: String,
    pub kind: UriKind,
}

impl Uri {
    pub(crate) fn parse(s: &str) -> Result<Self, &'static str> {
        if s.chars().any(char::is_control) {
            return Err("control characters are not allowed");
        }
        let kind = if has_scheme(s) {
            UriKind::Absolute
        } else {
            UriKind::Relative
        };
        Ok(Self {
            value: s.to_owned(),
            kind,
        })
    }
}

/// `scheme ":"` where scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Property value produced by the interpreter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Value {
    Null,
    String(String),
    Bool(bool),
    Int(i32),
    Double(f64),
    Float(f32),
    Thickness(Thickness),
    CornerRadius(CornerRadius),
    GridLength(GridLength),
    Color(Color),
    Brush(Brush),
    Uri(Uri),
    Enum(EnumValue),
    /// Row or column definitions of a grid.
    Definitions(Vec<GridLength>),
    Command(Command),
}

impl Value {
    /// Semantic kind this value converts back into, if any.
    ///
    /// `Null` and definition lists have no declared kind.
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null | Self::Definitions(_) => None,
            Self::String(_) => Some(ValueKind::String),
            Self::Bool(_) => Some(ValueKind::Bool),
            Self::Int(_) => Some(ValueKind::Int),
            Self::Double(_) => Some(ValueKind::Double),
            Self::Float(_) => Some(ValueKind::Float),
            Self::Thickness(_) => Some(ValueKind::Thickness),
            Self::CornerRadius(_) => Some(ValueKind::CornerRadius),
            Self::GridLength(_) => Some(ValueKind::GridLength),
            Self::Color(_) => Some(ValueKind::Color),
            Self::Brush(_) => Some(ValueKind::Brush),
            Self::Uri(_) => Some(ValueKind::Uri),
            Self::Enum(value) => Some(ValueKind::Enum(value.ty)),
            Self::Command(_) => Some(ValueKind::Command),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Culture-invariant finite float: `.` is the only decimal separator, and
/// `NaN`/`inf` spellings are rejected.
pub(crate) fn parse_number(s: &str) -> Result<f64, &'static str> {
    match s.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err("not a finite number"),
        Err(_) => Err("not a number"),
    }
}

fn split_tokens(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, &'static str> {
    split_tokens(s).map(parse_number).collect()
}
