//! Raw attribute string to typed value conversion.
//!
//! All numeric parsing is culture-invariant: `.` is the decimal separator and
//! no thousands grouping is accepted, whatever the host locale says.

use crate::value::{Brush, Color, CornerRadius, GridLength, Thickness, Uri, Value, ValueKind};

/// A raw string could not be converted to the declared property type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert '{value}' to {target}: {reason}")]
pub struct CoerceError {
    /// Raw attribute text.
    pub value: String,
    /// Display name of the target type.
    pub target: String,
    /// Short description of what went wrong.
    pub reason: &'static str,
}

impl CoerceError {
    fn new(value: &str, target: ValueKind, reason: &'static str) -> Self {
        Self {
            value: value.to_owned(),
            target: target.to_string(),
            reason,
        }
    }
}

/// Convert `raw` into a [`Value`] of kind `target`.
///
/// # Errors
///
/// Returns [`CoerceError`] when the text is not a valid literal of the target
/// type. [`ValueKind::Command`] never converts from a literal.
pub fn coerce(raw: &str, target: ValueKind) -> Result<Value, CoerceError> {
    let fail = |reason| CoerceError::new(raw, target, reason);
    match target {
        ValueKind::String => Ok(Value::String(raw.to_owned())),
        ValueKind::Bool => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| fail("expected 'true' or 'false'")),
        ValueKind::Int => raw
            .trim()
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| fail("not an integer")),
        ValueKind::Double => crate::value::parse_number(raw).map(Value::Double).map_err(fail),
        ValueKind::Float => match raw.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(Value::Float(value)),
            Ok(_) => Err(fail("not a finite number")),
            Err(_) => Err(fail("not a number")),
        },
        ValueKind::Thickness => Thickness::parse(raw).map(Value::Thickness).map_err(fail),
        ValueKind::CornerRadius => CornerRadius::parse(raw).map(Value::CornerRadius).map_err(fail),
        ValueKind::GridLength => GridLength::parse(raw).map(Value::GridLength).map_err(fail),
        ValueKind::Color => Color::parse(raw).map(Value::Color).map_err(fail),
        ValueKind::Brush => Color::parse(raw)
            .map(|color| Value::Brush(Brush::Solid(color)))
            .map_err(fail),
        ValueKind::Uri => Uri::parse(raw).map(Value::Uri).map_err(fail),
        ValueKind::Enum(ty) => ty
            .parse(raw)
            .map(Value::Enum)
            .ok_or_else(|| fail("unknown member")),
        ValueKind::Command => Err(fail("a command can only be supplied by a markup extension")),
    }
}

/// Convert a row/column definition list (`"Auto,*,2*,120"`).
pub(crate) fn coerce_definitions(raw: &str) -> Result<Value, CoerceError> {
    GridLength::parse_list(raw)
        .map(Value::Definitions)
        .map_err(|reason| CoerceError {
            value: raw.to_owned(),
            target: "definition list".to_owned(),
            reason,
        })
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{EnumType, GridUnit, UriKind};

    static ALIGNMENT: EnumType = EnumType {
        name: "HorizontalAlignment",
        members: &["Stretch", "Left", "Center", "Right"],
    };

    #[test]
    fn test_string_is_identity() {
        assert_eq!(
            coerce("  keep  spaces ", ValueKind::String),
            Ok(Value::String("  keep  spaces ".to_owned()))
        );
    }

    #[test]
    fn test_bool_ignores_case() {
        assert_eq!(coerce("True", ValueKind::Bool), Ok(Value::Bool(true)));
        assert_eq!(coerce("FALSE", ValueKind::Bool), Ok(Value::Bool(false)));
        assert!(coerce("yes", ValueKind::Bool).is_err());
        assert!(coerce("1", ValueKind::Bool).is_err());
    }

    #[test]
    fn test_int() {
        assert_eq!(coerce("42", ValueKind::Int), Ok(Value::Int(42)));
        assert_eq!(coerce(" -7 ", ValueKind::Int), Ok(Value::Int(-7)));
        assert!(coerce("4.2", ValueKind::Int).is_err());
        assert!(coerce("1,000", ValueKind::Int).is_err());
    }

    #[test]
    fn test_double_uses_invariant_decimal_point() {
        assert_eq!(coerce("12.5", ValueKind::Double), Ok(Value::Double(12.5)));
        assert_eq!(coerce("1e3", ValueKind::Double), Ok(Value::Double(1000.0)));

        let err = coerce("12,5", ValueKind::Double).unwrap_err();
        assert_eq!(err.value, "12,5");
        assert_eq!(err.target, "double");
    }

    #[test]
    fn test_float_uses_invariant_decimal_point() {
        assert_eq!(coerce("12.5", ValueKind::Float), Ok(Value::Float(12.5)));
        assert!(coerce("12,5", ValueKind::Float).is_err());
    }

    #[test]
    fn test_non_finite_numbers_are_coercion_errors() {
        let err = coerce("Infinity", ValueKind::Double).unwrap_err();
        assert_eq!(err.target, "double");
        assert!(coerce("nan", ValueKind::Double).is_err());
        assert!(coerce("1e40", ValueKind::Float).is_err());
        assert!(coerce("inf", ValueKind::Thickness).is_err());
    }

    #[test]
    fn test_thousands_grouping_is_rejected() {
        assert!(coerce("1,250.5", ValueKind::Double).is_err());
        assert!(coerce("1 250", ValueKind::Double).is_err());
        assert_eq!(coerce("-0.25", ValueKind::Double), Ok(Value::Double(-0.25)));
    }

    #[test]
    fn test_structured_values() {
        assert_eq!(
            coerce("8,4", ValueKind::Thickness),
            Ok(Value::Thickness(Thickness::new(8.0, 4.0, 8.0, 4.0)))
        );
        assert!(matches!(
            coerce("6", ValueKind::CornerRadius),
            Ok(Value::CornerRadius(r)) if r.top_left == 6.0 && r.bottom_right == 6.0
        ));
        assert!(matches!(
            coerce("3*", ValueKind::GridLength),
            Ok(Value::GridLength(GridLength { unit: GridUnit::Star, .. }))
        ));
    }

    #[test]
    fn test_color_and_brush() {
        assert_eq!(
            coerce("Red", ValueKind::Color),
            Ok(Value::Color(Color::from_argb(0xFFFF_0000)))
        );
        assert_eq!(
            coerce("#336699", ValueKind::Brush),
            Ok(Value::Brush(Brush::Solid(Color::from_argb(0xFF33_6699))))
        );
        assert!(coerce("Blurple", ValueKind::Brush).is_err());
    }

    #[test]
    fn test_uri() {
        let Ok(Value::Uri(uri)) = coerce("avares://App/Assets/logo.png", ValueKind::Uri) else {
            panic!("expected uri");
        };
        assert_eq!(uri.kind, UriKind::Absolute);
    }

    #[test]
    fn test_enum_by_member_name() {
        let Ok(Value::Enum(value)) = coerce("center", ValueKind::Enum(&ALIGNMENT)) else {
            panic!("expected enum");
        };
        assert_eq!(value.member, "Center");

        let err = coerce("Middle", ValueKind::Enum(&ALIGNMENT)).unwrap_err();
        assert_eq!(err.target, "HorizontalAlignment");
    }

    #[test]
    fn test_definitions() {
        assert_eq!(
            coerce_definitions("Auto,*"),
            Ok(Value::Definitions(vec![GridLength::AUTO, GridLength::star(1.0)]))
        );
        let err = coerce_definitions("Auto,wide").unwrap_err();
        assert_eq!(err.target, "definition list");
    }

    #[test]
    fn test_command_never_coerces() {
        assert!(coerce("Save", ValueKind::Command).is_err());
    }

    #[test]
    fn test_error_message() {
        let err = coerce("maybe", ValueKind::Bool).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot convert 'maybe' to bool: expected 'true' or 'false'"
        );
    }
}
