//! Markup extensions: `{Name Arg=Value, ...}` attribute values.
//!
//! Extensions resolve to deferred [`Command`]s instead of literal values.
//! The set of extension names is closed; an unknown name resolves to nothing
//! and the interpreter rejects the document.
//!
//! Only one extension exists:
//!
//! ```text
//! {SetResource Key=IsOpen, Expression=!$self}
//! ```
//!
//! | Expression   | Effect when invoked                                        |
//! |--------------|------------------------------------------------------------|
//! | `!$self`     | negate the boolean in the slot and store it                |
//! | `$self`      | return the slot's current value                            |
//! | `$parameter` | store the invocation parameter                             |
//! | other text   | convert the text to the slot's current type and store it   |

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::allowlist::PropertyDecl;
use crate::coerce::coerce;
use crate::resources::{CommandError, ResourceDictionary};
use crate::value::{Value, ValueKind};

/// What a [`Command`] does to its slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CommandAction {
    /// `!$self`
    Toggle,
    /// `$self`
    Read,
    /// `$parameter`
    WriteParameter,
    /// Any other expression, converted lazily to the slot's current type.
    Assign(String),
}

/// Deferred operation bound to a named resource slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Command {
    pub key: String,
    pub action: CommandAction,
}

impl Command {
    /// Run the command against `resources`.
    ///
    /// Returns the value read or written.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if a toggle finds a non-boolean slot or an
    /// assigned expression does not convert to the slot's type.
    pub fn invoke(
        &self,
        resources: &mut ResourceDictionary,
        parameter: Option<Value>,
    ) -> Result<Value, CommandError> {
        let key = self.key.as_str();
        let value = match &self.action {
            CommandAction::Read => return Ok(resources.get(key).clone()),
            CommandAction::Toggle => match resources.get(key) {
                Value::Bool(current) => Value::Bool(!current),
                other => {
                    return Err(CommandError::NotBoolean {
                        key: key.to_owned(),
                        current: format!("{other:?}"),
                    });
                }
            },
            CommandAction::WriteParameter => parameter.unwrap_or(Value::Null),
            CommandAction::Assign(expression) => match resources.get(key) {
                Value::Null => Value::Null,
                current => {
                    let kind = current.kind().ok_or_else(|| CommandError::NotAssignable {
                        key: key.to_owned(),
                    })?;
                    coerce(expression, kind).map_err(|source| CommandError::Convert {
                        key: key.to_owned(),
                        source,
                    })?
                }
            },
        };
        resources.insert(key, value.clone());
        Ok(value)
    }
}

/// Error for a recognised extension with bad arguments or target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtensionError {
    #[error("malformed markup extension '{0}'")]
    Malformed(String),

    #[error("{extension}: missing required argument '{argument}'")]
    MissingArgument {
        extension: &'static str,
        argument: &'static str,
    },

    #[error("{extension}: unknown argument '{argument}'")]
    UnknownArgument {
        extension: &'static str,
        argument: String,
    },

    #[error("{extension} produces a command, but '{property}' expects {expected}")]
    TargetType {
        extension: &'static str,
        property: &'static str,
        expected: ValueKind,
    },
}

type Provider = fn(&ExtensionArgs<'_>, &PropertyDecl) -> Result<Value, ExtensionError>;

/// Closed table of recognised extension names.
const EXTENSIONS: &[(&str, Provider)] = &[("SetResource", set_resource)];

/// Whether an attribute value must be routed to [`resolve`].
///
/// A value starting with `{}` is an escaped literal; use [`unescape_literal`].
#[must_use]
pub fn is_extension(raw: &str) -> bool {
    raw.starts_with('{') && !raw.starts_with("{}")
}

/// Strip the `{}` escape prefix from a literal attribute value.
#[must_use]
pub fn unescape_literal(raw: &str) -> &str {
    raw.strip_prefix("{}").unwrap_or(raw)
}

/// Resolve a bracketed expression for the property `target`.
///
/// Returns `Ok(None)` when the extension name is not recognised.
///
/// # Errors
///
/// Returns [`ExtensionError`] when the expression is not well-formed, its
/// arguments are wrong, or the target cannot hold the produced value.
pub fn resolve(expression: &str, target: &PropertyDecl) -> Result<Option<Value>, ExtensionError> {
    let body = expression
        .trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| ExtensionError::Malformed(expression.to_owned()))?
        .trim();

    let (name, rest) = body
        .split_once(char::is_whitespace)
        .unwrap_or((body, ""));
    if name.is_empty() {
        return Err(ExtensionError::Malformed(expression.to_owned()));
    }

    let Some((_, provider)) = EXTENSIONS.iter().find(|(known, _)| *known == name) else {
        return Ok(None);
    };

    let args = ExtensionArgs::parse(rest)
        .ok_or_else(|| ExtensionError::Malformed(expression.to_owned()))?;
    provider(&args, target).map(Some)
}

fn set_resource(args: &ExtensionArgs<'_>, target: &PropertyDecl) -> Result<Value, ExtensionError> {
    const NAME: &str = "SetResource";

    if target.kind != ValueKind::Command {
        return Err(ExtensionError::TargetType {
            extension: NAME,
            property: target.name,
            expected: target.kind,
        });
    }
    if let Some(argument) = args.unknown(&["Key", "Expression"]) {
        return Err(ExtensionError::UnknownArgument {
            extension: NAME,
            argument: argument.to_owned(),
        });
    }

    let key = args.require(NAME, "Key")?;
    let expression = args.require(NAME, "Expression")?;
    let action = match expression {
        "!$self" => CommandAction::Toggle,
        "$self" => CommandAction::Read,
        "$parameter" => CommandAction::WriteParameter,
        other => CommandAction::Assign(other.to_owned()),
    };

    Ok(Value::Command(Command {
        key: key.to_owned(),
        action,
    }))
}

/// `Key=Value` pairs separated by commas. Values may be single- or double-quoted.
#[derive(Debug, Default, PartialEq)]
struct ExtensionArgs<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> ExtensionArgs<'a> {
    fn parse(input: &'a str) -> Option<Self> {
        let mut pairs = Vec::new();
        let mut remaining = input.trim_start();

        while !remaining.is_empty() {
            let (key, value, rest) = parse_key_value(remaining)?;
            pairs.push((key, value));

            let rest = rest.trim_start();
            remaining = match rest.strip_prefix(',') {
                Some(after) => after.trim_start(),
                None if rest.is_empty() => rest,
                None => return None,
            };
        }

        Some(Self { pairs })
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn require(&self, extension: &'static str, key: &'static str) -> Result<&'a str, ExtensionError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or(ExtensionError::MissingArgument {
                extension,
                argument: key,
            })
    }

    fn unknown(&self, known: &[&str]) -> Option<&'a str> {
        self.pairs
            .iter()
            .map(|(k, _)| *k)
            .find(|k| !known.contains(k))
    }
}

/// Split `key=value` off the front of `s`. Returns `(key, value, rest)`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();
    if key.is_empty() || key.contains(',') {
        return None;
    }

    let after_eq = s[eq_pos + 1..].trim_start();
    if let Some(quote) = after_eq.chars().next().filter(|c| matches!(c, '"' | '\'')) {
        let stripped = &after_eq[1..];
        let end_quote = stripped.find(quote)?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(',').unwrap_or(after_eq.len());
        Some((key, after_eq[..end].trim_end(), &after_eq[end..]))
    }
}
