//! Sandboxed markup interpreter for lesson content.
//!
//! Turns untrusted, XAML-like markup into a validated [`Node`] tree. Nothing
//! outside a closed [`Allowlist`] is ever constructed: every tag maps to a
//! factory function, every attribute to a declared, typed property.
//!
//! # Architecture
//!
//! - [`Allowlist`] - tag → factory, structural kind and typed properties
//! - [`coerce`] - raw attribute text → [`Value`] for a [`ValueKind`]
//! - [`extension`] - `{SetResource ...}` values resolving to deferred [`Command`]s
//! - [`Interpreter`] - single forward pass with an explicit builder stack
//!
//! # Example
//!
//! ```ignore
//! use ml_markup::{parse, Value};
//!
//! let root = parse("<Grid><TextBlock Text='hi'/></Grid>")?;
//! assert_eq!(root.kind(), "Grid");
//! assert_eq!(root.children()[0].property("Text"), Some(&Value::String("hi".into())));
//! ```

mod allowlist;
mod coerce;
mod colors;
mod controls;
mod error;
pub mod extension;
mod indent;
mod interpreter;
mod node;
mod resources;
mod value;

pub use allowlist::{
    Allowlist, AllowlistEntry, AllowlistEntryBuilder, AllowlistError, Finalizer, PropertyDecl,
    Structure,
};
pub use coerce::{CoerceError, coerce};
pub use controls::{
    DOCK, FONT_STYLE, FONT_WEIGHT, HORIZONTAL_ALIGNMENT, ORIENTATION, TEXT_ALIGNMENT,
    TEXT_WRAPPING, VERTICAL_ALIGNMENT,
};
pub use error::{MarkupError, MarkupErrorKind};
pub use extension::{Command, CommandAction, ExtensionError};
pub use indent::remove_base_indent;
pub use interpreter::{Interpreter, parse};
pub use node::{Content, Node, PropertyKey};
pub use resources::{CommandError, ResourceDictionary};
pub use value::{
    Brush, Color, CornerRadius, EnumType, EnumValue, GridLength, GridUnit, Thickness, Uri,
    UriKind, Value, ValueKind,
};
