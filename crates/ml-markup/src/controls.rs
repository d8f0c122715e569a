//! Built-in allowlist for lesson documents.

use std::sync::LazyLock;

use crate::allowlist::{Allowlist, AllowlistEntry, PropertyDecl, Structure};
use crate::indent::remove_base_indent;
use crate::node::{Content, Node, PropertyKey};
use crate::value::{EnumType, Value, ValueKind};

pub static HORIZONTAL_ALIGNMENT: EnumType = EnumType {
    name: "HorizontalAlignment",
    members: &["Stretch", "Left", "Center", "Right"],
};

pub static VERTICAL_ALIGNMENT: EnumType = EnumType {
    name: "VerticalAlignment",
    members: &["Stretch", "Top", "Center", "Bottom"],
};

pub static ORIENTATION: EnumType = EnumType {
    name: "Orientation",
    members: &["Horizontal", "Vertical"],
};

pub static DOCK: EnumType = EnumType {
    name: "Dock",
    members: &["Left", "Bottom", "Right", "Top"],
};

pub static FONT_WEIGHT: EnumType = EnumType {
    name: "FontWeight",
    members: &[
        "Thin",
        "ExtraLight",
        "Light",
        "Normal",
        "Medium",
        "SemiBold",
        "Bold",
        "ExtraBold",
        "Black",
    ],
};

pub static FONT_STYLE: EnumType = EnumType {
    name: "FontStyle",
    members: &["Normal", "Italic", "Oblique"],
};

pub static TEXT_WRAPPING: EnumType = EnumType {
    name: "TextWrapping",
    members: &["NoWrap", "Wrap", "WrapWithOverflow"],
};

pub static TEXT_ALIGNMENT: EnumType = EnumType {
    name: "TextAlignment",
    members: &["Left", "Center", "Right", "Justify", "Start", "End"],
};

const DEFAULT_LANGUAGE: &str = "cs";

/// Layout properties every control declares.
const LAYOUT: &[PropertyDecl] = &[
    PropertyDecl::new("Width", ValueKind::Double),
    PropertyDecl::new("Height", ValueKind::Double),
    PropertyDecl::new("MinWidth", ValueKind::Double),
    PropertyDecl::new("MinHeight", ValueKind::Double),
    PropertyDecl::new("MaxWidth", ValueKind::Double),
    PropertyDecl::new("MaxHeight", ValueKind::Double),
    PropertyDecl::new("Margin", ValueKind::Thickness),
    PropertyDecl::new("HorizontalAlignment", ValueKind::Enum(&HORIZONTAL_ALIGNMENT)),
    PropertyDecl::new("VerticalAlignment", ValueKind::Enum(&VERTICAL_ALIGNMENT)),
    PropertyDecl::new("IsVisible", ValueKind::Bool),
    PropertyDecl::new("Opacity", ValueKind::Double),
];

const PANEL: &[PropertyDecl] = &[PropertyDecl::new("Background", ValueKind::Brush)];

const TEXT: &[PropertyDecl] = &[
    PropertyDecl::new("Text", ValueKind::String),
    PropertyDecl::new("FontSize", ValueKind::Double),
    PropertyDecl::new("FontWeight", ValueKind::Enum(&FONT_WEIGHT)),
    PropertyDecl::new("FontStyle", ValueKind::Enum(&FONT_STYLE)),
    PropertyDecl::new("Foreground", ValueKind::Brush),
    PropertyDecl::new("Background", ValueKind::Brush),
    PropertyDecl::new("Padding", ValueKind::Thickness),
    PropertyDecl::new("LineHeight", ValueKind::Double),
    PropertyDecl::new("TextWrapping", ValueKind::Enum(&TEXT_WRAPPING)),
    PropertyDecl::new("TextAlignment", ValueKind::Enum(&TEXT_ALIGNMENT)),
];

const SOURCE: &[PropertyDecl] = &[
    PropertyDecl::new("Language", ValueKind::String),
    PropertyDecl::new("Text", ValueKind::String),
];

impl Allowlist {
    /// Controls available to lesson documents.
    ///
    /// | Tag                                                  | Structure    |
    /// |------------------------------------------------------|--------------|
    /// | `Grid`, `StackPanel`, `DockPanel`, `Lesson`, `Examine` | many children |
    /// | `Button`, `Border`                                   | single child |
    /// | `TextBlock`, `H1`, `P`, `Code`, `File`               | text only    |
    ///
    /// # Panics
    ///
    /// Never in practice: the table is static and free of duplicates.
    #[must_use]
    pub fn lesson_controls() -> &'static Allowlist {
        static CONTROLS: LazyLock<Allowlist> = LazyLock::new(|| {
            Allowlist::new(lesson_entries()).expect("lesson controls table is well-formed")
        });
        &CONTROLS
    }
}

fn lesson_entries() -> Vec<AllowlistEntry> {
    vec![
        AllowlistEntry::builder("Grid", Structure::ManyChildren, || Node::new("Grid"))
            .properties(LAYOUT)
            .properties(PANEL)
            .attached(&[
                PropertyDecl::new("Row", ValueKind::Int),
                PropertyDecl::new("Column", ValueKind::Int),
                PropertyDecl::new("RowSpan", ValueKind::Int),
                PropertyDecl::new("ColumnSpan", ValueKind::Int),
            ])
            .grid_definitions()
            .build(),
        AllowlistEntry::builder("StackPanel", Structure::ManyChildren, || {
            Node::new("StackPanel")
        })
        .properties(LAYOUT)
        .properties(PANEL)
        .properties(&[
            PropertyDecl::new("Orientation", ValueKind::Enum(&ORIENTATION)),
            PropertyDecl::new("Spacing", ValueKind::Double),
        ])
        .build(),
        AllowlistEntry::builder("DockPanel", Structure::ManyChildren, || {
            Node::new("DockPanel")
        })
        .properties(LAYOUT)
        .properties(PANEL)
        .properties(&[PropertyDecl::new("LastChildFill", ValueKind::Bool)])
        .attached(&[PropertyDecl::new("Dock", ValueKind::Enum(&DOCK))])
        .build(),
        AllowlistEntry::builder("Lesson", Structure::ManyChildren, || Node::new("Lesson"))
            .properties(LAYOUT)
            .properties(&[PropertyDecl::new("Id", ValueKind::String)])
            .build(),
        AllowlistEntry::builder("Examine", Structure::ManyChildren, || Node::new("Examine"))
            .properties(LAYOUT)
            .finalizer(only_files)
            .build(),
        AllowlistEntry::builder("Button", Structure::SingleChild, || Node::new("Button"))
            .properties(LAYOUT)
            .properties(&[
                PropertyDecl::new("Command", ValueKind::Command),
                PropertyDecl::new("CommandParameter", ValueKind::String),
                PropertyDecl::new("IsEnabled", ValueKind::Bool),
                PropertyDecl::new("Background", ValueKind::Brush),
                PropertyDecl::new("Foreground", ValueKind::Brush),
                PropertyDecl::new("Padding", ValueKind::Thickness),
                PropertyDecl::new("FontSize", ValueKind::Double),
                PropertyDecl::new("NavigateUri", ValueKind::Uri),
            ])
            .build(),
        AllowlistEntry::builder("Border", Structure::SingleChild, || Node::new("Border"))
            .properties(LAYOUT)
            .properties(&[
                PropertyDecl::new("Background", ValueKind::Brush),
                PropertyDecl::new("BorderBrush", ValueKind::Brush),
                PropertyDecl::new("BorderThickness", ValueKind::Thickness),
                PropertyDecl::new("CornerRadius", ValueKind::CornerRadius),
                PropertyDecl::new("Padding", ValueKind::Thickness),
            ])
            .build(),
        text_block("TextBlock", || Node::new("TextBlock")),
        text_block("H1", || Node::new("TextBlock").with_class("H1")),
        text_block("P", || Node::new("TextBlock").with_class("P")),
        AllowlistEntry::builder("Code", Structure::TextLeaf, code)
            .properties(LAYOUT)
            .properties(SOURCE)
            .finalizer(dedent)
            .build(),
        AllowlistEntry::builder("File", Structure::TextLeaf, file)
            .properties(LAYOUT)
            .properties(SOURCE)
            .properties(&[PropertyDecl::new("FilePath", ValueKind::String)])
            .finalizer(dedent)
            .build(),
    ]
}

fn text_block(tag: &'static str, factory: fn() -> Node) -> AllowlistEntry {
    AllowlistEntry::builder(tag, Structure::TextLeaf, factory)
        .properties(LAYOUT)
        .properties(TEXT)
        .build()
}

fn code() -> Node {
    let mut node = Node::new("Code");
    node.set_property(
        PropertyKey::own("Language"),
        Value::String(DEFAULT_LANGUAGE.to_owned()),
    );
    node
}

fn file() -> Node {
    let mut node = Node::new("File");
    node.set_property(
        PropertyKey::own("Language"),
        Value::String(DEFAULT_LANGUAGE.to_owned()),
    );
    node
}

/// Strip the base indentation of source listings, whether given as content
/// or through the `Text` attribute.
fn dedent(node: &mut Node) -> Result<(), String> {
    if let Content::Text(text) = node.content() {
        let text = remove_base_indent(text, true);
        node.set_text(text);
    }
    if let Some(Value::String(text)) = node.property("Text") {
        let text = remove_base_indent(text, true);
        node.set_property(PropertyKey::own("Text"), Value::String(text));
    }
    Ok(())
}

fn only_files(node: &mut Node) -> Result<(), String> {
    match node.children().iter().find(|child| child.kind() != "File") {
        Some(other) => Err(format!("only 'File' elements are allowed, found '{}'", other.kind())),
        None => Ok(()),
    }
}
