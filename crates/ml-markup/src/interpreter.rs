//! Streaming markup interpreter.
//!
//! Reads the document once, front to back, and keeps an explicit stack of
//! node builders for the elements that are currently open. A node leaves the
//! stack only after its end tag has been read and its kind-specific
//! finalization succeeded, at which point it is attached to its parent.
//! Any failure aborts the whole parse.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::allowlist::{Allowlist, AllowlistEntry};
use crate::coerce::{coerce, coerce_definitions};
use crate::error::{MarkupError, MarkupErrorKind};
use crate::extension::{is_extension, resolve, unescape_literal};
use crate::node::{Node, NodeBuilder, PropertyKey};

/// Attribute prefixes that never reach the allowlist.
const IGNORABLE_PREFIXES: &[&str] = &["xmlns", "x", "d", "mc"];

/// Layout definition attributes, accepted only on grid-shaped entries.
const GRID_DEFINITIONS: &[&str] = &["RowDefinitions", "ColumnDefinitions"];

/// Parse `text` against the built-in lesson controls.
///
/// # Errors
///
/// Returns [`MarkupError`] on any syntax, allowlist, structure or value error.
pub fn parse(text: &str) -> Result<Node, MarkupError> {
    Interpreter::new(Allowlist::lesson_controls()).parse(text)
}

/// Markup interpreter bound to an allowlist.
///
/// Holds no per-parse state, so one interpreter can be shared across threads.
#[derive(Clone, Copy, Debug)]
pub struct Interpreter<'a> {
    allowlist: &'a Allowlist,
}

/// Open element.
struct Frame<'a> {
    builder: NodeBuilder<'a>,
    tag: String,
}

/// Text collected since the last element boundary.
#[derive(Default)]
struct PendingText {
    text: String,
    position: u64,
}

impl PendingText {
    fn push(&mut self, position: u64, text: &str) {
        if self.text.is_empty() {
            self.position = position;
        }
        self.text.push_str(text);
    }
}

/// Per-call parse state.
struct Parse<'a> {
    allowlist: &'a Allowlist,
    stack: Vec<Frame<'a>>,
    root: Option<Node>,
    pending: PendingText,
}

impl<'a> Interpreter<'a> {
    #[must_use]
    pub fn new(allowlist: &'a Allowlist) -> Self {
        Self { allowlist }
    }

    #[must_use]
    pub fn allowlist(&self) -> &'a Allowlist {
        self.allowlist
    }

    /// Build a validated node tree from `text`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] describing the first problem found. No partial
    /// tree is returned.
    pub fn parse(&self, text: &str) -> Result<Node, MarkupError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(false);

        let mut state = Parse {
            allowlist: self.allowlist,
            stack: Vec::new(),
            root: None,
            pending: PendingText::default(),
        };

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|e| MarkupError::syntax(reader.error_position(), e.to_string()))?;

            match event {
                Event::Start(e) => {
                    state.flush_text()?;
                    let frame = state.open(&reader, &e, position)?;
                    state.stack.push(frame);
                }
                Event::Empty(e) => {
                    state.flush_text()?;
                    let frame = state.open(&reader, &e, position)?;
                    state.close(frame, position)?;
                }
                Event::End(_) => {
                    state.flush_text()?;
                    let frame = state.stack.pop().ok_or_else(|| {
                        MarkupError::syntax(position, "unexpected end element")
                    })?;
                    state.close(frame, position)?;
                }
                Event::Text(e) => {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|e| MarkupError::syntax(position, e.to_string()))?;
                    state.pending.push(position, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|e| MarkupError::syntax(position, e.to_string()))?;
                    let decoded = decode_entity(&entity).ok_or_else(|| {
                        MarkupError::syntax(position, format!("unknown entity '&{entity};'"))
                    })?;
                    state.pending.push(position, &decoded);
                }
                Event::CData(e) => {
                    state.pending.push(position, &String::from_utf8_lossy(&e));
                }
                Event::DocType(_) => {
                    return Err(MarkupError::syntax(
                        position,
                        "document type declarations are not allowed",
                    ));
                }
                Event::Comment(_) | Event::PI(_) => state.flush_text()?,
                Event::Decl(_) => {}
                Event::Eof => return state.finish(reader.buffer_position()),
            }
        }
    }
}

impl<'a> Parse<'a> {
    /// Create the node for an element start and apply its attributes.
    fn open(
        &self,
        reader: &Reader<&[u8]>,
        start: &BytesStart<'_>,
        position: u64,
    ) -> Result<Frame<'a>, MarkupError> {
        let tag = decode(reader, start.name().as_ref(), position)?;
        let local = decode(reader, start.local_name().as_ref(), position)?;

        if local.contains('.') {
            return Err(MarkupError::syntax(
                position,
                format!("property elements are not supported: <{tag}>"),
            ));
        }
        if self.root.is_some() && self.stack.is_empty() {
            return Err(MarkupError::syntax(position, "multiple root elements"));
        }

        let entry = self.allowlist.lookup(&local).ok_or_else(|| {
            MarkupError::new(
                MarkupErrorKind::UnknownType,
                position,
                format!("type is not allowed: '{local}'"),
            )
        })?;

        if let Some(parent) = self.stack.last() {
            parent
                .builder
                .check_child_slot()
                .map_err(|msg| MarkupError::new(MarkupErrorKind::Structure, position, msg))?;
        }

        let mut builder = NodeBuilder::begin(entry);
        for attr in start.attributes() {
            let attr = attr.map_err(|e| MarkupError::syntax(position, e.to_string()))?;
            let name = decode(reader, attr.key.as_ref(), position)?;
            let value = attr
                .unescape_value()
                .map_err(|e| MarkupError::syntax(position, e.to_string()))?;
            self.apply_attribute(&mut builder, &name, &value, position)?;
        }

        Ok(Frame { builder, tag })
    }

    fn apply_attribute(
        &self,
        builder: &mut NodeBuilder<'a>,
        name: &str,
        raw: &str,
        position: u64,
    ) -> Result<(), MarkupError> {
        if name == "x:Name" {
            builder.set_name(raw);
            return Ok(());
        }
        if is_ignorable(name) {
            return Ok(());
        }

        let entry = builder.entry();
        if let Some(&definitions) = GRID_DEFINITIONS.iter().find(|d| **d == name) {
            if !entry.accepts_grid_definitions() {
                return Err(MarkupError::new(
                    MarkupErrorKind::Structure,
                    position,
                    format!("'{name}' is only supported on grid elements, not '{}'", entry.tag()),
                ));
            }
            let value = coerce_definitions(raw)
                .map_err(|e| MarkupError::coercion(position, name, e))?;
            builder.set_property(PropertyKey::own(definitions), value);
            return Ok(());
        }

        let (key, decl) = if let Some((owner, property)) = name.split_once('.') {
            let resolved = self.allowlist.lookup(owner).and_then(|owner_entry| {
                self.allowlist
                    .lookup_property(owner, property)
                    .map(|decl| (owner_entry, decl))
            });
            let Some((owner_entry, decl)) = resolved else {
                return Err(MarkupError::new(
                    MarkupErrorKind::UnknownAttachedProperty,
                    position,
                    format!("unknown attached property: '{name}'"),
                ));
            };
            (PropertyKey::attached(owner_entry.tag(), decl.name), decl)
        } else {
            let decl = entry.property(name).ok_or_else(|| unknown_property(entry, name, position))?;
            (PropertyKey::own(decl.name), decl)
        };

        let value = if is_extension(raw) {
            match resolve(raw, decl) {
                Ok(Some(value)) => value,
                Ok(None) => {
                    return Err(MarkupError::new(
                        MarkupErrorKind::MarkupExtension,
                        position,
                        format!("markup extension is unknown or not allowed: '{raw}'"),
                    ));
                }
                Err(e) => {
                    return Err(MarkupError::new(
                        MarkupErrorKind::MarkupExtension,
                        position,
                        e.to_string(),
                    ));
                }
            }
        } else {
            coerce(unescape_literal(raw), decl.kind)
                .map_err(|e| MarkupError::coercion(position, name, e))?
        };

        builder.set_property(key, value);
        Ok(())
    }

    /// Finalize a frame and hand the node to its parent or make it the root.
    fn close(&mut self, frame: Frame<'a>, position: u64) -> Result<(), MarkupError> {
        let node = frame.builder.finish().map_err(|msg| {
            MarkupError::new(
                MarkupErrorKind::Structure,
                position,
                format!("<{}>: {msg}", frame.tag),
            )
        })?;

        match self.stack.last_mut() {
            Some(parent) => parent
                .builder
                .attach(node)
                .map_err(|msg| MarkupError::new(MarkupErrorKind::Structure, position, msg)),
            None => {
                self.root = Some(node);
                Ok(())
            }
        }
    }

    /// Route collected text to the innermost open element.
    fn flush_text(&mut self) -> Result<(), MarkupError> {
        let PendingText { text, position } = std::mem::take(&mut self.pending);
        if text.trim().is_empty() {
            return Ok(());
        }
        let Some(top) = self.stack.last_mut() else {
            return Err(MarkupError::new(
                MarkupErrorKind::RootText,
                position,
                "text at document root is not supported",
            ));
        };
        top.builder
            .append_text(&text)
            .map_err(|msg| MarkupError::new(MarkupErrorKind::Structure, position, msg))
    }

    fn finish(mut self, position: u64) -> Result<Node, MarkupError> {
        self.flush_text()?;
        if let Some(open) = self.stack.last() {
            return Err(MarkupError::new(
                MarkupErrorKind::UnterminatedElement,
                position,
                format!("element <{}> is not closed", open.tag),
            ));
        }
        self.root.ok_or_else(|| {
            MarkupError::new(
                MarkupErrorKind::EmptyDocument,
                position,
                "root element not found",
            )
        })
    }
}

fn unknown_property(entry: &AllowlistEntry, name: &str, position: u64) -> MarkupError {
    MarkupError::new(
        MarkupErrorKind::UnknownProperty,
        position,
        format!("unknown property '{name}' on '{}'", entry.tag()),
    )
}

/// Namespace declarations and design-time attributes.
fn is_ignorable(name: &str) -> bool {
    let prefix = name.split_once(':').map_or(name, |(prefix, _)| prefix);
    IGNORABLE_PREFIXES.contains(&prefix) && (prefix != name || name == "xmlns")
}

fn decode(reader: &Reader<&[u8]>, bytes: &[u8], position: u64) -> Result<String, MarkupError> {
    reader
        .decoder()
        .decode(bytes)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| MarkupError::syntax(position, e.to_string()))
}

/// Decode a predefined entity or character reference name (without `&` and `;`).
pub(crate) fn decode_entity(entity: &str) -> Option<String> {
    match entity {
        "lt" => Some("<".to_owned()),
        "gt" => Some(">".to_owned()),
        "amp" => Some("&".to_owned()),
        "apos" => Some("'".to_owned()),
        "quot" => Some("\"".to_owned()),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32).map(String::from)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::allowlist::{PropertyDecl, Structure};
    use crate::extension::{Command, CommandAction};
    use crate::value::{GridLength, Thickness, Value, ValueKind};

    fn kind_of(result: Result<Node, MarkupError>) -> MarkupErrorKind {
        result.expect_err("parse should fail").kind
    }

    #[test]
    fn test_grid_with_text_block() {
        let root = parse("<Grid><TextBlock Text='hi'/></Grid>").unwrap();

        assert_eq!(root.kind(), "Grid");
        assert_eq!(root.children().len(), 1);
        let child = &root.children()[0];
        assert_eq!(child.kind(), "TextBlock");
        assert_eq!(child.property("Text"), Some(&Value::String("hi".to_owned())));
    }

    #[test]
    fn test_children_in_document_order() {
        let root = parse(
            r#"<StackPanel>
                <H1>Title</H1>
                <P>First</P>
                <Border><TextBlock>Inner</TextBlock></Border>
                <P>Second</P>
            </StackPanel>"#,
        )
        .unwrap();

        let texts: Vec<_> = root
            .children()
            .iter()
            .map(|child| (child.kind(), child.classes().to_vec(), child.text()))
            .collect();
        assert_eq!(
            texts,
            vec![
                ("TextBlock", vec!["H1"], Some("Title")),
                ("TextBlock", vec!["P"], Some("First")),
                ("Border", vec![], None),
                ("TextBlock", vec!["P"], Some("Second")),
            ]
        );
        assert_eq!(root.children()[2].children()[0].text(), Some("Inner"));
    }

    #[test]
    fn test_unknown_type() {
        let err = parse("<StackPanel><Window/></StackPanel>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::UnknownType);
        assert_eq!(err.position, 12);
        assert!(err.message.contains("Window"));
    }

    #[test]
    fn test_type_lookup_is_case_sensitive() {
        assert_eq!(kind_of(parse("<grid/>")), MarkupErrorKind::UnknownType);
    }

    #[test]
    fn test_property_element_syntax_rejected() {
        let err = parse("<Grid><Grid.RowDefinitions/></Grid>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::ParseSyntax);
        assert!(err.message.contains("Grid.RowDefinitions"));
    }

    #[test]
    fn test_second_child_of_single_child_node() {
        let err = parse("<Border><TextBlock>a</TextBlock><TextBlock>b</TextBlock></Border>")
            .unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::Structure);
        assert_eq!(err.message, "'Border' can only have one child");
    }

    #[test]
    fn test_single_child_keeps_first_child() {
        let allowlist = Allowlist::lesson_controls();
        let entry = allowlist.lookup("Border").unwrap();
        let mut builder = NodeBuilder::begin(entry);
        builder.attach(Node::new("TextBlock")).unwrap();
        assert!(builder.attach(Node::new("Button")).is_err());
        assert_eq!(builder.finish().unwrap().children()[0].kind(), "TextBlock");
    }

    #[test]
    fn test_button_text_content_once() {
        let root = parse("<Button>Run</Button>").unwrap();
        assert_eq!(root.text(), Some("Run"));

        assert_eq!(
            kind_of(parse("<Button>Run<TextBlock/></Button>")),
            MarkupErrorKind::Structure
        );
        assert_eq!(
            kind_of(parse("<Button><TextBlock/>Run</Button>")),
            MarkupErrorKind::Structure
        );
    }

    #[test]
    fn test_comment_splits_single_child_text() {
        let err = parse("<Button>Run<!-- c -->More</Button>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::Structure);
        assert_eq!(err.message, "'Button' already has content; cannot add a text node");

        assert_eq!(
            kind_of(parse("<Button>Run<?pi data?>More</Button>")),
            MarkupErrorKind::Structure
        );
        let root = parse("<Button><!-- c -->Run<!-- d --></Button>").unwrap();
        assert_eq!(root.text(), Some("Run"));
    }

    #[test]
    fn test_bare_name_is_not_a_name_binding() {
        assert_eq!(
            kind_of(parse("<StackPanel Name='Body'/>")),
            MarkupErrorKind::UnknownProperty
        );
    }

    #[test]
    fn test_text_leaf_rejects_children() {
        assert_eq!(
            kind_of(parse("<TextBlock><Border/></TextBlock>")),
            MarkupErrorKind::Structure
        );
    }

    #[test]
    fn test_text_runs_concatenate() {
        let root = parse("<TextBlock>a &lt; b<!-- note --> &amp; <![CDATA[c > d]]></TextBlock>")
            .unwrap();
        assert_eq!(root.text(), Some("a < b & c > d"));
    }

    #[test]
    fn test_character_references() {
        let root = parse("<TextBlock Text='&#65;&#x42;'>&#x2014;</TextBlock>").unwrap();
        assert_eq!(root.property("Text"), Some(&Value::String("AB".to_owned())));
        assert_eq!(root.text(), Some("\u{2014}"));
    }

    #[test]
    fn test_unknown_entity() {
        assert_eq!(
            kind_of(parse("<TextBlock>&nbsp;</TextBlock>")),
            MarkupErrorKind::ParseSyntax
        );
    }

    #[test]
    fn test_text_in_panel() {
        let err = parse("<StackPanel>loose</StackPanel>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::Structure);
        assert_eq!(err.message, "text content is not supported for 'StackPanel'");
    }

    #[test]
    fn test_root_text() {
        assert_eq!(kind_of(parse("hello")), MarkupErrorKind::RootText);
        assert_eq!(
            kind_of(parse("<TextBlock/>trailing")),
            MarkupErrorKind::RootText
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(kind_of(parse("")), MarkupErrorKind::EmptyDocument);
        assert_eq!(
            kind_of(parse("  <!-- nothing --> ")),
            MarkupErrorKind::EmptyDocument
        );
    }

    #[test]
    fn test_unterminated_element() {
        let err = parse("<StackPanel><TextBlock>hi</TextBlock>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::UnterminatedElement);
        assert!(err.message.contains("StackPanel"));
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert_eq!(
            kind_of(parse("<StackPanel></Grid>")),
            MarkupErrorKind::ParseSyntax
        );
    }

    #[test]
    fn test_multiple_roots() {
        assert_eq!(
            kind_of(parse("<TextBlock/><TextBlock/>")),
            MarkupErrorKind::ParseSyntax
        );
    }

    #[test]
    fn test_doctype_rejected() {
        let doc = r#"<!DOCTYPE TextBlock [<!ENTITY x "boom">]><TextBlock>&x;</TextBlock>"#;
        assert_eq!(kind_of(parse(doc)), MarkupErrorKind::ParseSyntax);
    }

    #[test]
    fn test_ignorable_attributes() {
        let root = parse(
            r#"<StackPanel xmlns="https://github.com/avaloniaui"
                          xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml"
                          xmlns:d="http://schemas.microsoft.com/expression/blend/2008"
                          x:Class="Lessons.Intro" d:DesignWidth="800" mc:Ignorable="d"
                          x:Name="Body"/>"#,
        )
        .unwrap();
        assert_eq!(root.name(), Some("Body"));
        assert_eq!(root.properties().count(), 0);
    }

    #[test]
    fn test_unknown_property() {
        let err = parse("<TextBlock Colour='Red'/>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::UnknownProperty);
        assert_eq!(err.message, "unknown property 'Colour' on 'TextBlock'");
        assert_eq!(
            kind_of(parse("<TextBlock text='lower'/>")),
            MarkupErrorKind::UnknownProperty
        );
    }

    #[test]
    fn test_attached_properties() {
        let root = parse(
            r#"<Grid RowDefinitions="Auto,*" ColumnDefinitions="120,2*">
                <TextBlock Grid.Row="1" Grid.Column="1" Grid.ColumnSpan="2"/>
            </Grid>"#,
        )
        .unwrap();
        assert_eq!(
            root.property("RowDefinitions"),
            Some(&Value::Definitions(vec![GridLength::AUTO, GridLength::star(1.0)]))
        );
        assert_eq!(
            root.property("ColumnDefinitions"),
            Some(&Value::Definitions(vec![
                GridLength::pixels(120.0),
                GridLength::star(2.0)
            ]))
        );
        let cell = &root.children()[0];
        assert_eq!(cell.attached("Grid", "Row"), Some(&Value::Int(1)));
        assert_eq!(cell.attached("Grid", "ColumnSpan"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_unknown_attached_property() {
        assert_eq!(
            kind_of(parse("<TextBlock Window.Top='1'/>")),
            MarkupErrorKind::UnknownAttachedProperty
        );
        assert_eq!(
            kind_of(parse("<TextBlock Grid.Depth='1'/>")),
            MarkupErrorKind::UnknownAttachedProperty
        );
    }

    #[test]
    fn test_grid_definitions_only_on_grid() {
        let err = parse("<StackPanel RowDefinitions='Auto'/>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::Structure);
        assert_eq!(
            kind_of(parse("<Grid RowDefinitions='Auto,tall'/>")),
            MarkupErrorKind::Coercion
        );
    }

    #[test]
    fn test_coercion() {
        let root = parse(
            r##"<Border Padding="8,4" Background="#336699" CornerRadius="6">
                <TextBlock FontSize="12.5" HorizontalAlignment="center" TextWrapping="Wrap"/>
            </Border>"##,
        )
        .unwrap();
        assert_eq!(
            root.property("Padding"),
            Some(&Value::Thickness(Thickness::new(8.0, 4.0, 8.0, 4.0)))
        );
        let text = &root.children()[0];
        assert_eq!(text.property("FontSize"), Some(&Value::Double(12.5)));
        assert!(matches!(
            text.property("HorizontalAlignment"),
            Some(Value::Enum(v)) if v.member == "Center"
        ));

        let err = parse("<TextBlock FontSize='12,5'/>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::Coercion);
        assert_eq!(err.coerce_error().map(|e| e.value.as_str()), Some("12,5"));
    }

    #[test]
    fn test_set_resource_extension() {
        let root = parse(
            r#"<Button Command="{SetResource Key=ShowHint, Expression=!$self}">Hint</Button>"#,
        )
        .unwrap();
        assert_eq!(
            root.property("Command"),
            Some(&Value::Command(Command {
                key: "ShowHint".to_owned(),
                action: CommandAction::Toggle,
            }))
        );
    }

    #[test]
    fn test_unknown_extension() {
        let err = parse("<TextBlock Text='{Binding Title}'/>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::MarkupExtension);
        assert_eq!(
            kind_of(parse("<TextBlock Text='{SetResource Key=A, Expression=$self}'/>")),
            MarkupErrorKind::MarkupExtension
        );
    }

    #[test]
    fn test_escaped_literal() {
        let root = parse("<TextBlock Text='{}{not an extension}'/>").unwrap();
        assert_eq!(
            root.property("Text"),
            Some(&Value::String("{not an extension}".to_owned()))
        );
    }

    #[test]
    fn test_command_property_rejects_literals() {
        assert_eq!(
            kind_of(parse("<Button Command='Save'/>")),
            MarkupErrorKind::Coercion
        );
    }

    #[test]
    fn test_code_finalizer_removes_indent() {
        let root = parse(
            "<Code Language='rust'>\n        fn main() {\n            run();\n        }\n    </Code>",
        )
        .unwrap();
        assert_eq!(root.text(), Some("fn main() {\n    run();\n}"));
    }

    #[test]
    fn test_examine_accepts_only_files() {
        let root = parse(
            r#"<Examine><File FilePath="src/main.rs">fn main() {}</File></Examine>"#,
        )
        .unwrap();
        assert_eq!(root.children()[0].kind(), "File");

        let err = parse("<Examine><TextBlock>x</TextBlock></Examine>").unwrap_err();
        assert_eq!(err.kind, MarkupErrorKind::Structure);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let doc = r#"<Lesson><StackPanel Spacing="4"><H1>Intro</H1><Button Command="{SetResource Key=A, Expression=$parameter}">Go</Button></StackPanel></Lesson>"#;
        let allowlist = Allowlist::lesson_controls();
        let tags_before = allowlist.tags();

        let first = parse(doc).unwrap();
        let second = parse(doc).unwrap();

        assert_eq!(first, second);
        assert_eq!(allowlist.tags(), tags_before);
    }

    #[test]
    fn test_custom_allowlist() {
        fn card() -> Node {
            Node::new("Card")
        }
        let allowlist = Allowlist::new([AllowlistEntry::builder("Card", Structure::TextLeaf, card)
            .properties(&[PropertyDecl::new("Elevated", ValueKind::Bool)])
            .build()])
        .unwrap();
        let interpreter = Interpreter::new(&allowlist);

        let card = interpreter.parse("<Card Elevated='True'>Body</Card>").unwrap();
        assert_eq!(card.property("Elevated"), Some(&Value::Bool(true)));
        assert_eq!(
            kind_of(interpreter.parse("<Grid/>")),
            MarkupErrorKind::UnknownType
        );
    }

    #[test]
    fn test_decode_entity() {
        assert_eq!(decode_entity("quot").as_deref(), Some("\""));
        assert_eq!(decode_entity("#X41").as_deref(), Some("A"));
        assert_eq!(decode_entity("#xD800"), None);
        assert_eq!(decode_entity("nbsp"), None);
    }

    #[test]
    fn test_ignorable() {
        assert!(is_ignorable("xmlns"));
        assert!(is_ignorable("xmlns:x"));
        assert!(is_ignorable("d:DesignHeight"));
        assert!(!is_ignorable("x"));
        assert!(!is_ignorable("Text"));
    }
}
