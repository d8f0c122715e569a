//! `ml show` command implementation.

use clap::Args;
use ml_markup::{Node, Value};

use super::lessons::locale_label;
use super::{ContentArgs, parse_id};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Lesson id.
    id: String,

    #[command(flatten)]
    content: ContentArgs,

    /// Print the tree as JSON.
    #[arg(long)]
    json: bool,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if the lesson doesn't exist, has no readable text,
    /// or doesn't parse.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let id = parse_id(&self.id)?;
        let content = self.content.open()?;

        let text = content
            .repository
            .content_by_id(&id, &content.locale)?
            .ok_or_else(|| CliError::Validation(format!("lesson {id} has no readable content")))?;
        let root = ml_markup::parse(&text)?;

        if self.json {
            output.row(&serde_json::to_string_pretty(&root)?);
        } else {
            output.heading(&format!("{id} ({})", locale_label(&content.locale)));
            for line in render_tree(&root) {
                output.row(&line);
            }
        }
        Ok(())
    }
}

/// Render a node tree as indented lines, one node per line.
pub(crate) fn render_tree(root: &Node) -> Vec<String> {
    let mut lines = Vec::new();
    render_node(root, 0, &mut lines);
    lines
}

fn render_node(node: &Node, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);

    let mut line = format!("{indent}{}", node.kind());
    if let Some(name) = node.name() {
        line.push_str(&format!("#{name}"));
    }
    for class in node.classes() {
        line.push_str(&format!(".{class}"));
    }
    for (key, value) in node.properties() {
        line.push_str(&format!(" {key}={}", format_value(value)));
    }
    lines.push(line);

    if let Some(text) = node.text() {
        lines.extend(text.lines().map(|text_line| format!("{indent}  | {text_line}")));
    }
    for child in node.children() {
        render_node(child, depth + 1, lines);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::String(s) => format!("{s:?}"),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Double(d) => d.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Color(color) => color.to_string(),
        Value::Enum(member) => member.member.to_owned(),
        Value::Uri(uri) => uri.value.clone(),
        Value::Command(command) => format!("{{{:?} {}}}", command.action, command.key),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_tree() {
        let root = ml_markup::parse(
            r#"<StackPanel x:Name="main" Orientation="horizontal">
  <H1 Grid.Row="1">Intro</H1>
  <Button Command="{SetResource Key=Flag, Expression=!$self}"><TextBlock Text="Go"/></Button>
  <Code>
      let x = 1;
        x + 1
  </Code>
</StackPanel>"#,
        )
        .unwrap();

        assert_eq!(
            render_tree(&root),
            vec![
                "StackPanel#main Orientation=Horizontal",
                "  TextBlock.H1 Grid.Row=1",
                "    | Intro",
                "  Button Command={Toggle Flag}",
                "    TextBlock Text=\"Go\"",
                "  Code Language=\"cs\"",
                "    | let x = 1;",
                "    |   x + 1",
            ]
        );
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&Value::Null), "null");
        assert_eq!(format_value(&Value::Double(12.5)), "12.5");
        assert_eq!(format_value(&Value::String("a\"b".to_owned())), "\"a\\\"b\"");
    }
}
