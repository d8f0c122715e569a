//! Base indentation removal for embedded code listings.

/// Strip the indentation shared with the first non-blank line.
///
/// Line endings are normalized to `\n`. The leading spaces and tabs of the
/// first non-blank line define the base indent; each line loses the longest
/// prefix it shares with it. With `trim_outer_empty_lines`, blank lines at the
/// start and end are dropped.
#[must_use]
pub fn remove_base_indent(text: &str, trim_outer_empty_lines: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let base_indent = lines
        .iter()
        .find(|line| !line.trim().is_empty())
        .map_or("", |line| {
            let end = line
                .find(|c: char| c != ' ' && c != '\t')
                .unwrap_or(line.len());
            &line[..end]
        });

    let stripped: Vec<&str> = lines
        .iter()
        .map(|line| {
            let shared = line
                .bytes()
                .zip(base_indent.bytes())
                .take_while(|(a, b)| a == b)
                .count();
            &line[shared..]
        })
        .collect();

    if !trim_outer_empty_lines {
        return stripped.join("\n");
    }

    let is_blank = |line: &&str| line.trim().is_empty();
    let Some(start) = stripped.iter().position(|line| !is_blank(line)) else {
        return String::new();
    };
    let end = stripped.iter().rposition(|line| !is_blank(line)).unwrap_or(start);
    stripped[start..=end].join("\n")
}
