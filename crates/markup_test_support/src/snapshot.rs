//! Line-oriented text snapshots of builder output.
//!
//! Outline trees start with `#root`; each child follows on its own
//! `| `-prefixed line, indented two spaces per nesting level. Table entries
//! are one line each, with group members and titled bodies indented below.

use crate::escape_text;
use markup::{Cell, Child, Entry, Node};

pub fn format_tree(root: &Node) -> Vec<String> {
    let mut lines = vec!["#root".to_string()];
    let mut stack: Vec<(std::slice::Iter<'_, Child>, usize)> = vec![(root.children().iter(), 0)];
    while let Some((iter, depth)) = stack.last_mut() {
        let depth = *depth;
        let Some(child) = iter.next() else {
            stack.pop();
            continue;
        };
        let indent = "  ".repeat(depth);
        match child {
            Child::Text(text) => lines.push(format!("| {indent}{}", escape_text(text))),
            Child::Link(url) => lines.push(format!("| {indent}url {}", escape_text(url))),
            Child::Element(node) => {
                let label = node.label().map(|tag| tag.as_str()).unwrap_or("#root");
                lines.push(format!("| {indent}<{label}>"));
                stack.push((node.children().iter(), depth + 1));
            }
        }
    }
    lines
}

pub fn format_entries(entries: &[Entry]) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in entries {
        push_entry(&mut lines, entry, 0);
    }
    lines
}

fn push_entry(lines: &mut Vec<String>, entry: &Entry, depth: usize) {
    let indent = "  ".repeat(depth);
    match entry {
        Entry::Raw { tag, cell } => {
            lines.push(format!("{indent}<{}> {}", tag.as_str(), format_cell(cell)));
        }
        Entry::Cell(cell) => lines.push(format!("{indent}{}", format_cell(cell))),
        Entry::Rows(rows) => {
            lines.push(format!("{indent}rows"));
            for cell in rows {
                lines.push(format!("{indent}  {}", format_cell(cell)));
            }
        }
        Entry::Titled { title, body } => {
            lines.push(format!("{indent}title {}", escape_text(title)));
            push_entry(lines, body, depth + 1);
        }
    }
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => escape_text(text),
        Cell::Link(url) => format!("url {}", escape_text(url)),
    }
}
