// SPDX-License-Identifier: MPL-2.0

use crate::dom::Node;

/// Elements that flow on the same line as their siblings.
const INLINE_ELEMENTS: &[&str] = &["a", "button", "em", "small", "span", "strong"];

/// Render a node tree for a terminal.
///
/// Block elements start a new line, runs of inline siblings share one.
/// Buttons and links show as `[label](key)` so they can be clicked by key.
pub fn render_to_text(node: &Node) -> String {
    let mut lines = Vec::new();
    write_block(node, &mut lines);
    lines.join("\n")
}

fn is_inline(node: &Node) -> bool {
    INLINE_ELEMENTS.contains(&node.tag.as_str())
}

fn write_block(node: &Node, lines: &mut Vec<String>) {
    match node.tag.as_str() {
        "hr" => {
            lines.push("-".repeat(40));
            return;
        }
        "textarea" => {
            let shown = node
                .text
                .as_deref()
                .filter(|t| !t.is_empty())
                .or_else(|| node.attr("placeholder"))
                .unwrap_or_default();
            lines.push(format!("> {shown}"));
            return;
        }
        _ => {}
    }

    if is_inline(node) {
        lines.push(inline_text(node));
        return;
    }

    if let Some(text) = &node.text {
        lines.push(text.clone());
        if node.tag == "h2" {
            lines.push("=".repeat(text.chars().count()));
        }
    }

    let mut run: Vec<String> = Vec::new();
    for child in &node.children {
        if is_inline(child) {
            let text = inline_text(child);
            if !text.is_empty() {
                run.push(text);
            }
        } else {
            flush(&mut run, lines);
            write_block(child, lines);
        }
    }
    flush(&mut run, lines);

    if node.has_class("post") {
        lines.push(String::new());
    }
}

fn flush(run: &mut Vec<String>, lines: &mut Vec<String>) {
    if !run.is_empty() {
        lines.push(run.join("  "));
        run.clear();
    }
}

fn inline_text(node: &Node) -> String {
    let mut text = node.text.clone().unwrap_or_default();
    for child in &node.children {
        let inner = inline_text(child);
        if inner.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&inner);
    }

    match (node.tag.as_str(), &node.key) {
        ("a" | "button", Some(key)) => format!("[{text}]({key})"),
        ("a" | "button", None) => format!("[{text}]"),
        _ => text,
    }
}
