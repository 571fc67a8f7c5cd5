// SPDX-License-Identifier: MPL-2.0

//! A small element tree that views render into.
//!
//! Nodes are plain data. Interactive nodes carry a `key` plus a map from
//! event name to the [`Action`] it triggers; nothing executable lives in the
//! tree, so rendering stays pure and binding happens separately.

mod html;
mod text;

pub use html::{escape_attr, escape_html, render_to_html};
pub use text::render_to_text;

use crate::view::Action;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Element name, e.g. "div", "button".
    pub tag: String,

    /// Stable identity; required for a node to be bindable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,

    /// Event name ("click", "submit") to the action it triggers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, Action>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Node {
            tag: tag.to_string(),
            key: None,
            attrs: BTreeMap::new(),
            events: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf carrying text.
    pub fn text(tag: &str, content: &str) -> Self {
        let mut node = Node::new(tag);
        node.text = Some(content.to_string());
        node
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn on(mut self, event: &str, action: Action) -> Self {
        self.events.insert(event.to_string(), action);
        self
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class()
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn event(&self, name: &str) -> Option<&Action> {
        self.events.get(name)
    }

    /// Depth-first, pre-order walk over this node and its descendants.
    pub fn walk(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find_by_key(&self, key: &str) -> Option<&Node> {
        self.walk().find(|node| node.key.as_deref() == Some(key))
    }

    pub fn find_all_by_class(&self, class: &str) -> Vec<&Node> {
        self.walk().filter(|node| node.has_class(class)).collect()
    }

    /// All text in this subtree, in document order, space separated.
    pub fn text_content(&self) -> String {
        self.walk()
            .filter_map(|node| node.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
