// SPDX-License-Identifier: MPL-2.0

//! Pure renderers from [`ViewState`] to [`Node`] trees.

mod action;
pub mod bind;
mod feed;
mod pagination;
mod post_card;
mod profile;

pub use action::Action;
pub use bind::{Bindings, Handlers};
pub use feed::{render_compose, render_feed};
pub use pagination::render_pagination;
pub use post_card::render_post;
pub use profile::render_profile;

use crate::config::DEFAULT_TIMESTAMP_FORMAT;
use crate::dom::Node;
use crate::state::{Screen, ViewState};
use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub timestamp_format: String,
    /// Zone timestamps are shown in; `None` means the system's local zone.
    pub offset: Option<FixedOffset>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            offset: None,
        }
    }
}

impl RenderOptions {
    /// Format with the configured pattern, falling back to RFC 3339 if the
    /// pattern is invalid.
    pub fn format_timestamp(&self, timestamp: DateTime<Utc>) -> String {
        let mut out = String::new();
        let written = match self.offset {
            Some(offset) => write!(
                out,
                "{}",
                timestamp.with_timezone(&offset).format(&self.timestamp_format)
            ),
            None => write!(
                out,
                "{}",
                timestamp.with_timezone(&Local).format(&self.timestamp_format)
            ),
        };
        match written {
            Ok(()) => out,
            Err(_) => timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Render the content region.
pub fn render(state: &ViewState, options: &RenderOptions) -> Node {
    let mut root = Node::new("div")
        .with_key("main-content")
        .with_attr("id", "main-content");

    if let Some(alert) = &state.alert {
        root = root.child(
            Node::text("div", alert)
                .with_key("alert")
                .with_class("alert alert-danger")
                .with_attr("role", "alert"),
        );
    }

    match &state.screen {
        Screen::Blank => root.child(Node::text("p", "Loading...")),
        Screen::Feed(feed) => root.children(render_feed(feed, &state.draft, options)),
        Screen::Profile(profile) => root.children(render_profile(profile, options)),
    }
}
