// SPDX-License-Identifier: MPL-2.0

use crate::dom::Node;
use crate::state::{FeedKind, FeedScreen};
use crate::view::pagination::render_pagination;
use crate::view::post_card::render_post;
use crate::view::{Action, RenderOptions};

pub fn render_compose(draft: &str) -> Node {
    let mut textarea = Node::new("textarea")
        .with_key("compose-content")
        .with_class("form-control")
        .with_attr("placeholder", "Write something...");
    if !draft.is_empty() {
        textarea.text = Some(draft.to_string());
    }

    Node::new("form")
        .with_key("compose")
        .with_attr("id", "post-form")
        .on("submit", Action::SubmitPost)
        .child(textarea)
        .child(
            Node::text("button", "Post")
                .with_key("compose-submit")
                .with_class("btn btn-primary mt-2")
                .on("click", Action::SubmitPost),
        )
}

/// The full feed gets a compose form on top; the following feed does not.
pub fn render_feed(feed: &FeedScreen, draft: &str, options: &RenderOptions) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(feed.posts.len() + 3);

    let title = match feed.kind {
        FeedKind::All => {
            nodes.push(render_compose(draft));
            "All Posts"
        }
        FeedKind::Following => "Following",
    };
    nodes.push(Node::text("h2", title));

    if feed.posts.is_empty() {
        nodes.push(Node::text("p", "No posts yet.").with_class("empty"));
    }
    nodes.extend(feed.posts.iter().map(|post| render_post(post, options)));
    nodes.extend(render_pagination(&feed.page));
    nodes
}
