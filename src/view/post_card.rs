// SPDX-License-Identifier: MPL-2.0

use crate::dom::Node;
use crate::state::PostView;
use crate::view::{Action, RenderOptions};

/// Render one post card.
///
/// The author link opens the profile and the heart toggles the like. Only
/// the viewer's own posts get an Edit button.
pub fn render_post(view: &PostView, options: &RenderOptions) -> Node {
    let post = &view.post;
    let id = post.id;

    let author = Node::text("a", &post.user)
        .with_key(format!("post-{id}-author"))
        .with_class("profile-link")
        .with_attr("data-username", post.user.clone())
        .on(
            "click",
            Action::OpenProfile {
                username: post.user.clone(),
            },
        );

    let like_class = if view.like.liked() {
        "btn like-button liked"
    } else {
        "btn like-button"
    };
    let like_button = Node::text("button", view.like.icon())
        .with_key(format!("post-{id}-like"))
        .with_class(like_class)
        .on("click", Action::ToggleLike { post_id: id });

    let like_count = Node::text("span", &view.like.like_count().to_string())
        .with_key(format!("post-{id}-likes"))
        .with_class("like-count");

    let mut actions = Node::new("div")
        .with_class("post-actions")
        .child(like_button)
        .child(like_count);

    if post.is_owner {
        actions = actions.child(
            Node::text("button", "Edit")
                .with_key(format!("post-{id}-edit"))
                .with_class("btn btn-link edit-button")
                .on("click", Action::EditPost { post_id: id }),
        );
    }

    Node::new("div")
        .with_key(format!("post-{id}"))
        .with_class("post mb-3")
        .child(author)
        .child(Node::text("small", &options.format_timestamp(post.timestamp)).with_class("timestamp"))
        .child(
            Node::text("p", &post.content)
                .with_key(format!("post-{id}-content"))
                .with_class("post-content"),
        )
        .child(actions)
}
