// SPDX-License-Identifier: MPL-2.0

use crate::dom::Node;
use crate::state::ProfileScreen;
use crate::view::pagination::render_pagination;
use crate::view::post_card::render_post;
use crate::view::{Action, RenderOptions};

pub fn render_profile(profile: &ProfileScreen, options: &RenderOptions) -> Vec<Node> {
    let (label, class) = if profile.is_following {
        ("Unfollow", "btn btn-danger")
    } else {
        ("Follow", "btn btn-success")
    };

    let header = Node::new("div")
        .with_key("profile-header")
        .with_class("profile-header")
        .child(Node::text("h2", &profile.username))
        .child(Node::text("p", &format!("Email: {}", profile.email)))
        .child(
            Node::text("p", &format!("Followers: {}", profile.followers_count))
                .with_key("followers-count"),
        )
        .child(
            Node::text("p", &format!("Following: {}", profile.following_count))
                .with_key("following-count"),
        )
        .child(
            Node::text("button", label)
                .with_key("follow")
                .with_class(class)
                .on(
                    "click",
                    Action::ToggleFollow {
                        username: profile.username.clone(),
                    },
                ),
        );

    let mut nodes = Vec::with_capacity(profile.posts.len() + 2);
    nodes.push(header);
    nodes.extend(profile.posts.iter().map(|post| render_post(post, options)));
    nodes.extend(render_pagination(&profile.page));
    nodes
}
