// SPDX-License-Identifier: MPL-2.0

use crate::dom::Node;
use crate::state::PageInfo;
use crate::view::Action;

/// Previous/Next controls, each asking for the neighbouring page of the
/// same view. `None` when there is nowhere to go.
pub fn render_pagination(page: &PageInfo) -> Option<Node> {
    if !page.has_previous && !page.has_next {
        return None;
    }

    let mut nav = Node::new("nav").with_class("pagination");
    if page.has_previous {
        nav = nav.child(
            Node::text("button", "Previous")
                .with_key("page-prev")
                .with_class("btn btn-outline-primary")
                .on(
                    "click",
                    Action::Paginate {
                        page: page.current_page.saturating_sub(1).max(1),
                    },
                ),
        );
    }
    nav = nav.child(Node::text("span", &format!("Page {}", page.current_page)).with_class("page-number"));
    if page.has_next {
        nav = nav.child(
            Node::text("button", "Next")
                .with_key("page-next")
                .with_class("btn btn-outline-primary")
                .on(
                    "click",
                    Action::Paginate {
                        page: page.current_page.saturating_add(1),
                    },
                ),
        );
    }
    Some(nav)
}
