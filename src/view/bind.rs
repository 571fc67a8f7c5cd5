// SPDX-License-Identifier: MPL-2.0

use crate::dom::Node;
use crate::view::Action;
use std::collections::BTreeMap;
use tracing::debug;

/// Receivers for every action a view can emit.
#[allow(async_fn_in_trait)]
pub trait Handlers {
    async fn open_profile(&mut self, username: &str);
    async fn toggle_like(&mut self, post_id: u64);
    async fn edit_post(&mut self, post_id: u64);
    async fn toggle_follow(&mut self, username: &str);
    async fn paginate(&mut self, page: u32);
    async fn submit_post(&mut self);
}

/// The (key, event) → action table of a rendered tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    table: BTreeMap<(String, String), Action>,
}

impl Bindings {
    /// Collect every keyed node's events. Unkeyed nodes cannot be targeted
    /// and are skipped.
    pub fn collect(root: &Node) -> Self {
        let mut table = BTreeMap::new();
        for node in root.walk() {
            let Some(key) = &node.key else {
                continue;
            };
            for (event, action) in &node.events {
                table.insert((key.clone(), event.clone()), action.clone());
            }
        }
        Self { table }
    }

    pub fn get(&self, key: &str, event: &str) -> Option<&Action> {
        self.table.get(&(key.to_string(), event.to_string()))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Keys that respond to `event`, in key order.
    pub fn keys_for(&self, event: &str) -> impl Iterator<Item = &str> {
        self.table
            .keys()
            .filter(move |(_, e)| e == event)
            .map(|(key, _)| key.as_str())
    }

    /// Fire `event` on the node with `key`. Returns false if nothing is
    /// bound there.
    pub async fn dispatch<H: Handlers>(&self, key: &str, event: &str, handlers: &mut H) -> bool {
        let Some(action) = self.get(key, event).cloned() else {
            debug!(key, event, "no binding");
            return false;
        };
        perform(action, handlers).await;
        true
    }
}

/// Route one action to its handler.
pub async fn perform<H: Handlers>(action: Action, handlers: &mut H) {
    debug!(?action, "dispatching");
    match action {
        Action::OpenProfile { username } => handlers.open_profile(&username).await,
        Action::ToggleLike { post_id } => handlers.toggle_like(post_id).await,
        Action::EditPost { post_id } => handlers.edit_post(post_id).await,
        Action::ToggleFollow { username } => handlers.toggle_follow(&username).await,
        Action::Paginate { page } => handlers.paginate(page).await,
        Action::SubmitPost => handlers.submit_post().await,
    }
}
