// SPDX-License-Identifier: MPL-2.0

use serde_json::Value;

/// Where navigations are recorded.
pub trait History {
    fn push_state(&mut self, state: Value, url: &str);
    /// Step back one entry, yielding what a popstate would carry.
    fn back(&mut self) -> Option<PopState>;
    fn forward(&mut self) -> Option<PopState>;
}

/// What a back/forward step hands to the router: the state object pushed
/// with that entry, or `None` for the entry the session started on.
#[derive(Debug, Clone, PartialEq)]
pub struct PopState {
    pub state: Option<Value>,
    pub url: String,
}

/// In-memory session history with a cursor, browser style: pushing after
/// going back discards the forward entries.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<PopState>,
    index: usize,
}

impl SessionHistory {
    pub fn new(initial_url: &str) -> Self {
        Self {
            entries: vec![PopState {
                state: None,
                url: initial_url.to_string(),
            }],
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> &PopState {
        &self.entries[self.index]
    }
}

impl History for SessionHistory {
    fn push_state(&mut self, state: Value, url: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(PopState {
            state: Some(state),
            url: url.to_string(),
        });
        self.index = self.entries.len() - 1;
    }

    fn back(&mut self) -> Option<PopState> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current().clone())
    }

    fn forward(&mut self) -> Option<PopState> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current().clone())
    }
}
