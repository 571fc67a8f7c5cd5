// SPDX-License-Identifier: MPL-2.0

use serde::{Deserialize, Serialize};

/// What activating a bound node asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    OpenProfile { username: String },
    ToggleLike { post_id: u64 },
    EditPost { post_id: u64 },
    ToggleFollow { username: String },
    Paginate { page: u32 },
    SubmitPost,
}
