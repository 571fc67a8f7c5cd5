// SPDX-License-Identifier: MPL-2.0

mod likes;
pub mod settings;
mod view_state;

pub use likes::{LikeControl, PendingLike, Resolution};
pub use settings::{AppSettings, SettingsError};
pub use view_state::{FeedKind, FeedScreen, PageInfo, PostView, ProfileScreen, Screen, ViewState};
