// SPDX-License-Identifier: MPL-2.0

mod client;
mod csrf;
mod types;

pub use client::{ClientError, NetworkApi, NetworkClient};
pub use csrf::cookie_value;
pub(crate) use csrf::decode_component;
pub use types::{LikeResponse, MessageResponse, Post, PostPage, Profile, ProfileUser, parse_timestamp};
