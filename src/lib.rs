// SPDX-License-Identifier: MPL-2.0

//! Client for the Network posts/follow web application: an HTTP API client,
//! a history-aware router, pure view renderers and the state they read.

pub mod api;
pub mod app;
pub mod config;
pub mod dom;
pub mod nav;
pub mod runtime;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AppOptions, NetworkApp, Prompt};
