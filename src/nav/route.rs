// SPDX-License-Identifier: MPL-2.0

use crate::api::decode_component;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{Position, Url};

/// Origin used to build and parse client paths; only the part after the
/// host is ever exposed.
static LOCAL_ORIGIN: Lazy<Url> =
    Lazy::new(|| Url::parse("http://localhost/").expect("static origin is a valid url"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("profile entry without a username")]
    MissingUsername,
    #[error("{0:?} entry must not carry a username")]
    UnexpectedUsername(View),
    #[error("{0:?} cannot be used as a username in a path")]
    InvalidUsername(String),
    #[error("page numbers start at 1")]
    ZeroPage,
    #[error("no view for path {0:?}")]
    UnknownPath(String),
    #[error("malformed history state: {0}")]
    InvalidState(String),
}

/// Which listing a navigation entry shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Posts,
    Profile,
    Following,
}

/// The state object stored with each history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub view: View,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub page: u32,
}

/// A place the client can be: one page of one listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Feed { page: u32 },
    Profile { username: String, page: u32 },
    Following { page: u32 },
}

impl Default for Route {
    fn default() -> Self {
        Route::feed(1)
    }
}

impl Route {
    pub fn feed(page: u32) -> Self {
        Route::Feed { page: page.max(1) }
    }

    pub fn following(page: u32) -> Self {
        Route::Following { page: page.max(1) }
    }

    /// Fails for names that cannot be a single path segment: empty, `.`
    /// and `..` would be dropped or resolved away by URL normalization.
    pub fn profile(username: impl Into<String>, page: u32) -> Result<Self, RouteError> {
        let username = username.into();
        match username.as_str() {
            "" => Err(RouteError::MissingUsername),
            "." | ".." => Err(RouteError::InvalidUsername(username)),
            _ => Ok(Route::Profile {
                username,
                page: page.max(1),
            }),
        }
    }

    pub fn view(&self) -> View {
        match self {
            Route::Feed { .. } => View::Posts,
            Route::Profile { .. } => View::Profile,
            Route::Following { .. } => View::Following,
        }
    }

    pub fn page(&self) -> u32 {
        match self {
            Route::Feed { page } | Route::Following { page } | Route::Profile { page, .. } => *page,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Route::Profile { username, .. } => Some(username),
            _ => None,
        }
    }

    /// Same listing, another page.
    pub fn with_page(&self, page: u32) -> Self {
        match self {
            Route::Feed { .. } => Route::feed(page),
            Route::Following { .. } => Route::following(page),
            Route::Profile { username, .. } => Route::Profile {
                username: username.clone(),
                page: page.max(1),
            },
        }
    }

    /// Path and query for this route, identical for the fetch and the
    /// history entry: `/posts?page=2`, `/profile/alice?page=1`.
    pub fn path(&self) -> String {
        let mut url = LOCAL_ORIGIN.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear();
            match self {
                Route::Feed { .. } => {
                    segments.push("posts");
                }
                Route::Following { .. } => {
                    segments.push("following");
                }
                Route::Profile { username, .. } => {
                    segments.push("profile").push(username);
                }
            }
        }
        url.query_pairs_mut()
            .append_pair("page", &self.page().to_string());
        url[Position::BeforePath..].to_string()
    }

    /// Parse a client path back into a route. A missing or unusable page
    /// falls back to 1.
    pub fn from_path(path: &str) -> Result<Self, RouteError> {
        let url = LOCAL_ORIGIN
            .join(path)
            .map_err(|_| RouteError::UnknownPath(path.to_string()))?;

        let page = url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse::<u32>().ok())
            .unwrap_or(1);

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|segment| !segment.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] | ["posts"] => Ok(Route::feed(page)),
            ["following"] => Ok(Route::following(page)),
            ["profile", username] => Route::profile(decode_component(username), page),
            _ => Err(RouteError::UnknownPath(path.to_string())),
        }
    }

    pub fn to_entry(&self) -> HistoryEntry {
        HistoryEntry {
            view: self.view(),
            username: self.username().map(str::to_string),
            page: self.page(),
        }
    }

    pub fn from_entry(entry: &HistoryEntry) -> Result<Self, RouteError> {
        if entry.page == 0 {
            return Err(RouteError::ZeroPage);
        }
        match (entry.view, &entry.username) {
            (View::Profile, Some(username)) if !username.is_empty() => {
                Route::profile(username.clone(), entry.page)
            }
            (View::Profile, _) => Err(RouteError::MissingUsername),
            (view, Some(_)) => Err(RouteError::UnexpectedUsername(view)),
            (View::Posts, None) => Ok(Route::feed(entry.page)),
            (View::Following, None) => Ok(Route::following(entry.page)),
        }
    }

    /// The JSON object pushed onto history.
    pub fn to_state(&self) -> serde_json::Value {
        serde_json::to_value(self.to_entry()).unwrap_or(serde_json::Value::Null)
    }

    pub fn from_state(state: &serde_json::Value) -> Result<Self, RouteError> {
        let entry: HistoryEntry = serde_json::from_value(state.clone())
            .map_err(|e| RouteError::InvalidState(e.to_string()))?;
        Self::from_entry(&entry)
    }
}
