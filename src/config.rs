// SPDX-License-Identifier: MPL-2.0

pub const APP_ID: &str = "io.github.network.NetworkClient";
pub const APP_NAME: &str = "Network";

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

/// Cookie the server stores its CSRF secret in.
pub const CSRF_COOKIE: &str = "csrftoken";
/// Header every mutating request must echo the token in.
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Cookie carrying the logged-in session.
pub const SESSION_COOKIE: &str = "sessionid";

/// Year, long month, day, hour and minute, e.g. "May 1, 2024, 02:05 PM".
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%B %-d, %Y, %I:%M %p";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = concat!("NetworkClient/", env!("CARGO_PKG_VERSION"));
