// SPDX-License-Identifier: MPL-2.0

mod history;
mod route;
mod router;

pub use history::{History, PopState, SessionHistory};
pub use route::{HistoryEntry, Route, RouteError, View};
pub use router::{Router, Ticket};
