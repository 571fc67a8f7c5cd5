// SPDX-License-Identifier: MPL-2.0

//! Optimistic like toggling.
//!
//! A click flips the control at once and yields a [`PendingLike`] for the
//! request. When the answer comes back the control either keeps the flip
//! or returns to where it was before that click. Each click supersedes the
//! previous one; answers to superseded clicks do not touch the display
//! but still move the last state the server is known to hold, which is
//! what counts are stepped from when an answer carries none.

use crate::api::{ClientError, LikeResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeControl {
    liked: bool,
    like_count: u32,
    issued: u64,
    pending: Option<u64>,
    server: ServerState,
}

/// Last state the server acknowledged, and the click that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ServerState {
    seq: u64,
    liked: bool,
    like_count: u32,
}

impl ServerState {
    /// Count the server would report with `liked` applied.
    fn count_for(&self, liked: bool) -> u32 {
        match (self.liked, liked) {
            (false, true) => self.like_count.saturating_add(1),
            (true, false) => self.like_count.saturating_sub(1),
            _ => self.like_count,
        }
    }

    /// Record a successful answer. Answers older than the one already
    /// recorded are ignored.
    fn acknowledge(&mut self, pending: &PendingLike, like_count: Option<u32>) -> bool {
        if pending.seq <= self.seq {
            return false;
        }
        let count = like_count.unwrap_or_else(|| self.count_for(pending.desired));
        self.like_count = count;
        self.liked = pending.desired;
        self.seq = pending.seq;
        true
    }
}

/// One in-flight like request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLike {
    pub post_id: u64,
    pub seq: u64,
    /// State sent to the server.
    pub desired: bool,
    /// State before the click.
    pub previous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Confirmed { liked: bool, like_count: u32 },
    Reverted { liked: bool, reason: String },
    /// A later click is in flight; this answer no longer matters.
    Stale,
}

impl LikeControl {
    pub fn new(liked: bool, like_count: u32) -> Self {
        Self {
            liked,
            like_count,
            issued: 0,
            pending: None,
            server: ServerState {
                seq: 0,
                liked,
                like_count,
            },
        }
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn like_count(&self) -> u32 {
        self.like_count
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn icon(&self) -> &'static str {
        if self.liked { "♥" } else { "♡" }
    }

    pub fn click(&mut self, post_id: u64) -> PendingLike {
        let previous = self.liked;
        self.liked = !previous;
        self.issued += 1;
        self.pending = Some(self.issued);
        PendingLike {
            post_id,
            seq: self.issued,
            desired: self.liked,
            previous,
        }
    }

    pub fn resolve(
        &mut self,
        pending: &PendingLike,
        result: Result<LikeResponse, ClientError>,
    ) -> Resolution {
        let failure = match result {
            Ok(LikeResponse {
                error: Some(error), ..
            }) => Some(error),
            Ok(LikeResponse { like_count, .. }) => {
                // The latest click always acknowledges.
                if !self.server.acknowledge(pending, like_count) {
                    return Resolution::Stale;
                }
                None
            }
            Err(e) => Some(e.to_string()),
        };

        if self.pending != Some(pending.seq) {
            // Nothing left in flight: show what the server now holds.
            if failure.is_none() && self.pending.is_none() {
                self.liked = self.server.liked;
                self.like_count = self.server.like_count;
            }
            return Resolution::Stale;
        }
        self.pending = None;

        match failure {
            None => {
                self.liked = self.server.liked;
                self.like_count = self.server.like_count;
                Resolution::Confirmed {
                    liked: self.liked,
                    like_count: self.like_count,
                }
            }
            Some(reason) => {
                self.liked = pending.previous;
                self.like_count = self.server.count_for(pending.previous);
                Resolution::Reverted {
                    liked: self.liked,
                    reason,
                }
            }
        }
    }
}
