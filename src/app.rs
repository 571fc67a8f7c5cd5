// SPDX-License-Identifier: MPL-2.0

use crate::api::{ClientError, LikeResponse, NetworkApi, Post};
use crate::dom::Node;
use crate::nav::{History, Route, Router, Ticket};
use crate::state::{FeedKind, PendingLike, PostView, Resolution, Screen, ViewState};
use crate::view::{self, Bindings, Handlers, RenderOptions};
use serde_json::Value;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Asks the user for a line of text.
pub trait Prompt {
    /// `None` when the user cancels.
    fn ask(&mut self, message: &str, initial: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub render: RenderOptions,
    /// Show failures in the view as well as logging them.
    pub alert_on_error: bool,
}

/// The client: owns the view state and mediates every user action between
/// the server, the history and the views.
pub struct NetworkApp<A, H: History, P> {
    api: A,
    router: Router<H>,
    prompt: P,
    state: ViewState,
    options: AppOptions,
}

impl<A: NetworkApi, H: History, P: Prompt> NetworkApp<A, H, P> {
    pub fn new(api: A, history: H, prompt: P, options: AppOptions) -> Self {
        Self {
            api,
            router: Router::new(history),
            prompt,
            state: ViewState::default(),
            options,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn history(&self) -> &H {
        self.router.history()
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.router.current()
    }

    /// The content region as it stands.
    pub fn document(&self) -> Node {
        view::render(&self.state, &self.options.render)
    }

    pub fn bindings(&self) -> Bindings {
        Bindings::collect(&self.document())
    }

    /// Fire `event` on the rendered node with `key`.
    pub async fn fire(&mut self, key: &str, event: &str) -> bool {
        let bindings = self.bindings();
        bindings.dispatch(key, event, self).await
    }

    pub async fn click(&mut self, key: &str) -> bool {
        self.fire(key, "click").await
    }

    fn report(&mut self, context: &str, err: &dyn fmt::Display) {
        error!(error = %err, "{context}");
        if self.options.alert_on_error {
            self.state.alert = Some(format!("{context}: {err}"));
        }
    }

    // ---- navigation ----------------------------------------------------

    pub async fn navigate(&mut self, route: Route) -> Result<(), ClientError> {
        let ticket = self.router.begin(route);
        let result = self.fetch(ticket.route()).await;
        self.complete(ticket, result)
    }

    /// Replay the view a history entry describes, without pushing a new
    /// entry. An entry without state does nothing.
    pub async fn on_popstate(&mut self, state: Option<Value>) -> Result<(), ClientError> {
        let Some(ticket) = self.router.on_popstate(state.as_ref()) else {
            debug!("popstate without usable state");
            return Ok(());
        };
        let result = self.fetch(ticket.route()).await;
        self.complete(ticket, result)
    }

    /// Returns false when there is no entry to go back to.
    pub async fn back(&mut self) -> Result<bool, ClientError> {
        let Some(popped) = self.router.history_mut().back() else {
            return Ok(false);
        };
        self.on_popstate(popped.state).await.map(|()| true)
    }

    pub async fn forward(&mut self) -> Result<bool, ClientError> {
        let Some(popped) = self.router.history_mut().forward() else {
            return Ok(false);
        };
        self.on_popstate(popped.state).await.map(|()| true)
    }

    /// Same view, another page.
    pub async fn go_to_page(&mut self, page: u32) -> Result<(), ClientError> {
        let route = self
            .router
            .current()
            .map(|route| route.with_page(page))
            .unwrap_or_else(|| Route::feed(page));
        self.navigate(route).await
    }

    /// Start a navigation without fetching; pair with [`Self::fetch`] and
    /// [`Self::complete`] when requests may overlap.
    pub fn begin_navigation(&mut self, route: Route) -> Ticket {
        self.router.begin(route)
    }

    pub async fn fetch(&self, route: &Route) -> Result<Screen, ClientError> {
        match route {
            Route::Feed { page } => self
                .api
                .list_posts(*page)
                .await
                .map(|posts| Screen::feed(FeedKind::All, posts)),
            Route::Following { page } => self
                .api
                .following_posts(*page)
                .await
                .map(|posts| Screen::feed(FeedKind::Following, posts)),
            Route::Profile { username, page } => self
                .api
                .get_profile(username, *page)
                .await
                .map(Screen::profile),
        }
    }

    /// Show a fetched view. Results for superseded navigations are dropped,
    /// and a failure leaves the current view in place.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<Screen, ClientError>,
    ) -> Result<(), ClientError> {
        if !self.router.is_latest(&ticket) {
            debug!(path = %ticket.route().path(), "discarding superseded response");
            return Ok(());
        }

        match result {
            Ok(screen) => {
                let path = ticket.route().path();
                self.router.accept(ticket);
                self.state.screen = screen;
                self.state.alert = None;
                info!(%path, "view loaded");
                Ok(())
            }
            Err(e) => {
                let context = format!("failed to load {}", ticket.route().path());
                self.report(&context, &e);
                Err(e)
            }
        }
    }

    // ---- likes -----------------------------------------------------------

    pub async fn toggle_like(&mut self, post_id: u64) -> Result<Resolution, ClientError> {
        let pending = self.begin_like(post_id)?;
        let result = self.api.like(post_id, pending.desired).await;
        Ok(self.finish_like(&pending, result))
    }

    /// Flip the post's like control right away.
    pub fn begin_like(&mut self, post_id: u64) -> Result<PendingLike, ClientError> {
        let view = self.state.post_mut(post_id).ok_or_else(|| {
            warn!(post_id, "like on a post that is not shown");
            ClientError::InvalidInput(format!("post {post_id} is not shown"))
        })?;
        Ok(view.like.click(post_id))
    }

    pub fn finish_like(
        &mut self,
        pending: &PendingLike,
        result: Result<LikeResponse, ClientError>,
    ) -> Resolution {
        let Some(view) = self.state.post_mut(pending.post_id) else {
            debug!(post_id = pending.post_id, "post left the view before its like resolved");
            return Resolution::Stale;
        };

        let resolution = view.like.resolve(pending, result);
        match &resolution {
            Resolution::Confirmed { liked, like_count } => {
                debug!(post_id = pending.post_id, liked, like_count, "like confirmed");
            }
            Resolution::Reverted { reason, .. } => {
                self.report(&format!("like on post {} reverted", pending.post_id), reason);
            }
            Resolution::Stale => {
                debug!(post_id = pending.post_id, seq = pending.seq, "ignoring superseded like");
            }
        }
        resolution
    }

    // ---- editing ---------------------------------------------------------

    /// Returns `Ok(false)` when the user cancelled or left the text empty.
    pub async fn edit_post(&mut self, post_id: u64) -> Result<bool, ClientError> {
        let current = match self.state.post(post_id) {
            Some(view) => view.post.content.clone(),
            None => {
                warn!(post_id, "edit on a post that is not shown");
                return Err(ClientError::InvalidInput(format!(
                    "post {post_id} is not shown"
                )));
            }
        };

        let Some(answer) = self.prompt.ask("Edit your post:", &current) else {
            debug!(post_id, "edit cancelled");
            return Ok(false);
        };
        let content = answer.trim();
        if content.is_empty() {
            debug!(post_id, "edit left empty");
            return Ok(false);
        }

        if let Err(e) = self.api.edit_post(post_id, content).await {
            self.report(&format!("failed to edit post {post_id}"), &e);
            return Err(e);
        }

        if let Some(view) = self.state.post_mut(post_id) {
            view.post.content = content.to_string();
        }
        info!(post_id, "post edited");
        Ok(true)
    }

    // ---- following -------------------------------------------------------

    pub async fn toggle_follow(&mut self, username: &str) -> Result<(), ClientError> {
        if let Err(e) = self.api.toggle_follow(username).await {
            self.report(&format!("failed to toggle follow for {username}"), &e);
            return Err(e);
        }

        if let Some(profile) = self.state.profile_mut(username) {
            profile.toggle_follow();
            info!(
                username,
                following = profile.is_following,
                followers = profile.followers_count,
                "follow toggled"
            );
        }
        Ok(())
    }

    // ---- composing -------------------------------------------------------

    pub fn set_draft(&mut self, text: &str) {
        self.state.draft = text.to_string();
    }

    /// Publish the compose draft. New posts appear at the top of the first
    /// feed page when that page is showing.
    pub async fn submit_post(&mut self) -> Result<Post, ClientError> {
        let content = self.state.draft.trim().to_string();
        if content.is_empty() {
            let err = ClientError::InvalidInput("post content is empty".into());
            self.report("not posting", &err);
            return Err(err);
        }

        let mut post = match self.api.create_post(&content).await {
            Ok(post) => post,
            Err(e) => {
                self.report("failed to create post", &e);
                return Err(e);
            }
        };
        post.is_owner = true;

        self.state.draft.clear();
        if let Some(feed) = self.state.feed_head_mut() {
            feed.posts.insert(0, PostView::from(post.clone()));
        }
        info!(post_id = post.id, "post created");
        Ok(post)
    }
}

/// Views dispatch here. Failures were already logged by the operations.
impl<A: NetworkApi, H: History, P: Prompt> Handlers for NetworkApp<A, H, P> {
    async fn open_profile(&mut self, username: &str) {
        match Route::profile(username, 1) {
            Ok(route) => {
                let _ = self.navigate(route).await;
            }
            Err(e) => warn!(error = %e, "not opening profile"),
        }
    }

    async fn toggle_like(&mut self, post_id: u64) {
        let _ = NetworkApp::toggle_like(self, post_id).await;
    }

    async fn edit_post(&mut self, post_id: u64) {
        let _ = NetworkApp::edit_post(self, post_id).await;
    }

    async fn toggle_follow(&mut self, username: &str) {
        let _ = NetworkApp::toggle_follow(self, username).await;
    }

    async fn paginate(&mut self, page: u32) {
        let _ = self.go_to_page(page).await;
    }

    async fn submit_post(&mut self) {
        let _ = NetworkApp::submit_post(self).await;
    }
}
