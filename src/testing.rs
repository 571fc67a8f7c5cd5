// SPDX-License-Identifier: MPL-2.0

//! Scripted stand-ins for the server and the user, shared by unit tests.

use crate::api::{
    ClientError, LikeResponse, MessageResponse, NetworkApi, Post, PostPage, Profile, ProfileUser,
};
use crate::app::Prompt;
use chrono::{TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

pub fn post(id: u64, user: &str, is_owner: bool) -> Post {
    Post {
        id,
        user: user.to_string(),
        content: format!("post {id}"),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        like_count: 1,
        is_liked: false,
        is_owner,
    }
}

pub fn page(posts: Vec<Post>, has_previous: bool, has_next: bool, current_page: u32) -> PostPage {
    PostPage {
        posts,
        has_previous,
        has_next,
        current_page,
    }
}

pub fn profile(username: &str, followers_count: u32, is_following: bool, posts: Vec<Post>) -> Profile {
    Profile {
        user: ProfileUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        },
        followers_count,
        following_count: 0,
        is_following,
        posts,
        has_previous: false,
        has_next: false,
        current_page: 1,
    }
}

/// In-memory server. Every call is logged as `METHOD path`.
#[derive(Default)]
pub struct FakeApi {
    pub feed: HashMap<u32, PostPage>,
    pub following: HashMap<u32, PostPage>,
    pub profiles: HashMap<(String, u32), Profile>,
    pub like_replies: RefCell<VecDeque<Result<LikeResponse, ClientError>>>,
    pub follow_error: Option<ClientError>,
    pub edit_error: Option<ClientError>,
    pub offline: Cell<bool>,
    pub calls: RefCell<Vec<String>>,
    pub next_id: Cell<u64>,
}

impl FakeApi {
    pub fn with_feed(mut self, number: u32, page: PostPage) -> Self {
        self.feed.insert(number, page);
        self
    }

    pub fn with_following(mut self, number: u32, page: PostPage) -> Self {
        self.following.insert(number, page);
        self
    }

    pub fn with_profile(mut self, number: u32, profile: Profile) -> Self {
        self.profiles
            .insert((profile.user.username.clone(), number), profile);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<(), ClientError> {
        self.calls.borrow_mut().push(call);
        if self.offline.get() {
            return Err(ClientError::Network("connection refused".into()));
        }
        Ok(())
    }

    fn not_found() -> ClientError {
        ClientError::Status {
            status: 404,
            body: "not found".into(),
        }
    }
}

impl NetworkApi for FakeApi {
    async fn list_posts(&self, page: u32) -> Result<PostPage, ClientError> {
        self.record(format!("GET /posts?page={page}"))?;
        self.feed.get(&page).cloned().ok_or_else(Self::not_found)
    }

    async fn following_posts(&self, page: u32) -> Result<PostPage, ClientError> {
        self.record(format!("GET /following?page={page}"))?;
        self.following.get(&page).cloned().ok_or_else(Self::not_found)
    }

    async fn get_profile(&self, username: &str, page: u32) -> Result<Profile, ClientError> {
        self.record(format!("GET /profile/{username}?page={page}"))?;
        self.profiles
            .get(&(username.to_string(), page))
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_post(&self, content: &str) -> Result<Post, ClientError> {
        self.record("POST /posts".to_string())?;
        let id = self.next_id.get() + 100;
        self.next_id.set(self.next_id.get() + 1);
        Ok(Post {
            id,
            user: "me".into(),
            content: content.to_string(),
            timestamp: Utc::now(),
            like_count: 0,
            is_liked: false,
            is_owner: false,
        })
    }

    async fn toggle_follow(&self, username: &str) -> Result<MessageResponse, ClientError> {
        self.record(format!("POST /follow/{username}"))?;
        match &self.follow_error {
            Some(e) => Err(e.clone()),
            None => Ok(MessageResponse {
                message: Some("Followed successfully.".into()),
                error: None,
            }),
        }
    }

    async fn like(&self, post_id: u64, liked: bool) -> Result<LikeResponse, ClientError> {
        self.record(format!("POST /like/{post_id} liked={liked}"))?;
        self.like_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(LikeResponse::default()))
    }

    async fn edit_post(
        &self,
        post_id: u64,
        content: &str,
    ) -> Result<MessageResponse, ClientError> {
        self.record(format!("POST /edit_post/{post_id}/ content={content}"))?;
        match &self.edit_error {
            Some(e) => Err(e.clone()),
            None => Ok(MessageResponse {
                message: Some("Post updated.".into()),
                error: None,
            }),
        }
    }
}

/// Answers prompts from a queue; an empty queue cancels.
#[derive(Default)]
pub struct ScriptedPrompt {
    pub answers: VecDeque<Option<String>>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn answering(answers: impl IntoIterator<Item = Option<&'static str>>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|a| a.map(str::to_string))
                .collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str, initial: &str) -> Option<String> {
        self.asked.push(format!("{message} [{initial}]"));
        self.answers.pop_front().flatten()
    }
}
