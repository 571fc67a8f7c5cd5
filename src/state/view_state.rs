// SPDX-License-Identifier: MPL-2.0

use crate::api::{Post, PostPage, Profile};
use crate::state::likes::LikeControl;

/// A post on screen. `like` is authoritative for like state; the
/// `like_count`/`is_liked` fields on `post` are only what was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct PostView {
    pub post: Post,
    pub like: LikeControl,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        let like = LikeControl::new(post.is_liked, post.like_count);
        Self { post, like }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub has_previous: bool,
    pub has_next: bool,
    pub current_page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    All,
    Following,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedScreen {
    pub kind: FeedKind,
    pub posts: Vec<PostView>,
    pub page: PageInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileScreen {
    pub username: String,
    pub email: String,
    pub followers_count: u32,
    pub following_count: u32,
    pub is_following: bool,
    pub posts: Vec<PostView>,
    pub page: PageInfo,
}

impl ProfileScreen {
    /// Apply a confirmed follow toggle to the header.
    pub fn toggle_follow(&mut self) {
        self.is_following = !self.is_following;
        self.followers_count = if self.is_following {
            self.followers_count.saturating_add(1)
        } else {
            self.followers_count.saturating_sub(1)
        };
    }
}

/// What the content region shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Screen {
    #[default]
    Blank,
    Feed(FeedScreen),
    Profile(ProfileScreen),
}

impl Screen {
    pub fn feed(kind: FeedKind, page: PostPage) -> Self {
        Screen::Feed(FeedScreen {
            kind,
            posts: page.posts.into_iter().map(PostView::from).collect(),
            page: PageInfo {
                has_previous: page.has_previous,
                has_next: page.has_next,
                current_page: page.current_page,
            },
        })
    }

    pub fn profile(profile: Profile) -> Self {
        let mut profile = profile;
        profile.fill_authors();
        Screen::Profile(ProfileScreen {
            username: profile.user.username,
            email: profile.user.email,
            followers_count: profile.followers_count,
            following_count: profile.following_count,
            is_following: profile.is_following,
            posts: profile.posts.into_iter().map(PostView::from).collect(),
            page: PageInfo {
                has_previous: profile.has_previous,
                has_next: profile.has_next,
                current_page: profile.current_page,
            },
        })
    }

    pub fn posts(&self) -> &[PostView] {
        match self {
            Screen::Blank => &[],
            Screen::Feed(feed) => &feed.posts,
            Screen::Profile(profile) => &profile.posts,
        }
    }

    pub fn posts_mut(&mut self) -> &mut [PostView] {
        match self {
            Screen::Blank => &mut [],
            Screen::Feed(feed) => &mut feed.posts,
            Screen::Profile(profile) => &mut profile.posts,
        }
    }
}

/// Everything the views render from. Nothing is read back out of rendered
/// output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub screen: Screen,
    /// Text in the compose box.
    pub draft: String,
    /// Last error, when errors are surfaced.
    pub alert: Option<String>,
}

impl ViewState {
    pub fn post(&self, post_id: u64) -> Option<&PostView> {
        self.screen.posts().iter().find(|p| p.post.id == post_id)
    }

    pub fn post_mut(&mut self, post_id: u64) -> Option<&mut PostView> {
        self.screen
            .posts_mut()
            .iter_mut()
            .find(|p| p.post.id == post_id)
    }

    pub fn profile_mut(&mut self, username: &str) -> Option<&mut ProfileScreen> {
        match &mut self.screen {
            Screen::Profile(profile) if profile.username == username => Some(profile),
            _ => None,
        }
    }

    /// The first page of the full feed, where new posts appear.
    pub fn feed_head_mut(&mut self) -> Option<&mut FeedScreen> {
        match &mut self.screen {
            Screen::Feed(feed) if feed.kind == FeedKind::All && feed.page.current_page <= 1 => {
                Some(feed)
            }
            _ => None,
        }
    }
}
