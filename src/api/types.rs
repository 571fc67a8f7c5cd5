// SPDX-License-Identifier: MPL-2.0

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A post as the server renders it for the current viewer.
///
/// `like_count`, `is_liked` and `is_owner` are missing from the create-post
/// response, and `user` is missing from posts embedded in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub user: String,
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_owner: bool,
}

/// One page of posts plus the flags the pagination control needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WirePage")]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub has_previous: bool,
    pub has_next: bool,
    pub current_page: u32,
}

impl PostPage {
    /// A page with no neighbours, used for unpaginated list responses.
    pub fn single(posts: Vec<Post>) -> Self {
        Self {
            posts,
            has_previous: false,
            has_next: false,
            current_page: 1,
        }
    }
}

/// Older servers answer `GET /posts` with a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum WirePage {
    Paged {
        posts: Vec<Post>,
        #[serde(default)]
        has_previous: bool,
        #[serde(default)]
        has_next: bool,
        #[serde(default = "first_page")]
        current_page: u32,
    },
    Bare(Vec<Post>),
}

impl From<WirePage> for PostPage {
    fn from(wire: WirePage) -> Self {
        match wire {
            WirePage::Paged {
                posts,
                has_previous,
                has_next,
                current_page,
            } => Self {
                posts,
                has_previous,
                has_next,
                current_page: current_page.max(1),
            },
            WirePage::Bare(posts) => Self::single(posts),
        }
    }
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user: ProfileUser,
    pub followers_count: u32,
    pub following_count: u32,
    pub is_following: bool,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub has_previous: bool,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default = "first_page")]
    pub current_page: u32,
}

impl Profile {
    /// Posts on a profile page are all by the profile's user; the server
    /// leaves the author out, so fill it in.
    pub fn fill_authors(&mut self) {
        for post in &mut self.posts {
            if post.user.is_empty() {
                post.user = self.user.username.clone();
            }
        }
    }
}

/// Answer to `POST /like/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LikeResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub like_count: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Answer to the follow and edit endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewPost<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LikeRequest {
    pub liked: bool,
}

/// Accepts RFC 3339 and offset-less ISO 8601; the latter is read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_post_defaults_for_create_response() {
        let json = r#"{"id": 7, "content": "hi", "timestamp": "2024-05-01T12:30:00.123Z", "user": "alice"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.user, "alice");
        assert_eq!(post.like_count, 0);
        assert!(!post.is_liked);
        assert!(!post.is_owner);
        assert_eq!(post.timestamp.hour(), 12);
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let ts = parse_timestamp("2023-11-02T08:05:09.500000").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2023, 11, 2));
        assert_eq!((ts.hour(), ts.minute()), (8, 5));
    }

    #[test]
    fn test_offset_timestamp_normalized() {
        let ts = parse_timestamp("2024-01-01T01:00:00+02:00").unwrap();
        assert_eq!(ts.day(), 31);
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let json = r#"{"id": 1, "content": "x", "timestamp": "yesterday"}"#;
        assert!(serde_json::from_str::<Post>(json).is_err());
    }

    #[test]
    fn test_paged_response() {
        let json = r#"{
            "posts": [{"id": 1, "user": "bob", "content": "a", "timestamp": "2024-05-01T00:00:00Z",
                       "like_count": 3, "is_liked": true, "is_owner": false}],
            "has_previous": true, "has_next": false, "current_page": 2
        }"#;
        let page: PostPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.posts.len(), 1);
        assert!(page.has_previous);
        assert!(!page.has_next);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.posts[0].like_count, 3);
    }

    #[test]
    fn test_bare_array_is_single_page() {
        let json = r#"[{"id": 1, "user": "bob", "content": "a", "timestamp": "2024-05-01T00:00:00Z"}]"#;
        let page: PostPage = serde_json::from_str(json).unwrap();
        assert_eq!(page, PostPage::single(page.posts.clone()));
    }

    #[test]
    fn test_profile_fill_authors() {
        let json = r#"{
            "user": {"username": "alice", "email": "a@example.com"},
            "followers_count": 2, "following_count": 1, "is_following": false,
            "posts": [{"id": 3, "content": "mine", "timestamp": "2024-05-01T00:00:00Z"}]
        }"#;
        let mut profile: Profile = serde_json::from_str(json).unwrap();
        profile.fill_authors();
        assert_eq!(profile.posts[0].user, "alice");
        assert_eq!(profile.current_page, 1);
        assert!(!profile.has_next);
    }

    #[test]
    fn test_like_response_variants() {
        let ok: LikeResponse =
            serde_json::from_str(r#"{"message": "Like added.", "like_count": 4}"#).unwrap();
        assert_eq!(ok.like_count, Some(4));
        assert!(ok.error.is_none());

        let err: LikeResponse = serde_json::from_str(r#"{"error": "Post not found."}"#).unwrap();
        assert_eq!(err.error.as_deref(), Some("Post not found."));
    }
}
