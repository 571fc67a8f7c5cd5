// SPDX-License-Identifier: MPL-2.0

use crate::api::csrf;
use crate::api::types::{
    LikeRequest, LikeResponse, MessageResponse, NewPost, Post, PostPage, Profile,
};
use crate::config::{CSRF_COOKIE, CSRF_HEADER, USER_AGENT};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Longest slice of an error body kept in `ClientError::Status`.
const MAX_ERROR_BODY: usize = 512;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("server reported an error: {0}")]
    Api(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// The server endpoints the client consumes.
///
/// `NetworkClient` is the HTTP implementation; tests substitute scripted
/// fakes.
#[allow(async_fn_in_trait)]
pub trait NetworkApi {
    /// `GET /posts?page=N`
    async fn list_posts(&self, page: u32) -> Result<PostPage, ClientError>;
    /// `GET /following?page=N`
    async fn following_posts(&self, page: u32) -> Result<PostPage, ClientError>;
    /// `GET /profile/{username}?page=N`
    async fn get_profile(&self, username: &str, page: u32) -> Result<Profile, ClientError>;
    /// `POST /posts`
    async fn create_post(&self, content: &str) -> Result<Post, ClientError>;
    /// `POST /follow/{username}`
    async fn toggle_follow(&self, username: &str) -> Result<MessageResponse, ClientError>;
    /// `POST /like/{id}`. An `error` field in the answer is left for the
    /// caller to interpret.
    async fn like(&self, post_id: u64, liked: bool) -> Result<LikeResponse, ClientError>;
    /// `POST /edit_post/{id}/`
    async fn edit_post(&self, post_id: u64, content: &str)
    -> Result<MessageResponse, ClientError>;
}

/// HTTP client for one Network server, holding its own cookie jar.
#[derive(Clone)]
pub struct NetworkClient {
    http: reqwest::Client,
    jar: Arc<Jar>,
    base: Url,
}

impl NetworkClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidInput(format!("server url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidInput(format!(
                "server url {base_url:?} must be http(s)"
            )));
        }

        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .cookie_provider(jar.clone())
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { http, jar, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Seed a cookie for the server, e.g. a session copied from a browser.
    pub fn set_cookie(&self, name: &str, value: &str) {
        self.jar
            .add_cookie_str(&format!("{name}={value}; Path=/"), &self.base);
    }

    /// Current value of the CSRF cookie, if the jar holds one.
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        let header = header.to_str().ok()?;
        csrf::cookie_value(header, CSRF_COOKIE)
    }

    /// Load the index page so the server can hand out a CSRF cookie.
    pub async fn prime_csrf(&self) -> Result<(), ClientError> {
        let url = self.endpoint(&[""], None);
        debug!(%url, "priming csrf cookie");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }
        if self.csrf_token().is_none() {
            warn!("server did not set a {CSRF_COOKIE} cookie");
        }
        Ok(())
    }

    fn endpoint(&self, segments: &[&str], page: Option<u32>) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(segments);
        }
        if let Some(page) = page {
            url.query_pairs_mut()
                .append_pair("page", &page.to_string());
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// POST with the CSRF header attached.
    fn post(&self, url: Url) -> RequestBuilder {
        debug!(%url, "POST");
        let request = self.http.post(url);
        match self.csrf_token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => {
                warn!("no {CSRF_COOKIE} cookie; sending request without {CSRF_HEADER}");
                request
            }
        }
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            let mut body = body;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(format!("{url}: {e}")))
    }

    fn reject_error_payload(response: MessageResponse) -> Result<MessageResponse, ClientError> {
        match response.error {
            Some(error) => Err(ClientError::Api(error)),
            None => Ok(response),
        }
    }
}

impl NetworkApi for NetworkClient {
    async fn list_posts(&self, page: u32) -> Result<PostPage, ClientError> {
        self.get_json(self.endpoint(&["posts"], Some(page))).await
    }

    async fn following_posts(&self, page: u32) -> Result<PostPage, ClientError> {
        self.get_json(self.endpoint(&["following"], Some(page))).await
    }

    async fn get_profile(&self, username: &str, page: u32) -> Result<Profile, ClientError> {
        let mut profile: Profile = self
            .get_json(self.endpoint(&["profile", username], Some(page)))
            .await?;
        profile.fill_authors();
        Ok(profile)
    }

    async fn create_post(&self, content: &str) -> Result<Post, ClientError> {
        let request = self
            .post(self.endpoint(&["posts"], None))
            .json(&NewPost { content });
        Self::send_json(request).await
    }

    async fn toggle_follow(&self, username: &str) -> Result<MessageResponse, ClientError> {
        let request = self.post(self.endpoint(&["follow", username], None));
        Self::send_json(request)
            .await
            .and_then(Self::reject_error_payload)
    }

    async fn like(&self, post_id: u64, liked: bool) -> Result<LikeResponse, ClientError> {
        let id = post_id.to_string();
        let request = self
            .post(self.endpoint(&["like", &id], None))
            .json(&LikeRequest { liked });
        Self::send_json(request).await
    }

    async fn edit_post(
        &self,
        post_id: u64,
        content: &str,
    ) -> Result<MessageResponse, ClientError> {
        let id = post_id.to_string();
        let request = self
            .post(self.endpoint(&["edit_post", &id, ""], None))
            .form(&[("content", content)]);
        Self::send_json(request)
            .await
            .and_then(Self::reject_error_payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::sync::mpsc;
    use std::thread;

    #[derive(Debug)]
    struct Captured {
        method: String,
        url: String,
        csrf: Option<String>,
        content_type: Option<String>,
        body: String,
    }

    /// Serve `replies` in order on a local port, reporting each request.
    fn stub_server(replies: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Captured>) {
        stub_server_with_cookies(
            replies
                .into_iter()
                .map(|(status, body)| (status, body, None))
                .collect(),
        )
    }

    /// Like [`stub_server`], optionally answering with a `Set-Cookie` header.
    fn stub_server_with_cookies(
        replies: Vec<(u16, &'static str, Option<&'static str>)>,
    ) -> (String, mpsc::Receiver<Captured>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for (status, body, set_cookie) in replies {
                let Ok(mut request) = server.recv() else {
                    return;
                };
                let header = |name: &'static str| {
                    request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv(name))
                        .map(|h| h.value.as_str().to_string())
                };
                let csrf = header("X-CSRFToken");
                let content_type = header("Content-Type");
                let mut text = String::new();
                request.as_reader().read_to_string(&mut text).unwrap();
                let _ = tx.send(Captured {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    csrf,
                    content_type,
                    body: text,
                });
                let json_header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .unwrap();
                let mut response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(json_header);
                if let Some(cookie) = set_cookie {
                    let header =
                        tiny_http::Header::from_bytes(&b"Set-Cookie"[..], cookie.as_bytes())
                            .unwrap();
                    response.add_header(header);
                }
                let _ = request.respond(response);
            }
        });

        (format!("http://127.0.0.1:{port}"), rx)
    }

    fn client(base: &str) -> NetworkClient {
        NetworkClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_rejects_non_http_base() {
        assert!(matches!(
            NetworkClient::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(ClientError::InvalidInput(_))
        ));
        assert!(NetworkClient::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_endpoint_encodes_username_and_page() {
        let client = client("http://localhost:8000/");
        let url = client.endpoint(&["profile", "al ice"], Some(2));
        assert_eq!(url.as_str(), "http://localhost:8000/profile/al%20ice?page=2");
        let url = client.endpoint(&["edit_post", "9", ""], None);
        assert_eq!(url.path(), "/edit_post/9/");
    }

    #[test]
    fn test_csrf_token_from_jar() {
        let client = client("http://localhost:8000");
        assert_eq!(client.csrf_token(), None);
        client.set_cookie("csrftoken", "abc123");
        assert_eq!(client.csrf_token().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_list_posts_sends_page_query() {
        let (base, rx) = stub_server(vec![(
            200,
            r#"{"posts": [], "has_previous": true, "has_next": false, "current_page": 3}"#,
        )]);
        let page = client(&base).list_posts(3).await.unwrap();
        assert_eq!(page.current_page, 3);
        assert!(page.has_previous);

        let seen = rx.recv().unwrap();
        assert_eq!(seen.method, "GET");
        assert_eq!(seen.url, "/posts?page=3");
    }

    #[tokio::test]
    async fn test_like_sends_csrf_and_json_body() {
        let (base, rx) = stub_server(vec![(200, r#"{"message": "Like added.", "like_count": 3}"#)]);
        let client = client(&base);
        client.set_cookie("csrftoken", "tok");

        let response = client.like(5, true).await.unwrap();
        assert_eq!(response.like_count, Some(3));

        let seen = rx.recv().unwrap();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.url, "/like/5");
        assert_eq!(seen.csrf.as_deref(), Some("tok"));
        let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(body, serde_json::json!({"liked": true}));
    }

    #[tokio::test]
    async fn test_edit_post_is_form_encoded() {
        let (base, rx) = stub_server(vec![(200, r#"{"message": "Post updated."}"#)]);
        let client = client(&base);
        client.set_cookie("csrftoken", "tok");

        client.edit_post(9, "new text & more").await.unwrap();

        let seen = rx.recv().unwrap();
        assert_eq!(seen.url, "/edit_post/9/");
        assert_eq!(
            seen.content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(seen.body, "content=new+text+%26+more");
    }

    #[tokio::test]
    async fn test_prime_csrf_stores_server_cookie() {
        let (base, rx) = stub_server_with_cookies(vec![
            (200, "<html></html>", Some("csrftoken=abc; Path=/")),
            (200, r#"{"message": "Like added."}"#, None),
        ]);
        let client = client(&base);

        client.prime_csrf().await.unwrap();
        assert_eq!(client.csrf_token().as_deref(), Some("abc"));
        client.like(1, true).await.unwrap();

        let index = rx.recv().unwrap();
        assert_eq!(index.method, "GET");
        assert_eq!(index.url, "/");
        let like = rx.recv().unwrap();
        assert_eq!(like.url, "/like/1");
        assert_eq!(like.csrf.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_prime_csrf_without_cookie() {
        let (base, rx) = stub_server(vec![
            (200, "<html></html>"),
            (200, r#"{"message": "Like added."}"#),
        ]);
        let client = client(&base);

        client.prime_csrf().await.unwrap();
        assert_eq!(client.csrf_token(), None);
        client.like(1, true).await.unwrap();

        rx.recv().unwrap();
        assert_eq!(rx.recv().unwrap().csrf, None);
    }

    #[tokio::test]
    async fn test_prime_csrf_error_status() {
        let (base, _rx) = stub_server(vec![(503, "down")]);
        let err = client(&base).prime_csrf().await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_follow_without_token_still_sends() {
        let (base, rx) = stub_server(vec![(201, r#"{"message": "Followed successfully."}"#)]);
        let response = client(&base).toggle_follow("bob").await.unwrap();
        assert_eq!(response.message.as_deref(), Some("Followed successfully."));

        let seen = rx.recv().unwrap();
        assert_eq!(seen.url, "/follow/bob");
        assert_eq!(seen.csrf, None);
        assert!(seen.body.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_and_payload() {
        let (base, _rx) = stub_server(vec![
            (404, r#"{"error": "User not found."}"#),
            (200, r#"{"error": "Not your post."}"#),
        ]);
        let client = client(&base);

        let err = client.get_profile("ghost", 1).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));

        let err = client.edit_post(1, "x").await.unwrap_err();
        assert_eq!(err, ClientError::Api("Not your post.".to_string()));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let (base, _rx) = stub_server(vec![(200, "<html>login</html>")]);
        let err = client(&base).following_posts(1).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = client(&format!("http://127.0.0.1:{port}"))
            .list_posts(1)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
