//! Client for the remote posts API
//!
//! Reads degrade gracefully: listing returns an empty list and a single
//! fetch returns `None` when anything goes wrong. Mutations hand their
//! errors back to the caller, except [`BlogApi::delete_post`] which reports
//! success as a boolean.

mod error;
mod transport;

use std::sync::Arc;

pub use error::ApiError;
pub use transport::{HttpTransport, Method, Transport, MAX_RESPONSE_SIZE};

use crate::config::ApiConfig;
use crate::content::{NewPost, Post, PostUpdate};
use crate::helpers::url::encode_segment;

/// Posts API client
#[derive(Clone)]
pub struct BlogApi {
    transport: Arc<dyn Transport>,
}

impl BlogApi {
    /// Create a client talking HTTP to the configured API
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new(
            &config.base_url,
            config.timeout(),
        )))
    }

    /// Create a client over any transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch all posts, propagating failures
    pub fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        let body = self.transport.send(Method::Get, "/posts", None)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch all posts; any failure is logged and yields an empty list
    pub fn list_posts(&self) -> Vec<Post> {
        match self.fetch_posts() {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("Failed to fetch post list: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch one post, propagating failures
    pub fn fetch_post(&self, id: &str) -> Result<Post, ApiError> {
        let body = self.transport.send(Method::Get, &post_path(id), None)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch one post; absence and failures both yield `None`
    pub fn get_post(&self, id: &str) -> Option<Post> {
        match self.fetch_post(id) {
            Ok(post) => Some(post),
            Err(ApiError::NotFound) => {
                tracing::debug!("Post {} not found", id);
                None
            }
            Err(e) => {
                tracing::error!("Failed to fetch post {}: {}", id, e);
                None
            }
        }
    }

    /// Create a post
    pub fn create_post(&self, post: &NewPost) -> Result<Post, ApiError> {
        let body = serde_json::to_string(post)?;
        let response = self
            .transport
            .send(Method::Post, "/posts", Some(body))
            .inspect_err(|e| tracing::error!("Failed to create post: {}", e))?;
        let created: Post = serde_json::from_str(&response)?;
        tracing::info!("Created post {} ({})", created.id, created.title);
        Ok(created)
    }

    /// Update the given fields of a post
    pub fn update_post(&self, id: &str, update: &PostUpdate) -> Result<Post, ApiError> {
        let body = serde_json::to_string(update)?;
        let response = self
            .transport
            .send(Method::Put, &post_path(id), Some(body))
            .inspect_err(|e| tracing::error!("Failed to update post {}: {}", id, e))?;
        let updated: Post = serde_json::from_str(&response)?;
        tracing::info!("Updated post {}", updated.id);
        Ok(updated)
    }

    /// Delete a post, propagating failures
    pub fn try_delete_post(&self, id: &str) -> Result<(), ApiError> {
        self.transport.send(Method::Delete, &post_path(id), None)?;
        tracing::info!("Deleted post {}", id);
        Ok(())
    }

    /// Delete a post; returns whether the API accepted the deletion
    pub fn delete_post(&self, id: &str) -> bool {
        match self.try_delete_post(id) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to delete post {}: {}", id, e);
                false
            }
        }
    }
}

fn post_path(id: &str) -> String {
    format!("/posts/{}", encode_segment(id))
}


#[cfg(test)]
mod tests {
    use super::mock::{post_json, posts_json, MockTransport, Reply};
    use super::*;

    fn api(transport: MockTransport) -> (BlogApi, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        (BlogApi::with_transport(transport.clone()), transport)
    }

    #[test]
    fn test_list_posts_keeps_order() {
        let body = posts_json(&[
            post_json(3, "third", true),
            post_json(1, "first", false),
            post_json(2, "second", true),
        ]);
        let (api, _) = api(MockTransport::new().reply(Method::Get, "/posts", Reply::Body(body)));
        let titles: Vec<_> = api.list_posts().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_list_posts_fails_soft() {
        for reply in [
            Reply::Body("not json".to_string()),
            Reply::Body(r#"{"posts": []}"#.to_string()),
            Reply::Body(r#"[{"id": 1}]"#.to_string()),
            Reply::Status(500),
            Reply::Status(404),
            Reply::Timeout,
        ] {
            let (api, _) = api(MockTransport::new().reply(Method::Get, "/posts", reply.clone()));
            assert!(api.list_posts().is_empty(), "{:?}", reply);
            assert!(api.fetch_posts().is_err(), "{:?}", reply);
        }
    }

    #[test]
    fn test_get_post_missing_is_none() {
        let (api, _) = api(MockTransport::new());
        assert!(api.get_post("missing-id").is_none());
        assert!(api.fetch_post("missing-id").unwrap_err().is_not_found());
    }

    #[test]
    fn test_get_post_failure_is_none() {
        let (api, _) =
            api(MockTransport::new().reply(Method::Get, "/posts/7", Reply::Status(503)));
        assert!(api.get_post("7").is_none());
    }

    #[test]
    fn test_get_post() {
        let (api, _) = api(MockTransport::new().reply(
            Method::Get,
            "/posts/7",
            Reply::Body(post_json(7, "seven", false)),
        ));
        let post = api.get_post("7").unwrap();
        assert_eq!(post.title, "seven");
        assert!(!post.published);
    }

    #[test]
    fn test_ids_are_encoded_in_paths() {
        let (api, transport) = api(MockTransport::new());
        api.get_post("../admin");
        assert_eq!(transport.requests()[0].path, "/posts/%2E%2E%2Fadmin");
    }

    #[test]
    fn test_create_post_sends_body() {
        let (api, transport) = api(MockTransport::new().reply(
            Method::Post,
            "/posts",
            Reply::Body(post_json(9, "new", true)),
        ));
        let post = NewPost {
            title: "new".to_string(),
            content: "body".to_string(),
            tags: Some(vec!["rust".to_string()]),
            published: Some(true),
            ..Default::default()
        };
        let created = api.create_post(&post).unwrap();
        assert_eq!(created.id.as_str(), "9");

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Post);
        let json: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": "new", "content": "body", "tags": ["rust"], "published": true })
        );
    }

    #[test]
    fn test_create_post_propagates_failure() {
        let (api, _) =
            api(MockTransport::new().reply(Method::Post, "/posts", Reply::Status(500)));
        let err = api.create_post(&NewPost::default()).unwrap_err();
        assert!(matches!(err, ApiError::Status(500)));
    }

    #[test]
    fn test_update_post() {
        let (api, transport) = api(
            MockTransport::new()
                .reply(Method::Put, "/posts/4", Reply::Body(post_json(4, "edited", true)))
                .reply(Method::Put, "/posts/5", Reply::Timeout),
        );
        let update = PostUpdate {
            title: Some("edited".to_string()),
            ..Default::default()
        };
        assert_eq!(api.update_post("4", &update).unwrap().title, "edited");
        assert_eq!(
            transport.requests()[0].body.as_deref(),
            Some(r#"{"title":"edited"}"#)
        );
        assert!(matches!(
            api.update_post("5", &update),
            Err(ApiError::Timeout)
        ));
    }

    #[test]
    fn test_delete_post() {
        let (api, _) = api(
            MockTransport::new()
                .reply(Method::Delete, "/posts/1", Reply::Body(String::new()))
                .reply(Method::Delete, "/posts/2", Reply::Status(500)),
        );
        assert!(api.delete_post("1"));
        assert!(!api.delete_post("2"));
        assert!(!api.delete_post("3"));
        assert!(api.try_delete_post("2").is_err());
    }
}
