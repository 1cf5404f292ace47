//! Social feed posts.

use super::POSTS;
use crate::client::EncoreClient;
use crate::error::{ClientError, Result};
use crate::rest::Query;
use crate::types::Fetched;
use encore_core::{NewPost, Post, PostId, UserId};
use tracing::info;

/// Post client.
pub struct PostsApi<'a> {
    client: &'a EncoreClient,
}

impl<'a> PostsApi<'a> {
    pub(crate) fn new(client: &'a EncoreClient) -> Self {
        Self { client }
    }

    /// Latest posts from everyone.
    pub async fn feed(&self, limit: usize) -> Result<Fetched<Vec<Post>>> {
        let query = Query::new()
            .select("*")
            .order("created_at", true)
            .limit(limit);
        self.client.select_cached(POSTS, &query).await
    }

    pub async fn by_author(&self, author_id: &UserId) -> Result<Fetched<Vec<Post>>> {
        let query = Query::new()
            .select("*")
            .eq("author_id", author_id)
            .order("created_at", true);
        self.client.select_cached(POSTS, &query).await
    }

    /// Publish a post. Invalid posts are rejected before any request.
    pub async fn create(&self, post: &NewPost) -> Result<Post> {
        post.validate()?;
        let created: Post = self.client.insert(POSTS, post).await?;
        info!(post_id = %created.id, author_id = %created.author_id, "Post created");
        Ok(created)
    }

    /// Delete a post. Row-level security limits this to the author.
    pub async fn delete(&self, post_id: &PostId) -> Result<()> {
        let query = Query::new().eq("id", post_id);
        let removed = self.client.delete(POSTS, &query).await?;

        if removed == 0 {
            return Err(ClientError::not_found("Post", post_id.as_str()));
        }
        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }
}
