//! JSONPlaceholder Example
//!
//! Demonstrates the typed request client against a public fake REST API.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use izzi::prelude::*;

// ============================================================================
// Data Types
// ============================================================================

/// A blog post. The API sends `userId`, which is already camelCase, so the
/// conversion leaves it alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

/// Payload to create or replace a post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

// ============================================================================
// API wrapper
// ============================================================================

/// Thin wrapper binding a base URL to a [`Client`].
#[derive(Debug, Clone)]
pub struct PostsApi {
    client: Client,
    base_url: String,
}

impl PostsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .with_logging()
                .build(),
            base_url: base_url.into(),
        }
    }

    /// Get a post, cached for five minutes.
    pub async fn post(&self, id: u64) -> izzi::Result<Post> {
        self.client
            .get_cached(
                &format!("{}/posts/{id}", self.base_url),
                Duration::from_secs(300),
            )
            .await
    }

    /// Create a post.
    pub async fn create(&self, post: NewPost) -> izzi::Result<Post> {
        self.client
            .post(&format!("{}/posts", self.base_url), Body::Structured(post))
            .await
    }

    /// Delete a post.
    pub async fn delete(&self, id: u64) -> izzi::Result<()> {
        let _: serde::de::IgnoredAny = self
            .client
            .delete(&format!("{}/posts/{id}", self.base_url))
            .await?;
        Ok(())
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> izzi::Result<()> {
    let api = PostsApi::new("https://jsonplaceholder.typicode.com");

    println!("=== Get post 1 ===");
    let post = api.post(1).await?;
    println!("{post:#?}");

    println!("\n=== Get post 1 again (served from cache) ===");
    let cached = api.post(1).await?;
    println!("same post: {}", cached == post);

    println!("\n=== Create a post ===");
    let created = api
        .create(NewPost {
            user_id: 1,
            title: "izzi".to_string(),
            body: "typed requests".to_string(),
        })
        .await?;
    println!("created post #{}", created.id);

    println!("\n=== Missing post ===");
    match api.post(100_000).await {
        Err(err) => println!("{err}"),
        Ok(post) => println!("unexpected: {post:?}"),
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
