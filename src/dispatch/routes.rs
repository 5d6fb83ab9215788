//! # Routes
//!
//! Maps each validated form input to the method, path and JSON body the
//! backend expects.
//!
//! Two wire dialects exist. `Legacy` reproduces the browser page the
//! backend was first paired with, including its quirks: login sends
//! `usernameOrEmail`, post deletion targets `/posts/{id}`, and comment
//! creation uses camelCase keys while comment update uses snake_case.
//! `Canonical` follows the routes the backend actually serves.

use reqwest::Method;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use super::forms::{BlogPostInput, CommentInput, Credentials, LoginCredentials};

pub const REGISTER: &str = "register";
pub const LOGIN: &str = "login";
pub const BLOG_POSTS: &str = "blog_posts";
pub const LEGACY_POSTS: &str = "posts";
pub const COMMENTS: &str = "comments";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiDialect {
    #[default]
    Legacy,
    Canonical,
}

impl fmt::Display for ApiDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiDialect::Legacy => f.write_str("legacy"),
            ApiDialect::Canonical => f.write_str("canonical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown API dialect '{0}', expected 'legacy' or 'canonical'")]
pub struct UnknownDialect(pub String);

impl FromStr for ApiDialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(ApiDialect::Legacy),
            "canonical" => Ok(ApiDialect::Canonical),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// A fully prepared request, relative to the profile's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Raw path segments; identifiers are kept verbatim and encoded on send
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Path for display and logging, e.g. `/blog_posts/42`
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path())
    }
}

pub fn register(credentials: &Credentials) -> ApiRequest {
    ApiRequest::new(Method::POST, &[REGISTER]).with_body(json!({
        "username": credentials.username,
        "email": credentials.email,
        "password": credentials.password,
    }))
}

pub fn login(credentials: &LoginCredentials, dialect: ApiDialect) -> ApiRequest {
    let body = match dialect {
        ApiDialect::Legacy => json!({
            "usernameOrEmail": credentials.username_or_email,
            "password": credentials.password,
        }),
        ApiDialect::Canonical => json!({
            "username": credentials.username_or_email,
            "password": credentials.password,
        }),
    };
    ApiRequest::new(Method::POST, &[LOGIN]).with_body(body)
}

pub fn create_post(input: &BlogPostInput) -> ApiRequest {
    ApiRequest::new(Method::POST, &[BLOG_POSTS]).with_body(post_body(input))
}

pub fn update_post(input: &BlogPostInput, post_id: &str) -> ApiRequest {
    ApiRequest::new(Method::PUT, &[BLOG_POSTS, post_id]).with_body(post_body(input))
}

pub fn delete_post(post_id: &str, dialect: ApiDialect) -> ApiRequest {
    let collection = match dialect {
        ApiDialect::Legacy => LEGACY_POSTS,
        ApiDialect::Canonical => BLOG_POSTS,
    };
    ApiRequest::new(Method::DELETE, &[collection, post_id])
}

pub fn list_posts() -> ApiRequest {
    ApiRequest::new(Method::GET, &[BLOG_POSTS])
}

pub fn show_post(post_id: &str) -> ApiRequest {
    ApiRequest::new(Method::GET, &[BLOG_POSTS, post_id])
}

pub fn create_comment(input: &CommentInput, dialect: ApiDialect) -> ApiRequest {
    let body = match dialect {
        ApiDialect::Legacy => json!({
            "commenterName": input.commenter_name,
            "commentText": input.comment_text,
            "postId": input.post_id,
        }),
        ApiDialect::Canonical => snake_case_comment_body(input),
    };
    ApiRequest::new(Method::POST, &[COMMENTS]).with_body(body)
}

pub fn update_comment(input: &CommentInput, comment_id: &str) -> ApiRequest {
    ApiRequest::new(Method::PUT, &[COMMENTS, comment_id]).with_body(snake_case_comment_body(input))
}

pub fn delete_comment(comment_id: &str) -> ApiRequest {
    ApiRequest::new(Method::DELETE, &[COMMENTS, comment_id])
}

pub fn list_comments() -> ApiRequest {
    ApiRequest::new(Method::GET, &[COMMENTS])
}

pub fn show_comment(comment_id: &str) -> ApiRequest {
    ApiRequest::new(Method::GET, &[COMMENTS, comment_id])
}

fn post_body(input: &BlogPostInput) -> Value {
    json!({
        "title": input.title,
        "content": input.content,
    })
}

fn snake_case_comment_body(input: &CommentInput) -> Value {
    json!({
        "commenter_name": input.commenter_name,
        "comment_text": input.comment_text,
        "blog_post_id": input.post_id,
    })
}
