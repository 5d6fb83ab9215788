//! # Form Identities and Payloads
//!
//! Every submittable form has a [`FormId`]. Field values arrive as
//! [`FormFields`], the equivalent of browser form data, and are lifted into
//! the typed inputs below before validation.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::view::ListRegion;

/// Field names shared by the forms
pub mod field {
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const USERNAME_OR_EMAIL: &str = "usernameOrEmail";
    pub const TITLE: &str = "title";
    pub const CONTENT: &str = "content";
    pub const POST_ID: &str = "postId";
    pub const COMMENTER_NAME: &str = "commenterName";
    pub const COMMENT_TEXT: &str = "commentText";
    pub const COMMENT_ID: &str = "commentId";
}

/// Logical identity of a form (or list action)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormId {
    Register,
    Login,
    CreatePost,
    UpdatePost,
    DeletePost,
    CreateComment,
    UpdateComment,
    DeleteComment,
    ListPosts,
    ListComments,
    ShowPost,
    ShowComment,
}

impl FormId {
    /// All form identities, in declaration order
    pub const ALL: [FormId; 12] = [
        FormId::Register,
        FormId::Login,
        FormId::CreatePost,
        FormId::UpdatePost,
        FormId::DeletePost,
        FormId::CreateComment,
        FormId::UpdateComment,
        FormId::DeleteComment,
        FormId::ListPosts,
        FormId::ListComments,
        FormId::ShowPost,
        FormId::ShowComment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormId::Register => "register",
            FormId::Login => "login",
            FormId::CreatePost => "create-post",
            FormId::UpdatePost => "update-post",
            FormId::DeletePost => "delete-post",
            FormId::CreateComment => "create-comment",
            FormId::UpdateComment => "update-comment",
            FormId::DeleteComment => "delete-comment",
            FormId::ListPosts => "list-posts",
            FormId::ListComments => "list-comments",
            FormId::ShowPost => "show-post",
            FormId::ShowComment => "show-comment",
        }
    }

    /// Region a fetch action renders into, or `None` for write forms
    /// that answer with a notification.
    pub fn list_region(&self) -> Option<ListRegion> {
        match self {
            FormId::ListPosts | FormId::ShowPost => Some(ListRegion::Posts),
            FormId::ListComments | FormId::ShowComment => Some(ListRegion::Comments),
            _ => None,
        }
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form '{0}'")]
pub struct UnknownForm(pub String);

impl FromStr for FormId {
    type Err = UnknownForm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormId::ALL
            .into_iter()
            .find(|form| form.as_str() == s)
            .ok_or_else(|| UnknownForm(s.to_string()))
    }
}

/// Submitted field values keyed by field name
///
/// A field that was never filled in reads as the empty string, the same
/// way an untouched input reads in a browser form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> &str {
        self.get_opt(name).unwrap_or("")
    }

    pub fn get_opt(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Registration credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            username: fields.get(field::USERNAME).to_string(),
            email: fields.get(field::EMAIL).to_string(),
            password: fields.get(field::PASSWORD).to_string(),
        }
    }
}

/// Login credentials; the identifier may be a username or an email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub username_or_email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            username_or_email: fields.get(field::USERNAME_OR_EMAIL).to_string(),
            password: fields.get(field::PASSWORD).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostInput {
    pub title: String,
    pub content: String,
    /// Target of an update or delete
    pub post_id: Option<String>,
}

impl BlogPostInput {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            title: fields.get(field::TITLE).to_string(),
            content: fields.get(field::CONTENT).to_string(),
            post_id: fields.get_opt(field::POST_ID).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentInput {
    pub commenter_name: String,
    pub comment_text: String,
    pub post_id: String,
    /// Target of an update or delete
    pub comment_id: Option<String>,
}

impl CommentInput {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            commenter_name: fields.get(field::COMMENTER_NAME).to_string(),
            comment_text: fields.get(field::COMMENT_TEXT).to_string(),
            post_id: fields.get(field::POST_ID).to_string(),
            comment_id: fields.get_opt(field::COMMENT_ID).map(str::to_string),
        }
    }
}
