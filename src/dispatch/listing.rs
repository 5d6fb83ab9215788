//! # Listing
//!
//! Decodes fetched posts and comments and renders each as one line of
//! text for a list region.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

use super::view::ListRegion;

/// Entity identifier as the backend serialises it
///
/// Accepts a plain string, a number, or a Mongo extended-JSON object
/// (`{"$oid": "..."}`). A missing or null identifier is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Value> for EntityId {
    fn from(value: &Value) -> Self {
        let text = match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Object(map) => match map.get("$oid") {
                Some(Value::String(oid)) => oid.clone(),
                _ => value.to_string(),
            },
            other => other.to_string(),
        };
        EntityId(text)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(EntityId::from(&value))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostSummary {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl fmt::Display for PostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Content: {}",
            self.id, self.title, self.content
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommentSummary {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub commenter_name: String,
    #[serde(default)]
    pub comment_text: String,
    #[serde(default)]
    pub blog_post_id: EntityId,
}

impl fmt::Display for CommentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Text: {}, Post ID: {}",
            self.id, self.commenter_name, self.comment_text, self.blog_post_id
        )
    }
}

/// Decode a collection; anything but a JSON array is rejected
fn decode_many<'a, T: Deserialize<'a>>(body: &'a Value) -> Result<Vec<T>, serde_json::Error> {
    match body {
        Value::Array(_) => Vec::<T>::deserialize(body),
        other => Err(serde_json::Error::custom(format!(
            "expected an array of entities, found {}",
            kind_of(other)
        ))),
    }
}

/// Decode exactly one entity; anything but a JSON object is rejected
fn decode_one<'a, T: Deserialize<'a>>(body: &'a Value) -> Result<T, serde_json::Error> {
    match body {
        Value::Object(_) => T::deserialize(body),
        other => Err(serde_json::Error::custom(format!(
            "expected a single entity, found {}",
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn decode_posts(body: &Value) -> Result<Vec<PostSummary>, serde_json::Error> {
    decode_many(body)
}

pub fn decode_comments(body: &Value) -> Result<Vec<CommentSummary>, serde_json::Error> {
    decode_many(body)
}

/// Render a fetched collection as the lines shown in `region`
pub fn render_lines(region: ListRegion, body: &Value) -> Result<Vec<String>, serde_json::Error> {
    let lines: Vec<String> = match region {
        ListRegion::Posts => decode_posts(body)?.iter().map(ToString::to_string).collect(),
        ListRegion::Comments => decode_comments(body)?
            .iter()
            .map(ToString::to_string)
            .collect(),
    };
    Ok(lines)
}

/// Render a single fetched entity as the one line shown in `region`
pub fn render_entity(region: ListRegion, body: &Value) -> Result<String, serde_json::Error> {
    let line = match region {
        ListRegion::Posts => decode_one::<PostSummary>(body)?.to_string(),
        ListRegion::Comments => decode_one::<CommentSummary>(body)?.to_string(),
    };
    Ok(line)
}
