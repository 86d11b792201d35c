//! JSON-LD `@context` handling for NGSI-LD payloads.

use serde_json::Map;
use serde_json::Value;
use std::str::FromStr;

const AT_CONTEXT: &str = "@context";

#[derive(thiserror::Error, Debug)]
pub enum AtContextError {
    #[error("data not json")]
    NotJson(#[source] serde_json::Error),

    #[error("@context: {0}: not a context url nor json")]
    InvalidContext(String),

    #[error("failed to encode entities: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A JSON-LD `@context`: either the URL of a remote context or an inline JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum AtContext {
    Url(String),
    Inline(Value),
}

impl FromStr for AtContext {
    type Err = AtContextError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.starts_with("http://") || text.starts_with("https://") {
            return Ok(AtContext::Url(text.to_string()));
        }
        serde_json::from_str(text)
            .map(AtContext::Inline)
            .map_err(|_| AtContextError::InvalidContext(text.to_string()))
    }
}

impl From<&AtContext> for Value {
    fn from(context: &AtContext) -> Self {
        match context {
            AtContext::Url(url) => Value::String(url.clone()),
            AtContext::Inline(json) => json.clone(),
        }
    }
}

/// Set the `@context` of an entity or of each entity of an array.
///
/// The `@context` is placed first, replacing any existing one.
pub fn insert_at_context(payload: &[u8], context: &AtContext) -> Result<Vec<u8>, AtContextError> {
    let json: Value = serde_json::from_slice(payload).map_err(AtContextError::NotJson)?;
    let json = match json {
        Value::Array(entities) => Value::Array(
            entities
                .into_iter()
                .map(|entity| with_context(entity, context))
                .collect(),
        ),
        entity => with_context(entity, context),
    };
    serde_json::to_vec(&json).map_err(AtContextError::Encode)
}

fn with_context(entity: Value, context: &AtContext) -> Value {
    let Value::Object(members) = entity else {
        return entity;
    };
    let mut entity = Map::with_capacity(members.len() + 1);
    entity.insert(AT_CONTEXT.to_string(), context.into());
    for (key, value) in members {
        if key != AT_CONTEXT {
            entity.insert(key, value);
        }
    }
    Value::Object(entity)
}
