//! Decoding of LLM responses.
//!
//! Models wrap JSON in markdown fences and alternate between a named wrapper
//! object and a bare array, so every list parser goes through one routine:
//! strip fences, try `{"<key>": [...]}`, then try `[...]`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClusterItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub signal_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EpicResponse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriorityItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DependencyItem {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(rename = "type", default)]
    pub dep_type: String,
    #[serde(default)]
    pub confidence: f64,
}

pub fn parse_cluster_response(content: &str) -> Result<Vec<ClusterItem>, ParseError> {
    parse_list(content, "clusters", false)
}

pub fn parse_priority_response(content: &str) -> Result<Vec<PriorityItem>, ParseError> {
    parse_list(content, "priorities", false)
}

/// An empty `{"dependencies": []}` is a valid answer: nothing depends on anything.
pub fn parse_dependency_response(content: &str) -> Result<Vec<DependencyItem>, ParseError> {
    parse_list(content, "dependencies", true)
}

/// Epic responses are a single object; there is no array form.
pub fn parse_epic_response(content: &str) -> Result<EpicResponse, ParseError> {
    let body = strip_code_fence(content);
    let epic: EpicResponse = serde_json::from_str(&body)
        .map_err(|e| ParseError::new(format!("invalid epic JSON: {e}"), content))?;
    if epic.title.trim().is_empty() {
        return Err(ParseError::new("epic response has no title", content));
    }
    Ok(epic)
}

/// Decode a list of `T` either from `{"<key>": [...]}` or from a bare array.
///
/// An object without `key` is a failure. An explicitly empty list is a
/// failure unless `allow_empty` is set.
fn parse_list<T: DeserializeOwned>(
    content: &str,
    key: &str,
    allow_empty: bool,
) -> Result<Vec<T>, ParseError> {
    let body = strip_code_fence(content);
    let value: Value = serde_json::from_str(&body)
        .map_err(|e| ParseError::new(format!("invalid {key} JSON: {e}"), content))?;

    let items: Vec<T> = match value {
        Value::Object(mut map) => match map.remove(key) {
            Some(list) => serde_json::from_value(list)
                .map_err(|e| ParseError::new(format!("malformed {key} list: {e}"), content))?,
            None => {
                return Err(ParseError::new(
                    format!("response object has no \"{key}\" list"),
                    content,
                ))
            }
        },
        Value::Array(_) => serde_json::from_value(value)
            .map_err(|e| ParseError::new(format!("malformed {key} array: {e}"), content))?,
        _ => {
            return Err(ParseError::new(
                format!("expected a {key} object or array"),
                content,
            ))
        }
    };

    if items.is_empty() && !allow_empty {
        return Err(ParseError::new(format!("no {key} in response"), content));
    }
    Ok(items)
}

/// Trim `content` and, if it is wrapped in a triple-backtick fence, keep only
/// the lines between the fences. The language tag is ignored.
pub fn strip_code_fence(content: &str) -> String {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().skip(1).collect();
    if lines
        .last()
        .is_some_and(|l| l.trim_start().starts_with("```"))
    {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}
