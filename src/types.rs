use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// A parsed query context: addon invocation arguments keyed by name
pub type QueryMap = BTreeMap<String, QueryValue>;

/// Flat string arguments for a callback URL
pub type CallbackArgs = BTreeMap<String, String>;

/// A value in a query mapping
///
/// Queries nest exactly one level deep: a value is a scalar string, an
/// ordered sequence of strings, or a string-to-string map. Anything deeper
/// cannot be represented in the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Str(String),
    Seq(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl QueryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[String]> {
        match self {
            QueryValue::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            QueryValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(items: Vec<String>) -> Self {
        QueryValue::Seq(items)
    }
}

impl From<BTreeMap<String, String>> for QueryValue {
    fn from(map: BTreeMap<String, String>) -> Self {
        QueryValue::Map(map)
    }
}

/// One saved favorite, as persisted in the store
///
/// `callback` is the mode replayed when the favorite is activated; the
/// special value `"play"` marks a directly playable item. For directory
/// favorites `queries` holds the base64url-encoded query string to replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub callback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fanart: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries: Option<String>,
}

impl FavoriteRecord {
    /// Build a record from the current query context.
    ///
    /// Only string-valued fields are read. A missing title is an error;
    /// every other field falls back to absent or empty.
    pub fn from_query_context(ctx: &QueryMap) -> Result<Self> {
        let field = |key: &str| ctx.get(key).and_then(QueryValue::as_str).map(str::to_string);
        let title = field("title").ok_or(Error::MissingField("title"))?;
        Ok(FavoriteRecord {
            title,
            url: field("url"),
            callback: field("callback").unwrap_or_default(),
            item_type: field("item_type"),
            image: field("image"),
            fanart: field("fanart"),
            category: field("category").unwrap_or_default(),
            queries: field("queries"),
        })
    }
}

/// A replayed directory favorite: the decoded queries to navigate into
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub title: String,
    pub queries: QueryMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fanart: Option<String>,
    pub context_menu: Vec<(String, String)>,
}

/// A replayed playable favorite: resolves straight to a media URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayableItem {
    pub title: String,
    pub url: String,
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fanart: Option<String>,
    pub context_menu: Vec<(String, String)>,
}

/// One entry in a replayed favorites listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingEntry {
    Directory(DirectoryEntry),
    Playable(PlayableItem),
}
