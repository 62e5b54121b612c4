//! Invocation-side helpers: query-string parsing and callback URLs
//!
//! The host calls the addon with a base URL and a query string; everything
//! the invocation needs travels in that query. [`parse_query`] turns the raw
//! string into a [`QueryMap`] and [`build_invoke_url`] goes the other way
//! for flat callback arguments.
//!
//! # Example
//!
//! ```rust
//! use favkit::{parse_query, QueryValue};
//!
//! let ctx = parse_query("?title=Test+Movie&category=movies");
//! assert_eq!(ctx["title"], QueryValue::from("Test Movie"));
//! // invocations without an explicit mode land on the main listing
//! assert_eq!(ctx["mode"], QueryValue::from("main"));
//! ```

use std::collections::BTreeMap;

use crate::types::{CallbackArgs, QueryMap, QueryValue};

/// Mode selected when an invocation names none
pub const MODE_MAIN: &str = "main";
/// Mode that saves the current query context as a favorite
pub const MODE_SAVE_FAVORITE: &str = "saveFavorite";
/// Mode that deletes the favorite named by the current query context
pub const MODE_DELETE_FAVORITE: &str = "deleteFavorite";
/// Mode that lists saved favorites
pub const MODE_SHOW_FAVORITES: &str = "showFavorites";
/// Callback value marking a favorite as directly playable
pub const CALLBACK_PLAY: &str = "play";

const MODE_KEY: &str = "mode";

/// Parse an invocation query string into a query context
///
/// Accepts the raw host argument with or without its leading `?`. Values
/// are URL-decoded (`+` counts as a space), pairs with an empty value are
/// dropped, and a key repeated across pairs collects into a
/// [`QueryValue::Seq`] in order of appearance. When the string names no
/// `mode` the default `main` is filled in, so dispatching on `mode` always
/// finds a value.
pub fn parse_query(query: &str) -> QueryMap {
    let raw = query.strip_prefix('?').unwrap_or(query);
    let mut collected: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pair in raw.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some(parts) => parts,
            None => continue,
        };
        let value = url_decode(value);
        if value.is_empty() {
            continue;
        }
        collected.entry(url_decode(key)).or_default().push(value);
    }

    let mut parsed = QueryMap::new();
    for (key, mut values) in collected {
        let value = if values.len() == 1 {
            QueryValue::Str(values.remove(0))
        } else {
            QueryValue::Seq(values)
        };
        parsed.insert(key, value);
    }
    parsed
        .entry(MODE_KEY.to_string())
        .or_insert_with(|| QueryValue::from(MODE_MAIN));
    parsed
}

/// Build a URL that re-invokes the addon with the given flat arguments
///
/// Keys and values are percent-encoded; argument order follows the map's
/// key order, so the same arguments always produce the same URL.
pub fn build_invoke_url(base_url: &str, args: &CallbackArgs) -> String {
    format!("{}?{}", base_url, encode_args(args))
}

/// Percent-encode flat callback arguments into a query string
pub fn encode_args(args: &CallbackArgs) -> String {
    let encoded: Vec<String> = args
        .iter()
        .map(|(key, value)| {
            format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
        })
        .collect();
    encoded.join("&")
}

fn url_decode(raw: &str) -> String {
    let unplussed = raw.replace('+', " ");
    match urlencoding::decode(&unplussed) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => unplussed,
    }
}
