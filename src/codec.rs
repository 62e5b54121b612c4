//! Codec for the delimited query-string format favorites are stored in
//!
//! This module converts between a [`QueryMap`] and the single delimited
//! string the addon passes around in URLs and favorite records. Values nest
//! one level deep: scalars, sequences of strings and string-to-string maps.
//!
//! # Format
//!
//! Fragments are joined by `&` with no leading separator:
//!
//! ```text
//! mapping  := fragment ("&" fragment)*
//! fragment := key "=" tagged
//! tagged   := "__str__/"   text
//!           | "__list__/"  ("__" element)*
//!           | "__tuple__/" ("__" element)*
//!           | "__dict__/"  ("___" inner-key "__" inner-value)*
//! ```
//!
//! Sequences always encode with the `__list__/` marker; `__tuple__/` is
//! accepted on decode so strings written by older encoders still parse, but
//! the sequence kind does not survive a round trip. Keys are limited to
//! letters, digits, underscores and whitespace; entries with other keys are
//! dropped from the output without error, and so are fragments that match no
//! marker on decode. The format is deliberately not URL safe;
//! callers base64-encode the result before embedding it in a URL.
//!
//! # Example
//!
//! ```rust
//! use favkit::{decode, encode, QueryValue};
//! use std::collections::BTreeMap;
//!
//! let mut queries = BTreeMap::new();
//! queries.insert("mode".to_string(), QueryValue::from("listEpisodes"));
//! queries.insert(
//!     "seasons".to_string(),
//!     QueryValue::Seq(vec!["1".to_string(), "2".to_string()]),
//! );
//!
//! let encoded = encode(&queries);
//! assert_eq!(encoded, "mode=__str__/listEpisodes&seasons=__list__/__1__2");
//! assert_eq!(decode(&encoded), queries);
//! ```

use log::debug;
use std::collections::BTreeMap;

use crate::types::{QueryMap, QueryValue};

const STR_MARKER: &str = "__str__/";
const LIST_MARKER: &str = "__list__/";
const TUPLE_MARKER: &str = "__tuple__/";
const DICT_MARKER: &str = "__dict__/";

/// Options controlling quirks of the encoded output
///
/// The defaults produce the clean form of the format. Turn on
/// `double_map_fragments` to emit every map-valued fragment twice, matching
/// strings written by older encoders; [`decode`] collapses the duplicate
/// either way, so the flag only matters when byte-for-byte output
/// compatibility is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub double_map_fragments: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            double_map_fragments: false,
        }
    }
}

/// Returns true if a key can be represented in the encoded format
///
/// Keys may contain letters, digits, underscores and whitespace, and must
/// not be empty. Anything else would collide with the format's delimiters.
pub fn is_encodable_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c.is_whitespace())
}

/// Encode a query mapping into a single delimited string
///
/// Entries whose key fails [`is_encodable_key`] are silently dropped.
/// Equivalent to [`encode_with`] with default [`EncodeOptions`].
pub fn encode(queries: &QueryMap) -> String {
    encode_with(queries, &EncodeOptions::default())
}

/// Encode a query mapping with explicit quirk options
pub fn encode_with(queries: &QueryMap, options: &EncodeOptions) -> String {
    let mut fragments: Vec<String> = Vec::new();
    for (key, value) in queries {
        if !is_encodable_key(key) {
            debug!("dropping key not representable in query format: {:?}", key);
            continue;
        }
        match value {
            QueryValue::Str(text) => {
                fragments.push(format!("{}={}{}", key, STR_MARKER, text));
            }
            QueryValue::Seq(items) => {
                let mut fragment = format!("{}={}", key, LIST_MARKER);
                for item in items {
                    fragment.push_str("__");
                    fragment.push_str(item);
                }
                fragments.push(fragment);
            }
            QueryValue::Map(map) => {
                let mut fragment = format!("{}={}", key, DICT_MARKER);
                for (inner_key, inner_value) in map {
                    fragment.push_str(&format!("___{}__{}", inner_key, inner_value));
                }
                if options.double_map_fragments {
                    fragments.push(fragment.clone());
                }
                fragments.push(fragment);
            }
        }
    }
    fragments.join("&")
}

/// Decode a delimited string back into a query mapping
///
/// The decoder is total: fragments that match no type marker, and inner map
/// pairs with no key/value separator, are dropped without error. When a key
/// appears in several fragments the last one wins. Sequence elements come
/// back in order but always as a [`QueryValue::Seq`], whether the string was
/// written with the list or the tuple marker.
pub fn decode(encoded: &str) -> QueryMap {
    let mut queries = QueryMap::new();
    for fragment in encoded.split('&') {
        if fragment.is_empty() {
            continue;
        }
        let (key, tagged) = match fragment.split_once('=') {
            Some(parts) => parts,
            None => continue,
        };
        if let Some(text) = tagged.strip_prefix(STR_MARKER) {
            queries.insert(key.to_string(), QueryValue::Str(text.to_string()));
        } else if let Some(payload) = tagged
            .strip_prefix(LIST_MARKER)
            .or_else(|| tagged.strip_prefix(TUPLE_MARKER))
        {
            queries.insert(key.to_string(), QueryValue::Seq(decode_elements(payload)));
        } else if let Some(payload) = tagged.strip_prefix(DICT_MARKER) {
            queries.insert(key.to_string(), QueryValue::Map(decode_pairs(payload)));
        } else {
            debug!("dropping fragment with unknown type marker: {:?}", fragment);
        }
    }
    queries
}

/// Split a sequence payload of the form `__a__b` into its elements
///
/// The payload starts with the element prefix, so the piece before the first
/// `__` is always empty and gets discarded.
fn decode_elements(payload: &str) -> Vec<String> {
    payload.split("__").skip(1).map(str::to_string).collect()
}

/// Split a map payload of the form `___k__v___k2__v2` into its pairs
fn decode_pairs(payload: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for pair in payload.split("___") {
        if pair.is_empty() {
            continue;
        }
        match pair.split_once("__") {
            Some((inner_key, inner_value)) => {
                map.insert(inner_key.to_string(), inner_value.to_string());
            }
            None => {
                debug!("dropping malformed map pair: {:?}", pair);
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_encode_scalar() {
        let mut queries = QueryMap::new();
        queries.insert("mode".to_string(), QueryValue::from("main"));
        assert_eq!(encode(&queries), "mode=__str__/main");
    }

    #[test]
    fn test_encode_joins_fragments_without_leading_separator() {
        let mut queries = QueryMap::new();
        queries.insert("a".to_string(), QueryValue::from("1"));
        queries.insert("b".to_string(), QueryValue::from("2"));
        assert_eq!(encode(&queries), "a=__str__/1&b=__str__/2");
    }

    #[test]
    fn test_encode_sequence() {
        let mut queries = QueryMap::new();
        queries.insert(
            "pages".to_string(),
            QueryValue::Seq(vec!["one".to_string(), "two".to_string(), "three".to_string()]),
        );
        assert_eq!(encode(&queries), "pages=__list__/__one__two__three");
    }

    #[test]
    fn test_encode_empty_sequence() {
        let mut queries = QueryMap::new();
        queries.insert("pages".to_string(), QueryValue::Seq(Vec::new()));
        assert_eq!(encode(&queries), "pages=__list__/");
    }

    #[test]
    fn test_encode_map() {
        let mut queries = QueryMap::new();
        queries.insert(
            "headers".to_string(),
            QueryValue::Map(map_of(&[("accept", "text"), ("host", "example")])),
        );
        assert_eq!(
            encode(&queries),
            "headers=__dict__/___accept__text___host__example"
        );
    }

    #[test]
    fn test_encode_drops_unencodable_keys() {
        let mut queries = QueryMap::new();
        queries.insert("good_key".to_string(), QueryValue::from("kept"));
        queries.insert("bad-key".to_string(), QueryValue::from("gone"));
        queries.insert("bad=key".to_string(), QueryValue::from("gone"));
        queries.insert(String::new(), QueryValue::from("gone"));
        assert_eq!(encode(&queries), "good_key=__str__/kept");
    }

    #[test]
    fn test_encode_allows_whitespace_in_keys() {
        let mut queries = QueryMap::new();
        queries.insert("my key".to_string(), QueryValue::from("value"));
        assert_eq!(encode(&queries), "my key=__str__/value");
    }

    #[test]
    fn test_encode_doubles_map_fragments_when_asked() {
        let mut queries = QueryMap::new();
        queries.insert(
            "extras".to_string(),
            QueryValue::Map(map_of(&[("k", "v")])),
        );
        let options = EncodeOptions {
            double_map_fragments: true,
        };
        assert_eq!(
            encode_with(&queries, &options),
            "extras=__dict__/___k__v&extras=__dict__/___k__v"
        );
        assert_eq!(encode(&queries), "extras=__dict__/___k__v");
    }

    #[test]
    fn test_decode_collapses_doubled_map_fragments() {
        let mut queries = QueryMap::new();
        queries.insert(
            "extras".to_string(),
            QueryValue::Map(map_of(&[("k", "v")])),
        );
        let options = EncodeOptions {
            double_map_fragments: true,
        };
        assert_eq!(decode(&encode_with(&queries, &options)), queries);
    }

    #[test]
    fn test_decode_scalar() {
        let decoded = decode("url=__str__/http://example.com/watch?id=3");
        assert_eq!(
            decoded.get("url").and_then(QueryValue::as_str),
            Some("http://example.com/watch?id=3")
        );
    }

    #[test]
    fn test_decode_accepts_tuple_marker_as_sequence() {
        let decoded = decode("pages=__tuple__/__one__two");
        assert_eq!(
            decoded.get("pages").and_then(QueryValue::as_seq),
            Some(&["one".to_string(), "two".to_string()][..])
        );
    }

    #[test]
    fn test_decode_tolerates_leading_separator() {
        let decoded = decode("&mode=__str__/main&page=__str__/2");
        assert_eq!(decoded.len(), 2);
        assert_eq!(
            decoded.get("mode").and_then(QueryValue::as_str),
            Some("main")
        );
    }

    #[test]
    fn test_decode_drops_unmarked_fragments() {
        let decoded = decode("mode=__str__/main&plain=value&noequals");
        assert_eq!(decoded.len(), 1);
        assert!(decoded.contains_key("mode"));
    }

    #[test]
    fn test_decode_drops_malformed_map_pairs() {
        let decoded = decode("extras=__dict__/___good__value___broken");
        assert_eq!(
            decoded.get("extras").and_then(QueryValue::as_map),
            Some(&map_of(&[("good", "value")]))
        );
    }

    #[test]
    fn test_decode_map_pair_splits_once() {
        // a value containing the pair separator stays intact past the first split
        let decoded = decode("extras=__dict__/___key__part__more");
        assert_eq!(
            decoded.get("extras").and_then(QueryValue::as_map),
            Some(&map_of(&[("key", "part__more")]))
        );
    }

    #[test]
    fn test_decode_last_fragment_wins() {
        let decoded = decode("mode=__str__/first&mode=__str__/second");
        assert_eq!(
            decoded.get("mode").and_then(QueryValue::as_str),
            Some("second")
        );
    }

    #[test]
    fn test_decode_empty_string() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_round_trip_flat_mapping() {
        let mut queries = QueryMap::new();
        queries.insert("mode".to_string(), QueryValue::from("listShows"));
        queries.insert("page".to_string(), QueryValue::from("3"));
        queries.insert("title".to_string(), QueryValue::from("Some Show"));
        assert_eq!(decode(&encode(&queries)), queries);
    }

    #[test]
    fn test_round_trip_nested_mapping() {
        let mut queries = QueryMap::new();
        queries.insert("mode".to_string(), QueryValue::from("play"));
        queries.insert(
            "parts".to_string(),
            QueryValue::Seq(vec!["cd1".to_string(), "cd2".to_string()]),
        );
        queries.insert(
            "headers".to_string(),
            QueryValue::Map(map_of(&[("referer", "http:example")])),
        );
        assert_eq!(decode(&encode(&queries)), queries);
    }

    #[test]
    fn test_round_trip_preserves_sequence_order() {
        let mut queries = QueryMap::new();
        queries.insert(
            "episodes".to_string(),
            QueryValue::Seq(vec!["9".to_string(), "1".to_string(), "5".to_string()]),
        );
        let decoded = decode(&encode(&queries));
        assert_eq!(
            decoded.get("episodes").and_then(QueryValue::as_seq),
            Some(&["9".to_string(), "1".to_string(), "5".to_string()][..])
        );
    }

    #[test]
    fn test_round_trip_drops_hyphenated_key() {
        let mut queries = QueryMap::new();
        queries.insert("keep".to_string(), QueryValue::from("yes"));
        queries.insert("drop-me".to_string(), QueryValue::from("no"));
        let decoded = decode(&encode(&queries));
        assert_eq!(decoded.len(), 1);
        assert!(decoded.contains_key("keep"));
        assert!(!decoded.contains_key("drop-me"));
    }

    #[test]
    fn test_round_trip_empty_containers() {
        let mut queries = QueryMap::new();
        queries.insert("seq".to_string(), QueryValue::Seq(Vec::new()));
        queries.insert("map".to_string(), QueryValue::Map(BTreeMap::new()));
        assert_eq!(decode(&encode(&queries)), queries);
    }

    #[test]
    fn test_numbers_come_back_as_strings() {
        let mut queries = QueryMap::new();
        queries.insert("page".to_string(), QueryValue::from("42"));
        let decoded = decode(&encode(&queries));
        assert_eq!(decoded.get("page"), Some(&QueryValue::Str("42".to_string())));
    }

    #[test]
    fn test_is_encodable_key() {
        assert!(is_encodable_key("mode"));
        assert!(is_encodable_key("item_type"));
        assert!(is_encodable_key("season 2"));
        assert!(is_encodable_key("page3"));
        assert!(!is_encodable_key(""));
        assert!(!is_encodable_key("bad-key"));
        assert!(!is_encodable_key("bad&key"));
        assert!(!is_encodable_key("bad=key"));
        assert!(!is_encodable_key("bad/key"));
    }
}
