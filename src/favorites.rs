//! The favorites lifecycle: save, enumerate, replay and delete
//!
//! Favorites are saved from a query context (the arguments the favorite
//! action put into its callback URL), listed back grouped by category, and
//! deleted through the same title-derived id they were saved under.
//!
//! Enumeration is a two-step navigation: invoked without a category it
//! returns the category menu; invoked with one it replays every stored
//! record whose category matches. Replay turns a record back into either a
//! playable item or a directory entry, each carrying a "Delete favorite"
//! context-menu entry scoped to the requested category.
//!
//! Failure handling is deliberately uneven, matching how the listing is
//! used: a missing store directory is a normal "nothing saved yet" outcome,
//! a record that cannot be replayed aborts the whole enumeration, and a
//! failed delete turns into a transient notice without unwinding the
//! calling flow.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use log::{debug, warn};
use regex::RegexBuilder;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::codec;
use crate::error::{Error, Result};
use crate::menu::MenuBuilder;
use crate::request::{CALLBACK_PLAY, MODE_DELETE_FAVORITE, MODE_SHOW_FAVORITES};
use crate::store::{record_id, FavoriteStore};
use crate::types::{
    DirectoryEntry, FavoriteRecord, ListingEntry, PlayableItem, QueryMap, QueryValue,
};

/// Label of the per-favorite delete action
pub const DELETE_FAVORITE_LABEL: &str = "Delete favorite";
/// Notice shown when enumeration finds no favorites directory
pub const NOTICE_NO_FAVORITES: &str = "No favorites saved";
/// Notice shown when a favorite cannot be deleted
pub const NOTICE_DELETE_FAILED: &str = "Unable to delete favorite";

const CONTEXT_CATEGORY: &str = "category";
const CONTEXT_TITLE: &str = "title";
const DEFAULT_ITEM_TYPE: &str = "video";

/// Category key to display label, in stable key order
pub type Categories = BTreeMap<String, String>;

/// The categories offered when the caller supplies none
pub fn default_categories() -> Categories {
    let mut categories = Categories::new();
    categories.insert("movies".to_string(), "Movies".to_string());
    categories.insert("tv".to_string(), "Tv shows".to_string());
    categories
}

/// Receiver for transient user notices
///
/// Stands in for the host's short popup. Implementations must not fail;
/// a notice is fire-and-forget.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Outcome of a favorites enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Listing {
    /// No category requested yet: navigate into one of these
    Categories(Vec<DirectoryEntry>),
    /// Favorites matching the requested category, in store order
    Favorites(Vec<ListingEntry>),
    /// Nothing saved yet
    NoFavorites,
}

/// Save the favorite described by the current query context
///
/// The context must carry a `title`; every other field is optional. The
/// record is stored under the title-derived id, so saving over an existing
/// title replaces that favorite.
pub fn save_favorite(store: &dyn FavoriteStore, ctx: &QueryMap) -> Result<()> {
    let record = FavoriteRecord::from_query_context(ctx)?;
    store.put(&record_id(&record.title), &record)?;
    debug!("saved favorite {:?}", record.title);
    Ok(())
}

/// Enumerate favorites, or the category menu when no category is requested
///
/// `menu` supplies the base context menu replayed entries extend with
/// their delete action; `categories` overrides [`default_categories`].
/// The requested category is used as a case-insensitive pattern matched
/// against the start of each record's stored category, so requesting
/// `tv` also finds records filed under `Tv shows`.
pub fn list_favorites(
    store: &dyn FavoriteStore,
    notifier: &dyn Notifier,
    menu: &MenuBuilder,
    ctx: &QueryMap,
    categories: Option<&Categories>,
) -> Result<Listing> {
    let requested = match ctx.get(CONTEXT_CATEGORY).and_then(QueryValue::as_str) {
        Some(category) => category,
        None => return Ok(Listing::Categories(category_entries(categories))),
    };

    let matcher = RegexBuilder::new(&format!("^(?:{})", requested))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::InvalidCategoryPattern {
            pattern: requested.to_string(),
            message: e.to_string(),
        })?;

    let records = match store.list() {
        Ok(records) => records,
        Err(Error::StoreMissing { .. }) => {
            notifier.notify(NOTICE_NO_FAVORITES);
            return Ok(Listing::NoFavorites);
        }
        Err(e) => return Err(e),
    };

    let mut entries = Vec::new();
    for record in records {
        if !matcher.is_match(&record.category) {
            continue;
        }
        entries.push(replay_record(&record, menu, requested)?);
    }
    debug!(
        "listed {} favorite(s) for category {:?}",
        entries.len(),
        requested
    );
    Ok(Listing::Favorites(entries))
}

/// Delete the favorite named by the current query context
///
/// The id is recomputed from the context's `title`, exactly as on save.
/// Any failure is reported through the notifier and returned; callers that
/// treat deletion as best-effort can drop the result.
pub fn delete_favorite(
    store: &dyn FavoriteStore,
    notifier: &dyn Notifier,
    ctx: &QueryMap,
) -> Result<()> {
    match try_delete(store, ctx) {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!("favorite deletion failed: {}", e);
            notifier.notify(NOTICE_DELETE_FAILED);
            Err(e)
        }
    }
}

fn try_delete(store: &dyn FavoriteStore, ctx: &QueryMap) -> Result<()> {
    let title = ctx
        .get(CONTEXT_TITLE)
        .and_then(QueryValue::as_str)
        .ok_or(Error::MissingField(CONTEXT_TITLE))?;
    store.delete(&record_id(title))
}

/// Build the category navigation entries
fn category_entries(categories: Option<&Categories>) -> Vec<DirectoryEntry> {
    let defaults;
    let categories = match categories {
        Some(categories) => categories,
        None => {
            defaults = default_categories();
            &defaults
        }
    };
    categories
        .iter()
        .map(|(key, label)| {
            let mut queries = QueryMap::new();
            queries.insert("mode".to_string(), QueryValue::from(MODE_SHOW_FAVORITES));
            queries.insert(CONTEXT_CATEGORY.to_string(), QueryValue::from(key.as_str()));
            DirectoryEntry {
                title: label.clone(),
                queries,
                image: None,
                fanart: None,
                context_menu: Vec::new(),
            }
        })
        .collect()
}

/// Turn a stored record back into a listing entry
///
/// A record whose callback is `play` replays as a playable item; anything
/// else replays as a directory whose queries come out of the record's
/// base64url payload. A record missing the data its shape requires is
/// corrupt and fails the enumeration.
fn replay_record(
    record: &FavoriteRecord,
    menu: &MenuBuilder,
    requested: &str,
) -> Result<ListingEntry> {
    let mut entry_menu = menu.clone();
    entry_menu.set_favorite_action(
        DELETE_FAVORITE_LABEL,
        MODE_DELETE_FAVORITE,
        MODE_DELETE_FAVORITE,
        requested,
    );

    if record.callback == CALLBACK_PLAY {
        let url = record.url.as_deref().ok_or_else(|| Error::RecordCorrupt {
            name: record.title.clone(),
            message: "playable favorite has no url".to_string(),
        })?;
        let item_type = record.item_type.as_deref().unwrap_or(DEFAULT_ITEM_TYPE);
        let context_menu = entry_menu.item_menu(
            &record.title,
            url,
            item_type,
            record.image.as_deref(),
            record.fanart.as_deref(),
        );
        Ok(ListingEntry::Playable(PlayableItem {
            title: record.title.clone(),
            url: url.to_string(),
            item_type: item_type.to_string(),
            image: record.image.clone(),
            fanart: record.fanart.clone(),
            context_menu,
        }))
    } else {
        let queries = decode_stored_queries(record)?;
        let context_menu = entry_menu.directory_menu(
            &record.title,
            &queries,
            record.image.as_deref(),
            record.fanart.as_deref(),
        );
        Ok(ListingEntry::Directory(DirectoryEntry {
            title: record.title.clone(),
            queries,
            image: record.image.clone(),
            fanart: record.fanart.clone(),
            context_menu,
        }))
    }
}

fn decode_stored_queries(record: &FavoriteRecord) -> Result<QueryMap> {
    let encoded = record.queries.as_deref().ok_or_else(|| Error::RecordCorrupt {
        name: record.title.clone(),
        message: "directory favorite has no queries".to_string(),
    })?;
    let raw = URL_SAFE.decode(encoded).map_err(|e| Error::RecordCorrupt {
        name: record.title.clone(),
        message: format!("queries are not valid base64: {}", e),
    })?;
    let raw = String::from_utf8(raw).map_err(|e| Error::RecordCorrupt {
        name: record.title.clone(),
        message: format!("queries are not valid utf-8: {}", e),
    })?;
    Ok(codec::decode(&raw))
}
