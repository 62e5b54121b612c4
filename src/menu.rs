//! Context-menu descriptors and host command rendering
//!
//! A [`MenuBuilder`] accumulates named menu entries and renders them into
//! the `(label, command)` pairs the host attaches to a listing entry. Two
//! command shapes exist: `refresh(<url>)` replaces the current listing with
//! the result of the call, `background(<url>)` runs the call without
//! leaving the screen. The URL re-invokes the addon with the entry's
//! callback arguments.
//!
//! One entry is special: the favorite action. It is rendered only together
//! with the listing entry it applies to, because its callback arguments
//! carry a snapshot of that entry (see [`MenuBuilder::item_menu`] and
//! [`MenuBuilder::directory_menu`]).
//!
//! # Example
//!
//! ```rust
//! use favkit::MenuBuilder;
//! use std::collections::BTreeMap;
//!
//! let mut menu = MenuBuilder::new("plugin://favorites");
//! let mut args = BTreeMap::new();
//! args.insert("mode".to_string(), "showFavorites".to_string());
//! menu.add_entry("Favorites", &args, true);
//!
//! assert_eq!(
//!     menu.render(),
//!     vec![(
//!         "Favorites".to_string(),
//!         "refresh(plugin://favorites?mode=showFavorites)".to_string(),
//!     )]
//! );
//! ```

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::Serialize;

use crate::codec;
use crate::request;
use crate::types::{CallbackArgs, QueryMap};

/// Label used when a favorite action is set with an empty one
pub const DEFAULT_FAVORITE_LABEL: &str = "Add as favorite in this addon";

/// One named context-menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuDescriptor {
    pub label: String,
    pub encoded_args: String,
    pub refreshes_listing: bool,
}

/// The distinguished favorite entry of a menu
///
/// `callback` is the mode replayed when the saved favorite is activated
/// later; `action` is the mode invoked when the menu entry itself is
/// clicked (saving or deleting the favorite).
#[derive(Debug, Clone, PartialEq, Eq)]
struct FavoriteAction {
    label: String,
    callback: String,
    action: String,
    category: String,
}

/// Accumulates context-menu entries and renders host commands
#[derive(Debug, Clone)]
pub struct MenuBuilder {
    base_url: String,
    entries: Vec<MenuDescriptor>,
    favorite: Option<FavoriteAction>,
}

impl MenuBuilder {
    pub fn new(base_url: &str) -> Self {
        MenuBuilder {
            base_url: base_url.to_string(),
            entries: Vec::new(),
            favorite: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add a menu entry, or replace the one already carrying this label
    ///
    /// Entries render in the order they were first added; replacing keeps
    /// the original position. `refreshes_listing` picks the `refresh`
    /// command shape over `background`.
    pub fn add_entry(&mut self, label: &str, args: &CallbackArgs, refreshes_listing: bool) {
        let descriptor = MenuDescriptor {
            label: label.to_string(),
            encoded_args: request::encode_args(args),
            refreshes_listing,
        };
        match self.entries.iter_mut().find(|entry| entry.label == label) {
            Some(existing) => *existing = descriptor,
            None => self.entries.push(descriptor),
        }
    }

    /// Set the favorite action, replacing any previous one
    ///
    /// An empty label falls back to [`DEFAULT_FAVORITE_LABEL`]. `action` is
    /// conventionally [`request::MODE_SAVE_FAVORITE`] on regular listings
    /// and [`request::MODE_DELETE_FAVORITE`] on replayed favorites.
    pub fn set_favorite_action(
        &mut self,
        label: &str,
        callback: &str,
        action: &str,
        category: &str,
    ) {
        let label = if label.is_empty() {
            DEFAULT_FAVORITE_LABEL
        } else {
            label
        };
        self.favorite = Some(FavoriteAction {
            label: label.to_string(),
            callback: callback.to_string(),
            action: action.to_string(),
            category: category.to_string(),
        });
    }

    /// Render the accumulated entries into `(label, command)` pairs
    ///
    /// The favorite action is not included; it only renders through
    /// [`item_menu`](Self::item_menu) or
    /// [`directory_menu`](Self::directory_menu), which can supply the
    /// listing entry it snapshots.
    pub fn render(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|entry| (entry.label.clone(), self.command_for(entry)))
            .collect()
    }

    /// Render the menu for a playable item, favorite action included
    ///
    /// The favorite entry's arguments snapshot the item so that clicking it
    /// later can save (or delete) exactly this entry: mode, title,
    /// callback, url, item type, artwork and category all travel in the
    /// callback URL.
    pub fn item_menu(
        &self,
        title: &str,
        url: &str,
        item_type: &str,
        image: Option<&str>,
        fanart: Option<&str>,
    ) -> Vec<(String, String)> {
        match &self.favorite {
            Some(favorite) => {
                let args = favorite.item_args(title, url, item_type, image, fanart);
                self.render_with_favorite(favorite, &args)
            }
            None => self.render(),
        }
    }

    /// Render the menu for a directory entry, favorite action included
    ///
    /// Directories have no playable URL; instead the favorite arguments
    /// carry the directory's own queries, base64url-encoded so the nested
    /// structure survives the flat callback URL.
    pub fn directory_menu(
        &self,
        title: &str,
        queries: &QueryMap,
        image: Option<&str>,
        fanart: Option<&str>,
    ) -> Vec<(String, String)> {
        match &self.favorite {
            Some(favorite) => {
                let args = favorite.directory_args(title, queries, image, fanart);
                self.render_with_favorite(favorite, &args)
            }
            None => self.render(),
        }
    }

    fn render_with_favorite(
        &self,
        favorite: &FavoriteAction,
        args: &CallbackArgs,
    ) -> Vec<(String, String)> {
        let mut combined = self.clone();
        combined.add_entry(&favorite.label, args, false);
        combined.render()
    }

    fn command_for(&self, descriptor: &MenuDescriptor) -> String {
        let url = format!("{}?{}", self.base_url, descriptor.encoded_args);
        if descriptor.refreshes_listing {
            format!("refresh({})", url)
        } else {
            format!("background({})", url)
        }
    }
}

impl FavoriteAction {
    fn base_args(&self, title: &str) -> CallbackArgs {
        let mut args = CallbackArgs::new();
        args.insert("mode".to_string(), self.action.clone());
        args.insert("title".to_string(), title.to_string());
        args.insert("callback".to_string(), self.callback.clone());
        args.insert("category".to_string(), self.category.clone());
        args
    }

    fn item_args(
        &self,
        title: &str,
        url: &str,
        item_type: &str,
        image: Option<&str>,
        fanart: Option<&str>,
    ) -> CallbackArgs {
        let mut args = self.base_args(title);
        args.insert("url".to_string(), url.to_string());
        args.insert("item_type".to_string(), item_type.to_string());
        insert_artwork(&mut args, image, fanart);
        args
    }

    fn directory_args(
        &self,
        title: &str,
        queries: &QueryMap,
        image: Option<&str>,
        fanart: Option<&str>,
    ) -> CallbackArgs {
        let mut args = self.base_args(title);
        args.insert(
            "queries".to_string(),
            URL_SAFE.encode(codec::encode(queries)),
        );
        insert_artwork(&mut args, image, fanart);
        args
    }
}

fn insert_artwork(args: &mut CallbackArgs, image: Option<&str>, fanart: Option<&str>) {
    if let Some(image) = image {
        args.insert("image".to_string(), image.to_string());
    }
    if let Some(fanart) = fanart {
        args.insert("fanart".to_string(), fanart.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{MODE_DELETE_FAVORITE, MODE_SAVE_FAVORITE};
    use crate::types::QueryValue;

    fn args_of(pairs: &[(&str, &str)]) -> CallbackArgs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_empty_menu() {
        let menu = MenuBuilder::new("plugin://favorites");
        assert!(menu.render().is_empty());
    }

    #[test]
    fn test_render_refresh_and_background_commands() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.add_entry("Reload", &args_of(&[("mode", "main")]), true);
        menu.add_entry("Mark watched", &args_of(&[("mode", "markWatched")]), false);
        assert_eq!(
            menu.render(),
            vec![
                (
                    "Reload".to_string(),
                    "refresh(plugin://favorites?mode=main)".to_string()
                ),
                (
                    "Mark watched".to_string(),
                    "background(plugin://favorites?mode=markWatched)".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.add_entry("Zeta", &args_of(&[("mode", "z")]), false);
        menu.add_entry("Alpha", &args_of(&[("mode", "a")]), false);
        let labels: Vec<String> = menu.render().into_iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Zeta".to_string(), "Alpha".to_string()]);
    }

    #[test]
    fn test_readding_a_label_overwrites_in_place() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.add_entry("First", &args_of(&[("mode", "one")]), false);
        menu.add_entry("Second", &args_of(&[("mode", "two")]), false);
        menu.add_entry("First", &args_of(&[("mode", "replaced")]), true);
        let rendered = menu.render();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].0, "First");
        assert_eq!(
            rendered[0].1,
            "refresh(plugin://favorites?mode=replaced)"
        );
        assert_eq!(rendered[1].0, "Second");
    }

    #[test]
    fn test_render_leaves_favorite_out() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.set_favorite_action("Save", "play", MODE_SAVE_FAVORITE, "movies");
        assert!(menu.render().is_empty());
    }

    #[test]
    fn test_item_menu_appends_favorite_snapshot() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.set_favorite_action("Save favorite", "play", MODE_SAVE_FAVORITE, "movies");
        let rendered = menu.item_menu(
            "Test Movie",
            "http://example.com/video.mp4",
            "video",
            None,
            None,
        );
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, "Save favorite");
        let command = &rendered[0].1;
        assert!(command.starts_with("background(plugin://favorites?"));
        assert!(command.contains("mode=saveFavorite"));
        assert!(command.contains("title=Test%20Movie"));
        assert!(command.contains("callback=play"));
        assert!(command.contains("url=http%3A%2F%2Fexample.com%2Fvideo.mp4"));
        assert!(command.contains("item_type=video"));
        assert!(command.contains("category=movies"));
    }

    #[test]
    fn test_item_menu_skips_missing_artwork() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.set_favorite_action("Save favorite", "play", MODE_SAVE_FAVORITE, "movies");
        let rendered = menu.item_menu("Title", "http://example.com", "video", None, None);
        assert!(!rendered[0].1.contains("image="));
        assert!(!rendered[0].1.contains("fanart="));
    }

    #[test]
    fn test_directory_menu_encodes_queries() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.set_favorite_action("Save favorite", "listShows", MODE_SAVE_FAVORITE, "tv");
        let mut queries = QueryMap::new();
        queries.insert("mode".to_string(), QueryValue::from("listShows"));
        let rendered = menu.directory_menu("Some Show", &queries, Some("poster.png"), None);
        assert_eq!(rendered.len(), 1);
        let command = &rendered[0].1;
        // URL_SAFE.encode("mode=__str__/listShows")
        assert!(command.contains("queries=bW9kZT1fX3N0cl9fL2xpc3RTaG93cw%3D%3D"));
        assert!(command.contains("image=poster.png"));
        assert!(!command.contains("url="));
    }

    #[test]
    fn test_favorite_keeps_regular_entries_first() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.add_entry("Refresh", &args_of(&[("mode", "main")]), true);
        menu.set_favorite_action(
            "Delete favorite",
            MODE_DELETE_FAVORITE,
            MODE_DELETE_FAVORITE,
            "tv",
        );
        let rendered = menu.item_menu("Show", "http://example.com", "video", None, None);
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].0, "Refresh");
        assert_eq!(rendered[1].0, "Delete favorite");
    }

    #[test]
    fn test_empty_favorite_label_gets_default() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.set_favorite_action("", "play", MODE_SAVE_FAVORITE, "movies");
        let rendered = menu.item_menu("Movie", "http://example.com", "video", None, None);
        assert_eq!(rendered[0].0, DEFAULT_FAVORITE_LABEL);
    }

    #[test]
    fn test_setting_favorite_again_replaces_it() {
        let mut menu = MenuBuilder::new("plugin://favorites");
        menu.set_favorite_action("Save favorite", "play", MODE_SAVE_FAVORITE, "movies");
        menu.set_favorite_action(
            "Delete favorite",
            MODE_DELETE_FAVORITE,
            MODE_DELETE_FAVORITE,
            "tv",
        );
        let rendered = menu.item_menu("Show", "http://example.com", "video", None, None);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, "Delete favorite");
        assert!(rendered[0].1.contains("mode=deleteFavorite"));
        assert!(rendered[0].1.contains("category=tv"));
    }
}
