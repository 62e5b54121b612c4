//! # favkit - Favorites engine for media-center addons
//!
//! This library implements the favorites subsystem of a media-center addon:
//! a codec for the delimited query format favorites travel in, a context
//! menu builder that renders host command strings, and a file-backed
//! save / list / delete lifecycle with one record per favorite.
//!
//! ## Features
//!
//! - Encode and decode nested query mappings (scalars, sequences, one-level maps)
//! - Parse host invocation query strings, with `mode=main` filled in by default
//! - Build context menus rendering `refresh(...)` / `background(...)` host commands
//! - Save favorites as one JSON file each under `<profile>/Favorites/`
//! - Enumerate favorites by category with case-insensitive prefix matching
//! - Replay saved favorites as playable items or directory entries
//! - Delete favorites through the same title-derived file name they were saved under
//!
//! ## Quick Start
//!
//! ### Round-tripping queries
//!
//! ```rust
//! use favkit::{decode, encode, QueryValue};
//! use std::collections::BTreeMap;
//!
//! let mut queries = BTreeMap::new();
//! queries.insert("mode".to_string(), QueryValue::from("listEpisodes"));
//! queries.insert("show".to_string(), QueryValue::from("Some Show"));
//!
//! let encoded = encode(&queries);
//! assert_eq!(encoded, "mode=__str__/listEpisodes&show=__str__/Some Show");
//! assert_eq!(decode(&encoded), queries);
//! ```
//!
//! ### Saving and listing favorites
//!
//! ```rust,no_run
//! use favkit::{
//!     list_favorites, parse_query, save_favorite, FsStore, Listing, MenuBuilder, Notifier,
//! };
//! use std::path::Path;
//!
//! struct Popup;
//!
//! impl Notifier for Popup {
//!     fn notify(&self, message: &str) {
//!         println!("{}", message);
//!     }
//! }
//!
//! let profile = Path::new("/home/user/.kodi/userdata/addon_data/plugin.video.example");
//! let store = FsStore::new(profile);
//!
//! // the host passes this query string when the user clicks "Save favorite"
//! let ctx = parse_query(
//!     "mode=saveFavorite&title=Test+Movie&callback=play&url=http%3A%2F%2Fexample.com&category=movies",
//! );
//! save_favorite(&store, &ctx)?;
//!
//! let menu = MenuBuilder::new("plugin://plugin.video.example");
//! let listing = list_favorites(&store, &Popup, &menu, &parse_query("category=movies"), None)?;
//! if let Listing::Favorites(entries) = listing {
//!     println!("{} favorite(s)", entries.len());
//! }
//! # Ok::<(), favkit::Error>(())
//! ```
//!
//! ### Building context menus
//!
//! ```rust
//! use favkit::{MenuBuilder, MODE_SAVE_FAVORITE};
//! use std::collections::BTreeMap;
//!
//! let mut menu = MenuBuilder::new("plugin://plugin.video.example");
//! let mut args = BTreeMap::new();
//! args.insert("mode".to_string(), "showFavorites".to_string());
//! menu.add_entry("Favorites", &args, true);
//! menu.set_favorite_action("Save favorite", "play", MODE_SAVE_FAVORITE, "movies");
//!
//! let pairs = menu.item_menu("Test Movie", "http://example.com/video.mp4", "video", None, None);
//! assert_eq!(pairs.len(), 2);
//! assert_eq!(
//!     pairs[0].1,
//!     "refresh(plugin://plugin.video.example?mode=showFavorites)"
//! );
//! ```
//!
//! ## Storage Layout
//!
//! One favorite is one file: `<profile>/Favorites/<id>.txt`, where the id is
//! the padded URL-safe base64 encoding of the title. Saving over an existing
//! title replaces that favorite; deleting recomputes the same id from the
//! title in the active query context. Record files hold JSON and can be
//! inspected or removed by hand.
//!
//! ## Error Handling
//!
//! All functions return [`Result<T, Error>`]. Conditions the flow is meant
//! to recover from have their own variants:
//!
//! ```rust
//! use favkit::{Error, FavoriteStore, FsStore};
//! use std::path::Path;
//!
//! let store = FsStore::new(Path::new("/nonexistent/profile"));
//! match store.list() {
//!     Ok(records) => println!("{} favorite(s)", records.len()),
//!     Err(Error::StoreMissing { directory }) => {
//!         println!("nothing saved yet under {}", directory.display());
//!     }
//!     Err(e) => eprintln!("storage failure: {}", e),
//! }
//! ```

// Re-export all public types at crate root
pub use types::{
    CallbackArgs, DirectoryEntry, FavoriteRecord, ListingEntry, PlayableItem, QueryMap, QueryValue,
};

// Re-export error types
pub use error::{Error, Result};

// Re-export the query codec
pub use codec::{decode, encode, encode_with, is_encodable_key, EncodeOptions};

// Re-export invocation helpers
pub use request::{
    build_invoke_url, encode_args, parse_query, CALLBACK_PLAY, MODE_DELETE_FAVORITE, MODE_MAIN,
    MODE_SAVE_FAVORITE, MODE_SHOW_FAVORITES,
};

// Re-export the menu builder
pub use menu::{MenuBuilder, MenuDescriptor, DEFAULT_FAVORITE_LABEL};

// Re-export the store
pub use store::{ensure_dir, record_id, EnsureDir, FavoriteStore, FsStore, FAVORITES_DIR};

// Re-export the favorites lifecycle
pub use favorites::{
    default_categories, delete_favorite, list_favorites, save_favorite, Categories, Listing,
    Notifier, DELETE_FAVORITE_LABEL, NOTICE_DELETE_FAILED, NOTICE_NO_FAVORITES,
};

// All modules are private - use re-exports above for public API
mod codec;
mod error;
mod favorites;
mod menu;
mod request;
mod store;
mod types;
