//! Filesystem-backed storage for favorite records
//!
//! One favorite is one file: `<profile>/Favorites/<id>.txt`, where the id is
//! the padded URL-safe base64 encoding of the favorite's title. Records are
//! stored as JSON. Because the file name is derived from the title alone,
//! saving a favorite with an existing title replaces the earlier one, and
//! deleting needs nothing but the title.
//!
//! The [`FavoriteStore`] trait is what the lifecycle functions work
//! against; [`FsStore`] is the production implementation.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use log::debug;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::FavoriteRecord;

/// Name of the store directory inside the profile directory
pub const FAVORITES_DIR: &str = "Favorites";

/// Extension of record files
const RECORD_EXT: &str = "txt";

/// Derive the store id of a favorite from its title
///
/// The padded URL-safe base64 alphabet keeps ids filesystem-safe whatever
/// the title contains, and matches the file names older addon versions
/// wrote, so an existing Favorites directory stays readable.
///
/// # Example
///
/// ```rust
/// use favkit::record_id;
///
/// assert_eq!(record_id("Test Movie"), "VGVzdCBNb3ZpZQ==");
/// assert_eq!(record_id("Movie?"), "TW92aWU_");
/// ```
pub fn record_id(title: &str) -> String {
    URL_SAFE.encode(title)
}

/// Outcome of an idempotent directory creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureDir {
    Created,
    AlreadyExists,
}

/// Create a directory and its missing parents if it does not exist yet
///
/// Losing a creation race to another process counts as `AlreadyExists`,
/// not as an error.
pub fn ensure_dir(path: &Path) -> Result<EnsureDir> {
    if path.is_dir() {
        return Ok(EnsureDir::AlreadyExists);
    }
    match std::fs::create_dir_all(path) {
        Ok(()) => Ok(EnsureDir::Created),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(EnsureDir::AlreadyExists),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Storage interface the favorites lifecycle works against
pub trait FavoriteStore {
    /// Persist a record under the given id, replacing any previous one
    fn put(&self, id: &str, record: &FavoriteRecord) -> Result<()>;

    /// Read back every stored record, in deterministic order
    fn list(&self) -> Result<Vec<FavoriteRecord>>;

    /// Remove the record stored under the given id
    ///
    /// Deleting an id that is not stored is an error.
    fn delete(&self, id: &str) -> Result<()>;
}

/// Favorite storage rooted at an addon profile directory
#[derive(Debug, Clone)]
pub struct FsStore {
    profile_dir: PathBuf,
}

impl FsStore {
    /// Create a store for the given profile directory
    ///
    /// Nothing is touched on disk until the first [`put`](FavoriteStore::put).
    pub fn new(profile_dir: &Path) -> Self {
        FsStore {
            profile_dir: profile_dir.to_path_buf(),
        }
    }

    /// Full path of the Favorites directory inside the profile
    pub fn favorites_dir(&self) -> PathBuf {
        self.profile_dir.join(FAVORITES_DIR)
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.favorites_dir().join(format!("{}.{}", id, RECORD_EXT))
    }
}

impl FavoriteStore for FsStore {
    fn put(&self, id: &str, record: &FavoriteRecord) -> Result<()> {
        ensure_dir(&self.favorites_dir())?;
        let path = self.record_path(id);
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)?;
        debug!("saved favorite {:?} as {}", record.title, path.display());
        Ok(())
    }

    fn list(&self) -> Result<Vec<FavoriteRecord>> {
        let dir = self.favorites_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::StoreMissing { directory: dir });
            }
            Err(e) => return Err(Error::Io(e)),
        };

        // Only files the store itself writes; the profile may hold anything
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_EXT)
            {
                paths.push(path);
            }
        }
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            records.push(read_record(&path)?);
        }
        Ok(records)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let path = self.record_path(id);
        std::fs::remove_file(&path)?;
        debug!("deleted favorite file {}", path.display());
        Ok(())
    }
}

/// Read one record file, mapping any failure to [`Error::RecordCorrupt`]
///
/// An unreadable file and an undeserializable one are the same condition
/// for the caller: the store holds something it cannot hand back.
fn read_record(path: &Path) -> Result<FavoriteRecord> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let raw = std::fs::read_to_string(path).map_err(|e| Error::RecordCorrupt {
        name: name.clone(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| Error::RecordCorrupt {
        name,
        message: e.to_string(),
    })
}
