//! # Favorites
//!
//! The only state Atlas persists: a list of favorited country codes stored as
//! a JSON array under a single key (`"favorite"`).
//!
//! The list is read in full on every access and rewritten in full on every
//! toggle. There is no caching and no batching, so the persisted value is
//! always the source of truth.
//!
//! Storage is injected through the [`Storage`] trait: [`FileStorage`] keeps
//! one JSON file per key on disk, [`MemoryStorage`] keeps values in a map.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Key under which the favorites list is stored.
pub const FAVORITES_KEY: &str = "favorite";

/// A synchronous string key-value store.
pub trait Storage: Send {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Replaces the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

/// Atomically write `contents` to `path` (via `.tmp` + rename).
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        atomic_write(&self.path_for(key), value)
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw value (e.g. a hand-written favorites list).
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The favorites set, backed by a [`Storage`].
pub struct Favorites {
    storage: Box<dyn Storage>,
}

impl Favorites {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Reads the persisted list. A missing key, an unreadable store or a
    /// malformed value all read as an empty list.
    pub fn codes(&self) -> Vec<String> {
        let raw = match self.storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(codes) => dedup_preserving_order(codes),
            Err(e) => {
                warn!("Malformed favorites value, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Snapshot for annotating a freshly fetched list.
    pub fn snapshot(&self) -> HashSet<String> {
        self.codes().into_iter().collect()
    }

    pub fn is_favorited(&self, code: &str) -> bool {
        self.codes().iter().any(|c| c == code)
    }

    /// Flips membership of `code` and persists the whole list.
    /// Returns the new state (`true` = now a favorite).
    pub fn toggle(&mut self, code: &str) -> io::Result<bool> {
        let mut codes = self.codes();
        let now_favorited = if let Some(pos) = codes.iter().position(|c| c == code) {
            codes.remove(pos);
            false
        } else {
            codes.push(code.to_string());
            true
        };

        let json = serde_json::to_string(&codes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.storage.set(FAVORITES_KEY, &json)?;
        debug!("Favorite {} -> {} ({} total)", code, now_favorited, codes.len());
        Ok(now_favorited)
    }
}

fn dedup_preserving_order(codes: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    codes
        .into_iter()
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(raw: &str) -> Favorites {
        Favorites::new(Box::new(MemoryStorage::new().with_value(FAVORITES_KEY, raw)))
    }

    #[test]
    fn test_absent_key_is_empty() {
        let favorites = Favorites::new(Box::new(MemoryStorage::new()));
        assert!(favorites.codes().is_empty());
        assert!(!favorites.is_favorited("BRA"));
    }

    #[test]
    fn test_malformed_value_is_empty() {
        let favorites = seeded("{not json");
        assert!(favorites.codes().is_empty());

        let favorites = seeded(r#"{"BRA": true}"#);
        assert!(favorites.codes().is_empty());
    }

    #[test]
    fn test_toggle_removes_existing() {
        let mut favorites = seeded(r#"["BRA","USA"]"#);
        assert!(favorites.is_favorited("BRA"));
        assert!(!favorites.toggle("BRA").unwrap());
        assert_eq!(favorites.codes(), vec!["USA"]);
    }

    #[test]
    fn test_toggle_appends_missing() {
        let mut favorites = seeded(r#"["USA"]"#);
        assert!(favorites.toggle("JPN").unwrap());
        assert_eq!(favorites.codes(), vec!["USA", "JPN"]);
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let mut favorites = seeded(r#"["BRA","USA"]"#);
        for code in ["BRA", "PER"] {
            let before = favorites.is_favorited(code);
            let size = favorites.codes().len();
            favorites.toggle(code).unwrap();
            favorites.toggle(code).unwrap();
            assert_eq!(favorites.is_favorited(code), before);
            assert_eq!(favorites.codes().len(), size);
        }
    }

    #[test]
    fn test_duplicates_in_storage_collapse() {
        let favorites = seeded(r#"["BRA","BRA","USA"]"#);
        assert_eq!(favorites.codes(), vec!["BRA", "USA"]);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage_dir = dir.path().join("nested");
        let mut favorites = Favorites::new(Box::new(FileStorage::new(&storage_dir)));

        assert!(favorites.codes().is_empty());
        favorites.toggle("BRA").unwrap();
        favorites.toggle("USA").unwrap();

        let raw = fs::read_to_string(storage_dir.join("favorite.json")).unwrap();
        assert_eq!(raw, r#"["BRA","USA"]"#);
        assert!(!storage_dir.join("favorite.tmp").exists());

        // A fresh handle over the same directory sees the same set
        let reopened = Favorites::new(Box::new(FileStorage::new(&storage_dir)));
        assert_eq!(reopened.codes(), vec!["BRA", "USA"]);
    }
}
