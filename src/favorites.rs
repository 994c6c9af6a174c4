//! Named favorite locations persisted in the preferences store
//!
//! Each favorite is stored as one string `name:latitude:longitude` inside a
//! string set. Records that do not split into exactly three fields, or whose
//! numbers do not parse, are dropped on load with a warning. A name that
//! contains `:` can therefore never be read back, so `put` refuses such names.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, info, warn};

use crate::errors::FavoritesError;
use crate::models::{Coordinate, FavoriteEntry};
use crate::storage::{SharedStore, FAVORITE_LOCATIONS_KEY};

pub const RECORD_DELIMITER: char = ':';

/// Favorite name to coordinate, ordered by name
pub type Favorites = BTreeMap<String, Coordinate>;

/// Serialize one favorite into its stored form
pub fn encode_record(name: &str, coordinate: &Coordinate) -> String {
    format!(
        "{}{}{}{}{}",
        name, RECORD_DELIMITER, coordinate.latitude, RECORD_DELIMITER, coordinate.longitude
    )
}

/// Parse one stored record; `None` for anything that is not exactly
/// `name:lat:lng` with numeric lat and lng
pub fn decode_record(record: &str) -> Option<(String, Coordinate)> {
    let parts: Vec<&str> = record.split(RECORD_DELIMITER).collect();
    let [name, latitude, longitude] = parts.as_slice() else {
        return None;
    };

    let latitude: f64 = latitude.parse().ok()?;
    let longitude: f64 = longitude.parse().ok()?;
    Some((name.to_string(), Coordinate::new(latitude, longitude)))
}

/// In-memory favorites kept in sync with durable storage.
///
/// Within one process this is the only writer of the favorites key.
pub struct FavoritesStore {
    store: SharedStore,
    favorites: Favorites,
}

impl FavoritesStore {
    /// Create the store and load whatever favorites are already persisted
    pub fn open(store: SharedStore) -> Self {
        let mut favorites_store = Self {
            store,
            favorites: Favorites::new(),
        };
        favorites_store.favorites = favorites_store.load();
        info!("Loaded {} favorite locations", favorites_store.favorites.len());
        favorites_store
    }

    /// Read every favorite from durable storage. Never fails: unreadable
    /// storage yields an empty map and malformed records are skipped.
    pub fn load(&self) -> Favorites {
        let records = match self.store.get_string_set(FAVORITE_LOCATIONS_KEY) {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                error!("Failed to read favorite locations: {}", e);
                return Favorites::new();
            }
        };

        records
            .iter()
            .filter_map(|record| {
                let decoded = decode_record(record);
                if decoded.is_none() {
                    warn!("Failed to parse favorite record: {}", record);
                }
                decoded
            })
            .collect()
    }

    /// Overwrite the persisted set with `favorites` in a single write
    pub fn save(&self, favorites: &Favorites) -> Result<(), FavoritesError> {
        let records: BTreeSet<String> = favorites
            .iter()
            .map(|(name, coordinate)| encode_record(name, coordinate))
            .collect();

        debug!("Saving {} favorite records", records.len());
        self.store.put_string_set(FAVORITE_LOCATIONS_KEY, records)?;
        Ok(())
    }

    /// Pick up changes another writer made to durable storage
    pub fn reload(&mut self) {
        self.favorites = self.load();
    }

    /// Insert or overwrite `name`, then persist. Starts from what is
    /// currently stored, so entries saved by another writer are kept.
    pub fn put(&mut self, name: &str, coordinate: Coordinate) -> Result<(), FavoritesError> {
        validate_name(name)?;

        let mut updated = self.load();
        updated.insert(name.to_string(), coordinate);
        self.save(&updated)?;
        self.favorites = updated;

        info!("Saved favorite '{}' at {}", name, coordinate);
        Ok(())
    }

    /// Delete `name` if present, then persist. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> Result<bool, FavoritesError> {
        let mut updated = self.load();
        let existed = updated.remove(name).is_some();
        self.save(&updated)?;
        self.favorites = updated;

        if existed {
            info!("Removed favorite '{}'", name);
        } else {
            debug!("Favorite '{}' not present, nothing removed", name);
        }
        Ok(existed)
    }

    pub fn get(&self, name: &str) -> Option<Coordinate> {
        self.favorites.get(name).copied()
    }

    /// Entries in name order, for display
    pub fn entries(&self) -> Vec<FavoriteEntry> {
        self.favorites
            .iter()
            .map(|(name, coordinate)| FavoriteEntry {
                name: name.clone(),
                coordinate: *coordinate,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }
}

fn validate_name(name: &str) -> Result<(), FavoritesError> {
    if name.is_empty() {
        return Err(FavoritesError::EmptyName);
    }
    if name.contains(RECORD_DELIMITER) {
        return Err(FavoritesError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn memory_store() -> SharedStore {
        Arc::new(MemoryStore::new())
    }

    fn seed(store: &SharedStore, records: &[&str]) {
        let records = records.iter().map(|r| r.to_string()).collect();
        store.put_string_set(FAVORITE_LOCATIONS_KEY, records).unwrap();
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = memory_store();
        let favorites_store = FavoritesStore::open(store);

        let mut favorites = Favorites::new();
        favorites.insert("Home".to_string(), Coordinate::new(41.3111, 69.2797));
        favorites.insert("North Pole".to_string(), Coordinate::new(90.0, 0.0));
        favorites.insert("Antimeridian".to_string(), Coordinate::new(-0.000001, -180.0));
        favorites.insert("Campus".to_string(), Coordinate::new(41.34114558450147, 69.28677201284974));
        favorites.insert("Новый дом 🏠".to_string(), Coordinate::new(-33.8688, 151.2093));

        favorites_store.save(&favorites).unwrap();
        assert_eq!(favorites_store.load(), favorites);
    }

    #[test]
    fn test_record_with_two_fields_is_dropped() {
        let store = memory_store();
        seed(&store, &["Tashkent:41.3", "Home:41.3111:69.2797"]);

        let loaded = FavoritesStore::open(store).load();
        assert!(!loaded.contains_key("Tashkent"));
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_record_with_non_numeric_latitude_is_dropped() {
        let store = memory_store();
        seed(&store, &["Tashkent:abc:69.28", "Tokyo:35.6762:xyz"]);

        assert!(FavoritesStore::open(store).load().is_empty());
    }

    #[test]
    fn test_name_with_delimiter_is_dropped_on_load() {
        let store = memory_store();
        seed(&store, &["Site:B:41.3:69.2"]);

        assert!(FavoritesStore::open(store).load().is_empty());
    }

    #[test]
    fn test_put_then_load() {
        let store = memory_store();
        let mut favorites_store = FavoritesStore::open(store.clone());

        favorites_store.put("Home", Coordinate::new(41.3111, 69.2797)).unwrap();

        let reopened = FavoritesStore::open(store);
        assert_eq!(reopened.load().get("Home"), Some(&Coordinate::new(41.3111, 69.2797)));
        assert_eq!(reopened.get("Home"), Some(Coordinate::new(41.3111, 69.2797)));
    }

    #[test]
    fn test_put_overwrites_existing_name() {
        let mut favorites_store = FavoritesStore::open(memory_store());

        favorites_store.put("Home", Coordinate::new(1.0, 2.0)).unwrap();
        favorites_store.put("Home", Coordinate::new(3.0, 4.0)).unwrap();

        assert_eq!(favorites_store.len(), 1);
        assert_eq!(favorites_store.load().get("Home"), Some(&Coordinate::new(3.0, 4.0)));
    }

    #[test]
    fn test_remove_last_favorite_leaves_empty_store() {
        let store = memory_store();
        let mut favorites_store = FavoritesStore::open(store.clone());
        favorites_store.put("Home", Coordinate::new(41.3111, 69.2797)).unwrap();

        assert!(favorites_store.remove("Home").unwrap());
        assert!(favorites_store.is_empty());
        assert!(FavoritesStore::open(store).load().is_empty());
    }

    #[test]
    fn test_remove_missing_name_is_noop() {
        let mut favorites_store = FavoritesStore::open(memory_store());
        favorites_store.put("Home", Coordinate::new(1.0, 2.0)).unwrap();

        assert!(!favorites_store.remove("Work").unwrap());
        assert_eq!(favorites_store.len(), 1);
    }

    #[test]
    fn test_put_rejects_unstorable_names() {
        let mut favorites_store = FavoritesStore::open(memory_store());

        assert!(matches!(
            favorites_store.put("", Coordinate::new(0.0, 0.0)),
            Err(FavoritesError::EmptyName)
        ));
        assert!(matches!(
            favorites_store.put("Gate:B", Coordinate::new(0.0, 0.0)),
            Err(FavoritesError::InvalidName(_))
        ));
        assert!(favorites_store.is_empty());
    }

    #[test]
    fn test_put_keeps_entries_from_another_writer() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        let open = || -> SharedStore { Arc::new(JsonFileStore::open(&path).unwrap()) };

        let mut tui = FavoritesStore::open(open());
        let mut cli = FavoritesStore::open(open());

        cli.put("Work", Coordinate::new(51.5074, -0.1278)).unwrap();
        tui.put("Home", Coordinate::new(41.3111, 69.2797)).unwrap();

        assert_eq!(tui.len(), 2);
        assert_eq!(tui.get("Work"), Some(Coordinate::new(51.5074, -0.1278)));

        let names: Vec<String> = FavoritesStore::open(open())
            .entries()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Home", "Work"]);

        cli.remove("Home").unwrap();
        tui.reload();
        assert_eq!(tui.get("Home"), None);
        assert_eq!(tui.len(), 1);
    }

    #[test]
    fn test_entries_are_sorted_by_name() {
        let mut favorites_store = FavoritesStore::open(memory_store());
        favorites_store.put("Work", Coordinate::new(1.0, 1.0)).unwrap();
        favorites_store.put("Home", Coordinate::new(2.0, 2.0)).unwrap();

        let names: Vec<String> = favorites_store.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Home", "Work"]);
    }

    #[test]
    fn test_record_encoding() {
        assert_eq!(encode_record("Home", &Coordinate::new(41.3111, 69.2797)), "Home:41.3111:69.2797");
        assert_eq!(encode_record("Zero", &Coordinate::new(0.0, -0.1278)), "Zero:0:-0.1278");
        assert_eq!(
            decode_record("Home:41.3111:69.2797"),
            Some(("Home".to_string(), Coordinate::new(41.3111, 69.2797)))
        );
    }
}
