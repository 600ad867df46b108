// Persistence for the user's favorite vehicles

use std::{
    collections::BTreeSet,
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::Mutex,
};

use crate::{error::StoreError, models::VehicleId};

pub type FavoriteSet = BTreeSet<VehicleId>;

/// Key-value style store the view session reads once at mount and writes back
/// after every favorite toggle.
pub trait FavoritesStore: Send + Sync {
    fn load(&self) -> Result<FavoriteSet, StoreError>;
    fn save(&self, favorites: &FavoriteSet) -> Result<(), StoreError>;
}

// Favorites kept as a JSON array of ids in a local file
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes writers so two saves never share the temp file
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into(), write_lock: Mutex::new(()) }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl FavoritesStore for JsonFileStore {
    fn load(&self) -> Result<FavoriteSet, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FavoriteSet::new()),
            Err(e) => return Err(e.into()),
        };
        let ids: Vec<VehicleId> = serde_json::from_str(&content)?;
        Ok(ids.into_iter().collect())
    }

    // Written to a sibling temp file, then renamed over the old one, so a
    // crash mid-write never leaves a truncated favorites file behind
    fn save(&self, favorites: &FavoriteSet) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let ids: Vec<&VehicleId> = favorites.iter().collect();
        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_string(&ids)?)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) struct MemoryStore {
    favorites: std::sync::Mutex<FavoriteSet>,
}

#[cfg(test)]
impl MemoryStore {
    pub(crate) fn with(ids: &[VehicleId]) -> Self {
        MemoryStore { favorites: std::sync::Mutex::new(ids.iter().cloned().collect()) }
    }

    pub(crate) fn snapshot(&self) -> FavoriteSet {
        self.favorites.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl FavoritesStore for MemoryStore {
    fn load(&self) -> Result<FavoriteSet, StoreError> {
        self.favorites.lock().map(|f| f.clone()).map_err(|_| StoreError::Poisoned)
    }

    fn save(&self, favorites: &FavoriteSet) -> Result<(), StoreError> {
        let mut guard = self.favorites.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = favorites.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("autocatalog-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_loads_empty_set() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_round_trips_mixed_ids() {
        let path = temp_path("roundtrip");
        let store = JsonFileStore::new(&path);
        let favorites: FavoriteSet = [VehicleId::Number(3), VehicleId::parse("abc")].into_iter().collect();

        store.save(&favorites).unwrap();
        let loaded = store.load().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, favorites);
    }

    #[test]
    fn test_save_replaces_file_without_leaving_temp_behind() {
        let path = temp_path("replace");
        let store = JsonFileStore::new(&path);
        store.save(&[VehicleId::Number(1), VehicleId::Number(2)].into_iter().collect()).unwrap();
        store.save(&[VehicleId::Number(7)].into_iter().collect()).unwrap();

        let on_disk = fs::read_to_string(&path).unwrap();
        let temp_left = store.temp_path().exists();
        fs::remove_file(&path).ok();

        assert_eq!(on_disk, "[7]");
        assert!(!temp_left);
    }

    #[test]
    fn test_string_ids_on_disk_match_numeric_ids() {
        let path = temp_path("legacy");
        fs::write(&path, r#"[1, "2"]"#).unwrap();
        let loaded = JsonFileStore::new(&path).load().unwrap();
        fs::remove_file(&path).ok();

        assert!(loaded.contains(&VehicleId::Number(2)));
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();
        let result = JsonFileStore::new(&path).load();
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
