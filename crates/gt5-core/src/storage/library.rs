//! Saved-drawing list kept under a single storage key.

use super::{Storage, StorageError, StorageResult};
use crate::canvas::DrawingData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key holding the JSON array of saved drawings.
pub const DRAWINGS_KEY: &str = "gt5-drawings";

/// A saved drawing as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDrawing {
    /// Save time in unix milliseconds, unique within the library.
    pub id: i64,
    pub name: String,
    pub date: DateTime<Utc>,
    pub data: DrawingData,
}

/// Listing entry: a saved drawing without its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingSummary {
    pub id: i64,
    pub name: String,
    pub date: DateTime<Utc>,
}

impl From<&SavedDrawing> for DrawingSummary {
    fn from(saved: &SavedDrawing) -> Self {
        Self {
            id: saved.id,
            name: saved.name.clone(),
            date: saved.date,
        }
    }
}

/// The list of saved drawings on top of a storage backend.
pub struct DrawingLibrary<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> DrawingLibrary<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    async fn read_all(&self) -> StorageResult<Vec<SavedDrawing>> {
        match self.storage.get(DRAWINGS_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| StorageError::Serialization(format!("{DRAWINGS_KEY}: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    async fn write_all(&self, drawings: &[SavedDrawing]) -> StorageResult<()> {
        let json = serde_json::to_string(drawings)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(DRAWINGS_KEY, &json).await
    }

    /// Save a drawing now. Returns its id.
    pub async fn save(&self, data: DrawingData, name: Option<&str>) -> StorageResult<i64> {
        self.save_at(data, name, Utc::now()).await
    }

    /// Save a drawing with an explicit timestamp. Returns its id.
    ///
    /// Unnamed drawings are called `Drawing N`, N being the new list length.
    pub async fn save_at(
        &self,
        data: DrawingData,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> StorageResult<i64> {
        let mut drawings = self.read_all().await?;

        let newest = drawings.iter().map(|d| d.id).max();
        let id = match newest {
            Some(newest) if newest >= now.timestamp_millis() => newest + 1,
            _ => now.timestamp_millis(),
        };
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Drawing {}", drawings.len() + 1),
        };

        log::info!("Saving drawing {id} as {name:?}");
        drawings.push(SavedDrawing {
            id,
            name,
            date: now,
            data,
        });
        self.write_all(&drawings).await?;
        Ok(id)
    }

    /// Load a saved drawing's data.
    pub async fn load(&self, id: i64) -> StorageResult<Option<DrawingData>> {
        let drawings = self.read_all().await?;
        Ok(drawings.into_iter().find(|d| d.id == id).map(|d| d.data))
    }

    /// Summaries of all saved drawings, oldest first.
    pub async fn list(&self) -> StorageResult<Vec<DrawingSummary>> {
        let drawings = self.read_all().await?;
        Ok(drawings.iter().map(DrawingSummary::from).collect())
    }

    /// Delete a saved drawing. Returns whether it existed.
    pub async fn delete(&self, id: i64) -> StorageResult<bool> {
        let mut drawings = self.read_all().await?;
        let before = drawings.len();
        drawings.retain(|d| d.id != id);
        if drawings.len() == before {
            return Ok(false);
        }
        self.write_all(&drawings).await?;
        log::info!("Deleted drawing {id}");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawingStore;
    use crate::storage::{FileStorage, MemoryStorage};
    use pollster::block_on;

    fn data() -> DrawingData {
        DrawingStore::default().to_data()
    }

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_empty_library() {
        let library = DrawingLibrary::new(Arc::new(MemoryStorage::new()));
        assert!(block_on(library.list()).unwrap().is_empty());
        assert_eq!(block_on(library.load(1)).unwrap(), None);
    }

    #[test]
    fn test_save_and_load() {
        let library = DrawingLibrary::new(Arc::new(MemoryStorage::new()));
        let id = block_on(library.save_at(data(), Some("Sunset"), at(1_700_000_000_000))).unwrap();
        assert_eq!(id, 1_700_000_000_000);
        assert_eq!(block_on(library.load(id)).unwrap(), Some(data()));

        let list = block_on(library.list()).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Sunset");
        assert_eq!(list[0].date, at(1_700_000_000_000));
    }

    #[test]
    fn test_default_names() {
        let library = DrawingLibrary::new(Arc::new(MemoryStorage::new()));
        block_on(library.save_at(data(), None, at(1))).unwrap();
        block_on(library.save_at(data(), Some("  "), at(2))).unwrap();
        let names: Vec<String> = block_on(library.list())
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Drawing 1", "Drawing 2"]);
    }

    #[test]
    fn test_ids_stay_unique_within_one_millisecond() {
        let library = DrawingLibrary::new(Arc::new(MemoryStorage::new()));
        let a = block_on(library.save_at(data(), None, at(500))).unwrap();
        let b = block_on(library.save_at(data(), None, at(500))).unwrap();
        let c = block_on(library.save_at(data(), None, at(400))).unwrap();
        assert_eq!((a, b, c), (500, 501, 502));
    }

    #[test]
    fn test_stored_format() {
        let storage = Arc::new(MemoryStorage::new());
        let library = DrawingLibrary::new(Arc::clone(&storage));
        block_on(library.save_at(data(), Some("A"), at(0))).unwrap();

        let json = block_on(storage.get(DRAWINGS_KEY)).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &value[0];
        assert_eq!(entry["id"], 0);
        assert_eq!(entry["name"], "A");
        assert_eq!(entry["date"], "1970-01-01T00:00:00Z");
        assert_eq!(entry["data"]["canvasSize"]["width"], 800);
        assert_eq!(entry["data"]["layers"][0]["name"], "Layer 1");
    }

    #[test]
    fn test_corrupt_list_is_an_error() {
        let storage = Arc::new(MemoryStorage::new());
        block_on(storage.set(DRAWINGS_KEY, "not json")).unwrap();
        let library = DrawingLibrary::new(storage);
        assert!(matches!(
            block_on(library.list()),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_delete() {
        let library = DrawingLibrary::new(Arc::new(MemoryStorage::new()));
        let id = block_on(library.save_at(data(), None, at(10))).unwrap();
        assert!(block_on(library.delete(id)).unwrap());
        assert!(!block_on(library.delete(id)).unwrap());
        assert!(block_on(library.list()).unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_file_backends() {
        let dir = tempfile::tempdir().unwrap();
        let first = DrawingLibrary::new(Arc::new(FileStorage::new(dir.path()).unwrap()));
        let id = block_on(first.save(data(), Some("Kept"))).unwrap();

        let second = DrawingLibrary::new(Arc::new(FileStorage::new(dir.path()).unwrap()));
        assert_eq!(block_on(second.load(id)).unwrap(), Some(data()));
    }
}
