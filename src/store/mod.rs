// Collection store module
// Owns the in-memory dish collection and its JSON snapshot on disk

mod dish;
mod error;
mod snapshot;

use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub use dish::Dish;
pub use error::StoreError;

/// The authoritative dish collection.
///
/// All access goes through one reader-writer lock. Writers hold it across id
/// assignment, mutation and save, so identifiers stay unique and snapshots
/// never interleave. A write is staged on a copy and only published once the
/// snapshot reached disk: a failed save leaves the collection untouched.
pub struct DishStore {
    path: PathBuf,
    atomic_writes: bool,
    dishes: RwLock<Vec<Dish>>,
}

impl DishStore {
    /// Create a store over an already loaded collection
    pub fn new(path: impl Into<PathBuf>, atomic_writes: bool, dishes: Vec<Dish>) -> Self {
        Self {
            path: path.into(),
            atomic_writes,
            dishes: RwLock::new(dishes),
        }
    }

    /// Load the data file at `path`. Fails if it is missing or malformed.
    pub fn open(path: impl Into<PathBuf>, atomic_writes: bool) -> Result<Self, StoreError> {
        let path = path.into();
        let dishes = snapshot::load(&path)?;
        crate::logger::log_info(&format!(
            "Loaded {} dishes from {}",
            dishes.len(),
            path.display()
        ));
        Ok(Self::new(path, atomic_writes, dishes))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All dishes in insertion order
    pub async fn list(&self) -> Vec<Dish> {
        self.dishes.read().await.clone()
    }

    pub async fn get(&self, id: i64) -> Option<Dish> {
        self.dishes.read().await.iter().find(|d| d.id == id).cloned()
    }

    /// Append `dish` under a fresh identifier, ignoring the id it carries
    pub async fn create(&self, mut dish: Dish) -> Result<Dish, StoreError> {
        self.commit(|dishes| {
            dish.id = next_id(dishes)?;
            dishes.push(dish.clone());
            Ok(dish)
        })
        .await
    }

    /// Replace every field but the id of dish `id`
    pub async fn replace(&self, id: i64, dish: Dish) -> Result<Dish, StoreError> {
        self.commit(|dishes| {
            let existing = dishes
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or(StoreError::NotFound(id))?;
            existing.replace_with(dish);
            Ok(existing.clone())
        })
        .await
    }

    /// Remove dish `id`, keeping the order of the rest
    pub async fn remove(&self, id: i64) -> Result<Dish, StoreError> {
        self.commit(|dishes| {
            let index = dishes
                .iter()
                .position(|d| d.id == id)
                .ok_or(StoreError::NotFound(id))?;
            Ok(dishes.remove(index))
        })
        .await
    }

    /// Apply `mutate` to a staged copy, persist it, then publish it.
    ///
    /// Nothing is written when `mutate` fails.
    async fn commit<T, F>(&self, mutate: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Vec<Dish>) -> Result<T, StoreError>,
    {
        let mut live = self.dishes.write().await;
        let mut staged = live.clone();

        let out = mutate(&mut staged)?;

        snapshot::save(&self.path, &staged, self.atomic_writes)?;
        *live = staged;
        Ok(out)
    }
}

/// One more than the largest identifier present, 1 for an empty collection
pub fn next_id(dishes: &[Dish]) -> Result<i64, StoreError> {
    let max = dishes.iter().map(|d| d.id).max().unwrap_or(0).max(0);
    max.checked_add(1).ok_or(StoreError::IdsExhausted(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Dish {
        Dish {
            name: name.to_string(),
            ..Dish::default()
        }
    }

    fn with_id(id: i64) -> Dish {
        Dish {
            id,
            ..Dish::default()
        }
    }

    fn temp_store(dir: &tempfile::TempDir) -> DishStore {
        DishStore::new(dir.path().join("dishes.json"), true, Vec::new())
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[]).unwrap(), 1);
        assert_eq!(next_id(&[with_id(3), with_id(1)]).unwrap(), 4);
        assert_eq!(next_id(&[with_id(-5)]).unwrap(), 1);
        assert!(matches!(
            next_id(&[with_id(i64::MAX)]),
            Err(StoreError::IdsExhausted(_))
        ));
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        for expected in 1..=5 {
            let mut dish = named("Dish");
            dish.id = 42;
            let created = store.create(dish).await.unwrap();
            assert_eq!(created.id, expected);
        }

        let ids: Vec<i64> = store.list().await.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_writes_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        store.create(named("Paella")).await.unwrap();
        store.create(named("Tortilla")).await.unwrap();
        store.replace(2, named("Tortilla de patatas")).await.unwrap();
        store.remove(1).await.unwrap();

        let reopened = DishStore::open(store.path(), true).unwrap();
        assert_eq!(reopened.list().await, store.list().await);
        assert_eq!(reopened.get(2).await.unwrap().name, "Tortilla de patatas");
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        store.create(named("Paella")).await.unwrap();
        store.create(named("Tortilla")).await.unwrap();
        store.remove(1).await.unwrap();
        assert_eq!(store.create(named("Gazpacho")).await.unwrap().id, 3);

        // Only ids above the maximum are handed out
        store.remove(3).await.unwrap();
        assert_eq!(store.create(named("Churros")).await.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_remove_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        for name in ["a", "b", "c", "d"] {
            store.create(named(name)).await.unwrap();
        }

        let removed = store.remove(2).await.unwrap();
        assert_eq!(removed.name, "b");

        let names: Vec<String> = store.list().await.into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[tokio::test]
    async fn test_missing_id_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        assert!(matches!(
            store.replace(9, named("x")).await,
            Err(StoreError::NotFound(9))
        ));
        assert!(matches!(store.remove(9).await, Err(StoreError::NotFound(9))));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_collection_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("dishes.json");
        let store = DishStore::new(&path, true, vec![Dish {
            id: 1,
            name: "Paella".to_string(),
            ..Dish::default()
        }]);

        assert!(store.create(named("Tortilla")).await.is_err());
        assert!(store.replace(1, named("Changed")).await.is_err());
        assert!(store.remove(1).await.is_err());

        let dishes = store.list().await;
        assert_eq!(dishes.len(), 1);
        assert_eq!(dishes[0].name, "Paella");
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_unique_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(temp_store(&dir));

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move { store.create(named(&format!("d{i}"))).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut ids: Vec<i64> = store.list().await.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = DishStore::open(dir.path().join("dishes.json"), true);
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
