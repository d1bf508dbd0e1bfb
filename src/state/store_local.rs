use crate::data_model::COLLECTIONS;
use crate::state::store::{Store, StoreError};
use async_trait::async_trait;
use log::{error, info};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::PathBuf;

/// File-backed store: `<path>/collection/<name>/<id>/data.js`, with the last
/// allocated id of each collection kept in `<path>/collection/<name>/cnt`.
#[derive(Debug, Clone, Default)]
pub struct StoreLocal {
    pub path: PathBuf,
    pub items: HashMap<String, BTreeSet<u64>>,
    pub items_count: HashMap<String, u64>,
}

impl StoreLocal {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.path.join("collection").join(collection)
    }

    fn item_path(&self, collection: &str, id: u64) -> PathBuf {
        self.collection_path(collection).join(id.to_string())
    }

    fn ids(&self, collection: &str) -> Result<&BTreeSet<u64>, StoreError> {
        self.items
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }

    fn write_count(&mut self, collection: &str, cnt: u64) -> Result<(), StoreError> {
        fs::write(self.collection_path(collection).join("cnt"), cnt.to_string())?;
        self.items_count.insert(collection.to_string(), cnt);
        Ok(())
    }

    fn load_collection(&mut self, collection: &str) -> Result<(), StoreError> {
        let coll_path = self.collection_path(collection);
        fs::create_dir_all(&coll_path)?;

        let mut ids = BTreeSet::new();
        for entry in fs::read_dir(&coll_path)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().to_string_lossy().parse::<u64>() {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(_) => error!("Skipping {:?} in collection {}", entry.file_name(), collection),
            }
        }

        let stored_cnt = match fs::read_to_string(coll_path.join("cnt")) {
            Ok(text) => text.trim().parse::<u64>().unwrap_or_else(|_| {
                error!("Failed to parse counter {}", text.trim());
                0
            }),
            Err(_) => 0,
        };
        let cnt = std::cmp::max(stored_cnt, ids.last().copied().unwrap_or(0));

        info!("New collection {}", collection);
        info!(" - items: {}", ids.len());
        info!(" - counter: {}", cnt);

        self.items.insert(collection.to_string(), ids);
        self.items_count.insert(collection.to_string(), cnt);
        Ok(())
    }
}

#[async_trait]
impl Store for StoreLocal {
    async fn connect(&mut self, url: &str) -> Result<(), StoreError> {
        self.path = PathBuf::from(url);
        for collection in COLLECTIONS {
            self.load_collection(collection)?;
        }
        Ok(())
    }

    async fn disconnect(&mut self) {
        self.items.clear();
        self.items_count.clear();
    }

    async fn get_item(&mut self, collection: &str, id: u64) -> Result<Option<Value>, StoreError> {
        if !self.ids(collection)?.contains(&id) {
            return Ok(None);
        }
        let text = fs::read_to_string(self.item_path(collection, id).join("data.js"))?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn get_all_items(&mut self, collection: &str) -> Result<BTreeMap<u64, Value>, StoreError> {
        let ids: Vec<u64> = self.ids(collection)?.iter().copied().collect();
        let mut map = BTreeMap::new();
        for id in ids {
            let text = fs::read_to_string(self.item_path(collection, id).join("data.js"))?;
            map.insert(id, serde_json::from_str(&text)?);
        }
        Ok(map)
    }

    async fn set_item(&mut self, collection: &str, id: u64, itm: &Value) -> Result<(), StoreError> {
        self.ids(collection)?;
        let item_path = self.item_path(collection, id);
        fs::create_dir_all(&item_path)?;
        fs::write(item_path.join("data.js"), serde_json::to_string(itm)?)?;

        if let Some(ids) = self.items.get_mut(collection) {
            ids.insert(id);
        }
        let cnt = self.items_count.get(collection).copied().unwrap_or(0);
        if id > cnt {
            self.write_count(collection, id)?;
        }
        Ok(())
    }

    async fn del_item(&mut self, collection: &str, id: u64) -> Result<bool, StoreError> {
        if !self.ids(collection)?.contains(&id) {
            return Ok(false);
        }
        fs::remove_dir_all(self.item_path(collection, id))?;
        if let Some(ids) = self.items.get_mut(collection) {
            ids.remove(&id);
        }
        Ok(true)
    }

    async fn next_id(&mut self, collection: &str) -> Result<u64, StoreError> {
        self.ids(collection)?;
        let id = self.items_count.get(collection).copied().unwrap_or(0) + 1;
        self.write_count(collection, id)?;
        Ok(id)
    }
}
