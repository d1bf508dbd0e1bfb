use crate::data_model::COLLECTIONS;
use crate::state::store::{Store, StoreError};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{error, info};
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{
    FindOneAndUpdateOptions, FindOneOptions, FindOptions, IndexOptions, ReplaceOptions,
    ReturnDocument,
};
use mongodb::{Client, Collection, IndexModel};
use serde_json::Value;
use std::collections::BTreeMap;

/// Holds one sequence document per collection.
const COUNTERS: &str = "counters";

#[derive(Debug, Clone)]
pub struct StoreMongo {
    pub db_name: String,
    pub client: Option<Client>,
}

impl StoreMongo {
    pub fn new(db_name: &str) -> Self {
        Self {
            db_name: db_name.to_string(),
            client: None,
        }
    }

    fn coll(&self, collection: &str) -> Result<Collection<Document>, StoreError> {
        if !COLLECTIONS.contains(&collection) && collection != COUNTERS {
            return Err(StoreError::UnknownCollection(collection.to_string()));
        }
        let client = self.client.as_ref().ok_or(StoreError::NotConnected)?;
        Ok(client.database(&self.db_name).collection::<Document>(collection))
    }
}

fn id_filter(id: u64) -> Document {
    doc! { "id": id as i64 }
}

fn no_object_id() -> Document {
    doc! { "_id": 0 }
}

#[async_trait]
impl Store for StoreMongo {
    async fn connect(&mut self, url: &str) -> Result<(), StoreError> {
        let client = Client::with_uri_str(url).await?;
        let db = client.database(&self.db_name);
        let existing = db.list_collection_names(None).await?;

        for collection in COLLECTIONS {
            if !existing.iter().any(|name| name == collection) {
                info!("Create collection {}", collection);
                db.create_collection(collection, None).await?;
            }
            let index = IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();
            db.collection::<Document>(collection)
                .create_index(index, None)
                .await?;
        }

        info!("Connected to {}", self.db_name);
        self.client = Some(client);
        Ok(())
    }

    async fn disconnect(&mut self) {
        self.client = None;
    }

    async fn get_item(&mut self, collection: &str, id: u64) -> Result<Option<Value>, StoreError> {
        let options = FindOneOptions::builder().projection(no_object_id()).build();
        match self.coll(collection)?.find_one(id_filter(id), options).await? {
            Some(document) => Ok(Some(mongodb::bson::from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn get_all_items(&mut self, collection: &str) -> Result<BTreeMap<u64, Value>, StoreError> {
        let options = FindOptions::builder()
            .projection(no_object_id())
            .sort(doc! { "id": 1 })
            .build();
        let mut cursor = self.coll(collection)?.find(doc! {}, options).await?;

        let mut map = BTreeMap::new();
        while let Some(document) = cursor.try_next().await? {
            let itm: Value = mongodb::bson::from_document(document)?;
            match itm.get("id").and_then(Value::as_u64) {
                Some(id) => {
                    map.insert(id, itm);
                }
                None => error!("Document without id in {}", collection),
            }
        }
        Ok(map)
    }

    async fn set_item(&mut self, collection: &str, id: u64, itm: &Value) -> Result<(), StoreError> {
        let document = mongodb::bson::to_document(itm)?;
        let options = ReplaceOptions::builder().upsert(true).build();
        self.coll(collection)?
            .replace_one(id_filter(id), document, options)
            .await?;
        Ok(())
    }

    async fn del_item(&mut self, collection: &str, id: u64) -> Result<bool, StoreError> {
        let res = self.coll(collection)?.delete_one(id_filter(id), None).await?;
        Ok(res.deleted_count > 0)
    }

    async fn next_id(&mut self, collection: &str) -> Result<u64, StoreError> {
        self.coll(collection)?;
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = self
            .coll(COUNTERS)?
            .find_one_and_update(
                doc! { "_id": collection },
                doc! { "$inc": { "seq": 1_i64 } },
                options,
            )
            .await?;

        let seq = counter
            .as_ref()
            .and_then(|c| c.get("seq"))
            .and_then(Bson::as_i64)
            .unwrap_or(1);
        Ok(seq as u64)
    }
}
