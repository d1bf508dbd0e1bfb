use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MongoDB: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("BSON encoding: {0}")]
    BsonSer(#[from] mongodb::bson::ser::Error),

    #[error("BSON decoding: {0}")]
    BsonDe(#[from] mongodb::bson::de::Error),

    #[error("Unknown collection {0}")]
    UnknownCollection(String),

    #[error("Store is not connected")]
    NotConnected,
}

/// Backend for record collections. Records travel as JSON objects carrying
/// their own `id` field; ids are unique per collection.
#[async_trait]
pub trait Store: Send {
    async fn connect(&mut self, url: &str) -> Result<(), StoreError>;
    async fn disconnect(&mut self);

    async fn get_item(&mut self, collection: &str, id: u64) -> Result<Option<Value>, StoreError>;
    async fn get_all_items(&mut self, collection: &str) -> Result<BTreeMap<u64, Value>, StoreError>;

    async fn set_item(&mut self, collection: &str, id: u64, itm: &Value) -> Result<(), StoreError>;
    async fn del_item(&mut self, collection: &str, id: u64) -> Result<bool, StoreError>;

    /// Reserve the next free id in `collection`.
    async fn next_id(&mut self, collection: &str) -> Result<u64, StoreError>;
}
