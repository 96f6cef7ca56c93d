pub mod client;
pub mod fetch;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

pub use crate::errors::StorageError;
pub use client::StorageProxyClient;
pub use fetch::{OriginalImage, fetch_original};
pub use memory::InMemoryStore;

/// ストレージから取得したオブジェクトとメタデータ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
}

impl StoredObject {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }
}

/// オリジナル画像を保持するオブジェクトストレージ
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        (**self).get_object(bucket, key).await
    }
}
