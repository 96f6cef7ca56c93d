use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::StorageError;
use crate::storage::{ObjectStore, StoredObject};

/// メモリ上のオブジェクトストレージ
///
/// 登録されていないキーは `NoSuchKey` になる。
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    objects: HashMap<(String, String), Result<StoredObject, StorageError>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, bucket: &str, key: &str, object: StoredObject) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), Ok(object));
        self
    }

    /// 指定キーの取得を常に失敗させる
    pub fn with_failure(mut self, bucket: &str, key: &str, error: StorageError) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), Err(error));
        self
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .unwrap_or_else(|| {
                Err(StorageError::NoSuchKey {
                    key: key.to_string(),
                })
            })
    }
}
