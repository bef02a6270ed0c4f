//! [`BucketClient`] on top of any [`object_store::ObjectStore`].
//!
//! Production wires an S3 store in; tests use `object_store::memory::InMemory`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};

use crate::contract::{BucketClient, ObjectBody, PutObject, StorageError};

#[derive(Debug, Clone)]
pub struct ObjectStoreBucket {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreBucket {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// The wrapped store, for direct inspection in tests.
    pub fn inner(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

#[async_trait]
impl BucketClient for ObjectStoreBucket {
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = Path::from(prefix.trim_end_matches('/'));
        tracing::debug!(prefix = %prefix, "Listing objects with delimiter");
        let listing = self.store.list_with_delimiter(Some(&prefix)).await?;
        let keys: Vec<String> = listing
            .objects
            .into_iter()
            .map(|meta| meta.location.to_string())
            .collect();
        tracing::debug!(prefix = %prefix, count = keys.len(), "Listed objects");
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<ObjectBody, StorageError> {
        let location = Path::from(key);
        let result = self.store.get(&location).await?;
        tracing::debug!(key, size = result.meta.size, "Opened object body");
        Ok(result
            .into_stream()
            .map_err(|e| -> StorageError { Box::new(e) })
            .boxed())
    }

    async fn put(&self, object: PutObject) -> Result<(), StorageError> {
        let location = Path::from(object.key.as_str());
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, object.content_type.into());
        if let Some(cache_control) = object.cache_control {
            attributes.insert(Attribute::CacheControl, cache_control.into());
        }
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };
        let size = object.body.len();
        self.store
            .put_opts(&location, PutPayload::from(object.body), opts)
            .await?;
        tracing::debug!(key = %location, size, "Stored object");
        Ok(())
    }
}
