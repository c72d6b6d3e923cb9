use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Write side of a blob store. Returns a location for the written object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String>;
}

/// Amazon S3, or any S3-compatible service when an endpoint is configured.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    base_url: String,
}

impl S3ObjectStore {
    pub async fn from_config(config: &StorageConfig) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        let base_url = match &config.endpoint {
            Some(endpoint) => {
                builder = builder.endpoint_url(endpoint).force_path_style(true);
                format!("{}/{}", endpoint, config.bucket)
            }
            None => format!("https://{}.s3.{}.amazonaws.com", config.bucket, config.region),
        };

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            base_url,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(DisplayErrorContext(&e).to_string()))?;

        Ok(format!("{}/{}", self.base_url, key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-process store that remembers objects in write order.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<Vec<StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every object written so far, oldest first.
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects().into_iter().rev().find(|object| object.key == key)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))?;
        objects.push(StoredObject {
            key: key.to_string(),
            body,
            content_type: content_type.to_string(),
        });
        Ok(format!("memory://{}", key))
    }
}

/// Key for one archive of a run: `{prefix}{timestamp}.json`, with the
/// timestamp's colons and periods swapped for hyphens.
pub fn archive_key(prefix: &str, timestamp: &str) -> String {
    format!("{}{}.json", prefix, timestamp.replace([':', '.'], "-"))
}

/// Writes record batches as pretty-printed JSON documents.
#[derive(Clone)]
pub struct ArchiveStore {
    store: Arc<dyn ObjectStore>,
}

impl ArchiveStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Stores `records` under `key` and returns the resulting location.
    ///
    /// An empty batch means something upstream went wrong, so it is refused
    /// with [`AppError::EmptyPayload`] instead of writing an empty document.
    #[instrument(level = "info", skip_all, fields(%key, count = records.len()))]
    pub async fn archive<T: Serialize>(&self, key: &str, records: &[T]) -> Result<String> {
        if records.is_empty() {
            return Err(AppError::EmptyPayload);
        }

        let body = serde_json::to_vec_pretty(records)?;
        let bytes = body.len();
        let location = self.store.put(key, body, JSON_CONTENT_TYPE).await?;

        info!(%location, bytes, "Archived records");
        Ok(location)
    }
}
