use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use color_eyre::Result;
use color_eyre::eyre::eyre;

/// Key-addressed byte storage with per-bucket namespaces.
///
/// The handler only ever needs whole-object reads and writes, so the seam is
/// kept that small. Implementations must tolerate concurrent calls, since
/// records in a batch are processed in parallel.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the full body of `key` in `bucket`.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Store `body` under `key` in `bucket`, returning a location descriptor
    /// for the stored object.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str)
    -> Result<String>;
}

/// [`BlobStore`] backed by the AWS S3 SDK.
///
/// The wrapped client is cheap to clone and safe to share across tasks;
/// construct one per process and inject it wherever a store is needed.
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
}

impl S3BlobStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        let body = response.body.collect().await?;
        Ok(body.into_bytes().to_vec())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await?;
        Ok(format!("s3://{bucket}/{key}"))
    }
}

/// In-memory [`BlobStore`] for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.objects
            .lock()
            .expect("store mutex poisoned")
            .insert((bucket.to_string(), key.to_string()), body);
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("store mutex poisoned")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.object(bucket, key)
            .ok_or_else(|| eyre!("no such object: {bucket}/{key}"))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        self.insert(bucket, key, body);
        Ok(format!("memory://{bucket}/{key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryBlobStore::new();
        let location = store
            .put("bucket", "a/b.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(location, "memory://bucket/a/b.png");
        assert_eq!(store.get("bucket", "a/b.png").await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn memory_store_get_of_missing_key_errors() {
        let store = MemoryBlobStore::new();
        assert!(store.get("bucket", "gone.jpg").await.is_err());
    }

    #[tokio::test]
    async fn buckets_are_separate_namespaces() {
        let store = MemoryBlobStore::new();
        store.insert("a", "k", vec![1]);
        store.insert("b", "k", vec![2]);
        assert_eq!(store.get("a", "k").await.unwrap(), vec![1]);
        assert_eq!(store.get("b", "k").await.unwrap(), vec![2]);
    }
}
