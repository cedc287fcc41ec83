//! In-memory object store / 内存对象存储
//!
//! A flat key/value bucket with real prefix+delimiter listing semantics,
//! matching what an S3-compatible backend returns. Used by the orchestration
//! tests so they exercise genuine hierarchy emulation.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{ObjectInfo, ObjectListing, ObjectStore, ProgressCallback};

#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    last_modified: DateTime<Utc>,
}

/// 内存存储桶
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects / 对象数量
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// All keys under a prefix / 前缀下的全部键
    pub fn keys_under(&self, prefix: &str) -> Vec<String> {
        self.objects
            .read()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_objects(&self, prefix: &str, delimiter: Option<&str>) -> Result<ObjectListing> {
        let objects = self.objects.read();
        let mut listing = ObjectListing::default();
        let mut seen_prefixes = BTreeSet::new();

        for (key, obj) in objects.iter() {
            let Some(rest) = key.strip_prefix(prefix) else {
                continue;
            };

            // Group keys at the first delimiter past the prefix into a
            // common prefix, the way S3 derives one-level-deep "folders".
            if let Some(delim) = delimiter {
                if let Some(pos) = rest.find(delim) {
                    let common = format!("{}{}", prefix, &rest[..pos + delim.len()]);
                    if seen_prefixes.insert(common.clone()) {
                        listing.common_prefixes.push(common);
                    }
                    continue;
                }
            }

            listing.contents.push(ObjectInfo {
                key: key.clone(),
                last_modified: Some(obj.last_modified),
                size: obj.body.len() as u64,
            });
        }

        Ok(listing)
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        progress: Option<ProgressCallback>,
    ) -> Result<()> {
        let total = body.len() as u64;
        if let Some(cb) = &progress {
            cb(0, total);
        }

        self.objects.write().insert(
            key.to_string(),
            StoredObject {
                body,
                last_modified: Utc::now(),
            },
        );

        if let Some(cb) = &progress {
            cb(total, total);
        }
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        // Deleting an absent key succeeds, matching S3 semantics
        self.objects.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(store: &MemoryStore, keys: &[&str]) {
        for key in keys {
            store
                .put_object(key, Bytes::from_static(b"x"), None)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_delimiter_grouping() {
        let store = MemoryStore::new();
        seed(
            &store,
            &["a.txt", "docs/one.txt", "docs/two.txt", "docs/deep/three.txt"],
        )
        .await;

        let root = store.list_objects("", Some("/")).await.unwrap();
        let keys: Vec<&str> = root.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a.txt"]);
        assert_eq!(root.common_prefixes, vec!["docs/"]);

        let docs = store.list_objects("docs/", Some("/")).await.unwrap();
        let keys: Vec<&str> = docs.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["docs/one.txt", "docs/two.txt"]);
        assert_eq!(docs.common_prefixes, vec!["docs/deep/"]);
    }

    #[tokio::test]
    async fn test_no_delimiter_lists_whole_subtree() {
        let store = MemoryStore::new();
        seed(&store, &["docs/one.txt", "docs/deep/two.txt"]).await;

        let all = store.list_objects("docs/", None).await.unwrap();
        assert_eq!(all.contents.len(), 2);
        assert!(all.common_prefixes.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete_object("nope").await.is_ok());
    }
}
