//! Recursive delete orchestrator / 递归删除编排
//!
//! The store has no folder primitive: deleting a folder means deleting every
//! object under its prefix. Direct children of one level drain through a
//! bounded worker pool, then each sub-prefix is descended into sequentially.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use parking_lot::Mutex;

use crate::browser::Browser;
use crate::entry::{Entry, EntryKind};

/// Concurrent delete workers per directory level / 每层目录的并发删除数
const DELETE_WORKERS: usize = 3;

/// Settled result of a batch deletion / 批量删除的最终结果
#[derive(Debug, Default)]
pub struct DeleteOutcome {
    pub deleted: usize,
    /// (key, error) per failed entry / 每个失败条目的键和错误
    pub failed: Vec<(String, String)>,
}

impl Browser {
    /// Delete one file entry / 删除单个文件条目
    pub async fn delete_file(&self, entry: &Entry, path: &str) -> Result<()> {
        let key = format!("{}{}", path, entry.key);
        self.store.delete_object(&key).await?;
        tracing::info!("deleted {:?}", key);

        // Folder recursion deletes raw keys directly and owns its own
        // refresh and pending-set cleanup, so this path is standalone only.
        self.pending_delete.write().remove(&entry.key);
        self.refresh().await
    }

    /// Delete a folder entry and its whole subtree / 删除文件夹及其整个子树
    pub async fn delete_folder(&self, entry: &Entry, base_path: &str) -> Result<()> {
        let prefix = if base_path.is_empty() {
            format!("{}/", entry.key)
        } else {
            format!("{}{}/", base_path, entry.key)
        };

        self.delete_prefix(&prefix, DELETE_WORKERS).await?;

        self.pending_delete.write().remove(&entry.key);
        self.refresh().await
    }

    /// Drain one directory level through the worker pool, then recurse
    /// 用工作池清空一层目录，再逐个递归子前缀
    fn delete_prefix<'a>(&'a self, prefix: &'a str, concurrency: usize) -> BoxFuture<'a, Result<()>> {
        async move {
            let listing = self.store.list_objects(prefix, Some("/")).await?;

            let queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(
                listing.contents.into_iter().map(|o| o.key).collect(),
            ));

            // Each worker pops one key at a time from the shared queue, so
            // every object is owned and deleted by exactly one worker.
            let workers = (0..concurrency.max(1)).map(|_| {
                let queue = Arc::clone(&queue);
                async move {
                    loop {
                        let key = queue.lock().pop();
                        let Some(key) = key else {
                            return Ok::<_, anyhow::Error>(());
                        };
                        self.store.delete_object(&key).await?;
                        tracing::debug!("deleted {:?}", key);
                    }
                }
            });

            // The join gates the descent: the next level is not entered
            // until every direct object of this one is gone.
            let mut first_error = None;
            for result in join_all(workers).await {
                if let Err(e) = result {
                    first_error.get_or_insert(e);
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }

            for sub_prefix in listing.common_prefixes {
                self.delete_prefix(&sub_prefix, concurrency).await?;
            }

            Ok(())
        }
        .boxed()
    }

    /// Delete everything currently selected / 删除当前选中的全部条目
    ///
    /// Marks the selection pending, suppresses listing auto-refresh for the
    /// duration of the batch, and dispatches file and folder deletions
    /// concurrently. Items settle independently: partial failure never
    /// aborts siblings.
    pub async fn delete_marked(&self) -> Result<DeleteOutcome> {
        let selected = self.selected_entries();
        self.mark_for_deletion(&selected);
        let targets = self.marked_for_deletion();
        let path = self.current_path();

        self.prevent_refresh.store(true, Ordering::SeqCst);

        let tasks: Vec<_> = targets
            .iter()
            .map(|entry| {
                let path = path.clone();
                async move {
                    let result = match entry.kind {
                        EntryKind::File => self.delete_file(entry, &path).await,
                        EntryKind::Folder => self.delete_folder(entry, &path).await,
                    };
                    (entry.key.clone(), result)
                }
            })
            .collect();

        let settled = join_all(tasks).await;
        self.prevent_refresh.store(false, Ordering::SeqCst);

        let mut outcome = DeleteOutcome::default();
        for (key, result) in settled {
            match result {
                Ok(()) => outcome.deleted += 1,
                Err(e) => {
                    tracing::error!("delete failed for {:?}: {}", key, e);
                    outcome.failed.push((key, e.to_string()));
                }
            }
        }

        if let Err(e) = self.refresh().await {
            tracing::warn!("listing refresh after batch delete failed: {}", e);
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, ObjectStore};
    use bytes::Bytes;

    async fn seeded_store(keys: &[&str]) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for key in keys {
            store
                .put_object(key, Bytes::from_static(b"data"), None)
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_delete_file_refreshes_and_unmarks() {
        let store = seeded_store(&["a.txt", "b.txt"]).await;
        let browser = Browser::with_store(store.clone(), "", ".vortex_placeholder");
        let entries = browser.list(Some("")).await.unwrap();

        browser.mark_for_deletion(&entries[..1]);
        browser.delete_file(&entries[0], "").await.unwrap();

        assert!(browser.marked_for_deletion().is_empty());
        let keys: Vec<String> = browser.entries().iter().map(|e| e.key.clone()).collect();
        assert_eq!(keys, vec!["b.txt"]);
        assert_eq!(store.keys_under(""), vec!["b.txt"]);
    }

    #[tokio::test]
    async fn test_delete_folder_clears_nested_subtree() {
        let store = seeded_store(&[
            "docs/.vortex_placeholder",
            "docs/a.txt",
            "docs/b.txt",
            "docs/deep/c.txt",
            "docs/deep/deeper/d.txt",
            "docs/deep/deeper/e.txt",
            "other.txt",
        ])
        .await;
        let browser = Browser::with_store(store.clone(), "", ".vortex_placeholder");
        let entries = browser.list(Some("")).await.unwrap();

        let folder = entries.iter().find(|e| e.key == "docs").unwrap().clone();
        browser.mark_for_deletion(std::slice::from_ref(&folder));
        browser.delete_folder(&folder, "").await.unwrap();

        // The whole subtree is gone, unrelated keys survive
        assert!(store.keys_under("docs/").is_empty());
        assert_eq!(store.keys_under(""), vec!["other.txt"]);
        assert!(browser.marked_for_deletion().is_empty());

        let keys: Vec<String> = browser.entries().iter().map(|e| e.key.clone()).collect();
        assert_eq!(keys, vec!["other.txt"]);
    }

    #[tokio::test]
    async fn test_delete_folder_with_many_children() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..25 {
            store
                .put_object(&format!("bulk/file{:02}.bin", i), Bytes::from_static(b"x"), None)
                .await
                .unwrap();
        }
        let browser = Browser::with_store(store.clone(), "", ".vortex_placeholder");
        let entries = browser.list(Some("")).await.unwrap();

        let folder = entries[0].clone();
        browser.delete_folder(&folder, "").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_marked_handles_mixed_selection() {
        let store = seeded_store(&[
            "docs/a.txt",
            "docs/deep/b.txt",
            "keep.txt",
            "loose.txt",
        ])
        .await;
        let browser = Browser::with_store(store.clone(), "", ".vortex_placeholder");
        let entries = browser.list(Some("")).await.unwrap();

        // Displayed order: docs (folder), keep.txt, loose.txt
        let docs = entries.iter().find(|e| e.key == "docs").unwrap().clone();
        let loose = entries.iter().find(|e| e.key == "loose.txt").unwrap().clone();
        browser.select_entry(&docs);
        browser.mark_for_deletion(std::slice::from_ref(&loose));

        let outcome = browser.delete_marked().await.unwrap();
        assert_eq!(outcome.deleted, 2);
        assert!(outcome.failed.is_empty());

        assert_eq!(store.keys_under(""), vec!["keep.txt"]);
        assert!(browser.marked_for_deletion().is_empty());
        let keys: Vec<String> = browser.entries().iter().map(|e| e.key.clone()).collect();
        assert_eq!(keys, vec!["keep.txt"]);
    }

    #[tokio::test]
    async fn test_listing_after_delete_never_contains_deleted_key() {
        let store = seeded_store(&["gone.txt", "stays.txt"]).await;
        let browser = Browser::with_store(store, "", ".vortex_placeholder");
        let entries = browser.list(Some("")).await.unwrap();

        let gone = entries.iter().find(|e| e.key == "gone.txt").unwrap().clone();
        browser.delete_file(&gone, "").await.unwrap();

        let listed = browser.list(Some("")).await.unwrap();
        assert!(listed.iter().all(|e| e.key != "gone.txt"));
    }
}
