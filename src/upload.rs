//! Upload orchestrator / 上传编排
//!
//! One concurrent task per file. Each task owns an upload record, forwards
//! store progress callbacks through a per-upload channel as integer
//! percentages, refreshes the listing on completion, and removes its record.
//! A failed upload keeps its record, marked failed, until dismissed.

use std::sync::Arc;

use anyhow::Result;
use bytes::Bytes;
use futures::future::join_all;
use serde::Serialize;

use crate::browser::Browser;
use crate::store::ProgressCallback;

/// A local file handed to the upload command / 待上传的本地文件
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub body: Bytes,
}

/// 上传记录状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    Active,
    Failed,
}

/// In-flight upload, keyed by the full destination key / 进行中的上传
#[derive(Debug, Clone, Serialize)]
pub struct UploadRecord {
    pub key: String,
    /// 0..=100
    pub progress: u8,
    pub state: UploadState,
}

/// Settled result of one upload batch / 一批上传的最终结果
#[derive(Debug, Default)]
pub struct UploadOutcome {
    /// Final stored keys / 实际写入的键
    pub completed: Vec<String>,
    /// (key, error) per failed file / 每个失败文件的键和错误
    pub failed: Vec<(String, String)>,
}

/// Pick a non-colliding name against the listed entries / 解决命名冲突
///
/// First collision inserts ` (1)` before the extension suffix, further
/// collisions bump the first all-digit parenthesized counter in place.
/// Non-numeric groups already in the name, like `photo (1 of 2).jpg`,
/// are left untouched.
pub fn resolve_collision_name(name: &str, existing: &[String]) -> String {
    let mut candidate = name.to_string();
    let mut count = 0u32;

    while existing.iter().any(|n| n == &candidate) {
        count += 1;
        if count == 1 {
            let (stem, suffix) = match name.find('.') {
                Some(pos) => name.split_at(pos),
                None => (name, ""),
            };
            candidate = format!("{} (1){}", stem, suffix);
        } else if let Some((open, close)) = find_counter_group(&candidate) {
            candidate.replace_range(open + 1..close, &count.to_string());
        }
    }

    candidate
}

/// Locate the first `(digits)` group, skipping non-numeric parentheses
/// 定位第一个纯数字括号组，跳过非数字括号
fn find_counter_group(name: &str) -> Option<(usize, usize)> {
    let mut search = 0;
    while let Some(open) = name[search..].find('(').map(|p| search + p) {
        let close = name[open..].find(')').map(|c| open + c)?;
        let inner = &name[open + 1..close];
        if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
            return Some((open, close));
        }
        search = close + 1;
    }
    None
}

impl Browser {
    /// Upload a batch of files into the current path / 上传一批文件到当前路径
    ///
    /// All files run concurrently and settle independently: one failure
    /// never aborts its siblings. Collision names are computed against the
    /// listing snapshot taken at batch start, so concurrent uploads in the
    /// same batch do not see each other's renames (已知竞态，保持原样).
    pub async fn upload(&self, files: Vec<LocalFile>) -> Result<UploadOutcome> {
        let existing: Vec<String> = self.files.read().iter().map(|e| e.key.clone()).collect();
        let path = self.current_path();

        let tasks: Vec<_> = files
            .into_iter()
            .map(|file| {
                let existing = existing.clone();
                let path = path.clone();
                async move {
                    let name = resolve_collision_name(&file.name, &existing);
                    let key = format!("{}{}", path, name);
                    self.upload_one(key, file.body).await
                }
            })
            .collect();

        let mut outcome = UploadOutcome::default();
        for settled in join_all(tasks).await {
            match settled {
                Ok(key) => outcome.completed.push(key),
                Err((key, error)) => {
                    tracing::error!("upload failed for {:?}: {}", key, error);
                    outcome.failed.push((key, error));
                }
            }
        }

        Ok(outcome)
    }

    /// Run a single upload task to completion / 执行单个上传任务
    async fn upload_one(&self, key: String, body: Bytes) -> std::result::Result<String, (String, String)> {
        self.uploads.write().push(UploadRecord {
            key: key.clone(),
            progress: 0,
            state: UploadState::Active,
        });

        // Progress flows through a channel: the store reports bytes, the
        // consumer task folds them into the record as whole percentages.
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<u8>();
        let uploads = Arc::clone(&self.uploads);
        let record_key = key.clone();
        let consumer = tokio::spawn(async move {
            while let Some(percent) = rx.recv().await {
                let mut uploads = uploads.write();
                if let Some(record) = uploads.iter_mut().find(|r| r.key == record_key) {
                    record.progress = percent;
                }
            }
        });

        let progress: ProgressCallback = Arc::new(move |loaded, total| {
            let percent = if total == 0 {
                100
            } else {
                (loaded as f64 / total as f64 * 100.0).round() as u8
            };
            let _ = tx.send(percent);
        });

        let result = self.store.put_object(&key, body, Some(progress)).await;
        // The callback was dropped by the store; the channel is closed now.
        let _ = consumer.await;

        match result {
            Ok(()) => {
                tracing::info!("uploaded {:?}", key);
                if let Err(e) = self.refresh().await {
                    tracing::warn!("listing refresh after upload failed: {}", e);
                }
                self.uploads.write().retain(|r| r.key != key);
                Ok(key)
            }
            Err(e) => {
                let mut uploads = self.uploads.write();
                if let Some(record) = uploads.iter_mut().find(|r| r.key == key) {
                    record.state = UploadState::Failed;
                }
                Err((key, e.to_string()))
            }
        }
    }

    /// Snapshot of the in-flight upload records / 当前上传记录快照
    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.read().clone()
    }

    /// Drop a (typically failed) upload record / 移除上传记录
    pub fn dismiss_upload(&self, key: &str) {
        self.uploads.write().retain(|r| r.key != key);
    }
}
