//! Object store interface (provides only primitive operations) / 对象存储接口
//!
//! The store is a stateless capability: it owns no browser state and every
//! call is an independent network operation that may fail on its own.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

pub mod memory;
pub mod s3;

pub use self::memory::MemoryStore;
pub use self::s3::S3Store;

/// 进度回调类型 / Progress callback type
/// 参数: (已完成字节数, 总字节数) / Parameters: (completed_bytes, total_bytes)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Raw object metadata as returned by the backing list call / 原始对象元信息
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Full flat key, not yet relativized / 完整扁平键
    pub key: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub size: u64,
}

/// One prefix+delimiter listing round-trip / 一次前缀列表调用的结果
#[derive(Debug, Clone, Default)]
pub struct ObjectListing {
    /// Direct child objects in backing-store order / 直接子对象，保持存储端顺序
    pub contents: Vec<ObjectInfo>,
    /// One-level-deeper prefixes ("folders") / 下一层公共前缀
    pub common_prefixes: Vec<String>,
}

/// Object store primitives / 对象存储原语
///
/// No retries here: transient failures surface as rejected calls and the
/// orchestrators decide what a partial failure means.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects under `prefix`, grouping at `delimiter` / 列出前缀下的对象
    async fn list_objects(&self, prefix: &str, delimiter: Option<&str>) -> Result<ObjectListing>;

    /// Store an object, reporting transfer progress / 上传对象并报告进度
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        progress: Option<ProgressCallback>,
    ) -> Result<()>;

    /// Delete one object / 删除单个对象
    async fn delete_object(&self, key: &str) -> Result<()>;
}
