//! Browser state façade / 浏览器状态门面
//!
//! One session object owning every piece of model state: current path,
//! displayed listing, listing cache, selection, pending deletions, and
//! upload records. The object store behind it is a stateless capability.
//! A presentation layer drives this through the command surface only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;

use crate::config::BrowserConfig;
use crate::entry::{entries_from_listing, normalize_root, parent_path, Entry};
use crate::selection::SelectionState;
use crate::sort::{sort_entries, SortField, SortOrder};
use crate::store::{ObjectStore, S3Store};
use crate::upload::UploadRecord;

/// Object-storage browser session / 对象存储浏览器会话
pub struct Browser {
    pub(crate) store: Arc<dyn ObjectStore>,
    pub(crate) placeholder: String,
    /// Current directory prefix, empty or ending with `/` / 当前目录前缀
    pub(crate) path: RwLock<String>,
    /// The displayed listing / 当前显示的列表
    pub(crate) files: RwLock<Vec<Entry>>,
    /// Listing cache, a hint only: correct until the next mutation
    /// 列表缓存，仅作提示，变更后即可能过期
    pub(crate) list_cache: RwLock<HashMap<String, Vec<Entry>>>,
    pub(crate) selection: RwLock<SelectionState>,
    /// Entries marked for deletion, keyed by entry key / 待删除条目
    pub(crate) pending_delete: RwLock<HashMap<String, Entry>>,
    pub(crate) uploads: Arc<RwLock<Vec<UploadRecord>>>,
    /// Cooperative signal suppressing listing auto-refresh during batches
    /// 批量操作期间抑制列表自动刷新的协作标志
    pub(crate) prevent_refresh: AtomicBool,
}

impl Browser {
    /// Connect to an S3-compatible bucket / 连接S3兼容存储桶
    pub fn connect(config: &BrowserConfig) -> Result<Self> {
        let store = Arc::new(S3Store::new(config)?);
        Ok(Self::with_store(
            store,
            &config.browser_root,
            &config.placeholder,
        ))
    }

    /// Build a session over any store implementation / 基于任意存储实现构造会话
    pub fn with_store(store: Arc<dyn ObjectStore>, browser_root: &str, placeholder: &str) -> Self {
        Self {
            store,
            placeholder: placeholder.to_string(),
            path: RwLock::new(normalize_root(browser_root)),
            files: RwLock::new(Vec::new()),
            list_cache: RwLock::new(HashMap::new()),
            selection: RwLock::new(SelectionState::default()),
            pending_delete: RwLock::new(HashMap::new()),
            uploads: Arc::new(RwLock::new(Vec::new())),
            prevent_refresh: AtomicBool::new(false),
        }
    }

    pub fn current_path(&self) -> String {
        self.path.read().clone()
    }

    /// The currently displayed entries / 当前显示的条目
    pub fn entries(&self) -> Vec<Entry> {
        self.files.read().clone()
    }

    /// Entries currently marked for deletion / 当前标记待删除的条目
    pub fn marked_for_deletion(&self) -> Vec<Entry> {
        self.pending_delete.read().values().cloned().collect()
    }

    /// 导航到指定路径
    pub async fn navigate(&self, path: &str) -> Result<Vec<Entry>> {
        self.list(Some(path)).await
    }

    /// Navigate to the parent directory / 导航到上级目录
    ///
    /// Navigating up from the root lists the root again.
    pub async fn navigate_up(&self) -> Result<Vec<Entry>> {
        let parent = parent_path(&self.current_path());
        self.list(Some(&parent)).await
    }

    /// List a directory / 列出目录内容
    ///
    /// A cached listing for the path is surfaced immediately as the
    /// displayed state, then the authoritative fetch always follows and
    /// replaces both the display and the cache slot.
    pub async fn list(&self, path: Option<&str>) -> Result<Vec<Entry>> {
        let path = match path {
            Some(p) => p.to_string(),
            None => self.current_path(),
        };

        let cached = self.list_cache.read().get(&path).cloned();
        if let Some(cached) = cached {
            tracing::debug!("serving cached listing for {:?} while refetching", path);
            *self.path.write() = path.clone();
            *self.files.write() = cached;
        }

        let listing = self.store.list_objects(&path, Some("/")).await?;
        let entries = entries_from_listing(&path, listing, &self.placeholder);

        tracing::debug!("listed {:?}: {} entries", path, entries.len());

        self.list_cache.write().insert(path.clone(), entries.clone());
        *self.path.write() = path;
        *self.files.write() = entries.clone();

        Ok(entries)
    }

    /// Re-fetch the current path unless a batch suppressed refreshes
    /// 重新拉取当前路径，批量操作期间跳过
    pub(crate) async fn refresh(&self) -> Result<()> {
        if self.prevent_refresh.load(Ordering::SeqCst) {
            tracing::debug!("listing refresh suppressed");
            return Ok(());
        }
        let path = self.current_path();
        self.list(Some(&path)).await?;
        Ok(())
    }

    /// Re-sort the displayed listing / 重排当前列表
    ///
    /// Changing the sort drops any live selection: a shift-range across a
    /// reorder is undefined otherwise.
    pub fn sort_by(&self, field: SortField, order: SortOrder) {
        self.clear_selection();
        sort_entries(&mut self.files.write(), field, order);
    }

    /// 单选条目
    pub fn select_entry(&self, entry: &Entry) {
        self.selection.write().select(&entry.key);
    }

    /// Shift-extend the selection to `entry` / 扩展选择范围
    pub fn extend_selection(&self, entry: &Entry) {
        let files = self.files.read().clone();
        self.selection.write().extend(&files, &entry.key);
    }

    pub fn clear_selection(&self) {
        self.selection.write().clear();
    }

    /// The effective selected set, recomputed against the live listing
    /// 当前生效的选中集合，基于实时列表计算
    pub fn selected_entries(&self) -> Vec<Entry> {
        let files = self.files.read();
        self.selection.read().selected(&files)
    }

    /// Create a folder by writing its placeholder object / 通过占位对象创建文件夹
    pub async fn create_folder(&self, name: &str) -> Result<()> {
        let key = format!("{}{}/{}", self.current_path(), name, self.placeholder);
        self.store.put_object(&key, bytes::Bytes::new(), None).await?;
        tracing::info!("created folder {:?}", name);
        self.refresh().await
    }

    /// Mark entries for deletion (confirmation step) / 标记待删除
    pub fn mark_for_deletion(&self, entries: &[Entry]) {
        let mut pending = self.pending_delete.write();
        for entry in entries {
            pending.insert(entry.key.clone(), entry.clone());
        }
    }

    /// Unmark one entry / 取消单个标记
    pub fn cancel_marked(&self, entry: &Entry) {
        self.pending_delete.write().remove(&entry.key);
    }
}
