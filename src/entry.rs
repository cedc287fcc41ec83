//! Hierarchy/listing model / 层级与列表模型
//!
//! Maps flat object keys onto folder/file entries for one directory level
//! using prefix+delimiter semantics, and derives parent navigation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::ObjectListing;

/// Entry kind / 条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// Directory entry, key relative to the listing path / 目录条目，key相对于当前路径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    /// Folders carry the zero instant so date comparators stay stable
    /// 文件夹使用零时刻，保证按时间排序时稳定
    pub last_modified: Option<DateTime<Utc>>,
    pub size: Option<u64>,
    pub kind: EntryKind,
}

impl Entry {
    pub fn file(key: impl Into<String>, last_modified: Option<DateTime<Utc>>, size: u64) -> Self {
        Self {
            key: key.into(),
            last_modified,
            size: Some(size),
            kind: EntryKind::File,
        }
    }

    pub fn folder(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            last_modified: Some(DateTime::<Utc>::UNIX_EPOCH),
            size: None,
            kind: EntryKind::Folder,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// Build the display entries for one path from a raw listing
/// 由原始列表结果构造某路径下的显示条目
///
/// Common prefixes become folder entries, direct objects become file entries
/// with the path prefix stripped. The directory marker object itself (empty
/// relative key) and the placeholder name are never surfaced. An object
/// sharing a name with a sibling folder is dropped so keys stay unique
/// within one listing.
pub fn entries_from_listing(path: &str, listing: ObjectListing, placeholder: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut folder_names = HashSet::new();

    for prefix in &listing.common_prefixes {
        let name = prefix
            .strip_prefix(path)
            .unwrap_or(prefix)
            .trim_end_matches('/');
        if !name.is_empty() && folder_names.insert(name.to_string()) {
            entries.push(Entry::folder(name));
        }
    }

    for obj in listing.contents {
        let key = obj.key.strip_prefix(path).unwrap_or(&obj.key);
        if key.is_empty() || key == placeholder || folder_names.contains(key) {
            continue;
        }
        entries.push(Entry::file(key, obj.last_modified, obj.size));
    }

    entries
}

/// Strip the trailing path segment / 去掉路径末尾一段
///
/// Walks backward from the end of `path` to the previous `/` boundary.
/// The root path yields itself, so navigating up from root is a no-op.
pub fn parent_path(path: &str) -> String {
    if path.len() < 2 {
        return String::new();
    }
    let bytes = path.as_bytes();
    let mut i = path.len() - 2;
    while i > 0 && bytes[i - 1] != b'/' {
        i -= 1;
    }
    path[..i].to_string()
}

/// Normalize a browser root into path form / 规范化根前缀
///
/// A path is always empty or ends with `/`.
pub fn normalize_root(root: &str) -> String {
    let trimmed = root.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}
