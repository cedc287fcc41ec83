//! Sort engine / 排序引擎
//!
//! Orders entries by name, size, or modification time. Whatever the field
//! and order, folders are always grouped before files; the order only
//! applies within each partition.

use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// 排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Size,
    Date,
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort entries in place / 就地排序
pub fn sort_entries(entries: &mut [Entry], field: SortField, order: SortOrder) {
    entries.sort_by(|a, b| {
        let cmp = match field {
            SortField::Name => natord::compare_ignore_case(&a.key, &b.key),
            SortField::Size => a.size.unwrap_or(0).cmp(&b.size.unwrap_or(0)),
            SortField::Date => a.last_modified.cmp(&b.last_modified),
        };
        match order {
            SortOrder::Asc => cmp,
            SortOrder::Desc => cmp.reverse(),
        }
    });

    // 目录始终在前（稳定排序保持分区内部顺序）
    entries.sort_by_key(|e| !e.is_folder());
}
