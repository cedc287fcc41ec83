//! Selection model / 选择模型
//!
//! Tracks a single anchor plus a shift-extended contiguous range over the
//! currently displayed, sorted entry list. Entries are tracked by key, not
//! by position: the effective range is recomputed against the live listing,
//! so re-sorting implicitly redefines range membership.

use crate::entry::Entry;

/// Anchor + shift endpoint, both stored as entry keys / 锚点与范围端点
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    anchor: Option<String>,
    shift: Option<String>,
}

impl SelectionState {
    /// Set the anchor and drop any range / 设置锚点并清除范围
    pub fn select(&mut self, key: &str) {
        self.anchor = Some(key.to_string());
        self.shift = None;
    }

    /// Extend the range from the anchor to `key` / 从锚点扩展范围到key
    ///
    /// With no anchor this behaves like `select`. If either endpoint is
    /// absent from `entries` the call is a no-op and the range is left
    /// unchanged.
    pub fn extend(&mut self, entries: &[Entry], key: &str) {
        let Some(anchor) = &self.anchor else {
            self.select(key);
            return;
        };

        let anchor_idx = entries.iter().position(|e| &e.key == anchor);
        let shift_idx = entries.iter().position(|e| e.key == key);
        if anchor_idx.is_none() || shift_idx.is_none() {
            tracing::debug!("extend selection skipped, endpoint not in listing: {}", key);
            return;
        }

        self.shift = Some(key.to_string());
    }

    /// 清除锚点和范围
    pub fn clear(&mut self) {
        self.anchor = None;
        self.shift = None;
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// The effective selected set, `{anchor} ∪ range` / 当前生效的选中集合
    ///
    /// The range is the inclusive slice between the anchor's and the shift
    /// endpoint's positions in `entries`, normalized low index first.
    pub fn selected(&self, entries: &[Entry]) -> Vec<Entry> {
        let Some(anchor) = &self.anchor else {
            return Vec::new();
        };
        let Some(anchor_idx) = entries.iter().position(|e| &e.key == anchor) else {
            return Vec::new();
        };

        let shift_idx = self
            .shift
            .as_ref()
            .and_then(|key| entries.iter().position(|e| &e.key == key));

        match shift_idx {
            Some(shift_idx) => {
                let (lo, hi) = if anchor_idx <= shift_idx {
                    (anchor_idx, shift_idx)
                } else {
                    (shift_idx, anchor_idx)
                };
                entries[lo..=hi].to_vec()
            }
            None => vec![entries[anchor_idx].clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<Entry> {
        (0..7)
            .map(|i| Entry::file(format!("f{}.txt", i), None, i))
            .collect()
    }

    fn keys(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_single_selection() {
        let entries = listing();
        let mut sel = SelectionState::default();
        sel.select("f3.txt");
        assert_eq!(keys(&sel.selected(&entries)), vec!["f3.txt"]);
    }

    #[test]
    fn test_range_is_normalized_by_index() {
        let entries = listing();

        // anchor at index 2, extend to index 5
        let mut sel = SelectionState::default();
        sel.select("f2.txt");
        sel.extend(&entries, "f5.txt");
        let selected = sel.selected(&entries);
        let forward = keys(&selected);
        assert_eq!(forward, vec!["f2.txt", "f3.txt", "f4.txt", "f5.txt"]);

        // same endpoints picked in the opposite order
        let mut sel = SelectionState::default();
        sel.select("f5.txt");
        sel.extend(&entries, "f2.txt");
        assert_eq!(keys(&sel.selected(&entries)), forward);
    }

    #[test]
    fn test_extend_without_anchor_selects() {
        let entries = listing();
        let mut sel = SelectionState::default();
        sel.extend(&entries, "f1.txt");
        assert_eq!(sel.anchor(), Some("f1.txt"));
        assert_eq!(keys(&sel.selected(&entries)), vec!["f1.txt"]);
    }

    #[test]
    fn test_extend_to_missing_entry_is_noop() {
        let entries = listing();
        let mut sel = SelectionState::default();
        sel.select("f2.txt");
        sel.extend(&entries, "f5.txt");
        sel.extend(&entries, "gone.txt");
        assert_eq!(
            keys(&sel.selected(&entries)),
            vec!["f2.txt", "f3.txt", "f4.txt", "f5.txt"]
        );
    }

    #[test]
    fn test_range_recomputed_against_live_listing() {
        let mut entries = listing();
        let mut sel = SelectionState::default();
        sel.select("f2.txt");
        sel.extend(&entries, "f4.txt");
        assert_eq!(sel.selected(&entries).len(), 3);

        // Reversing the displayed order redefines range membership
        entries.reverse();
        assert_eq!(sel.selected(&entries).len(), 3);
        assert_eq!(
            keys(&sel.selected(&entries)),
            vec!["f4.txt", "f3.txt", "f2.txt"]
        );
    }

    #[test]
    fn test_clear() {
        let entries = listing();
        let mut sel = SelectionState::default();
        sel.select("f0.txt");
        sel.clear();
        assert!(sel.selected(&entries).is_empty());
    }
}
