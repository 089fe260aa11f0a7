//! 选择集
//!
//! 记录当前被勾选的条目，与条目状态无关。

use std::collections::BTreeSet;

use crate::models::ItemId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    selected: BTreeSet<ItemId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 切换单个条目的选中状态，返回切换后是否选中
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// 全选；如果给定的 id 已经全部选中，则清空（全选 / 取消全选）
    pub fn select_all(&mut self, all_ids: &[ItemId]) {
        let fully_selected =
            !all_ids.is_empty() && all_ids.iter().all(|id| self.selected.contains(id));
        if fully_selected {
            self.selected.clear();
        } else {
            self.selected.extend(all_ids.iter().copied());
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    pub fn deselect(&mut self, id: ItemId) {
        self.selected.remove(&id);
    }

    pub fn selected(&self) -> Vec<ItemId> {
        self.selected.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
