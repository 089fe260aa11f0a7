//! 队列 + 选择集
//!
//! 所有删除都经过这里，被删除的 id 在同一次调用中从选择集移除。

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::models::{ItemId, ItemStatus, QueueItem, RequestKind};
use crate::queue::selection::SelectionManager;
use crate::queue::store::{QueueStore, StatusCounts};

/// 编排层之间共享的队列状态
pub type SharedQueue = Arc<Mutex<IndexQueue>>;

#[derive(Debug, Clone, Default)]
pub struct IndexQueue {
    store: QueueStore,
    selection: SelectionManager,
}

impl IndexQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedQueue {
        Arc::new(Mutex::new(self))
    }

    pub fn store(&self) -> &QueueStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut QueueStore {
        &mut self.store
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn add<S: AsRef<str>>(&mut self, urls: &[S]) -> Vec<ItemId> {
        self.store.add(urls)
    }

    pub fn add_with_kind<S: AsRef<str>>(&mut self, urls: &[S], kind: RequestKind) -> Vec<ItemId> {
        self.store.add_with_kind(urls, kind)
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        self.selection.deselect(id);
        self.store.remove(id)
    }

    pub fn remove_batch(&mut self, ids: &HashSet<ItemId>) -> Vec<ItemId> {
        let removed = self.store.remove_batch(ids);
        self.purge(&removed);
        removed
    }

    /// 删除当前选中的全部条目并清空选择集
    pub fn remove_selected(&mut self) -> Vec<ItemId> {
        let ids: HashSet<ItemId> = self.selection.selected().into_iter().collect();
        let removed = self.store.remove_batch(&ids);
        self.selection.clear();
        removed
    }

    pub fn remove_by_status(&mut self, status: ItemStatus) -> Vec<ItemId> {
        let removed = self.store.remove_by_status(status);
        self.purge(&removed);
        removed
    }

    /// 清除所有 FAILED 条目
    pub fn clear_failed(&mut self) -> usize {
        let removed = self.remove_by_status(ItemStatus::Failed);
        if !removed.is_empty() {
            info!("🧹 已清除 {} 个失败条目", removed.len());
        }
        removed.len()
    }

    fn purge(&mut self, removed: &[ItemId]) {
        for id in removed {
            self.selection.deselect(*id);
        }
    }

    pub fn query(&self, predicate: impl Fn(&QueueItem) -> bool) -> Vec<QueueItem> {
        self.store.query(predicate)
    }

    pub fn get(&self, id: ItemId) -> Option<&QueueItem> {
        self.store.get(id)
    }

    pub fn counts(&self) -> StatusCounts {
        self.store.count_by_status()
    }

    // ========== 选择 ==========

    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.store.get(id).is_none() {
            return false;
        }
        self.selection.toggle(id)
    }

    /// 对队列中全部条目做全选 / 取消全选
    pub fn select_all(&mut self) {
        let ids = self.store.ids();
        self.selection.select_all(&ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selection.is_selected(id)
    }

    /// 选中的条目，按队列顺序
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.store
            .items()
            .iter()
            .map(QueueItem::id)
            .filter(|id| self.selection.is_selected(*id))
            .collect()
    }
}
