//! 队列存储
//!
//! 有序保存所有条目。所有删除操作保持剩余条目的相对顺序。

use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use crate::models::{AnalysisResult, ItemId, ItemStatus, QueueItem, RequestKind, SubmitOutcome};

/// 各状态条目数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub analyzing: usize,
    pub ready: usize,
    pub submitting: usize,
    pub success: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: ItemStatus) -> usize {
        match status {
            ItemStatus::Pending => self.pending,
            ItemStatus::Analyzing => self.analyzing,
            ItemStatus::Ready => self.ready,
            ItemStatus::Submitting => self.submitting,
            ItemStatus::Success => self.success,
            ItemStatus::Failed => self.failed,
        }
    }

    pub fn total(&self) -> usize {
        ItemStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }

    /// 已经结束（SUCCESS / FAILED）的条目数
    pub fn finished(&self) -> usize {
        ItemStatus::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .map(|s| self.get(*s))
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueueStore {
    items: Vec<QueueItem>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按输入顺序追加 URL_UPDATED 条目，不与已有条目去重
    pub fn add<S: AsRef<str>>(&mut self, urls: &[S]) -> Vec<ItemId> {
        self.add_with_kind(urls, RequestKind::UrlUpdated)
    }

    pub fn add_with_kind<S: AsRef<str>>(&mut self, urls: &[S], kind: RequestKind) -> Vec<ItemId> {
        let mut ids = Vec::with_capacity(urls.len());
        for url in urls {
            let item = QueueItem::new(url.as_ref(), kind);
            ids.push(item.id());
            self.items.push(item);
        }
        ids
    }

    /// 删除单个条目，不存在时忽略；返回是否删除
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    /// 批量删除，返回实际删除的 id
    pub fn remove_batch(&mut self, ids: &HashSet<ItemId>) -> Vec<ItemId> {
        self.remove_where(|item| ids.contains(&item.id()))
    }

    /// 删除某个状态的全部条目（"清除失败"）
    pub fn remove_by_status(&mut self, status: ItemStatus) -> Vec<ItemId> {
        self.remove_where(|item| item.status() == status)
    }

    fn remove_where(&mut self, predicate: impl Fn(&QueueItem) -> bool) -> Vec<ItemId> {
        let mut removed = Vec::new();
        self.items.retain(|item| {
            if predicate(item) {
                removed.push(item.id());
                false
            } else {
                true
            }
        });
        removed
    }

    /// 只读过滤视图
    pub fn query(&self, predicate: impl Fn(&QueueItem) -> bool) -> Vec<QueueItem> {
        self.items
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: ItemId) -> Option<&QueueItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut QueueItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(QueueItem::id).collect()
    }

    pub fn ids_with_status(&self, status: ItemStatus) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|item| item.status() == status)
            .map(QueueItem::id)
            .collect()
    }

    pub fn count_by_status(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for item in &self.items {
            match item.status() {
                ItemStatus::Pending => counts.pending += 1,
                ItemStatus::Analyzing => counts.analyzing += 1,
                ItemStatus::Ready => counts.ready += 1,
                ItemStatus::Submitting => counts.submitting += 1,
                ItemStatus::Success => counts.success += 1,
                ItemStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// 解析一次批量操作的目标
    ///
    /// 显式给出 id 时只取这些 id（与状态无关，不存在的忽略）；否则取 `default_status` 的全部条目。
    /// 结果按队列顺序排列。
    pub(crate) fn resolve_targets(
        &self,
        target_ids: Option<&[ItemId]>,
        default_status: ItemStatus,
    ) -> Vec<ItemId> {
        match target_ids {
            Some(ids) => {
                let wanted: HashSet<ItemId> = ids.iter().copied().collect();
                self.items
                    .iter()
                    .filter(|item| wanted.contains(&item.id()))
                    .map(QueueItem::id)
                    .collect()
            }
            None => self.ids_with_status(default_status),
        }
    }

    pub(crate) fn transition(&mut self, id: ItemId, next: ItemStatus) -> AppResult<()> {
        let item = self.get_mut(id).ok_or(AppError::ItemNotFound(id))?;
        let from = item.status();
        if item.set_status(next) {
            Ok(())
        } else {
            Err(AppError::InvalidTransition { id, from, to: next })
        }
    }

    /// ANALYZING 条目退回 PENDING；其他状态不动。返回是否退回
    pub(crate) fn revert_analyzing(&mut self, id: ItemId, note: Option<&str>) -> bool {
        match self.get_mut(id) {
            Some(item) if item.status() == ItemStatus::Analyzing => {
                item.set_status(ItemStatus::Pending);
                if let Some(note) = note {
                    item.set_note(note);
                }
                true
            }
            _ => false,
        }
    }

    pub(crate) fn record_analysis(&mut self, id: ItemId, result: &AnalysisResult) -> bool {
        self.get_mut(id)
            .map(|item| item.apply_analysis(result))
            .unwrap_or(false)
    }

    /// SUBMITTING 条目恢复提交前的状态；其他状态不动。返回是否恢复
    pub(crate) fn cancel_submission(&mut self, id: ItemId) -> bool {
        self.get_mut(id)
            .map(QueueItem::cancel_submission)
            .unwrap_or(false)
    }

    pub(crate) fn record_submission(&mut self, id: ItemId, outcome: &SubmitOutcome) -> bool {
        self.get_mut(id)
            .map(|item| item.apply_submission(outcome))
            .unwrap_or(false)
    }
}
