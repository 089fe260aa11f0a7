//! 提交编排器
//!
//! READY → SUBMITTING → SUCCESS / FAILED
//!
//! 条目严格按队列顺序逐个提交：每个外部调用返回后立即写回该条目，再开始下一个。
//! 两次调用之间不持有队列锁，调用方可以看到逐条推进的进度。

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{ItemId, ItemStatus, ServiceAccountCredential, SubmitOutcome};
use crate::queue::{ProcessingGate, SharedQueue};
use crate::services::IndexSubmitter;

/// 一次提交的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitReport {
    pub success: usize,
    pub failed: usize,
    /// 取消后恢复原状态、未提交的条目数
    pub cancelled: usize,
}

impl SubmitReport {
    pub fn total(&self) -> usize {
        self.success + self.failed + self.cancelled
    }
}

pub struct SubmissionOrchestrator {
    queue: SharedQueue,
    gate: ProcessingGate,
    submitter: Arc<dyn IndexSubmitter>,
    credential: Option<ServiceAccountCredential>,
}

impl SubmissionOrchestrator {
    pub fn new(
        queue: SharedQueue,
        gate: ProcessingGate,
        submitter: Arc<dyn IndexSubmitter>,
        credential: Option<ServiceAccountCredential>,
    ) -> Self {
        Self {
            queue,
            gate,
            submitter,
            credential,
        }
    }

    pub fn set_credential(&mut self, credential: Option<ServiceAccountCredential>) {
        self.credential = credential;
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// 提交条目
    ///
    /// # 参数
    /// - `target_ids`: 指定条目；为 `None` 时提交全部 READY 条目
    pub async fn submit(&self, target_ids: Option<&[ItemId]>) -> AppResult<SubmitReport> {
        self.submit_until(target_ids, None).await
    }

    /// 可取消的提交
    ///
    /// 取消后不再开始新的条目：已完成的保持结果，尚未开始的恢复提交前的状态。
    pub async fn submit_until(
        &self,
        target_ids: Option<&[ItemId]>,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<SubmitReport> {
        let credential = self.credential.as_ref().ok_or(AppError::ConfigMissing)?;
        let _guard = self.gate.try_begin()?;

        let targets = self.begin(target_ids).await;
        if targets.is_empty() {
            debug!("没有需要提交的条目");
            return Ok(SubmitReport::default());
        }

        let total = targets.len();
        info!("📤 开始逐个提交 {} 个条目", total);

        let mut report = SubmitReport::default();
        for (index, id) in targets.iter().enumerate() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                report.cancelled = self.release(&targets[index..]).await;
                warn!("⏹ 提交已取消，{} 个条目恢复原状态", report.cancelled);
                break;
            }

            let snapshot = {
                let queue = self.queue.lock().await;
                queue.get(*id).cloned()
            };
            let Some(item) = snapshot else {
                debug!("条目 {} 已被删除，跳过", id);
                continue;
            };

            let outcome = match self.submitter.submit_one(&item, credential).await {
                Ok(outcome) => outcome,
                Err(e) => SubmitOutcome::failure(e.to_string()),
            };

            let committed = {
                let mut queue = self.queue.lock().await;
                queue.store_mut().record_submission(*id, &outcome)
            };
            if !committed {
                debug!("条目 {} 提交期间被删除，结果丢弃", id);
                continue;
            }

            if outcome.success {
                report.success += 1;
                info!("[{}/{}] ✓ {}", index + 1, total, item.url());
            } else {
                report.failed += 1;
                warn!(
                    "[{}/{}] ❌ {}: {}",
                    index + 1,
                    total,
                    item.url(),
                    outcome.message.as_deref().unwrap_or("未知错误")
                );
            }
        }

        info!(
            "✓ 提交完成: 成功 {}, 失败 {}, 取消 {}",
            report.success, report.failed, report.cancelled
        );
        Ok(report)
    }

    /// 解析目标并同步切换到 SUBMITTING
    async fn begin(&self, target_ids: Option<&[ItemId]>) -> Vec<ItemId> {
        let mut queue = self.queue.lock().await;
        let store = queue.store_mut();
        let mut targets = Vec::new();

        for id in store.resolve_targets(target_ids, ItemStatus::Ready) {
            match store.transition(id, ItemStatus::Submitting) {
                Ok(()) => targets.push(id),
                Err(e) => warn!("跳过条目 {}: {}", id, e),
            }
        }

        targets
    }

    /// 未开始的条目恢复进入 SUBMITTING 之前的状态
    async fn release(&self, remaining: &[ItemId]) -> usize {
        let mut queue = self.queue.lock().await;
        let store = queue.store_mut();
        remaining
            .iter()
            .filter(|id| store.cancel_submission(**id))
            .count()
    }
}
