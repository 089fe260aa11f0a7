//! 分析编排器
//!
//! PENDING → ANALYZING → READY（有结果）/ PENDING（无结果或调用失败）
//!
//! 整批 URL 只发一次外部调用；调用期间不持有队列锁。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{AnalysisResult, ItemId, ItemStatus};
use crate::queue::{ProcessingGate, SharedQueue};
use crate::services::UrlAnalyzer;

/// 分析结果中找不到某个 URL 时写入的说明
pub const UNMATCHED_NOTE: &str = "分析结果中缺少该 URL，已退回待分析";

/// 一次分析的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    /// 进入 READY 的条目数
    pub analyzed: usize,
    /// 响应中没有对应结果、被退回 PENDING 的条目数
    pub unmatched: usize,
}

pub struct AnalysisOrchestrator {
    queue: SharedQueue,
    gate: ProcessingGate,
    analyzer: Arc<dyn UrlAnalyzer>,
}

impl AnalysisOrchestrator {
    pub fn new(queue: SharedQueue, gate: ProcessingGate, analyzer: Arc<dyn UrlAnalyzer>) -> Self {
        Self {
            queue,
            gate,
            analyzer,
        }
    }

    /// 分析条目
    ///
    /// # 参数
    /// - `target_ids`: 指定条目（与状态无关）；为 `None` 时分析全部 PENDING 条目
    ///
    /// # 返回
    /// 调用失败时所有仍处于 ANALYZING 的目标退回 PENDING，并返回这一个聚合错误
    pub async fn analyze(&self, target_ids: Option<&[ItemId]>) -> AppResult<AnalysisReport> {
        let _guard = self.gate.try_begin()?;

        let targets = self.begin(target_ids).await;
        if targets.is_empty() {
            debug!("没有需要分析的条目");
            return Ok(AnalysisReport::default());
        }

        let urls = unique_urls(&targets);
        info!("🤖 开始分析 {} 个条目（{} 个 URL）", targets.len(), urls.len());

        let outcome = self
            .analyzer
            .analyze(&urls)
            .await
            .and_then(|results| validate_results(results, &urls));

        match outcome {
            Ok(results) => Ok(self.commit(&targets, results).await),
            Err(e) => {
                error!("❌ 分析失败，{} 个条目退回待分析: {}", targets.len(), e);
                self.rollback(&targets).await;
                Err(e)
            }
        }
    }

    /// 解析目标并同步切换到 ANALYZING
    async fn begin(&self, target_ids: Option<&[ItemId]>) -> Vec<(ItemId, String)> {
        let mut queue = self.queue.lock().await;
        let store = queue.store_mut();
        let mut targets = Vec::new();

        for id in store.resolve_targets(target_ids, ItemStatus::Pending) {
            match store.transition(id, ItemStatus::Analyzing) {
                Ok(()) => {
                    if let Some(item) = store.get(id) {
                        targets.push((id, item.url().to_string()));
                    }
                }
                Err(e) => warn!("跳过条目 {}: {}", id, e),
            }
        }

        targets
    }

    async fn commit(
        &self,
        targets: &[(ItemId, String)],
        results: Vec<AnalysisResult>,
    ) -> AnalysisReport {
        let by_url: HashMap<&str, &AnalysisResult> =
            results.iter().map(|r| (r.url.as_str(), r)).collect();

        let mut report = AnalysisReport::default();
        let mut queue = self.queue.lock().await;
        let store = queue.store_mut();

        for (id, url) in targets {
            match by_url.get(url.as_str()) {
                Some(result) => {
                    if store.record_analysis(*id, result) {
                        report.analyzed += 1;
                        debug!(
                            "✓ {} → {} ({})",
                            url, result.quality_label, result.quality_score
                        );
                    }
                }
                None => {
                    if store.revert_analyzing(*id, Some(UNMATCHED_NOTE)) {
                        report.unmatched += 1;
                        warn!("⚠️ 分析结果中没有 {}，已退回待分析", url);
                    }
                }
            }
        }

        info!(
            "✓ 分析完成: {} 个就绪, {} 个缺少结果",
            report.analyzed, report.unmatched
        );
        report
    }

    async fn rollback(&self, targets: &[(ItemId, String)]) {
        let mut queue = self.queue.lock().await;
        let store = queue.store_mut();
        for (id, _) in targets {
            store.revert_analyzing(*id, None);
        }
    }
}

fn unique_urls(targets: &[(ItemId, String)]) -> Vec<String> {
    let mut seen = HashSet::new();
    targets
        .iter()
        .filter(|(_, url)| seen.insert(url.as_str()))
        .map(|(_, url)| url.clone())
        .collect()
}

/// 检查分数范围与重复条目；未请求的 URL 直接丢弃
fn validate_results(
    results: Vec<AnalysisResult>,
    requested: &[String],
) -> AppResult<Vec<AnalysisResult>> {
    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(results.len());

    for result in results {
        if result.quality_score > 100 {
            return Err(AppError::malformed(format!(
                "{} 的分数 {} 超出范围 [0, 100]",
                result.url, result.quality_score
            )));
        }
        if !requested.contains(result.url.as_str()) {
            debug!("忽略未请求的 URL: {}", result.url);
            continue;
        }
        if !seen.insert(result.url.clone()) {
            return Err(AppError::malformed(format!("{} 出现了多条结果", result.url)));
        }
        kept.push(result);
    }

    Ok(kept)
}
