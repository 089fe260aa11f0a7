use std::fmt;

use chrono::{DateTime, Utc};
use phf::phf_map;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::analysis::{AnalysisResult, SubmitOutcome};

/// 队列条目 ID（创建时生成，不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 日志里只显示前 8 位
        let full = self.0.simple().to_string();
        write!(f, "{}", &full[..8])
    }
}

/// 条目状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    /// 等待分析
    Pending,
    /// 分析中
    Analyzing,
    /// 分析完成，等待提交
    Ready,
    /// 提交中
    Submitting,
    /// 提交成功
    Success,
    /// 提交失败
    Failed,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 6] = [
        ItemStatus::Pending,
        ItemStatus::Analyzing,
        ItemStatus::Ready,
        ItemStatus::Submitting,
        ItemStatus::Success,
        ItemStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "PENDING",
            ItemStatus::Analyzing => "ANALYZING",
            ItemStatus::Ready => "READY",
            ItemStatus::Submitting => "SUBMITTING",
            ItemStatus::Success => "SUCCESS",
            ItemStatus::Failed => "FAILED",
        }
    }

    /// 是否有外部调用正在处理该条目
    pub fn is_in_flight(self) -> bool {
        matches!(self, ItemStatus::Analyzing | ItemStatus::Submitting)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Success | ItemStatus::Failed)
    }

    /// 状态机允许的迁移
    ///
    /// 显式指定的批量操作可以从任意非处理中状态进入 ANALYZING / SUBMITTING。
    /// 取消提交时的回退不走这张表，见 [`QueueItem::cancel_submission`]。
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        use ItemStatus::*;
        match (self, next) {
            (from, Analyzing) | (from, Submitting) => !from.is_in_flight(),
            (Analyzing, Ready) | (Analyzing, Pending) => true,
            (Submitting, Success) | (Submitting, Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 质量等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityLabel {
    High,
    Medium,
    Low,
}

static LABEL_ALIASES: phf::Map<&'static str, QualityLabel> = phf_map! {
    "high" => QualityLabel::High,
    "高" => QualityLabel::High,
    "medium" => QualityLabel::Medium,
    "mid" => QualityLabel::Medium,
    "中" => QualityLabel::Medium,
    "low" => QualityLabel::Low,
    "低" => QualityLabel::Low,
};

impl QualityLabel {
    /// 从 LLM 返回的文本解析等级（忽略大小写）
    pub fn parse(s: &str) -> Option<Self> {
        LABEL_ALIASES.get(s.trim().to_lowercase().as_str()).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityLabel::High => "HIGH",
            QualityLabel::Medium => "MEDIUM",
            QualityLabel::Low => "LOW",
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 提交到索引服务时的通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    #[default]
    UrlUpdated,
    UrlDeleted,
}

impl RequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::UrlUpdated => "URL_UPDATED",
            RequestKind::UrlDeleted => "URL_DELETED",
        }
    }
}

/// 队列中的一个 URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueItem {
    id: ItemId,
    url: String,
    status: ItemStatus,
    quality_score: Option<u8>,
    quality_label: Option<QualityLabel>,
    analysis_note: Option<String>,
    request_kind: RequestKind,
    added_at: DateTime<Utc>,
    /// 进入 SUBMITTING 之前的状态
    #[serde(skip)]
    submitted_from: Option<ItemStatus>,
}

impl QueueItem {
    pub fn new(url: impl Into<String>, request_kind: RequestKind) -> Self {
        Self {
            id: ItemId::new(),
            url: url.into(),
            status: ItemStatus::Pending,
            quality_score: None,
            quality_label: None,
            analysis_note: None,
            request_kind,
            added_at: Utc::now(),
            submitted_from: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn quality_score(&self) -> Option<u8> {
        self.quality_score
    }

    pub fn quality_label(&self) -> Option<QualityLabel> {
        self.quality_label
    }

    pub fn analysis_note(&self) -> Option<&str> {
        self.analysis_note.as_deref()
    }

    pub fn request_kind(&self) -> RequestKind {
        self.request_kind
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub(crate) fn set_status(&mut self, next: ItemStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.submitted_from = (next == ItemStatus::Submitting).then_some(self.status);
        self.status = next;
        true
    }

    /// 取消尚未开始的提交，恢复进入 SUBMITTING 之前的状态
    pub(crate) fn cancel_submission(&mut self) -> bool {
        match (self.status, self.submitted_from.take()) {
            (ItemStatus::Submitting, Some(previous)) => {
                self.status = previous;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_note(&mut self, note: impl Into<String>) {
        self.analysis_note = Some(note.into());
    }

    /// 写入分析结果并进入 READY
    pub(crate) fn apply_analysis(&mut self, result: &AnalysisResult) -> bool {
        if !self.set_status(ItemStatus::Ready) {
            return false;
        }
        self.quality_score = Some(result.quality_score);
        self.quality_label = Some(result.quality_label);
        self.analysis_note = Some(result.reasoning.clone());
        true
    }

    /// 写入提交结果；失败时覆盖 analysis_note，分数与等级保持不变
    pub(crate) fn apply_submission(&mut self, outcome: &SubmitOutcome) -> bool {
        let next = if outcome.success {
            ItemStatus::Success
        } else {
            ItemStatus::Failed
        };
        if !self.set_status(next) {
            return false;
        }
        if !outcome.success {
            let reason = outcome.message.as_deref().unwrap_or("未知错误");
            self.analysis_note = Some(format!("提交失败: {}", reason));
        }
        true
    }
}
