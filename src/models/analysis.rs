use serde::{Deserialize, Serialize};

use crate::models::queue_item::QualityLabel;

/// 单个 URL 的分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub url: String,
    pub quality_label: QualityLabel,
    /// 0-100
    pub quality_score: u8,
    pub reasoning: String,
}

/// 单次提交调用的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    /// 失败时的诊断信息
    pub message: Option<String>,
}

impl SubmitOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
