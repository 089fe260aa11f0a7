//! 外部能力接口
//!
//! 编排层只依赖这两个接口，具体实现（LLM / HTTP）可以替换，测试里用假实现。

use futures::future::BoxFuture;

use crate::error::AppResult;
use crate::models::{AnalysisResult, QueueItem, ServiceAccountCredential, SubmitOutcome};

/// 批量分析 URL 质量
pub trait UrlAnalyzer: Send + Sync {
    /// 一次调用分析全部 URL；每个 URL 至多返回一条结果
    fn analyze<'a>(&'a self, urls: &'a [String]) -> BoxFuture<'a, AppResult<Vec<AnalysisResult>>>;
}

/// 向索引服务提交单个条目
pub trait IndexSubmitter: Send + Sync {
    /// `Err` 表示调用本身失败（网络 / 超时），`Ok` 中的 outcome 表示服务端的处理结果
    fn submit_one<'a>(
        &'a self,
        item: &'a QueueItem,
        credential: &'a ServiceAccountCredential,
    ) -> BoxFuture<'a, AppResult<SubmitOutcome>>;
}
