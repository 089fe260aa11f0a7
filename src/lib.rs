//! # Index Submit
//!
//! 提取 URL、用 LLM 评估索引质量、逐个提交到索引服务
//!
//! ## 架构设计
//!
//! ### ① 队列状态层（Queue）
//! - `queue/` - 有序条目集合、选择集、处理中标记
//! - 删除条目时同步清理选择集
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - URL 提取、LLM 质量评估，以及外部能力接口
//! - `clients/` - 索引服务 HTTP 客户端
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/analysis` - PENDING → ANALYZING → READY / PENDING
//! - `orchestrator/submission` - READY → SUBMITTING → SUCCESS / FAILED，逐个提交
//! - `orchestrator/batch_processor` - 应用入口
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod queue;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ItemId, ItemStatus, QualityLabel, QueueItem, RequestKind};
pub use orchestrator::{
    AnalysisOrchestrator, AnalysisReport, App, SubmissionOrchestrator, SubmitReport,
};
pub use queue::{IndexQueue, ProcessingGate, SharedQueue};
pub use services::{extract_urls, IndexSubmitter, UrlAnalyzer};
