//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `analysis` - 分析编排器
//! - PENDING → ANALYZING → READY / PENDING
//! - 整批 URL 一次外部调用
//!
//! ### `submission` - 提交编排器
//! - READY → SUBMITTING → SUCCESS / FAILED
//! - 逐个提交，每个结果立即写回
//!
//! ### `batch_processor` - 应用入口
//! - 提取 → 分析 → 提交 → 统计
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (整个流程)
//!     ↓
//! analysis / submission (状态迁移)
//!     ↓
//! services (能力层：extract / llm) + clients (索引服务)
//!     ↓
//! queue (队列状态 + 处理中标记)
//! ```
//!
//! 分析和提交共用一个 `ProcessingGate`，同一时间只能有一个在运行。

pub mod analysis;
pub mod batch_processor;
pub mod submission;

pub use analysis::{AnalysisOrchestrator, AnalysisReport, UNMATCHED_NOTE};
pub use batch_processor::App;
pub use submission::{SubmissionOrchestrator, SubmitReport};
