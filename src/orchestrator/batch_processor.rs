//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整的"提取 → 分析 → 提交"流程。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载凭据、创建 LLM 服务和索引客户端
//! 2. **URL 提取**：读取输入文件，按关键词过滤后加入队列
//! 3. **分析**：对全部 PENDING 条目做一次批量评估
//! 4. **提交**：逐个提交 READY 条目
//! 5. **全局统计**：输出各状态数量

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::clients::IndexingClient;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{load_credential, load_input_text, ServiceAccountCredential};
use crate::orchestrator::{AnalysisOrchestrator, SubmissionOrchestrator};
use crate::queue::{IndexQueue, ProcessingGate, SharedQueue};
use crate::services::{extract_urls, IndexSubmitter, LlmService, UrlAnalyzer};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    queue: SharedQueue,
    gate: ProcessingGate,
    analysis: AnalysisOrchestrator,
    submission: SubmissionOrchestrator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法写入日志文件: {}", config.output_log_file))?;

        let credential = match &config.credential_path {
            Some(path) => Some(
                load_credential(Path::new(path))
                    .await
                    .with_context(|| format!("无法加载凭据: {}", path))?,
            ),
            None => None,
        };

        logging::log_startup(&config.llm_model_name, credential.is_some());

        let analyzer: Arc<dyn UrlAnalyzer> = Arc::new(LlmService::new(&config));
        let submitter: Arc<dyn IndexSubmitter> = Arc::new(IndexingClient::new(&config)?);

        Ok(Self::with_services(config, analyzer, submitter, credential))
    }

    /// 使用自定义的分析 / 提交实现组装应用
    pub fn with_services(
        config: Config,
        analyzer: Arc<dyn UrlAnalyzer>,
        submitter: Arc<dyn IndexSubmitter>,
        credential: Option<ServiceAccountCredential>,
    ) -> Self {
        let queue = IndexQueue::new().shared();
        let gate = ProcessingGate::new();

        Self {
            analysis: AnalysisOrchestrator::new(queue.clone(), gate.clone(), analyzer),
            submission: SubmissionOrchestrator::new(
                queue.clone(),
                gate.clone(),
                submitter,
                credential,
            ),
            config,
            queue,
            gate,
        }
    }

    pub fn queue(&self) -> SharedQueue {
        self.queue.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.gate.is_processing()
    }

    pub fn analysis(&self) -> &AnalysisOrchestrator {
        &self.analysis
    }

    pub fn submission(&self) -> &SubmissionOrchestrator {
        &self.submission
    }

    /// 提取 URL 并加入队列，返回新增数量
    pub async fn ingest(&self, raw_text: &str) -> usize {
        let urls = extract_urls(raw_text, &self.config.filter_keywords);
        if urls.is_empty() {
            return 0;
        }
        let mut queue = self.queue.lock().await;
        queue.add(&urls).len()
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        self.run_until(&CancellationToken::new()).await
    }

    /// 运行主逻辑；`cancel` 触发后停止继续提交
    pub async fn run_until(&self, cancel: &CancellationToken) -> Result<()> {
        info!("\n📁 正在读取输入: {}", self.config.input_path);
        let raw = load_input_text(Path::new(&self.config.input_path))
            .await
            .with_context(|| format!("无法读取输入文件: {}", self.config.input_path))?;

        let added = self.ingest(&raw).await;
        if added == 0 {
            warn!("⚠️ 没有提取到任何 URL，程序结束");
            return Ok(());
        }
        info!("✓ 提取到 {} 个 URL", added);

        // 分析失败时条目已退回 PENDING，仍然继续提交之前就绪的条目
        if let Err(e) = self.analysis.analyze(None).await {
            error!("❌ 分析失败: {}", e);
        }

        match self.submission.submit_until(None, Some(cancel)).await {
            Ok(_) => {}
            Err(AppError::ConfigMissing) => {
                warn!("⚠️ 未配置凭据，跳过提交");
            }
            Err(e) => error!("❌ 提交失败: {}", e),
        }

        let counts = self.queue.lock().await.counts();
        logging::print_final_stats(&counts, &self.config.output_log_file);

        Ok(())
    }
}
