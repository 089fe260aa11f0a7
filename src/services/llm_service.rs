//! LLM 服务 - 业务能力层
//!
//! 只负责"URL 质量评估"能力，不关心条目状态
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{AnalysisResult, QualityLabel};
use crate::services::traits::UrlAnalyzer;
use crate::utils::truncate_text;

const CALL_NAME: &str = "llm-analysis";

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 对一批 URL 打分
/// - 把响应解析成结构化的分析结果
/// - 不修改队列条目
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去除首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AppError::external_call_failed(CALL_NAME, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::external_call_failed(CALL_NAME, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.2)
            .max_tokens(4096u32)
            .build()
            .map_err(|e| AppError::external_call_failed(CALL_NAME, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::external_call_failed(CALL_NAME, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::malformed("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }

    /// 对一批 URL 做质量评估
    pub async fn analyze_urls(&self, urls: &[String]) -> AppResult<Vec<AnalysisResult>> {
        debug!(
            "开始 LLM 质量评估，URL 数量: {}, 模型: {}",
            urls.len(),
            self.model_name
        );

        let (user_message, system_message) = build_analysis_messages(urls);
        let response = self
            .send_to_llm(&user_message, Some(system_message))
            .await?;

        parse_analysis_response(&response)
    }
}

impl UrlAnalyzer for LlmService {
    fn analyze<'a>(&'a self, urls: &'a [String]) -> BoxFuture<'a, AppResult<Vec<AnalysisResult>>> {
        Box::pin(self.analyze_urls(urls))
    }
}

/// 构建质量评估的消息
///
/// 返回 (user_message, system_message)
fn build_analysis_messages(urls: &[String]) -> (String, &'static str) {
    let system_message = "You are an SEO auditor. You judge whether a URL is worth submitting \
                          to a search engine indexing API, based on the URL alone.";

    let url_list = serde_json::to_string_pretty(urls).unwrap_or_default();

    let user_message = format!(
        r#"Rate the indexing quality of each URL below.

Consider: path readability, whether it looks like canonical content (articles, product
pages) rather than utility pages (login, cart, search results, tracking parameters),
and whether it is likely to be duplicate content.

URLs:
{}

Return ONLY a JSON array, one object per URL, in this exact shape:
[{{"url": "<the url exactly as given>", "qualityLabel": "HIGH" | "MEDIUM" | "LOW", "qualityScore": <integer 0-100>, "reasoning": "<one short sentence>"}}]"#,
        url_list
    );

    (user_message, system_message)
}

#[derive(Debug, Deserialize)]
struct RawAnalysisEntry {
    url: Option<String>,
    #[serde(alias = "qualityLabel", alias = "label")]
    quality_label: Option<String>,
    #[serde(alias = "qualityScore", alias = "score")]
    quality_score: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// 解析 LLM 的评估响应
///
/// 允许响应被 ```json 代码块包裹；缺少字段、等级无法识别或分数越界都视为格式错误。
pub fn parse_analysis_response(response: &str) -> AppResult<Vec<AnalysisResult>> {
    let body = extract_json_array(response)
        .ok_or_else(|| AppError::malformed(format!("响应中没有 JSON 数组: {}", truncate_text(response, 120))))?;

    let entries: Vec<RawAnalysisEntry> = serde_json::from_str(body)
        .map_err(|e| AppError::malformed(format!("无法解析分析结果: {}", e)))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| convert_entry(idx, entry))
        .collect()
}

fn convert_entry(idx: usize, entry: RawAnalysisEntry) -> AppResult<AnalysisResult> {
    let url = entry
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::malformed(format!("第 {} 条结果缺少 url", idx)))?;

    let label_text = entry
        .quality_label
        .ok_or_else(|| AppError::malformed(format!("{} 缺少 qualityLabel", url)))?;
    let quality_label = QualityLabel::parse(&label_text).ok_or_else(|| {
        AppError::malformed(format!("{} 的等级无法识别: {}", url, label_text))
    })?;

    let score = entry
        .quality_score
        .ok_or_else(|| AppError::malformed(format!("{} 缺少 qualityScore", url)))?;
    if !(0.0..=100.0).contains(&score) {
        return Err(AppError::malformed(format!(
            "{} 的分数 {} 超出范围 [0, 100]",
            url, score
        )));
    }

    Ok(AnalysisResult {
        url,
        quality_label,
        quality_score: score.round() as u8,
        reasoning: entry.reasoning.unwrap_or_default(),
    })
}

fn extract_json_array(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    (start < end).then(|| &response[start..=end])
}
