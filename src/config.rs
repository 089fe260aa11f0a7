use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::parse_keywords;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 索引服务配置 ---
    pub indexing_endpoint: String,
    /// 已换取的访问令牌（令牌交换由外部完成）
    pub indexing_access_token: Option<String>,
    /// 服务账号凭据 JSON 路径
    pub credential_path: Option<String>,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 输入 ---
    /// 待提取 URL 的文件（sitemap / HTML / 纯文本）
    pub input_path: String,
    /// URL 关键词过滤，为空时不过滤
    pub filter_keywords: Vec<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            indexing_endpoint: "https://indexing.googleapis.com/v3/urlNotifications:publish"
                .to_string(),
            indexing_access_token: None,
            credential_path: None,
            request_timeout_secs: 30,
            input_path: "sitemap.xml".to_string(),
            filter_keywords: Vec::new(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，缺失的键使用默认值，随后应用环境变量覆盖
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| {
            AppError::Config(format!("{}: {}", path.display(), e))
        })?;
        Ok(config.with_env_overrides())
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)?;
        if config.request_timeout_secs == 0 {
            return Err(AppError::Config("request_timeout_secs 必须大于 0".to_string()));
        }
        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        let env = |name: &str| std::env::var(name).ok();
        Self {
            llm_api_key: env("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: env("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: env("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            indexing_endpoint: env("INDEXING_ENDPOINT").unwrap_or(self.indexing_endpoint),
            indexing_access_token: env("INDEXING_ACCESS_TOKEN").or(self.indexing_access_token),
            credential_path: env("CREDENTIAL_PATH").or(self.credential_path),
            request_timeout_secs: env("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(self.request_timeout_secs),
            input_path: env("INPUT_PATH").unwrap_or(self.input_path),
            filter_keywords: env("FILTER_KEYWORDS")
                .map(|v| parse_keywords(&v))
                .unwrap_or(self.filter_keywords),
            verbose_logging: env("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            output_log_file: env("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }
}
