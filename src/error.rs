use thiserror::Error;

use crate::models::{ItemId, ItemStatus};

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 提交时未配置服务账号凭据
    #[error("配置缺失: 未提供索引服务凭据")]
    ConfigMissing,

    /// 外部调用（分析 / 提交）失败或超时
    #[error("外部调用失败 ({call}): {message}")]
    ExternalCallFailed { call: String, message: String },

    /// 分析响应缺少字段或与请求的 URL 不符
    #[error("响应格式错误: {0}")]
    MalformedResponse(String),

    /// 凭据校验失败
    #[error("校验失败: {0}")]
    Validation(String),

    /// 已有分析或提交任务在运行
    #[error("正在处理中，请等待当前任务完成")]
    Busy,

    /// 条目不存在
    #[error("条目 {0} 不存在")]
    ItemNotFound(ItemId),

    /// 非法的状态迁移
    #[error("条目 {id} 不能从 {from} 迁移到 {to}")]
    InvalidTransition {
        id: ItemId,
        from: ItemStatus,
        to: ItemStatus,
    },

    /// 配置文件内容错误
    #[error("配置错误: {0}")]
    Config(String),

    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML解析失败: {0}")]
    Toml(#[from] toml::de::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建外部调用失败错误
    pub fn external_call_failed(call: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::ExternalCallFailed {
            call: call.into(),
            message: message.to_string(),
        }
    }

    /// 创建响应格式错误
    pub fn malformed(message: impl Into<String>) -> Self {
        AppError::MalformedResponse(message.into())
    }

    /// 创建凭据校验错误
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
