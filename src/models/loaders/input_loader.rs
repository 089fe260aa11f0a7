use std::path::Path;

use tokio::fs;

use crate::error::AppResult;
use crate::models::credential::ServiceAccountCredential;

/// 从 JSON 文件加载并校验服务账号凭据
pub async fn load_credential(path: &Path) -> AppResult<ServiceAccountCredential> {
    let content = fs::read_to_string(path).await?;
    let credential = ServiceAccountCredential::from_json(&content)?;
    tracing::info!(
        "已加载凭据: {} ({})",
        credential.client_email,
        credential.project_id
    );
    Ok(credential)
}

/// 读取待提取的原始文本（sitemap / HTML / 纯文本）
pub async fn load_input_text(path: &Path) -> AppResult<String> {
    let content = fs::read_to_string(path).await?;
    tracing::info!(
        "正在加载: {} ({} 字节)",
        path.file_name().unwrap_or_default().to_string_lossy(),
        content.len()
    );
    Ok(content)
}
