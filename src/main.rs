use anyhow::{Context, Result};
use index_submit::utils::logging;
use index_submit::{App, Config};
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置：INDEX_SUBMIT_CONFIG 指向 TOML 文件时使用文件，否则只读环境变量
    let config = match std::env::var("INDEX_SUBMIT_CONFIG") {
        Ok(path) => Config::from_toml_file(&path)
            .with_context(|| format!("无法加载配置文件: {}", path))?,
        Err(_) => Config::from_env(),
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    let app = App::initialize(config).await?;

    // Ctrl+C 后不再开始新的提交
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("收到中断信号，当前条目完成后停止提交");
            on_signal.cancel();
        }
    });

    app.run_until(&cancel).await
}
