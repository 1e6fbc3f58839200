//! # 剪贴板图像工作台 — 调试入口
//!
//! 无界面的组合入口：启动剪贴板图像监控，把检测到的样本打到日志；
//! 设置了工作脚本时，对每个样本附带执行一次 `info` 命令验证处理链路。
//! 业务逻辑分布在库模块中，详见 `lib.rs` 架构文档。
//!
//! 环境变量：
//! - `CLIPBOARD_POLL_MS`：轮询间隔（毫秒，默认 500）
//! - `WORKER_PROGRAM`：解释器（默认 `python3`）
//! - `WORKER_SCRIPT`：工作脚本路径；未设置时跳过处理进程探测

use std::sync::Arc;
use std::time::Duration;

use clipboard_studio::clipboard::{
    ClipboardWatcher, DEFAULT_POLL_INTERVAL, SystemClipboard, WatcherConfig,
};
use clipboard_studio::worker::{CommandRequest, ProcessBridge, WorkerConfig};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = WatcherConfig {
        poll_interval: poll_interval_from_env(),
    };
    let watcher = ClipboardWatcher::with_config(Arc::new(SystemClipboard::new()), config);

    let bridge = bridge_from_env().map(Arc::new);
    if bridge.is_none() {
        log::info!("未设置 WORKER_SCRIPT，跳过处理进程探测");
    }

    watcher
        .start(move |sample| {
            log::info!(
                "样本: {}x{}，{} 字节，标识 {}",
                sample.width(),
                sample.height(),
                sample.byte_size(),
                sample.timestamp()
            );

            if let Some(bridge) = &bridge {
                let bridge = Arc::clone(bridge);
                let input = sample.to_data_uri();
                tokio::spawn(async move {
                    let request = CommandRequest::new("info").with_input(input);
                    match bridge.execute(&request).await {
                        Ok(result) => log::info!("info 结果: {}", result),
                        Err(err) => log::warn!("info 探测失败（{}）: {}", err.kind(), err),
                    }
                });
            }
        })
        .await;

    log::info!("按 Ctrl+C 退出");
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("等待 Ctrl+C 信号失败: {}", err);
    }
    watcher.stop().await;
}

fn poll_interval_from_env() -> Duration {
    match std::env::var("CLIPBOARD_POLL_MS") {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                log::warn!(
                    "CLIPBOARD_POLL_MS 取值非法（{}），使用默认 {}ms",
                    raw,
                    DEFAULT_POLL_INTERVAL.as_millis()
                );
                DEFAULT_POLL_INTERVAL
            }
        },
        Err(_) => DEFAULT_POLL_INTERVAL,
    }
}

fn bridge_from_env() -> Option<ProcessBridge> {
    let script = std::env::var_os("WORKER_SCRIPT")?;
    let program = std::env::var_os("WORKER_PROGRAM").unwrap_or_else(|| "python3".into());
    Some(ProcessBridge::new(WorkerConfig::new(program, script)))
}
