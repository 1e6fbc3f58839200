//! # 工作进程配置模块
//!
//! ## 设计思路
//!
//! 将"用哪个解释器、跑哪个脚本、等多久"集中到 `WorkerConfig`，
//! 桥本身保持无状态。`Default` 对应产品内置的 Python 图像处理脚本。

use std::path::PathBuf;
use std::time::Duration;

/// 工作进程调用配置。
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// 解释器或可执行程序（相对名按 `PATH` 解析）。
    pub program: PathBuf,
    /// 工作脚本入口，作为首个命令行参数传递。
    pub script: PathBuf,
    /// 单次执行的超时上限；`None` 表示不限时（默认）。
    ///
    /// 配置后超限的子进程会被终止，调用方收到 `WorkerError::Timeout`；
    /// 不配置时挂起的进程只阻塞它自己那次调用。
    pub timeout: Option<Duration>,
}

impl WorkerConfig {
    pub fn new(program: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::new("python3", "python-backend/image_processor.py")
    }
}
