//! # 工作进程错误模型模块
//!
//! ## 设计思路
//!
//! 用单一错误枚举承载一次调用的所有失败形态，调用侧可按分支匹配，
//! 也可通过 `kind()` 拿到稳定的种类代码做重试/提示策略。
//! 失败与成功同级：任何失败都是 `execute` 的正常返回值，不会升级为 panic。

use std::time::Duration;

use serde::Serialize;

/// 工作进程调用的失败种类。
///
/// 同一次调用只会产生其中一种：参数在启动前被拒绝（`InvalidRequest`）、
/// 进程无法启动或无法交互（`Spawn`）、进程以非 0 退出（`Exit`）、
/// 进程成功退出但输出不可解析（`Parse`）、配置了超时且超限（`Timeout`）。
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("处理请求不合法：{0}")]
    InvalidRequest(String),

    #[error("启动工作进程失败：{0}")]
    Spawn(#[source] std::io::Error),

    #[error("工作进程退出（代码 {code}）：{stderr}")]
    Exit { code: i32, stderr: String },

    #[error("解析工作进程输出失败：{reason}；原始输出：{stdout}")]
    Parse { reason: String, stdout: String },

    #[error("工作进程执行超时（{}ms）", .0.as_millis())]
    Timeout(Duration),
}

impl WorkerError {
    /// 稳定的失败种类代码，供宿主按类别分支。
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Spawn(_) => "spawn",
            Self::Exit { .. } => "worker",
            Self::Parse { .. } => "parse",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// 宿主层（IPC）要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for WorkerError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
