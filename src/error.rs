//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! 剪贴板读取属于"可跳过"错误：监控循环记录日志后等待下一轮即可。
//! 工作进程错误属于"可分支"错误：`WorkerError` 保留具体失败种类，
//! 上转到 `AppError` 后仍可通过 `source` 链还原。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `WorkerError` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于宿主层（IPC/前端）直接展示。

use serde::Serialize;

use crate::worker::WorkerError;

/// 应用级统一错误类型
///
/// 库的公开接口均返回此类型或其子错误，确保宿主收到一致的错误格式。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板读取/编码失败
    #[error("剪贴板操作失败: {0}")]
    Clipboard(String),

    /// 工作进程调用失败（启动 / 退出码 / 输出解析）
    #[error("{0}")]
    Worker(#[from] WorkerError),
}

/// 宿主层（IPC）要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
