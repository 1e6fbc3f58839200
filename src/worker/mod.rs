//! # 工作进程桥接模块（worker）
//!
//! ## 设计思路
//!
//! 图像处理本体运行在外部进程（产品内置的 Python 脚本）中，本模块
//! 负责把结构化的命令意图翻译为一次子进程调用，并把进程产出翻译回
//! 结构化结果。按职责拆分：
//!
//! - `request`：命令意图与命令行参数序列化
//! - `config`：解释器 / 脚本路径 / 可选超时
//! - `bridge`：子进程执行与结果判定
//! - `error`：失败种类模型
//!
//! ## 实现思路
//!
//! 调用链：
//!
//! ```text
//! CommandRequest（意图）
//!    ↓ to_args（固定参数顺序）
//! ProcessBridge::execute（一次调用一个子进程）
//!    ↓ stdout / stderr 收齐
//! 结果判定（退出码 0 + JSON ⇒ 成功；否则按种类归入 WorkerError）
//! ```
//!
//! 协议约定：工作端在成功时向 stdout 输出恰好一个 JSON 文档并以 0 退出，
//! 诊断信息走 stderr。

pub mod bridge;
pub mod config;
pub mod error;
pub mod request;

pub use bridge::ProcessBridge;
pub use config::WorkerConfig;
pub use error::WorkerError;
pub use request::{CommandOptions, CommandRequest};
