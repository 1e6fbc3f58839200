//! # 剪贴板监控模块（clipboard）
//!
//! ## 设计思路
//!
//! 该模块将"系统剪贴板读取 → 内容身份判定 → 轮询去重 → 宿主通知"
//! 按职责拆分为多个子模块：
//!
//! - `sample`：样本数据模型（一次读取的不可变快照）
//! - `accessor`：读取边界抽象与 arboard 系统实现，负责分配身份标识
//! - `watcher`：轮询生命周期与去重投递
//!
//! ## 实现思路
//!
//! 监控采用轮询而非系统事件：行为简单可预测，读取失败只影响单轮，
//! 下一轮自动重试。监控器与读取端通过 `ClipboardAccessor` 解耦，
//! 测试中可以注入脚本化的假实现驱动完整链路。
//!
//! 调用链：
//!
//! ```text
//! watcher.rs（定时任务 + 去重记账）
//!    ↓
//! accessor.rs（读取系统剪贴板 + 摘要缓存 + 身份标识分配）
//!    ↓
//! sample.rs（PNG 负载 + 元数据 + Data URI / 序列化）
//!    ↓
//! 宿主通知回调
//! ```

pub mod accessor;
pub mod sample;
pub mod watcher;

pub use accessor::{ClipboardAccessor, SystemClipboard};
pub use sample::{ClipboardImageSample, SampleFormat};
pub use watcher::{ClipboardWatcher, DEFAULT_POLL_INTERVAL, WatcherConfig};
