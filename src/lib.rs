//! # 剪贴板图像工作台 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 宿主层（桌面 UI / 组合入口）              │
//! │                                                          │
//! │   通知回调 ←─ 图像样本          命令请求 ─→ 结果 / 失败    │
//! └───────┬─────────────────────────────┬────────────────────┘
//!         ↕                             ↕
//! ┌───────┼─────────────────────────────┼────────────────────┐
//! │       ↕          核心 (Rust)        ↕                    │
//! │                                                          │
//! │  ┌─ clipboard ── 轮询监控 + 去重投递                     │
//! │  │   ├─ watcher    启停生命周期 / 每轮读取               │
//! │  │   ├─ accessor   读取边界 + 身份标识分配 (arboard)     │
//! │  │   └─ sample     不可变样本 (PNG + 元数据)             │
//! │  │                                                       │
//! │  ├─ worker ────── 外部处理进程桥                         │
//! │  │   ├─ request    命令意图 → 固定顺序参数               │
//! │  │   ├─ bridge     一次调用一个子进程 / JSON 结果        │
//! │  │   └─ config     解释器·脚本·可选超时                  │
//! │  │                                                       │
//! │  └─ error ─────── AppError (统一错误类型)                │
//! └───────┬─────────────────────────────┬────────────────────┘
//!         ↕                             ↕
//!    系统剪贴板                  外部图像处理脚本 (Python)
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，库公开接口的错误出口 |
//! | [`clipboard`] | 剪贴板图像轮询监控、内容身份判定、样本模型 |
//! | [`worker`] | 处理命令的进程桥：参数序列化、子进程执行、结果判定 |
//!
//! 两个核心组件互不依赖，由宿主（或 `main.rs` 调试入口）组合：
//! 监控产出的样本经宿主决策后，才会变成一条发给工作进程的命令。

pub mod clipboard;
pub mod error;
pub mod worker;
