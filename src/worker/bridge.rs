//! # 工作进程桥接模块
//!
//! ## 设计思路
//!
//! 每次 `execute` 启动一个独立子进程：无进程池、无跨调用状态，
//! 并发调用各自持有自己的子进程与输出缓冲，互不影响。
//! 调用结束后统一判定结果，成功与失败都是显式返回值。
//!
//! ## 实现思路
//!
//! - `tokio::process::Command`：stdin 置空，stdout/stderr 以管道收齐
//!   （`wait_with_output`，不做流式转发）。
//! - 退出码 0 时 stdout 必须恰好是一个 JSON 文档；解析失败即失败结果，
//!   绝不把无法解析的输出当成部分成功。
//! - 非 0 退出返回 `Exit { code, stderr }`；被信号终止记退出码 -1。
//! - 超时仅在配置后生效：超限即终止子进程并返回 `Timeout`。
//!   未配置超时时不设 `kill_on_drop`，已启动的进程运行到自然结束。

use std::ffi::OsString;
use std::process::{Output, Stdio};

use serde_json::Value;
use tokio::process::{Child, Command};

use super::config::WorkerConfig;
use super::error::WorkerError;
use super::request::CommandRequest;

/// 外部图像处理进程的调用桥。
///
/// 桥在两次调用之间只持有配置，可被任意多个调用方共享；
/// 需要串行化时由调用方自行排队。
pub struct ProcessBridge {
    config: WorkerConfig,
}

impl ProcessBridge {
    pub fn new(config: WorkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// 执行一条处理命令，等待进程结束并返回结构化结果。
    ///
    /// 成功返回工作端输出的 JSON 文档；所有失败路径都会先留下日志
    /// 再以 `WorkerError` 返回，不会静默丢弃。
    pub async fn execute(&self, request: &CommandRequest) -> Result<Value, WorkerError> {
        let args = match request.to_args(&self.config.script) {
            Ok(args) => args,
            Err(err) => {
                log::warn!("⚙️ 处理命令被拒绝: {}", err);
                return Err(err);
            }
        };

        log::debug!(
            "⚙️ 执行处理命令: {} {}",
            self.config.program.display(),
            display_args(&args)
        );

        let mut command = Command::new(&self.config.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // 仅超时模式下在丢弃句柄时终止子进程
            .kill_on_drop(self.config.timeout.is_some());

        let child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                log::error!("⚙️ 启动工作进程失败: {}", err);
                return Err(WorkerError::Spawn(err));
            }
        };

        let output = self.wait_for_output(child, &request.command).await?;
        let outcome = reconcile_output(output);
        match &outcome {
            Ok(_) => log::info!("✅ 处理命令 {} 执行成功", request.command),
            Err(err) => log::warn!("⚙️ 处理命令 {} 失败: {}", request.command, err),
        }
        outcome
    }

    /// 收齐子进程输出；配置了超时则以 `tokio::time::timeout` 约束等待。
    async fn wait_for_output(&self, child: Child, command: &str) -> Result<Output, WorkerError> {
        let wait = child.wait_with_output();
        let result = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result,
                Err(_) => {
                    log::warn!(
                        "⚙️ 处理命令 {} 超过 {}ms 未结束，已终止",
                        command,
                        limit.as_millis()
                    );
                    return Err(WorkerError::Timeout(limit));
                }
            },
            None => wait.await,
        };

        result.map_err(|err| {
            log::error!("⚙️ 收集工作进程输出失败: {}", err);
            WorkerError::Spawn(err)
        })
    }
}

/// 按退出码与标准输出判定最终结果。
///
/// stderr 在成功路径上仅作诊断信息，不参与判定。
fn reconcile_output(output: Output) -> Result<Value, WorkerError> {
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        return parse_worker_payload(&stdout);
    }

    // 被信号终止等拿不到退出码的情况统一记为 -1
    let code = output.status.code().unwrap_or(-1);
    let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
    Err(WorkerError::Exit { code, stderr })
}

/// stdout 必须恰好是一个 JSON 文档；空输出同样按解析失败处理，
/// 并在错误里保留原始输出便于排查。
fn parse_worker_payload(stdout: &str) -> Result<Value, WorkerError> {
    serde_json::from_str(stdout).map_err(|err| WorkerError::Parse {
        reason: err.to_string(),
        stdout: stdout.to_string(),
    })
}

fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
