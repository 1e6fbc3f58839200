//! # 处理命令请求模块
//!
//! ## 设计思路
//!
//! `CommandRequest` 描述一次调用的完整意图：命令标识 + 一组可枚举的
//! 可选参数。参数以命令行形式传给工作进程，顺序固定
//! （`--input` → `--output` → `--format` → `--quality` → `--params`），
//! 便于日志排查与测试断言。
//!
//! ## 实现思路
//!
//! - 路径字段保持 `OsString` 通道传递，不经过 UTF-8 转换。
//! - `params` 是命令专属的结构化负载，整体序列化为一个 JSON 参数，
//!   桥不理解其内容。
//! - 结构体可被 serde 反序列化，宿主层的 IPC JSON 可直接落到此类型。

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::WorkerError;

/// 处理命令的可选参数，缺省字段由工作端采用自身默认值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandOptions {
    /// 输入图像：文件路径，或 Base64 / Data URI 负载（由工作端自行探测）。
    pub input: Option<String>,
    /// 输出文件路径；缺省时工作端把结果以 Base64 编码返回。
    pub output: Option<PathBuf>,
    /// 目标编码格式（如 `PNG` / `JPEG` / `WEBP`，工作端默认 `PNG`）。
    pub format: Option<String>,
    /// 编码质量（工作端默认 95）。
    pub quality: Option<u32>,
    /// 命令专属结构化参数，原样以 JSON 传递。
    pub params: Option<serde_json::Value>,
}

/// 一次工作进程调用的完整意图。
///
/// 命令标识是工作端的分发键（如 `crop` / `rotate` / `flip_horizontal` /
/// `add_text` / `save` / `info` / `undo` / `redo`），桥对具体词表保持中立。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    #[serde(default)]
    pub options: CommandOptions,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            options: CommandOptions::default(),
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.options.input = Some(input.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.options.output = Some(output.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.options.format = Some(format.into());
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.options.quality = Some(quality);
        self
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.options.params = Some(params);
        self
    }

    /// 展开为工作进程的命令行参数。
    ///
    /// 布局恒为 `script command [--input v] [--output v] [--format v]
    /// [--quality v] [--params json]`，仅存在的字段会出现。
    /// 空白命令在这里被拒绝，不会走到进程启动。
    pub(crate) fn to_args(&self, script: &Path) -> Result<Vec<OsString>, WorkerError> {
        if self.command.trim().is_empty() {
            return Err(WorkerError::InvalidRequest("命令标识不能为空".into()));
        }

        let mut args: Vec<OsString> = Vec::with_capacity(12);
        args.push(script.as_os_str().to_os_string());
        args.push(OsString::from(self.command.as_str()));

        if let Some(input) = &self.options.input {
            args.push(OsString::from("--input"));
            args.push(OsString::from(input.as_str()));
        }
        if let Some(output) = &self.options.output {
            args.push(OsString::from("--output"));
            args.push(output.as_os_str().to_os_string());
        }
        if let Some(format) = &self.options.format {
            args.push(OsString::from("--format"));
            args.push(OsString::from(format.as_str()));
        }
        if let Some(quality) = self.options.quality {
            args.push(OsString::from("--quality"));
            args.push(OsString::from(quality.to_string()));
        }
        if let Some(params) = &self.options.params {
            let json = serde_json::to_string(params).map_err(|e| {
                WorkerError::InvalidRequest(format!("params 无法序列化为 JSON：{}", e))
            })?;
            args.push(OsString::from("--params"));
            args.push(OsString::from(json));
        }

        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandOptions, CommandRequest};
    use crate::worker::error::WorkerError;
    use serde_json::json;
    use std::ffi::OsString;
    use std::path::Path;

    #[test]
    fn to_args_orders_options_stably() {
        let request = CommandRequest::new("crop")
            .with_input("in.png")
            .with_output("out.webp")
            .with_format("WEBP")
            .with_quality(80)
            .with_params(json!({"x": 1, "y": 2}));

        let args = request.to_args(Path::new("worker.py")).unwrap();
        let expected: Vec<OsString> = [
            "worker.py", "crop", "--input", "in.png", "--output", "out.webp", "--format", "WEBP",
            "--quality", "80", "--params", r#"{"x":1,"y":2}"#,
        ]
        .into_iter()
        .map(OsString::from)
        .collect();

        assert_eq!(args, expected);
    }

    #[test]
    fn to_args_skips_absent_options() {
        let args = CommandRequest::new("info").to_args(Path::new("worker.py")).unwrap();
        assert_eq!(args, vec![OsString::from("worker.py"), OsString::from("info")]);
    }

    #[test]
    fn to_args_rejects_blank_command() {
        let result = CommandRequest::new("   ").to_args(Path::new("worker.py"));
        assert!(
            matches!(result, Err(WorkerError::InvalidRequest(_))),
            "空白命令应在启动前被拒绝"
        );
    }

    #[test]
    fn params_survive_serialization_losslessly() {
        let params = json!({
            "points": [[0, 0], [120, 45]],
            "text": "标注：上午 9:00",
            "opacity": 0.85,
            "nested": {"enabled": true, "label": null}
        });
        let request = CommandRequest::new("add_text").with_params(params.clone());

        let args = request.to_args(Path::new("worker.py")).unwrap();
        let raw = args.last().unwrap().to_str().unwrap();
        let restored: serde_json::Value = serde_json::from_str(raw).unwrap();

        assert_eq!(restored, params, "params 必须无损往返");
    }

    #[test]
    fn options_deserialize_from_host_json() {
        let options: CommandOptions =
            serde_json::from_str(r#"{"input": "a.png", "quality": 80}"#).unwrap();

        assert_eq!(options.input.as_deref(), Some("a.png"));
        assert_eq!(options.quality, Some(80));
        assert!(options.output.is_none());
        assert!(options.format.is_none());
        assert!(options.params.is_none());
    }
}
