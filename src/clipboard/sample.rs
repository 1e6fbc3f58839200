//! # 剪贴板图像样本模块
//!
//! ## 设计思路
//!
//! `ClipboardImageSample` 是监控与宿主之间唯一的数据载体：一次剪贴板读取
//! 的不可变快照。字段在构造时一次性确定，之后不再修改，因此去重只需要
//! 比较 `timestamp` 身份标识，无需做像素级比较。
//!
//! ## 实现思路
//!
//! - 负载使用 `bytes::Bytes`，读取端缓存与回调投递共享同一份内存。
//! - `byte_size` 由构造函数从负载长度推导，杜绝字段间不一致。
//! - 序列化输出 `{data, width, height, size, format, timestamp}`，其中
//!   `data` 为 Data URI，宿主层可直接用于 `<img>` 展示或作为处理输入。

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// 样本负载的编码格式。
///
/// 当前链路统一产出 PNG；保留枚举形态以便后续扩展其他无损格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Png,
}

impl SampleFormat {
    /// 稳定的小写格式名，供序列化与宿主展示。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
        }
    }

    /// 对应的 MIME 类型，用于拼接 Data URI。
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
        }
    }
}

/// 一次剪贴板图像读取的不可变快照。
///
/// `timestamp` 是内容身份标识：同一内容的多次读取携带相同标识，
/// 内容变化后标识严格递增（由读取端分配，见 `accessor` 模块）。
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardImageSample {
    payload: Bytes,
    width: u32,
    height: u32,
    byte_size: u64,
    format: SampleFormat,
    timestamp: i64,
}

impl ClipboardImageSample {
    /// 构造样本，`byte_size` 直接取自负载长度。
    pub fn new(payload: Bytes, width: u32, height: u32, format: SampleFormat, timestamp: i64) -> Self {
        let byte_size = payload.len() as u64;
        Self {
            payload,
            width,
            height,
            byte_size,
            format,
            timestamp,
        }
    }

    /// 编码后的图像字节（PNG）。
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 负载字节数，恒等于 `payload().len()`。
    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// 内容身份标识（毫秒时间戳，冲突时 +1 保证严格递增）。
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// 渲染为 `data:image/png;base64,...` 形式。
    ///
    /// 该形式既可直接交给前端展示，也可作为处理命令的 `--input` 负载。
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            general_purpose::STANDARD.encode(&self.payload)
        )
    }
}

/// 序列化为宿主层约定的载荷形状。
impl Serialize for ClipboardImageSample {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ClipboardImageSample", 6)?;
        state.serialize_field("data", &self.to_data_uri())?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("size", &self.byte_size)?;
        state.serialize_field("format", self.format.as_str())?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.end()
    }
}
