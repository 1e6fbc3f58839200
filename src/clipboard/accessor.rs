//! # 剪贴板读取边界模块
//!
//! ## 设计思路
//!
//! 监控循环不直接触碰系统剪贴板，而是依赖 `ClipboardAccessor` 抽象：
//! 生产环境用 `SystemClipboard`（arboard），测试用脚本化的假实现。
//!
//! 身份标识由读取端负责。系统剪贴板本身不提供"内容版本号"，因此
//! `SystemClipboard` 对原始像素做 SHA-256 摘要：摘要不变则复用上一次
//! 的样本（相同 `timestamp`，不重复编码 PNG）；摘要变化才分配新标识。
//! 新标识取 `max(当前毫秒时钟, 上一标识 + 1)`，时钟停滞或回拨时仍然
//! 严格递增。
//!
//! ## 实现思路
//!
//! - 每次读取新开 `arboard::Clipboard`，与写入端互不持有长生命周期句柄。
//! - `ContentNotAvailable` 与 0 尺寸图像视为"无图像"（`Ok(None)`），不算错误。
//! - 摘要与缓存封装在 `SampleMemo`，纯逻辑可单测。

use std::io::Cursor;
use std::sync::Mutex;

use bytes::Bytes;
use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::error::AppError;

use super::sample::{ClipboardImageSample, SampleFormat};

/// 宿主剪贴板读取边界。
///
/// # 约定
/// - `Ok(None)`：剪贴板为空或内容不是图像，属正常情况
/// - `Ok(Some(sample))`：当前图像快照；内容未变化时携带相同 `timestamp`
/// - `Err(_)`：本次读取失败，调用方记录后可在下一轮重试
pub trait ClipboardAccessor: Send + Sync {
    fn read(&self) -> Result<Option<ClipboardImageSample>, AppError>;
}

/// 基于 arboard 的系统剪贴板实现。
///
/// 内部缓存最近一次的内容摘要与样本，保证"未变化 => 相同身份标识"。
pub struct SystemClipboard {
    memo: Mutex<SampleMemo>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            memo: Mutex::new(SampleMemo::default()),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardAccessor for SystemClipboard {
    fn read(&self) -> Result<Option<ClipboardImageSample>, AppError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;

        let image = match clipboard.get_image() {
            Ok(image) => image,
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(err) => return Err(AppError::Clipboard(err.to_string())),
        };

        let width = u32::try_from(image.width)
            .map_err(|_| AppError::Clipboard(format!("图像宽度超出范围: {}", image.width)))?;
        let height = u32::try_from(image.height)
            .map_err(|_| AppError::Clipboard(format!("图像高度超出范围: {}", image.height)))?;
        if width == 0 || height == 0 {
            return Ok(None);
        }

        let digest = digest_rgba(width, height, &image.bytes);
        let now_ms = Utc::now().timestamp_millis();

        let mut memo = match self.memo.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("剪贴板采样缓存锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        };
        let sample = memo.admit(digest, now_ms, |token| {
            encode_sample(&image.bytes, width, height, token)
        })?;
        Ok(Some(sample))
    }
}

/// 最近一次读取的内容摘要与样本缓存。
#[derive(Default)]
struct SampleMemo {
    last: Option<MemoEntry>,
}

struct MemoEntry {
    digest: String,
    sample: ClipboardImageSample,
}

impl SampleMemo {
    /// 判定本次读取的身份：摘要未变化则复用缓存样本，
    /// 变化则用 `encode` 产出新样本并分配严格递增的标识。
    fn admit<E>(
        &mut self,
        digest: String,
        now_ms: i64,
        encode: E,
    ) -> Result<ClipboardImageSample, AppError>
    where
        E: FnOnce(i64) -> Result<ClipboardImageSample, AppError>,
    {
        if let Some(entry) = &self.last {
            if entry.digest == digest {
                return Ok(entry.sample.clone());
            }
        }

        let token = next_identity_token(now_ms, self.last.as_ref().map(|e| e.sample.timestamp()));
        let sample = encode(token)?;
        self.last = Some(MemoEntry {
            digest,
            sample: sample.clone(),
        });
        Ok(sample)
    }
}

/// 时钟停滞或回拨时退化为"上一标识 + 1"，保证标识严格递增。
fn next_identity_token(now_ms: i64, last: Option<i64>) -> i64 {
    match last {
        Some(prev) if now_ms <= prev => prev + 1,
        _ => now_ms,
    }
}

fn digest_rgba(width: u32, height: u32, rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(width.to_le_bytes());
    hasher.update(height.to_le_bytes());
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

fn encode_sample(
    rgba: &[u8],
    width: u32,
    height: u32,
    token: i64,
) -> Result<ClipboardImageSample, AppError> {
    let mut payload = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut payload),
        rgba,
        width,
        height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| AppError::Clipboard(format!("图像编码为 PNG 失败: {}", e)))?;

    Ok(ClipboardImageSample::new(
        Bytes::from(payload),
        width,
        height,
        SampleFormat::Png,
        token,
    ))
}
