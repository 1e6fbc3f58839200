//! # 剪贴板轮询监控模块
//!
//! ## 设计思路
//!
//! 以固定间隔轮询读取边界，发现"新图像"后调用宿主注册的通知回调。
//! 监控状态完全由实例自持（原子运行标志 + 任务句柄），不依赖全局变量，
//! 同一进程可并存多个互不干扰的监控实例。
//!
//! 去重只比较身份标识：本次样本的 `timestamp` 等于上一次已投递的标识
//! 则抑制，否则投递并记账。首次读取必然投递。不做像素比较。
//!
//! ## 实现思路
//!
//! - `start` 用 `compare_exchange` 保证幂等：重复启动只记一条警告，
//!   不会出现第二个定时任务。
//! - `stop` 中止轮询任务并等待其退出，返回后不会再产生回调；空闲时
//!   调用是无害的空操作。
//! - 单次轮询逻辑抽成同步的 `run_tick`，便于脱离定时器做确定性测试。
//! - 回调内的 panic 被捕获并记日志，轮询继续运行。

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::accessor::ClipboardAccessor;
use super::sample::ClipboardImageSample;

/// 默认轮询间隔。
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 监控可调参数。
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// 轮询间隔，低于下限时在启动阶段被钳制。
    pub poll_interval: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// 剪贴板图像轮询监控器。
///
/// 生命周期为 空闲 ⇄ 运行 两态，可反复启停；每次 `start` 都从"无历史"
/// 开始，首个非空读取总会投递。
pub struct ClipboardWatcher<A: ClipboardAccessor> {
    accessor: Arc<A>,
    config: WatcherConfig,
    running: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<A: ClipboardAccessor + 'static> ClipboardWatcher<A> {
    pub fn new(accessor: Arc<A>) -> Self {
        Self::with_config(accessor, WatcherConfig::default())
    }

    pub fn with_config(accessor: Arc<A>, config: WatcherConfig) -> Self {
        Self {
            accessor,
            config,
            running: AtomicBool::new(false),
            handle: Mutex::new(None),
        }
    }

    /// 启动轮询监控。
    ///
    /// 启动后立即执行首轮读取，之后按间隔推进；已在运行时重复调用
    /// 只记录警告，不产生第二个定时任务。
    pub async fn start<F>(&self, on_detected: F)
    where
        F: Fn(ClipboardImageSample) + Send + 'static,
    {
        // 句柄锁先行，启停彼此串行，任务句柄不会被竞争丢失
        let mut slot = self.handle.lock().await;
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("📋 剪贴板监控已在运行中，忽略重复启动");
            return;
        }

        let interval = normalize_poll_interval(self.config.poll_interval);
        if interval != self.config.poll_interval {
            log::debug!("📋 轮询间隔过小，已钳制为 {}ms", interval.as_millis());
        }

        let accessor = Arc::clone(&self.accessor);
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_delivered: Option<i64> = None;

            loop {
                ticker.tick().await;
                run_tick(accessor.as_ref(), &on_detected, &mut last_delivered);
            }
        }));
        log::info!("📋 剪贴板监控已启动（间隔 {}ms）", interval.as_millis());
    }

    /// 停止轮询监控。
    ///
    /// 中止定时任务并等待其退出，返回后不会再有回调触发；
    /// 未在运行时调用是空操作。
    pub async fn stop(&self) {
        let mut slot = self.handle.lock().await;
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }

        if let Some(task) = slot.take() {
            task.abort();
            let _ = task.await;
        }
        log::info!("📋 剪贴板监控已停止");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// 监控器被丢弃时中止后台任务，避免轮询泄漏。
impl<A: ClipboardAccessor> Drop for ClipboardWatcher<A> {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.handle.try_lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }
}

/// 执行单次轮询：读取 -> 去重 -> 投递。
///
/// 读取失败只记录警告并跳过本轮；回调 panic 被捕获，该样本仍视为已投递。
fn run_tick<A, F>(accessor: &A, on_detected: &F, last_delivered: &mut Option<i64>)
where
    A: ClipboardAccessor,
    F: Fn(ClipboardImageSample),
{
    let sample = match accessor.read() {
        Ok(Some(sample)) => sample,
        Ok(None) => return,
        Err(err) => {
            log::warn!("📋 读取剪贴板失败，本轮跳过: {}", err);
            return;
        }
    };

    if !should_deliver(*last_delivered, sample.timestamp()) {
        return;
    }
    *last_delivered = Some(sample.timestamp());

    log::info!(
        "🖼️ 检测到新的剪贴板图像: {}x{}，{} 字节",
        sample.width(),
        sample.height(),
        sample.byte_size()
    );
    if catch_unwind(AssertUnwindSafe(|| on_detected(sample))).is_err() {
        log::error!("📋 剪贴板通知回调发生 panic，已忽略");
    }
}

/// 仅按身份标识相等去重；首次读取（无历史）总是投递。
fn should_deliver(last_delivered: Option<i64>, timestamp: i64) -> bool {
    last_delivered != Some(timestamp)
}

fn normalize_poll_interval(interval: Duration) -> Duration {
    if interval < MIN_POLL_INTERVAL {
        MIN_POLL_INTERVAL
    } else {
        interval
    }
}
