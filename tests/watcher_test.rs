//! 监控生命周期集成测试
//!
//! 走真实的 tokio 定时任务（虚拟时钟），验证启停幂等、跨轮去重、
//! 停止后不再投递与重启后的首样本投递。读取端全部使用假实现，
//! 不依赖系统剪贴板。

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::time::Duration;

use bytes::Bytes;
use clipboard_studio::clipboard::{
    ClipboardAccessor, ClipboardImageSample, ClipboardWatcher, SampleFormat, WatcherConfig,
};
use clipboard_studio::error::AppError;

fn sample(token: i64) -> ClipboardImageSample {
    ClipboardImageSample::new(Bytes::from_static(b"png"), 4, 4, SampleFormat::Png, token)
}

fn test_watcher<A: ClipboardAccessor + 'static>(accessor: A) -> ClipboardWatcher<A> {
    ClipboardWatcher::with_config(
        Arc::new(accessor),
        WatcherConfig {
            poll_interval: Duration::from_millis(20),
        },
    )
}

/// 每次读取都返回同一份样本，并统计读取次数。
struct RepeatingAccessor {
    token: i64,
    reads: Arc<AtomicU32>,
}

impl RepeatingAccessor {
    fn new(token: i64) -> (Arc<AtomicU32>, Self) {
        let reads = Arc::new(AtomicU32::new(0));
        (
            Arc::clone(&reads),
            Self { token, reads },
        )
    }
}

impl ClipboardAccessor for RepeatingAccessor {
    fn read(&self) -> Result<Option<ClipboardImageSample>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(Some(sample(self.token)))
    }
}

/// 每次读取都产生新标识，相当于剪贴板内容每轮都在变化。
struct IncrementingAccessor {
    next: AtomicI64,
}

impl IncrementingAccessor {
    fn new() -> Self {
        Self {
            next: AtomicI64::new(1),
        }
    }
}

impl ClipboardAccessor for IncrementingAccessor {
    fn read(&self) -> Result<Option<ClipboardImageSample>, AppError> {
        Ok(Some(sample(self.next.fetch_add(1, Ordering::SeqCst))))
    }
}

fn counting_callback() -> (Arc<AtomicU32>, impl Fn(ClipboardImageSample) + Send + 'static) {
    let count = Arc::new(AtomicU32::new(0));
    let sink = Arc::clone(&count);
    (count, move |_sample| {
        sink.fetch_add(1, Ordering::SeqCst);
    })
}

async fn wait_until(deadline: Duration, cond: impl Fn() -> bool) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

#[tokio::test(start_paused = true)]
async fn unchanged_content_delivers_at_most_once() {
    let (reads, accessor) = RepeatingAccessor::new(7);
    let watcher = test_watcher(accessor);
    let (delivered, on_detected) = counting_callback();

    watcher.start(on_detected).await;
    assert!(
        wait_until(Duration::from_secs(2), || reads.load(Ordering::SeqCst) >= 10).await,
        "监控应持续轮询读取"
    );
    watcher.stop().await;

    assert_eq!(
        delivered.load(Ordering::SeqCst),
        1,
        "相同标识的样本只应投递一次"
    );
}

#[tokio::test(start_paused = true)]
async fn stop_halts_delivery_and_is_idempotent() {
    let watcher = test_watcher(IncrementingAccessor::new());
    let (delivered, on_detected) = counting_callback();

    watcher.start(on_detected).await;
    assert!(
        wait_until(Duration::from_secs(2), || delivered.load(Ordering::SeqCst) >= 3).await,
        "变化的内容应持续投递"
    );

    watcher.stop().await;
    let at_stop = delivered.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        delivered.load(Ordering::SeqCst),
        at_stop,
        "stop 返回后不应再有任何投递"
    );

    // 空闲状态下重复 stop 是无害的空操作
    watcher.stop().await;
    assert!(!watcher.is_running());
}

#[tokio::test(start_paused = true)]
async fn double_start_keeps_a_single_poller() {
    let (reads, accessor) = RepeatingAccessor::new(9);
    let watcher = test_watcher(accessor);
    let (delivered, on_detected) = counting_callback();
    let (second_delivered, second_callback) = counting_callback();

    watcher.start(on_detected).await;
    // 重复启动应记警告并保留原定时任务
    watcher.start(second_callback).await;

    assert!(
        wait_until(Duration::from_secs(2), || reads.load(Ordering::SeqCst) >= 10).await,
        "监控应持续轮询读取"
    );
    watcher.stop().await;

    assert_eq!(delivered.load(Ordering::SeqCst), 1, "首个回调投递一次");
    assert_eq!(
        second_delivered.load(Ordering::SeqCst),
        0,
        "重复启动不应挂接第二个定时任务"
    );
}

#[tokio::test(start_paused = true)]
async fn restart_delivers_first_sample_again() {
    let (_reads, accessor) = RepeatingAccessor::new(11);
    let watcher = test_watcher(accessor);

    let (first_round, first_callback) = counting_callback();
    watcher.start(first_callback).await;
    assert!(
        wait_until(Duration::from_secs(2), || first_round.load(Ordering::SeqCst) == 1).await,
        "首轮应投递一次"
    );
    watcher.stop().await;
    assert!(!watcher.is_running());

    // 重启后去重历史清空：同一内容作为"首样本"再次投递
    let (second_round, second_callback) = counting_callback();
    watcher.start(second_callback).await;
    assert!(watcher.is_running());
    assert!(
        wait_until(Duration::from_secs(2), || {
            second_round.load(Ordering::SeqCst) == 1
        })
        .await,
        "重启后的首个非空读取必须投递"
    );
    watcher.stop().await;
}
