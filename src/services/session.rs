//! 搜索会话控制
//!
//! 暂停、继续、取消与单步确认的协作原语。早期实现用轮询布尔位
//! 等待恢复，这里改为 watch 通道推送运行信号、Notify 传递单步
//! 确认，等待方挂起而不空转，取消能打断任何一处等待。

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{watch, Notify};

/// 运行信号，经 watch 通道广播给所有等待方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSignal {
    Paused,
    Running,
    Cancelled,
}

/// 一次搜索的共享控制面
///
/// 会话在驱动器与外部控制方（CLI 信号处理、测试）之间共享，
/// 全部方法取 `&self`，可放入 `Arc` 跨任务使用。
pub struct SearchSession {
    signal: watch::Sender<RunSignal>,
    step_mode: AtomicBool,
    step_ack: Notify,
    speed: RwLock<f64>,
}

impl SearchSession {
    /// 新会话以 Running 信号开始，连续模式，速度 1.0
    pub fn new() -> Self {
        let (signal, _) = watch::channel(RunSignal::Running);
        Self {
            signal,
            step_mode: AtomicBool::new(false),
            step_ack: Notify::new(),
            speed: RwLock::new(1.0),
        }
    }

    pub fn pause(&self) {
        self.signal.send_replace(RunSignal::Paused);
    }

    pub fn resume(&self) {
        if *self.signal.borrow() != RunSignal::Cancelled {
            self.signal.send_replace(RunSignal::Running);
        }
    }

    /// 取消不可逆，唤醒所有等待方
    pub fn cancel(&self) {
        self.signal.send_replace(RunSignal::Cancelled);
        self.step_ack.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow() == RunSignal::Cancelled
    }

    /// 挂起直到会话可运行；取消返回 false
    pub async fn wait_ready(&self) -> bool {
        let mut rx = self.signal.subscribe();
        loop {
            match *rx.borrow_and_update() {
                RunSignal::Running => return true,
                RunSignal::Cancelled => return false,
                RunSignal::Paused => {}
            }
            if rx.changed().await.is_err() {
                return false;
            }
        }
    }

    pub fn set_step_mode(&self, enabled: bool) {
        self.step_mode.store(enabled, Ordering::Release);
    }

    pub fn is_step_mode(&self) -> bool {
        self.step_mode.load(Ordering::Acquire)
    }

    /// 单步模式下放行下一步
    pub fn request_step(&self) {
        self.step_ack.notify_one();
    }

    /// 等待一次单步确认；取消返回 false
    pub async fn wait_step_request(&self) -> bool {
        let mut rx = self.signal.subscribe();
        loop {
            tokio::select! {
                _ = self.step_ack.notified() => {
                    return !self.is_cancelled();
                }
                changed = rx.changed() => {
                    if changed.is_err() || *rx.borrow() == RunSignal::Cancelled {
                        return false;
                    }
                }
            }
        }
    }

    /// 速度倍率：步间延迟 = 基础延迟 × 倍率，下限 0.1
    pub fn set_speed(&self, multiplier: f64) {
        *self.speed.write() = multiplier.max(0.1);
    }

    pub fn speed(&self) -> f64 {
        *self.speed.read()
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_new_session_is_immediately_ready() {
        let session = SearchSession::new();
        assert!(session.wait_ready().await);
    }

    #[tokio::test]
    async fn test_paused_session_wakes_on_resume() {
        let session = Arc::new(SearchSession::new());
        session.pause();

        let waiter = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.wait_ready().await })
        };
        tokio::task::yield_now().await;
        session.resume();

        let ready = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake in test")
            .expect("waiter task should not panic in test");
        assert!(ready);
    }

    #[tokio::test]
    async fn test_cancel_unblocks_waiters_with_false() {
        let session = Arc::new(SearchSession::new());
        session.pause();

        let waiter = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.wait_ready().await })
        };
        tokio::task::yield_now().await;
        session.cancel();

        let ready = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake in test")
            .expect("waiter task should not panic in test");
        assert!(!ready);
        assert!(session.is_cancelled());

        // 取消后 resume 无效
        session.resume();
        assert!(session.is_cancelled());
    }

    #[tokio::test]
    async fn test_step_request_releases_one_wait() {
        let session = SearchSession::new();
        session.set_step_mode(true);
        session.request_step();
        assert!(session.wait_step_request().await);
    }

    #[test]
    fn test_speed_is_clamped_to_lower_bound() {
        let session = SearchSession::new();
        session.set_speed(0.0);
        assert!((session.speed() - 0.1).abs() < f64::EPSILON);
        session.set_speed(2.5);
        assert!((session.speed() - 2.5).abs() < f64::EPSILON);
    }
}
