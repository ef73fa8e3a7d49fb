//! 外呼预算
//!
//! 路网吸附服务的调用配额：总次数上限加会话墙钟时限，任一超出
//! 即拒绝后续外呼。计数与会话起点可整体复位。

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// 进程级外呼预算
#[derive(Debug)]
pub struct ApiBudget {
    max_calls: u32,
    session_timeout: Duration,
    calls: AtomicU32,
    session_start: Mutex<Option<Instant>>,
}

impl ApiBudget {
    pub fn new(max_calls: u32, session_timeout: Duration) -> Self {
        Self {
            max_calls,
            session_timeout,
            calls: AtomicU32::new(0),
            session_start: Mutex::new(None),
        }
    }

    /// 申请一次外呼额度；会话计时从首次申请开始
    pub fn try_acquire(&self) -> bool {
        let mut start = self.session_start.lock();
        let begun = *start.get_or_insert_with(Instant::now);
        if begun.elapsed() > self.session_timeout {
            return false;
        }
        drop(start);

        self.calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                (count < self.max_calls).then_some(count + 1)
            })
            .is_ok()
    }

    pub fn calls_made(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// 清零计数并重开会话计时
    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
        *self.session_start.lock() = None;
    }
}
