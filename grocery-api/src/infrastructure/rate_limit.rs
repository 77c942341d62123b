//! 进程内固定窗口限流
//!
//! Counters live in this process only. Running several instances needs a
//! shared counter behind the same [`RateLimiter`] trait.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::config::RateLimitConfig;

/// 超过该数量时清理过期窗口
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub ok: bool,
    pub remaining: u32,
}

/// 限流接口
pub trait RateLimiter: Send + Sync {
    fn check(&self, key: &str) -> RateLimitStatus;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.window(), config.max_requests)
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitStatus {
        let mut windows = self.windows.lock();

        if windows.len() > SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started_at) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if now.duration_since(entry.started_at) >= self.window {
            *entry = Window {
                started_at: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            debug!("rate limit exceeded for {}", key);
            return RateLimitStatus {
                ok: false,
                remaining: 0,
            };
        }

        entry.count += 1;
        RateLimitStatus {
            ok: true,
            remaining: self.max_requests - entry.count,
        }
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn check(&self, key: &str) -> RateLimitStatus {
        self.check_at(key, Instant::now())
    }
}
