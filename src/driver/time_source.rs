// src/driver/time_source.rs
use core::sync::atomic::{AtomicI64, Ordering};
use core::time::Duration;
use std::sync::Arc;

use jiff::Timestamp;
use jiff::tz::{Offset, TimeZone};

use crate::common::config::ClockConfig;
use crate::common::error::{ClockError, Result};
use crate::common::types::ClockInstant;

pub trait TimeSource {
    /// 获取当前时刻，已按固定时差换算
    fn now(&self) -> Result<ClockInstant>;
}

/// 系统时钟 + 固定 UTC 偏移（不处理夏令时）
#[derive(Debug, Clone)]
pub struct SystemTimeSource {
    zone: TimeZone,
}

impl SystemTimeSource {
    pub fn new(offset: Offset) -> Self {
        Self {
            zone: TimeZone::fixed(offset),
        }
    }

    pub fn for_config(config: &ClockConfig) -> Self {
        Self::new(config.utc_offset())
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Result<ClockInstant> {
        let zoned = Timestamp::now().to_zoned(self.zone.clone());
        Ok(ClockInstant::from_zoned(&zoned))
    }
}

/// 模拟时钟源：64 位微秒时间戳，只在显式推进时变化
///
/// 克隆出的句柄共享同一个时间戳，便于在宿主持有时间源的同时从外部推进时间。
#[derive(Debug, Clone)]
pub struct SimulatedTimeSource {
    timestamp_us: Arc<AtomicI64>,
    zone: TimeZone,
}

impl SimulatedTimeSource {
    pub fn new(start: Timestamp, offset: Offset) -> Self {
        Self {
            timestamp_us: Arc::new(AtomicI64::new(start.as_microsecond())),
            zone: TimeZone::fixed(offset),
        }
    }

    pub fn for_config(start: Timestamp, config: &ClockConfig) -> Self {
        Self::new(start, config.utc_offset())
    }

    /// 与当前实例共享时间戳、但使用另一时差的时间源
    pub fn with_offset(&self, offset: Offset) -> Self {
        Self {
            timestamp_us: self.timestamp_us.clone(),
            zone: TimeZone::fixed(offset),
        }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp_us
            .store(timestamp.as_microsecond(), Ordering::Release);
        log::debug!("Simulated time set to {}", timestamp);
    }

    /// 推进模拟时间；溢出时饱和到 `i64::MAX`，随后的 `now` 会返回 `ClockError::Time`
    pub fn advance(&self, by: Duration) {
        let delta = i64::try_from(by.as_micros()).unwrap_or(i64::MAX);
        let _ = self
            .timestamp_us
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |us| {
                Some(us.saturating_add(delta))
            });
    }

    pub fn timestamp(&self) -> Result<Timestamp> {
        let us = self.timestamp_us.load(Ordering::Acquire);
        Timestamp::from_microsecond(us).map_err(|e| ClockError::Time(e.to_string()))
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> Result<ClockInstant> {
        let zoned = self.timestamp()?.to_zoned(self.zone.clone());
        Ok(ClockInstant::from_zoned(&zoned))
    }
}
