// src/service/scheduler.rs
//! 重绘调度器
//! 每个时钟槽位一个固定周期的重绘条目，由宿主驱动，渲染器不持有定时器

use core::fmt::Debug;

use embassy_time::{Duration, Instant, Timer};
use embedded_graphics::draw_target::DrawTarget;

use crate::common::error::{ClockError, Result};
use crate::driver::canvas::Canvas;
use crate::driver::time_source::TimeSource;
use crate::service::clock_host::ClockHost;

/// 调度条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledRedraw {
    /// 槽位名
    pub slot: String,
    /// 下一次重绘的截止时间
    pub next_due: Instant,
}

/// 重绘调度器
///
/// 各槽位的计时相互独立；错过的周期直接跳过，不会补发。
pub struct RedrawScheduler {
    period: Duration,
    entries: Vec<ScheduledRedraw>,
}

impl RedrawScheduler {
    pub fn new(period: Duration) -> Result<Self> {
        if period.as_ticks() == 0 {
            return Err(ClockError::InvalidConfig(
                "redraw period must be positive".to_string(),
            ));
        }

        Ok(Self {
            period,
            entries: Vec::new(),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// 从 `start` 起每个周期重绘一次该槽位；重复调度会重置计时
    pub fn schedule(&mut self, slot: &str, start: Instant) {
        let next_due = start + self.period;

        if let Some(entry) = self.entries.iter_mut().find(|e| e.slot == slot) {
            log::debug!("Rescheduling redraw for '{}'", slot);
            entry.next_due = next_due;
            return;
        }

        self.entries.push(ScheduledRedraw {
            slot: slot.to_string(),
            next_due,
        });
        log::info!(
            "Scheduled redraw for '{}' every {}ms",
            slot,
            self.period.as_millis()
        );
    }

    /// 停止该槽位的重绘
    pub fn cancel(&mut self, slot: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.slot != slot);
        before != self.entries.len()
    }

    /// 停止并移除一个时钟：先取消重绘，再从宿主注册表中移除，交还其表面
    pub fn remove<C, T>(&mut self, host: &mut ClockHost<C, T>, slot: &str) -> Result<C> {
        let cancelled = self.cancel(slot);
        let canvas = host.remove(slot)?;
        log::debug!("Clock '{}' removed (scheduled: {})", slot, cancelled);
        Ok(canvas)
    }

    pub fn is_scheduled(&self, slot: &str) -> bool {
        self.entries.iter().any(|e| e.slot == slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.next_due).min()
    }

    /// 取出到期的槽位（按调度顺序），并把它们的截止时间推进到 `now` 之后
    pub fn due(&mut self, now: Instant) -> Vec<String> {
        let period = self.period.as_ticks();
        let mut due = Vec::new();

        for entry in self.entries.iter_mut().filter(|e| e.next_due <= now) {
            let behind = (now - entry.next_due).as_ticks();
            let missed = behind / period;
            if missed > 0 {
                log::debug!("Redraw for '{}' skipped {} periods", entry.slot, missed);
            }
            entry.next_due += Duration::from_ticks(period * (missed + 1));
            due.push(entry.slot.clone());
        }

        due
    }

    /// 运行调度循环，直到完成 `max_frames` 个周期（0 表示不限）或没有剩余条目
    ///
    /// 单个槽位重绘失败时记录日志并取消该槽位，其余槽位不受影响。
    /// 返回实际执行的调度周期数。
    pub async fn run<C, T>(&mut self, host: &mut ClockHost<C, T>, max_frames: u32) -> u32
    where
        C: Canvas,
        T: TimeSource,
        <C::Target as DrawTarget>::Error: Debug,
    {
        let mut frames = 0;

        while let Some(deadline) = self.next_deadline() {
            if max_frames != 0 && frames >= max_frames {
                break;
            }

            Timer::at(deadline).await;

            for slot in self.due(Instant::now()) {
                match host.redraw(&slot) {
                    Ok(()) => {}
                    // 已从宿主移除的时钟只是停止计时，不算失败
                    Err(ClockError::UnknownSlot(_)) => {
                        log::debug!("Clock '{}' is gone, stopping its timer", slot);
                        self.cancel(&slot);
                    }
                    Err(e) => {
                        log::warn!("Redraw of '{}' failed, stopping its timer: {}", slot, e);
                        self.cancel(&slot);
                    }
                }
            }

            frames += 1;
        }

        log::info!("Redraw scheduler stopped after {} frames", frames);
        frames
    }
}
