// src/common/types.rs

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Point;
use jiff::Zoned;

use crate::common::error::{ClockError, Result};

/// 浮点坐标，几何计算全部在此完成，绘制前再取整
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 四舍五入到像素坐标
    pub fn to_point(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// 单帧使用的时刻（已按时区偏移换算）
///
/// 每次重绘时从时间源重新获取，不做缓存。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockInstant {
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
    day: u8,
}

impl ClockInstant {
    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32, day: u8) -> Result<Self> {
        if hour > 23 {
            return Err(ClockError::InvalidInstant(format!("hour {} out of range", hour)));
        }
        if minute > 59 {
            return Err(ClockError::InvalidInstant(format!(
                "minute {} out of range",
                minute
            )));
        }
        if second > 59 {
            return Err(ClockError::InvalidInstant(format!(
                "second {} out of range",
                second
            )));
        }
        if nanosecond > 999_999_999 {
            return Err(ClockError::InvalidInstant(format!(
                "nanosecond {} out of range",
                nanosecond
            )));
        }
        if !(1..=31).contains(&day) {
            return Err(ClockError::InvalidInstant(format!("day {} out of range", day)));
        }

        Ok(Self {
            hour,
            minute,
            second,
            nanosecond,
            day,
        })
    }

    /// 从带时区的时间构造，jiff 保证各字段已在合法范围内
    pub fn from_zoned(zoned: &Zoned) -> Self {
        Self {
            hour: zoned.hour() as u8,
            minute: zoned.minute() as u8,
            second: zoned.second() as u8,
            nanosecond: zoned.subsec_nanosecond() as u32,
            day: zoned.day() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// 含小数部分的秒数
    pub fn fractional_second(&self) -> f32 {
        self.second as f32 + self.nanosecond as f32 / 1_000_000_000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedleKind {
    Hour,
    Minute,
    Second,
}

/// 指针描述，计算后立即交给绘制调用，不做保留
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedleSpec {
    pub kind: NeedleKind,
    /// 弧度
    pub angle: f32,
    /// 指针尾部相对半径的比例（绘制在圆心另一侧）
    pub inner: f32,
    pub outer: f32,
    pub color: Rgb888,
    pub width: u32,
}

/// 表盘刻度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub index: u8,
    pub angle: f32,
    pub inner: f32,
    pub outer: f32,
    pub major: bool,
    pub width: u32,
}

/// 时钟实例的生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// 静态表盘已绘制
    Initialized,
    /// 由调度器周期性重绘
    Running,
}
