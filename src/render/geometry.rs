//! 表盘几何计算
//!
//! 所有函数都是 (ClockConfig, ClockInstant) 的纯函数，不访问绘制表面。
//! 角度以弧度表示，0 指向三点钟方向，顺时针增加（屏幕坐标 y 轴向下），
//! 因此减去 π/2 后 0 点位于正上方。

use core::f32::consts::{FRAC_PI_2, PI, TAU};

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

use crate::common::config::ClockConfig;
use crate::common::types::{ClockInstant, NeedleKind, NeedleSpec, PointF, Tick};

pub const TICK_COUNT: usize = 60;
pub const HOUR_STEP: f32 = TAU / 12.0;
pub const MINUTE_STEP: f32 = TAU / 60.0;

pub const FACE_ERASE_FRACTION: f32 = 0.89;
pub const HUB_FRACTION: f32 = 0.05;
pub const HOUR_LABEL_FRACTION: f32 = 0.75;
pub const TICK_INNER_FRACTION: f32 = 0.9;
pub const TICK_OUTER_FRACTION: f32 = 1.0;
pub const BORDER_OFFSET: f32 = 3.0;
pub const BORDER_WIDTH: u32 = 6;

pub const NEEDLE_TAIL_FRACTION: f32 = 0.05;
pub const HOUR_NEEDLE_FRACTION: f32 = 0.5;
pub const MINUTE_NEEDLE_FRACTION: f32 = 0.85;
pub const SECOND_NEEDLE_FRACTION: f32 = 0.85;
pub const NEEDLE_WIDTH: u32 = 2;
pub const SECOND_NEEDLE_WIDTH: u32 = 1;

/// 时针角度，分钟带来的小数小时连续计入
pub fn hour_angle(instant: &ClockInstant) -> f32 {
    let hours = (instant.hour() % 12) as f32 + instant.minute() as f32 / 60.0;
    hours * HOUR_STEP - FRAC_PI_2
}

pub fn minute_angle(instant: &ClockInstant) -> f32 {
    instant.minute() as f32 * MINUTE_STEP - FRAC_PI_2
}

pub fn second_angle(instant: &ClockInstant) -> f32 {
    instant.fractional_second() * MINUTE_STEP - FRAC_PI_2
}

/// 返回 (尾端, 尖端)，尾端位于圆心另一侧
pub fn needle_endpoints(config: &ClockConfig, angle: f32, inner: f32, outer: f32) -> (PointF, PointF) {
    let center = config.center();
    let r = config.radius();
    let (sin, cos) = angle.sin_cos();

    let tail = PointF::new(center.x - r * cos * inner, center.y - r * sin * inner);
    let tip = PointF::new(center.x + r * cos * outer, center.y + r * sin * outer);
    (tail, tip)
}

/// 按时、分、秒顺序返回三根指针
pub fn needles(config: &ClockConfig, instant: &ClockInstant) -> [NeedleSpec; 3] {
    let palette = config.palette();
    [
        NeedleSpec {
            kind: NeedleKind::Hour,
            angle: hour_angle(instant),
            inner: NEEDLE_TAIL_FRACTION,
            outer: HOUR_NEEDLE_FRACTION,
            color: palette.primary,
            width: NEEDLE_WIDTH,
        },
        NeedleSpec {
            kind: NeedleKind::Minute,
            angle: minute_angle(instant),
            inner: NEEDLE_TAIL_FRACTION,
            outer: MINUTE_NEEDLE_FRACTION,
            color: palette.primary,
            width: NEEDLE_WIDTH,
        },
        NeedleSpec {
            kind: NeedleKind::Second,
            angle: second_angle(instant),
            inner: NEEDLE_TAIL_FRACTION,
            outer: SECOND_NEEDLE_FRACTION,
            color: palette.accent,
            width: SECOND_NEEDLE_WIDTH,
        },
    ]
}

/// 生成 60 个刻度，每 5 个为一个粗刻度
pub fn ticks() -> Vec<Tick, TICK_COUNT> {
    let mut ticks = Vec::new();
    for i in 0..TICK_COUNT {
        let major = i % 5 == 0;
        let tick = Tick {
            index: i as u8,
            angle: i as f32 * MINUTE_STEP - FRAC_PI_2,
            inner: TICK_INNER_FRACTION,
            outer: TICK_OUTER_FRACTION,
            major,
            width: if major { 3 } else { 1 },
        };
        // 容量与循环次数一致
        let _ = ticks.push(tick);
    }
    ticks
}

/// 刻度线两端：从 0.9r 到 1.0r
pub fn tick_endpoints(config: &ClockConfig, tick: &Tick) -> (PointF, PointF) {
    let center = config.center();
    let r = config.radius();
    let (sin, cos) = tick.angle.sin_cos();
    (
        PointF::new(center.x + r * cos * tick.inner, center.y + r * sin * tick.inner),
        PointF::new(center.x + r * cos * tick.outer, center.y + r * sin * tick.outer),
    )
}

/// 1 到 12 点数字的中心位置
pub fn hour_labels(config: &ClockConfig) -> [(u8, PointF); 12] {
    let center = config.center();
    let r = config.radius();
    core::array::from_fn(|i| {
        let hour = i as u8 + 1;
        let angle = hour as f32 * PI / 6.0 - FRAC_PI_2;
        let (sin, cos) = angle.sin_cos();
        (
            hour,
            PointF::new(
                center.x + r * cos * HOUR_LABEL_FRACTION,
                center.y + r * sin * HOUR_LABEL_FRACTION,
            ),
        )
    })
}

pub fn day_label_position(config: &ClockConfig) -> PointF {
    PointF::new(config.width() * 0.7, config.height() * 0.5)
}

/// 日期数字下方的底色块
pub fn day_cell(config: &ClockConfig) -> Rectangle {
    let top_left = PointF::new(config.width() * 0.65, config.height() * 0.47).to_point();
    Rectangle::new(
        top_left,
        Size::new(
            (config.width() * 0.1).round() as u32,
            (config.height() * 0.06).round() as u32,
        ),
    )
}

/// 半径为 `fraction * r` 的圆的直径（像素）
pub fn diameter(config: &ClockConfig, fraction: f32) -> u32 {
    (2.0 * config.radius() * fraction).round() as u32
}

pub fn border_diameter(config: &ClockConfig) -> u32 {
    (2.0 * (config.radius() + BORDER_OFFSET)).round() as u32
}

pub fn center_point(config: &ClockConfig) -> Point {
    config.center().to_point()
}
