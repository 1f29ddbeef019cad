// src/lib.rs

//! 多时区指针时钟渲染
//!
//! 在任意 embedded-graphics 绘制目标上绘制指针表盘（边框、刻度、数字、日期和三根指针），
//! 并由宿主按固定周期重绘。

pub mod common;
pub mod driver;
pub mod render;
pub mod service;

pub use common::{AppConfig, ClockConfig, ClockError, ClockInstant, ClockPalette, Result};
pub use driver::{Canvas, Framebuffer, SimulatedTimeSource, SystemTimeSource, TimeSource};
pub use render::ClockRenderer;
pub use service::{ClockHost, RedrawScheduler};
