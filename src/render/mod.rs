//! 渲染模块
//! 表盘几何计算与基于 embedded-graphics 的绘制

pub mod clock_renderer;
pub mod geometry;

pub use clock_renderer::ClockRenderer;
