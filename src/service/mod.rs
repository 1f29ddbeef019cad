// src/service/mod.rs

//! 服务模块 - 时钟宿主与重绘调度
//!
//! 宿主维护槽位注册表并负责加载/重绘，调度器按固定周期驱动宿主。

pub mod clock_host;
pub mod scheduler;

pub use clock_host::{ClockHost, ClockSlot, fallback_message};
pub use scheduler::{RedrawScheduler, ScheduledRedraw};
