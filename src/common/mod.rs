// src/common/mod.rs

/// 公共模块定义
///
/// 配置、错误类型以及在渲染和调度之间传递的数据类型
pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ClockConfig, ClockPalette, ClockSettings};
pub use error::{ClockError, Result};
pub use types::{ClockInstant, ClockPhase, NeedleKind, NeedleSpec, PointF, Tick};
