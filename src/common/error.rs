// src/common/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClockError {
    #[error("Invalid clock configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid clock instant: {0}")]
    InvalidInstant(String),

    #[error("Surface for slot '{slot}' has no 2D drawing context")]
    SurfaceUnavailable { slot: String },

    #[error("Unknown clock slot '{0}'")]
    UnknownSlot(String),

    #[error("Clock slot '{0}' is already registered")]
    DuplicateSlot(String),

    #[error("Clock slot '{0}' has not been loaded")]
    NotRunning(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Time source error: {0}")]
    Time(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClockError {
    /// 表面不可用只影响单个时钟实例，不应中断其余实例
    pub fn is_surface_unavailable(&self) -> bool {
        matches!(self, ClockError::SurfaceUnavailable { .. })
    }
}

pub type Result<T> = core::result::Result<T, ClockError>;
