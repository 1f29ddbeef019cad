// src/driver/mod.rs
pub mod canvas;
pub mod framebuffer;
pub mod time_source;

pub use canvas::Canvas;
pub use framebuffer::Framebuffer;
pub use time_source::{SimulatedTimeSource, SystemTimeSource, TimeSource};
