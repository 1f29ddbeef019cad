// src/service/clock_host.rs

//! 时钟宿主 - 维护逻辑槽位到 {表面, 时间源, 配置} 的注册表
//!
//! 宿主负责初始化每个时钟并在调度器触发时重绘，渲染器本身不持有任何定时器。

use core::fmt::Debug;

use embedded_graphics::draw_target::DrawTarget;

use crate::common::config::ClockConfig;
use crate::common::error::{ClockError, Result};
use crate::common::types::ClockPhase;
use crate::driver::canvas::Canvas;
use crate::driver::time_source::TimeSource;
use crate::render::ClockRenderer;

/// 表面不支持 2D 绘制时展示给用户的提示
pub fn fallback_message(slot: &str) -> String {
    format!(
        "Clock '{}' cannot be displayed: its surface has no 2D drawing support",
        slot
    )
}

/// 注册表中的一个时钟
pub struct ClockSlot<C, T> {
    name: String,
    renderer: ClockRenderer,
    canvas: C,
    time_source: T,
    /// 尚未加载时为 None
    phase: Option<ClockPhase>,
    frames: u64,
}

impl<C, T> ClockSlot<C, T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ClockConfig {
        self.renderer.config()
    }

    pub fn phase(&self) -> Option<ClockPhase> {
        self.phase
    }

    /// 已完成的动态重绘次数（不含初始化时的那一次）
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }
}

pub struct ClockHost<C, T> {
    slots: Vec<ClockSlot<C, T>>,
}

impl<C, T> Default for ClockHost<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, T> ClockHost<C, T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// 注册一个时钟槽位，不做任何绘制
    pub fn register(
        &mut self,
        name: &str,
        config: ClockConfig,
        canvas: C,
        time_source: T,
    ) -> Result<()> {
        if self.slots.iter().any(|s| s.name == name) {
            return Err(ClockError::DuplicateSlot(name.to_string()));
        }

        self.slots.push(ClockSlot {
            name: name.to_string(),
            renderer: ClockRenderer::new(config),
            canvas,
            time_source,
            phase: None,
            frames: 0,
        });

        log::info!(
            "Registered clock '{}' (UTC{:+}h, {}x{} r={})",
            name,
            config.utc_offset_hours(),
            config.width(),
            config.height(),
            config.radius()
        );
        Ok(())
    }

    /// 按注册顺序返回槽位名
    pub fn slots(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.name.clone()).collect()
    }

    /// 已加载（Initialized 或 Running）的槽位名
    pub fn loaded_slots(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|s| s.phase.is_some())
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn slot(&self, name: &str) -> Result<&ClockSlot<C, T>> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ClockError::UnknownSlot(name.to_string()))
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut ClockSlot<C, T>> {
        self.slots
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| ClockError::UnknownSlot(name.to_string()))
    }

    pub fn phase(&self, name: &str) -> Result<Option<ClockPhase>> {
        Ok(self.slot(name)?.phase)
    }

    pub fn frames(&self, name: &str) -> Result<u64> {
        Ok(self.slot(name)?.frames)
    }

    pub fn canvas(&self, name: &str) -> Result<&C> {
        Ok(&self.slot(name)?.canvas)
    }

    /// 移除时钟并交还其表面；同时停止重绘请用 [`RedrawScheduler::remove`]
    ///
    /// [`RedrawScheduler::remove`]: crate::service::scheduler::RedrawScheduler::remove
    pub fn remove(&mut self, name: &str) -> Result<C> {
        let index = self
            .slots
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ClockError::UnknownSlot(name.to_string()))?;

        let slot = self.slots.remove(index);
        log::info!("Removed clock '{}' after {} frames", name, slot.frames);
        Ok(slot.canvas)
    }
}

impl<C, T> ClockHost<C, T>
where
    C: Canvas,
    T: TimeSource,
    <C::Target as DrawTarget>::Error: Debug,
{
    /// 初始化时钟：绘制静态表盘及第一帧，进入 Initialized 阶段
    ///
    /// 表面不支持 2D 绘制时返回 `SurfaceUnavailable`，且不做任何绘制。
    pub fn load(&mut self, name: &str) -> Result<()> {
        let slot = self.slot_mut(name)?;

        if slot.phase.is_some() {
            log::debug!("Clock '{}' already loaded", name);
            return Ok(());
        }

        let Some(target) = slot.canvas.context_2d() else {
            return Err(ClockError::SurfaceUnavailable {
                slot: name.to_string(),
            });
        };

        let instant = slot.time_source.now()?;
        slot.renderer.render_static_face(target, &instant)?;
        slot.phase = Some(ClockPhase::Initialized);

        log::info!(
            "Clock '{}' initialized at {:02}:{:02}:{:02}",
            name,
            instant.hour(),
            instant.minute(),
            instant.second()
        );
        Ok(())
    }

    /// 加载全部槽位，返回因表面不可用而跳过的槽位
    ///
    /// 表面不可用只影响该槽位；其它错误直接返回。
    pub fn load_all(&mut self) -> Result<Vec<String>> {
        let mut unavailable = Vec::new();

        for name in self.slots() {
            match self.load(&name) {
                Ok(()) => {}
                Err(e) if e.is_surface_unavailable() => {
                    log::warn!("{}", fallback_message(&name));
                    unavailable.push(name);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(unavailable)
    }

    /// 调度器每个周期调用一次；首次调用时进入 Running 阶段
    pub fn redraw(&mut self, name: &str) -> Result<()> {
        let slot = self.slot_mut(name)?;

        if slot.phase.is_none() {
            return Err(ClockError::NotRunning(name.to_string()));
        }

        let target = slot
            .canvas
            .context_2d()
            .ok_or_else(|| ClockError::SurfaceUnavailable {
                slot: name.to_string(),
            })?;

        let instant = slot.time_source.now()?;
        slot.renderer.render_face(target, &instant)?;

        if slot.phase == Some(ClockPhase::Initialized) {
            log::debug!("Clock '{}' running", name);
            slot.phase = Some(ClockPhase::Running);
        }
        slot.frames += 1;
        Ok(())
    }

    /// 按注册顺序重绘所有已加载的时钟
    pub fn redraw_all(&mut self) -> Result<()> {
        for name in self.loaded_slots() {
            self.redraw(&name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics::prelude::*;
    use jiff::Timestamp;

    use super::*;
    use crate::driver::framebuffer::Framebuffer;
    use crate::driver::time_source::SimulatedTimeSource;

    const UNTOUCHED: Rgb888 = Rgb888::new(1, 2, 3);

    type TestHost = ClockHost<Option<Framebuffer>, SimulatedTimeSource>;

    fn clock(offset: i8) -> (ClockConfig, Option<Framebuffer>, SimulatedTimeSource) {
        let config = ClockConfig::new(250.0, 250.0, 100.0, offset).unwrap();
        let start: Timestamp = "2024-06-01T12:00:00Z".parse().unwrap();
        (
            config,
            Some(Framebuffer::new(config.surface_size(), UNTOUCHED)),
            SimulatedTimeSource::for_config(start, &config),
        )
    }

    fn host() -> TestHost {
        let mut host = TestHost::new();
        for (name, offset) in [("west-coast", -7), ("gmt", 0), ("east-coast", -4)] {
            let (config, canvas, time) = clock(offset);
            host.register(name, config, canvas, time).unwrap();
        }
        host
    }

    fn drawn_pixels(host: &TestHost, name: &str) -> usize {
        let fb = host.canvas(name).unwrap().as_ref().unwrap();
        let size = fb.size();
        (size.width * size.height) as usize - fb.count(UNTOUCHED)
    }

    #[test]
    fn registration_rejects_duplicates() {
        let mut host = host();
        let (config, canvas, time) = clock(0);
        assert!(matches!(
            host.register("gmt", config, canvas, time),
            Err(ClockError::DuplicateSlot(_))
        ));
        assert_eq!(host.slots(), ["west-coast", "gmt", "east-coast"]);
    }

    #[test]
    fn lifecycle_moves_through_phases() {
        let mut host = host();
        assert_eq!(host.phase("gmt").unwrap(), None);
        assert_eq!(drawn_pixels(&host, "gmt"), 0);

        host.load("gmt").unwrap();
        assert_eq!(host.phase("gmt").unwrap(), Some(ClockPhase::Initialized));
        assert!(drawn_pixels(&host, "gmt") > 0);
        assert_eq!(host.frames("gmt").unwrap(), 0);

        host.redraw("gmt").unwrap();
        host.redraw("gmt").unwrap();
        assert_eq!(host.phase("gmt").unwrap(), Some(ClockPhase::Running));
        assert_eq!(host.frames("gmt").unwrap(), 2);

        // 重复加载不会回到 Initialized
        host.load("gmt").unwrap();
        assert_eq!(host.phase("gmt").unwrap(), Some(ClockPhase::Running));
    }

    #[test]
    fn redraw_requires_load() {
        let mut host = host();
        assert!(matches!(host.redraw("gmt"), Err(ClockError::NotRunning(_))));
        assert!(matches!(host.redraw("tokyo"), Err(ClockError::UnknownSlot(_))));
        assert!(matches!(host.load("tokyo"), Err(ClockError::UnknownSlot(_))));
    }

    #[test]
    fn unavailable_surface_skips_only_that_clock() {
        let mut host = host();
        let (config, _, time) = clock(9);
        host.register("tokyo", config, None, time).unwrap();

        let unavailable = host.load_all().unwrap();
        assert_eq!(unavailable, ["tokyo"]);
        assert_eq!(host.phase("tokyo").unwrap(), None);
        assert_eq!(host.loaded_slots(), ["west-coast", "gmt", "east-coast"]);

        assert!(matches!(
            host.load("tokyo"),
            Err(ClockError::SurfaceUnavailable { .. })
        ));
        host.redraw_all().unwrap();
        assert_eq!(host.frames("east-coast").unwrap(), 1);
        assert!(fallback_message("tokyo").contains("tokyo"));
    }

    #[test]
    fn redraw_follows_time_source() {
        let mut host = TestHost::new();
        let (config, canvas, time) = clock(0);
        let clock_time = time.clone();
        host.register("gmt", config, canvas, time).unwrap();
        host.load("gmt").unwrap();

        let snapshot = |host: &TestHost| host.canvas("gmt").unwrap().as_ref().unwrap().to_rgb();

        host.redraw("gmt").unwrap();
        let before = snapshot(&host);
        host.redraw("gmt").unwrap();
        assert_eq!(before, snapshot(&host));

        clock_time.advance(Duration::from_secs(7));
        host.redraw("gmt").unwrap();
        assert_ne!(before, snapshot(&host));
    }

    #[test]
    fn remove_returns_canvas() {
        let mut host = host();
        host.load_all().unwrap();

        let canvas = host.remove("west-coast").unwrap();
        assert!(canvas.is_some());
        assert_eq!(host.slots(), ["gmt", "east-coast"]);
        assert!(matches!(host.redraw("west-coast"), Err(ClockError::UnknownSlot(_))));
    }
}
