//! 指针时钟渲染器
//!
//! 负责在任意 `DrawTarget<Color = Rgb888>` 上绘制表盘：
//! - 静态部分（底盘、边框、60 个刻度），只在初始化时绘制一次
//! - 动态部分（数字、日期、三根指针），每次调度重绘

use core::fmt::{Debug, Write};

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_7X14_BOLD, FONT_9X18};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};

use crate::common::config::ClockConfig;
use crate::common::error::{ClockError, Result};
use crate::common::types::{ClockInstant, NeedleSpec, PointF};
use crate::render::geometry;

/// 单个时钟的渲染器，仅持有不可变配置
#[derive(Debug, Clone, Copy)]
pub struct ClockRenderer {
    config: ClockConfig,
}

impl ClockRenderer {
    pub fn new(config: ClockConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// 绘制一根指针：从圆心另一侧的尾端到尖端的一条直线
    pub fn draw_needle<D>(&self, target: &mut D, needle: &NeedleSpec) -> Result<()>
    where
        D: DrawTarget<Color = Rgb888>,
        D::Error: Debug,
    {
        let (tail, tip) =
            geometry::needle_endpoints(&self.config, needle.angle, needle.inner, needle.outer);

        Line::new(tail.to_point(), tip.to_point())
            .into_styled(PrimitiveStyle::with_stroke(needle.color, needle.width))
            .draw(target)
            .map_err(|e| ClockError::Render(format!("{:?} needle: {:?}", needle.kind, e)))
    }

    /// 每个调度周期调用一次的完整重绘
    pub fn render_face<D>(&self, target: &mut D, instant: &ClockInstant) -> Result<()>
    where
        D: DrawTarget<Color = Rgb888>,
        D::Error: Debug,
    {
        let palette = self.config.palette();

        // 擦除内圈，保留外圈刻度
        self.fill_disc(target, geometry::FACE_ERASE_FRACTION, palette.background)?;

        self.draw_hours(target)?;
        self.draw_day(target, instant)?;

        for needle in geometry::needles(&self.config, instant) {
            self.draw_needle(target, &needle)?;
        }

        Ok(())
    }

    /// 初始化时绘制一次：底盘、边框、刻度，随后立即绘制一次动态部分
    pub fn render_static_face<D>(&self, target: &mut D, instant: &ClockInstant) -> Result<()>
    where
        D: DrawTarget<Color = Rgb888>,
        D::Error: Debug,
    {
        let palette = self.config.palette();
        let center = geometry::center_point(&self.config);

        self.fill_disc(target, 1.0, palette.background)?;

        Circle::with_center(center, geometry::border_diameter(&self.config))
            .into_styled(PrimitiveStyle::with_stroke(
                palette.border,
                geometry::BORDER_WIDTH,
            ))
            .draw(target)
            .map_err(|e| ClockError::Render(format!("border: {:?}", e)))?;

        for tick in geometry::ticks() {
            let (inner, outer) = geometry::tick_endpoints(&self.config, &tick);
            Line::new(inner.to_point(), outer.to_point())
                .into_styled(PrimitiveStyle::with_stroke(palette.primary, tick.width))
                .draw(target)
                .map_err(|e| ClockError::Render(format!("tick {}: {:?}", tick.index, e)))?;
        }

        log::debug!(
            "Static face drawn: {}x{} r={}",
            self.config.width(),
            self.config.height(),
            self.config.radius()
        );

        self.render_face(target, instant)
    }

    fn fill_disc<D>(&self, target: &mut D, fraction: f32, color: Rgb888) -> Result<()>
    where
        D: DrawTarget<Color = Rgb888>,
        D::Error: Debug,
    {
        Circle::with_center(
            geometry::center_point(&self.config),
            geometry::diameter(&self.config, fraction),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
        .map_err(|e| ClockError::Render(format!("disc: {:?}", e)))
    }

    /// 中心圆点、12 个小时数字和日期底色块
    ///
    /// 数字使用固定字号（9x18），只有中心位置随半径缩放；
    /// 表盘很小时 "10"/"11" 的字形可能越出表面，越界像素由绘制目标丢弃。
    fn draw_hours<D>(&self, target: &mut D) -> Result<()>
    where
        D: DrawTarget<Color = Rgb888>,
        D::Error: Debug,
    {
        let palette = self.config.palette();

        self.fill_disc(target, geometry::HUB_FRACTION, palette.primary)?;

        let style = MonoTextStyle::new(&FONT_9X18, palette.primary);
        for (hour, position) in geometry::hour_labels(&self.config) {
            let mut label = heapless::String::<2>::new();
            write!(label, "{}", hour).map_err(|_| ClockError::Render("hour label".into()))?;
            draw_centered(target, &label, position, style)?;
        }

        geometry::day_cell(&self.config)
            .into_styled(PrimitiveStyle::with_fill(palette.primary))
            .draw(target)
            .map_err(|e| ClockError::Render(format!("day cell: {:?}", e)))
    }

    /// 日期只取自当前时刻的 day 字段
    fn draw_day<D>(&self, target: &mut D, instant: &ClockInstant) -> Result<()>
    where
        D: DrawTarget<Color = Rgb888>,
        D::Error: Debug,
    {
        let mut label = heapless::String::<2>::new();
        write!(label, "{}", instant.day()).map_err(|_| ClockError::Render("day label".into()))?;

        let style = MonoTextStyle::new(&FONT_7X14_BOLD, self.config.palette().secondary);
        draw_centered(
            target,
            &label,
            geometry::day_label_position(&self.config),
            style,
        )
    }
}

fn centered() -> TextStyle {
    TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build()
}

fn draw_centered<D>(
    target: &mut D,
    text: &str,
    position: PointF,
    style: MonoTextStyle<'_, Rgb888>,
) -> Result<()>
where
    D: DrawTarget<Color = Rgb888>,
    D::Error: Debug,
{
    Text::with_text_style(text, position.to_point(), style, centered())
        .draw(target)
        .map(|_| ())
        .map_err(|e| ClockError::Render(format!("text '{}': {:?}", text, e)))
}
