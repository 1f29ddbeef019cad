//! 内存帧缓冲区（RGB888），实现 embedded-graphics 的 `DrawTarget`

use core::convert::Infallible;
use std::io::Write;
use std::path::Path;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;

use crate::common::config::ClockConfig;
use crate::common::error::Result;
use crate::driver::canvas::Canvas;

/// 帧缓冲区
#[derive(Debug, Clone)]
pub struct Framebuffer {
    size: Size,
    pixels: Vec<Rgb888>,
    /// 落在缓冲区外的像素数，越界像素会被丢弃
    out_of_bounds: usize,
}

impl Framebuffer {
    /// 创建新的帧缓冲区
    pub fn new(size: Size, fill: Rgb888) -> Self {
        Self {
            size,
            pixels: vec![fill; size.width as usize * size.height as usize],
            out_of_bounds: 0,
        }
    }

    /// 按时钟配置的尺寸创建，初始为黑色
    pub fn for_clock(config: &ClockConfig) -> Self {
        Self::new(config.surface_size(), Rgb888::BLACK)
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb888> {
        self.index(point).map(|i| self.pixels[i])
    }

    pub fn out_of_bounds(&self) -> usize {
        self.out_of_bounds
    }

    /// 统计指定颜色的像素数
    pub fn count(&self, color: Rgb888) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    /// 转换为按行排列的 RGB 字节
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.r(), p.g(), p.b()])
            .collect()
    }

    /// 以二进制 PPM (P6) 格式输出
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.size.width, self.size.height)?;
        writer.write_all(&self.to_rgb())?;
        writer.flush()?;
        Ok(())
    }

    pub fn save_ppm(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_ppm(std::io::BufWriter::new(file))?;
        log::debug!("Snapshot written to {}", path.display());
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            match self.index(point) {
                Some(i) => self.pixels[i] = color,
                None => self.out_of_bounds += 1,
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> core::result::Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

impl Canvas for Framebuffer {
    type Target = Self;

    fn context_2d(&mut self) -> Option<&mut Self::Target> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    use super::*;

    #[test]
    fn drops_out_of_bounds_pixels() {
        let mut fb = Framebuffer::new(Size::new(4, 3), Rgb888::BLACK);
        fb.draw_iter([
            Pixel(Point::new(1, 1), Rgb888::RED),
            Pixel(Point::new(-1, 0), Rgb888::RED),
            Pixel(Point::new(4, 0), Rgb888::RED),
            Pixel(Point::new(0, 3), Rgb888::RED),
        ])
        .unwrap();

        assert_eq!(fb.pixel(Point::new(1, 1)), Some(Rgb888::RED));
        assert_eq!(fb.count(Rgb888::RED), 1);
        assert_eq!(fb.out_of_bounds(), 3);
        assert_eq!(fb.pixel(Point::new(4, 0)), None);
    }

    #[test]
    fn primitives_land_in_buffer() {
        let mut fb = Framebuffer::new(Size::new(10, 10), Rgb888::BLACK);
        Rectangle::new(Point::new(2, 2), Size::new(3, 4))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE))
            .draw(&mut fb)
            .unwrap();

        assert_eq!(fb.count(Rgb888::WHITE), 12);
        fb.clear(Rgb888::BLUE).unwrap();
        assert_eq!(fb.count(Rgb888::BLUE), 100);
    }

    #[test]
    fn ppm_snapshot_layout() {
        let mut fb = Framebuffer::new(Size::new(2, 1), Rgb888::BLACK);
        fb.draw_iter([Pixel(Point::new(1, 0), Rgb888::new(10, 20, 30))])
            .unwrap();

        let mut out = Vec::new();
        fb.write_ppm(&mut out).unwrap();

        let header = b"P6\n2 1\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &[0, 0, 0, 10, 20, 30]);
    }
}
