// src/common/config.rs
use std::path::{Path, PathBuf};

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::Rgb888;
use jiff::tz::Offset;
use serde::{Deserialize, Serialize};

use crate::common::error::{ClockError, Result};
use crate::common::types::PointF;

pub const DEFAULT_WIDTH: f32 = 250.0;
pub const DEFAULT_HEIGHT: f32 = 250.0;
pub const DEFAULT_RADIUS: f32 = 100.0;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 100;
pub const DEFAULT_FRAMES: u32 = 30;

/// 表盘配色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockPalette {
    #[serde(with = "hex_color")]
    pub border: Rgb888,
    #[serde(with = "hex_color")]
    pub background: Rgb888,
    /// 数字、时针、分针
    #[serde(with = "hex_color")]
    pub primary: Rgb888,
    /// 日期数字
    #[serde(with = "hex_color")]
    pub secondary: Rgb888,
    /// 秒针
    #[serde(with = "hex_color")]
    pub accent: Rgb888,
}

impl Default for ClockPalette {
    fn default() -> Self {
        Self {
            border: Rgb888::new(0x33, 0x33, 0x33),
            background: Rgb888::new(0x11, 0x11, 0x11),
            primary: Rgb888::new(0xFF, 0xFF, 0xFF),
            secondary: Rgb888::new(0x00, 0x00, 0x00),
            accent: Rgb888::new(0xFF, 0x00, 0x00),
        }
    }
}

/// 解析 `RRGGBB` 或 `#RRGGBB`
pub fn parse_hex_color(hex: &str) -> Result<Rgb888> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(ClockError::InvalidConfig(format!("invalid colour '{}'", hex)));
    }

    let channel = |range: core::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| ClockError::InvalidConfig(format!("invalid colour '{}'", hex)))
    };

    Ok(Rgb888::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

mod hex_color {
    use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(color: &Rgb888, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!(
            "#{:02X}{:02X}{:02X}",
            color.r(),
            color.g(),
            color.b()
        ))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Rgb888, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_hex_color(&raw).map_err(D::Error::custom)
    }
}

/// 单个时钟的不可变配置
///
/// 只能通过 [`ClockConfig::new`] 或 [`ClockConfig::from_settings`] 构造，
/// 构造时完成全部校验，之后不再修改。
///
/// 校验只保证 `radius <= min(width, height) / 2`。边框画在 `radius + 3` 处、线宽 6，
/// 半径贴满表面时边框会有一部分落在表面之外（被绘制目标丢弃）；需要完整边框时
/// 应留出至少 6 像素的余量。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockConfig {
    width: f32,
    height: f32,
    radius: f32,
    palette: ClockPalette,
    utc_offset_hours: i8,
    utc_offset: Offset,
}

impl ClockConfig {
    pub fn new(width: f32, height: f32, radius: f32, utc_offset_hours: i8) -> Result<Self> {
        Self::with_palette(
            width,
            height,
            radius,
            utc_offset_hours,
            ClockPalette::default(),
        )
    }

    pub fn with_palette(
        width: f32,
        height: f32,
        radius: f32,
        utc_offset_hours: i8,
        palette: ClockPalette,
    ) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ClockError::InvalidConfig(format!(
                "width must be positive, got {}",
                width
            )));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(ClockError::InvalidConfig(format!(
                "height must be positive, got {}",
                height
            )));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ClockError::InvalidConfig(format!(
                "radius must be positive, got {}",
                radius
            )));
        }
        if radius > width.min(height) / 2.0 {
            return Err(ClockError::InvalidConfig(format!(
                "radius {} does not fit a {}x{} surface",
                radius, width, height
            )));
        }

        let utc_offset = Offset::from_hours(utc_offset_hours).map_err(|e| {
            ClockError::InvalidConfig(format!("utc offset {}h: {}", utc_offset_hours, e))
        })?;

        Ok(Self {
            width,
            height,
            radius,
            palette,
            utc_offset_hours,
            utc_offset,
        })
    }

    pub fn from_settings(settings: &ClockSettings) -> Result<Self> {
        Self::with_palette(
            settings.width,
            settings.height,
            settings.radius,
            settings.utc_offset_hours,
            settings.palette,
        )
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn palette(&self) -> &ClockPalette {
        &self.palette
    }

    pub fn utc_offset_hours(&self) -> i8 {
        self.utc_offset_hours
    }

    pub fn utc_offset(&self) -> Offset {
        self.utc_offset
    }

    pub fn center(&self) -> PointF {
        PointF::new(self.width / 2.0, self.height / 2.0)
    }

    /// 承载该时钟所需的像素尺寸
    pub fn surface_size(&self) -> Size {
        Size::new(self.width.ceil() as u32, self.height.ceil() as u32)
    }
}

/// 配置文件中的单个时钟条目（未校验）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockSettings {
    pub slot: String,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default)]
    pub utc_offset_hours: i8,
    #[serde(default)]
    pub palette: ClockPalette,
}

impl ClockSettings {
    pub fn new(slot: &str, utc_offset_hours: i8) -> Self {
        Self {
            slot: slot.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            radius: DEFAULT_RADIUS,
            utc_offset_hours,
            palette: ClockPalette::default(),
        }
    }
}

fn default_width() -> f32 {
    DEFAULT_WIDTH
}

fn default_height() -> f32 {
    DEFAULT_HEIGHT
}

fn default_radius() -> f32 {
    DEFAULT_RADIUS
}

/// 宿主程序配置：重绘周期、运行帧数、快照目录以及时钟注册表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub frame_interval_ms: u64,
    /// 0 表示一直运行
    pub frames: u32,
    pub snapshot_dir: Option<PathBuf>,
    pub clocks: Vec<ClockSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            frames: DEFAULT_FRAMES,
            snapshot_dir: None,
            // 固定时差，不处理夏令时
            clocks: vec![
                ClockSettings::new("west-coast", -7),
                ClockSettings::new("gmt", 0),
                ClockSettings::new("east-coast", -4),
            ],
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading clock configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_interval_ms == 0 {
            return Err(ClockError::InvalidConfig(
                "frame_interval_ms must be positive".to_string(),
            ));
        }

        for (i, clock) in self.clocks.iter().enumerate() {
            if self.clocks[..i].iter().any(|c| c.slot == clock.slot) {
                return Err(ClockError::DuplicateSlot(clock.slot.clone()));
            }
            ClockConfig::from_settings(clock)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_dimensions() {
        for (w, h, r) in [
            (250.0, 250.0, 0.0),
            (250.0, 250.0, -5.0),
            (0.0, 250.0, 100.0),
            (250.0, -1.0, 100.0),
            (f32::NAN, 250.0, 100.0),
        ] {
            let err = ClockConfig::new(w, h, r, 0).unwrap_err();
            assert!(matches!(err, ClockError::InvalidConfig(_)), "{w}x{h} r{r}");
        }
    }

    #[test]
    fn rejects_radius_larger_than_surface() {
        assert!(ClockConfig::new(250.0, 200.0, 100.0, 0).is_ok());
        assert!(matches!(
            ClockConfig::new(250.0, 200.0, 100.5, 0),
            Err(ClockError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_impossible_offset() {
        assert!(ClockConfig::new(250.0, 250.0, 100.0, -7).is_ok());
        assert!(matches!(
            ClockConfig::new(250.0, 250.0, 100.0, 100),
            Err(ClockError::InvalidConfig(_))
        ));
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(
            parse_hex_color("#333333").unwrap(),
            Rgb888::new(0x33, 0x33, 0x33)
        );
        assert_eq!(parse_hex_color("ff0000").unwrap(), Rgb888::new(255, 0, 0));
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
    }

    #[test]
    fn default_config_has_three_zones() {
        let config = AppConfig::default();
        let slots: Vec<_> = config.clocks.iter().map(|c| c.slot.as_str()).collect();
        assert_eq!(slots, ["west-coast", "gmt", "east-coast"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_fills_defaults() {
        let config = AppConfig::from_json(
            r##"{
                "frames": 5,
                "clocks": [
                    { "slot": "tokyo", "utc_offset_hours": 9,
                      "palette": { "accent": "#00FF00" } }
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(config.frames, 5);
        assert_eq!(config.frame_interval_ms, DEFAULT_FRAME_INTERVAL_MS);
        let clock = &config.clocks[0];
        assert_eq!(clock.radius, DEFAULT_RADIUS);
        assert_eq!(clock.palette.accent, Rgb888::new(0, 255, 0));
        assert_eq!(clock.palette.border, ClockPalette::default().border);
    }

    #[test]
    fn json_rejects_duplicate_slots_and_bad_clocks() {
        let duplicate = r#"{ "clocks": [ { "slot": "gmt" }, { "slot": "gmt" } ] }"#;
        assert!(matches!(
            AppConfig::from_json(duplicate),
            Err(ClockError::DuplicateSlot(_))
        ));

        let bad_radius = r#"{ "clocks": [ { "slot": "gmt", "radius": 0 } ] }"#;
        assert!(matches!(
            AppConfig::from_json(bad_radius),
            Err(ClockError::InvalidConfig(_))
        ));

        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(ClockError::ConfigParse(_))
        ));
    }
}
