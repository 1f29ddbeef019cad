// src/main.rs

//! 多时区时钟模拟器入口
//!
//! 读取可选的 JSON 配置，为每个时钟分配内存帧缓冲区，运行若干帧后导出快照。

use std::path::PathBuf;

use embassy_time::{Duration, Instant};
use log::{info, warn};

use world_clock::common::AppConfig;
use world_clock::driver::{Framebuffer, SystemTimeSource};
use world_clock::service::{ClockHost, RedrawScheduler, fallback_message};
use world_clock::{ClockConfig, Result};

const CONFIG_ENV: &str = "WORLD_CLOCK_CONFIG";

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from)
}

fn run(config: &AppConfig) -> Result<()> {
    let mut host = ClockHost::new();

    for settings in &config.clocks {
        let clock = ClockConfig::from_settings(settings)?;
        host.register(
            &settings.slot,
            clock,
            Framebuffer::for_clock(&clock),
            SystemTimeSource::for_config(&clock),
        )?;
    }

    for slot in host.load_all()? {
        warn!("{}", fallback_message(&slot));
    }

    let mut scheduler = RedrawScheduler::new(Duration::from_millis(config.frame_interval_ms))?;
    let start = Instant::now();
    for slot in host.loaded_slots() {
        scheduler.schedule(&slot, start);
    }

    let frames = embassy_futures::block_on(scheduler.run(&mut host, config.frames));
    info!("Rendered {} frames", frames);

    if let Some(dir) = &config.snapshot_dir {
        std::fs::create_dir_all(dir)?;
        for slot in host.slots() {
            let path = dir.join(format!("{}.ppm", slot));
            host.canvas(&slot)?.save_ppm(&path)?;
            info!("Saved '{}' to {}", slot, path.display());
        }
    }

    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("World clock simulator starting");

    let config = match config_path() {
        Some(path) => AppConfig::load(&path)?,
        None => {
            info!("No config file given, using built-in clocks");
            AppConfig::default()
        }
    };

    run(&config)?;

    info!("World clock simulator finished");
    Ok(())
}
