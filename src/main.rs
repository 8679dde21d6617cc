//! Open Clicker
//!
//! A Windows auto-clicker: repeatedly synthesizes mouse clicks on a
//! background thread at a configurable interval, controlled from an egui
//! window and a stop/capture hotkey.

// Hide console window on Windows for GUI mode
#![windows_subsystem = "windows"]

mod automation;
mod config;
mod gui;
mod logging;
mod paths;

use anyhow::{anyhow, Context, Result};

use config::AppConfig;
use logging::{format_line, LogLevel, Logger};

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");

        // Written directly: the hook may run on any thread, before or after the logger exists
        let line = format_line(
            LogLevel::Error,
            &format!("[PANIC] thread '{}'{} {}", thread_name, location, msg),
        );
        eprint!("{}", line);
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(paths::get_log_file())
        {
            use std::io::Write;
            let _ = file.write_all(line.as_bytes());
        }
    }));
}

fn main() -> Result<()> {
    install_panic_hook();

    paths::ensure_directories().context("Failed to create the logs directory")?;
    let logger = Logger::to_file(paths::get_log_file());
    logger.info(format!("Open Clicker {} starting", env!("CARGO_PKG_VERSION")));

    let config = AppConfig::load_or_create(&paths::get_config_path(), &logger);
    logger.info(format!(
        "Hotkey VK: {:?}, font: {:?}",
        config.get_i64("settings:hotkey-vk"),
        config.get_str("style:font-family")
    ));
    if config.get_bool("settings:debug").unwrap_or(false) {
        logger.info("Debug mode enabled, the debug window will be shown");
    }

    let backend = match automation::default_backend() {
        Ok(backend) => backend,
        Err(e) => {
            logger.error(format!("No input backend: {:#}", e));
            return Err(e);
        }
    };

    logger.info("Starting GUI application...");
    match gui::run_gui(config, backend, logger.clone()) {
        Ok(()) => {
            logger.info("GUI application exited normally");
            Ok(())
        }
        Err(e) => {
            logger.error(format!("GUI error: {}", e));
            Err(anyhow!("GUI error: {}", e))
        }
    }
}
