//! GUI module for the application.
//!
//! Hosts the controller in an eframe window and repaints while a worker,
//! a pending stop or a capture needs polling.

pub mod controller;
pub mod render;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Vec2};

use crate::automation::platform::InputBackend;
use crate::config::{AppConfig, StyleSettings};
use crate::logging::Logger;

use controller::{Controller, FrameActions};

const WINDOW_TITLE: &str = "Open Clicker";
const FONT_DIR: &str = "C:\\Windows\\Fonts";
const FONT_NAME: &str = "ui_font";

/// Main GUI application struct.
pub struct GuiApp {
    controller: Controller,
    /// Repaint cadence while something is being polled.
    poll_interval: Duration,
    show_debug: bool,
    hotkey: String,
}

impl GuiApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        backend: Arc<dyn InputBackend>,
        logger: Logger,
    ) -> Self {
        Self::setup_fonts(&cc.egui_ctx, config.style(), &logger);
        Self::apply_style(&cc.egui_ctx, config.style());

        let settings = config.settings();
        let mut controller = Controller::new(backend, logger, settings);
        let hotkey = render::hotkey_name(controller.hotkey_vk());
        controller.log_line(format!(
            "Ready. Press {} to stop clicking or to capture the cursor.",
            hotkey
        ));

        Self {
            controller,
            poll_interval: Duration::from_millis(settings.poll_interval_ms.max(1)),
            show_debug: settings.debug,
            hotkey,
        }
    }

    /// Loads the configured system font ahead of egui's defaults.
    fn setup_fonts(ctx: &egui::Context, style: &StyleSettings, logger: &Logger) {
        let mut fonts = egui::FontDefinitions::default();
        let font_path = std::path::Path::new(FONT_DIR).join(&style.font_family);

        match std::fs::read(&font_path) {
            Ok(font_data) => {
                fonts.font_data.insert(
                    FONT_NAME.to_owned(),
                    egui::FontData::from_owned(font_data).into(),
                );
                for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                    fonts
                        .families
                        .entry(family)
                        .or_default()
                        .insert(0, FONT_NAME.to_owned());
                }
                logger.info(format!("Loaded font from: {}", font_path.display()));
            }
            Err(e) => {
                logger.warn(format!(
                    "Could not load font {}: {}. Using the built-in font.",
                    font_path.display(),
                    e
                ));
            }
        }

        ctx.set_fonts(fonts);
    }

    fn apply_style(ctx: &egui::Context, style: &StyleSettings) {
        let size = style.font_size;
        let [window_x, window_y] = style.window_padding;
        let [frame_x, frame_y] = style.frame_padding;
        let [item_x, item_y] = style.item_spacing;
        let frame_rounding = egui::Rounding::same(style.frame_rounding);

        ctx.style_mut(|s| {
            for (text_style, font_id) in s.text_styles.iter_mut() {
                font_id.size = match text_style {
                    egui::TextStyle::Heading => size * 1.3,
                    egui::TextStyle::Small => size * 0.75,
                    _ => size,
                };
            }

            s.spacing.window_margin = egui::Margin::symmetric(window_x, window_y);
            s.spacing.button_padding = Vec2::new(frame_x, frame_y);
            s.spacing.item_spacing = Vec2::new(item_x, item_y);

            s.visuals.window_rounding = egui::Rounding::same(style.window_rounding);
            s.visuals.widgets.noninteractive.rounding = frame_rounding;
            s.visuals.widgets.inactive.rounding = frame_rounding;
            s.visuals.widgets.hovered.rounding = frame_rounding;
            s.visuals.widgets.active.rounding = frame_rounding;
            s.visuals.widgets.open.rounding = frame_rounding;
        });
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = FrameActions::default();

        egui::CentralPanel::default().show(ctx, |ui| {
            let controller = &mut self.controller;
            let can_capture = controller.can_capture();

            render::render_options(ui, &mut controller.state, &controller.controls);
            actions.capture = render::render_coordinates(
                ui,
                &mut controller.state,
                &controller.controls,
                can_capture,
                &self.hotkey,
            );
            render::render_stats(ui, &controller.state.shared);

            let (start, stop, clear_log) = render::render_controls(
                ui,
                &controller.controls,
                controller.state.awaiting_exit,
                &self.hotkey,
            );
            actions.start = start;
            actions.stop = stop;
            actions.clear_log = clear_log;

            render::render_log(ui, &controller.log);
        });

        if self.show_debug {
            render::render_debug(ctx, &self.controller);
        }

        self.controller.process_frame(actions);

        if self.controller.needs_polling() {
            ctx.request_repaint_after(self.poll_interval);
        }
    }
}

/// Run the GUI application.
/// This function blocks until the window is closed.
pub fn run_gui(config: AppConfig, backend: Arc<dyn InputBackend>, logger: Logger) -> eframe::Result<()> {
    let renderer = config.renderer();
    logger.info(format!(
        "GUI: Creating {}x{} window (vsync: {})",
        renderer.width, renderer.height, renderer.vsync
    ));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(renderer.width as f32, renderer.height as f32))
            .with_min_inner_size(Vec2::new(400.0, 300.0))
            .with_title(WINDOW_TITLE),
        vsync: renderer.vsync,
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(GuiApp::new(cc, &config, backend, logger)))),
    )
}
