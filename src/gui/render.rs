//! GUI rendering functions.
//!
//! Each function draws one section and reports which buttons were clicked.
//! None of them start or stop anything; the controller applies the clicks
//! after the frame is laid out.

use eframe::egui::{self, Color32, RichText};

use crate::automation::input::{ClickKind, MouseButton};
use crate::automation::state::{AutomationState, SharedState};

use super::controller::Controller;
use super::state::{ActivityLog, Button, ControlStates, InputWidget};

const WAITING_COLOR: Color32 = Color32::from_rgb(200, 150, 0);
const CAPTURE_COLOR: Color32 = Color32::from_rgb(0, 120, 200);

/// Display name for a virtual-key code.
pub fn hotkey_name(vk: u16) -> String {
    match vk {
        0x70..=0x87 => format!("F{}", vk - 0x6F),
        0x30..=0x39 | 0x41..=0x5A => char::from(vk as u8).to_string(),
        _ => format!("VK 0x{:02X}", vk),
    }
}

/// Render interval, launch delay, click type and mouse button inputs.
pub fn render_options(ui: &mut egui::Ui, state: &mut AutomationState, controls: &ControlStates) {
    ui.horizontal(|ui| {
        ui.label(format!("{}:", InputWidget::Interval.label()));
        ui.add_enabled(
            controls.is_enabled(InputWidget::Interval),
            egui::DragValue::new(&mut state.interval_ms)
                .range(0..=i64::from(i32::MAX))
                .speed(1.0)
                .suffix(" ms"),
        )
        .on_hover_text("Wait between clicks. 0 clicks as fast as the OS allows.");
    });

    ui.horizontal(|ui| {
        ui.label(format!("{}:", InputWidget::LaunchDelay.label()));
        ui.add_enabled(
            controls.is_enabled(InputWidget::LaunchDelay),
            egui::DragValue::new(&mut state.launch_delay_ms)
                .range(0..=i64::from(i32::MAX))
                .speed(1.0)
                .suffix(" ms"),
        )
        .on_hover_text("Wait once after Start before the first click.");
    });

    ui.add_space(4.0);

    ui.add_enabled_ui(controls.is_enabled(InputWidget::ClickType), |ui| {
        egui::ComboBox::from_label(InputWidget::ClickType.label())
            .selected_text(state.click_kind.label())
            .show_ui(ui, |ui| {
                for kind in ClickKind::ALL {
                    ui.selectable_value(&mut state.click_kind, kind, kind.label());
                }
            })
            .response
            .on_hover_text("A double click sends two press/release pairs back to back.");
    });

    ui.add_enabled_ui(controls.is_enabled(InputWidget::MouseButton), |ui| {
        egui::ComboBox::from_label(InputWidget::MouseButton.label())
            .selected_text(state.mouse_button.label())
            .show_ui(ui, |ui| {
                for button in MouseButton::ALL {
                    ui.selectable_value(&mut state.mouse_button, button, button.label());
                }
            })
            .response
            .on_hover_text("Side buttons are the back/forward thumb buttons.");
    });
}

/// Render the custom coordinates checkbox, inputs and capture button.
/// Returns capture_clicked.
pub fn render_coordinates(
    ui: &mut egui::Ui,
    state: &mut AutomationState,
    controls: &ControlStates,
    can_capture: bool,
    hotkey: &str,
) -> bool {
    let mut capture_clicked = false;

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.add_enabled(
        controls.is_clickable(Button::CoordinatesEnabled),
        egui::Checkbox::new(&mut state.coords_enabled, Button::CoordinatesEnabled.label()),
    )
    .on_hover_text("When off, clicks land wherever the cursor is.");

    let inputs_enabled = state.coords_enabled && controls.is_enabled(InputWidget::Coordinates);
    ui.horizontal(|ui| {
        ui.add_enabled_ui(inputs_enabled, |ui| {
            ui.label("X:");
            ui.add(egui::DragValue::new(&mut state.coordinates[0]).speed(1.0))
                .on_hover_text("Screen X coordinate in pixels.");
            ui.label("Y:");
            ui.add(egui::DragValue::new(&mut state.coordinates[1]).speed(1.0))
                .on_hover_text("Screen Y coordinate in pixels.");
        });

        ui.add_space(12.0);

        ui.add_enabled_ui(can_capture && !state.capturing_position, |ui| {
            if ui
                .button("Capture")
                .on_hover_text(format!("Move the cursor and press {} to record its position.", hotkey))
                .clicked()
            {
                capture_clicked = true;
            }
        });
    });

    if state.capturing_position {
        ui.label(
            RichText::new(format!("Press {} to capture the cursor position...", hotkey))
                .color(CAPTURE_COLOR),
        );
    }

    capture_clicked
}

/// Render click counters.
pub fn render_stats(ui: &mut egui::Ui, shared: &SharedState) {
    let stats = shared.stats.snapshot();

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(RichText::new(format!("Total clicks: {}", stats.total)).strong());
    ui.horizontal_wrapped(|ui| {
        for button in MouseButton::ALL {
            ui.label(format!("{}: {}", button.label(), stats.for_button(button)));
            ui.add_space(12.0);
        }
    });
}

/// Render the Start, Stop and Clear Log buttons.
/// Returns (start_clicked, stop_clicked, clear_log_clicked).
pub fn render_controls(
    ui: &mut egui::Ui,
    controls: &ControlStates,
    awaiting_exit: bool,
    hotkey: &str,
) -> (bool, bool, bool) {
    let mut start_clicked = false;
    let mut stop_clicked = false;
    let mut clear_clicked = false;

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.add_enabled_ui(controls.is_clickable(Button::Start) && !awaiting_exit, |ui| {
            if ui.button(RichText::new(format!("▶ {}", Button::Start.label())).size(16.0)).clicked() {
                start_clicked = true;
            }
        });

        ui.add_space(20.0);

        ui.add_enabled_ui(controls.is_clickable(Button::Stop) && !awaiting_exit, |ui| {
            let label = format!("◼ {} ({})", Button::Stop.label(), hotkey);
            if ui.button(RichText::new(label).size(16.0)).clicked() {
                stop_clicked = true;
            }
        });

        ui.add_space(20.0);

        if ui.button("Clear Log").clicked() {
            clear_clicked = true;
        }

        if awaiting_exit {
            ui.spinner();
            ui.label(RichText::new("Waiting for the clicking thread...").color(WAITING_COLOR));
        }
    });

    (start_clicked, stop_clicked, clear_clicked)
}

/// Render the scrolling activity log.
pub fn render_log(ui: &mut egui::Ui, log: &ActivityLog) {
    ui.add_space(8.0);
    ui.separator();
    ui.label("Log");

    egui::Frame::group(ui.style()).show(ui, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if log.is_empty() {
                    ui.weak("Nothing logged yet.");
                }
                for line in log.lines() {
                    ui.label(RichText::new(line).monospace());
                }
            });
    });
}

/// Render internal state in a separate window.
pub fn render_debug(ctx: &egui::Context, controller: &Controller) {
    let state = &controller.state;
    let shared = &state.shared;

    egui::Window::new("Debug").default_open(false).show(ctx, |ui| {
        egui::Grid::new("debug_grid").num_columns(2).striped(true).show(ui, |ui| {
            ui.label("Run signal");
            ui.label(shared.run.load().label());
            ui.end_row();

            ui.label("Worker phase");
            ui.label(shared.phase.load().label());
            ui.end_row();

            ui.label("Interval / delay");
            ui.label(format!("{}ms / {}ms", state.interval_ms, state.launch_delay_ms));
            ui.end_row();

            ui.label("Action");
            ui.label(format!("{}, {}", state.mouse_button.label(), state.click_kind.label()));
            ui.end_row();

            ui.label("Coordinates");
            ui.label(format!(
                "({}, {}) {}",
                state.coordinates[0],
                state.coordinates[1],
                if state.coords_enabled { "enabled" } else { "disabled" }
            ));
            ui.end_row();

            ui.label("Worker thread");
            ui.label(controller.worker_thread_state());
            ui.end_row();

            let target = shared.target.load();
            ui.label("Published target");
            ui.label(format!("({}, {})", target.x, target.y));
            ui.end_row();

            ui.label("Awaiting exit");
            ui.label(format!("{} (prev {})", state.awaiting_exit, state.prev_awaiting_exit));
            ui.end_row();

            ui.label("Capturing");
            ui.label(state.capturing_position.to_string());
            ui.end_row();

            for button in Button::ALL {
                ui.label(button.label());
                ui.label(format!("{:?}", controller.controls.button(button)));
                ui.end_row();
            }

            for widget in InputWidget::ALL {
                ui.label(widget.label());
                ui.label(format!("{:?}", controller.controls.widget(widget)));
                ui.end_row();
            }

            ui.label("Log lines");
            ui.label(controller.log.len().to_string());
            ui.end_row();
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotkey_name() {
        assert_eq!(hotkey_name(0x76), "F7");
        assert_eq!(hotkey_name(0x70), "F1");
        assert_eq!(hotkey_name(0x87), "F24");
        assert_eq!(hotkey_name(0x51), "Q");
        assert_eq!(hotkey_name(0x1B), "VK 0x1B");
    }
}
