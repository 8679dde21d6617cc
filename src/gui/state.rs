//! GUI state that never leaves the UI thread.
//!
//! Enable/disable flags for buttons and input widgets, and the on-screen
//! activity log.

use std::collections::VecDeque;

/// Whether a control accepts input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    Clickable,
    Unclickable,
}

impl ControlState {
    pub fn is_clickable(self) -> bool {
        self == ControlState::Clickable
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Start,
    Stop,
    CoordinatesEnabled,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Start, Button::Stop, Button::CoordinatesEnabled];

    pub fn label(self) -> &'static str {
        match self {
            Button::Start => "Start",
            Button::Stop => "Stop",
            Button::CoordinatesEnabled => "Use custom coordinates",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputWidget {
    Interval,
    LaunchDelay,
    Coordinates,
    ClickType,
    MouseButton,
}

impl InputWidget {
    pub const ALL: [InputWidget; 5] = [
        InputWidget::Interval,
        InputWidget::LaunchDelay,
        InputWidget::Coordinates,
        InputWidget::ClickType,
        InputWidget::MouseButton,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InputWidget::Interval => "Milliseconds between clicks",
            InputWidget::LaunchDelay => "Launch delay",
            InputWidget::Coordinates => "Custom coordinates",
            InputWidget::ClickType => "Click type",
            InputWidget::MouseButton => "Mouse button",
        }
    }
}

/// Explicit enable flags, toggled at start and at confirmed stop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlStates {
    buttons: [ControlState; 3],
    widgets: [ControlState; 5],
}

impl Default for ControlStates {
    fn default() -> Self {
        Self {
            buttons: [
                ControlState::Clickable,
                ControlState::Unclickable,
                ControlState::Clickable,
            ],
            widgets: [ControlState::Clickable; 5],
        }
    }
}

impl ControlStates {
    pub fn button(&self, button: Button) -> ControlState {
        self.buttons[button as usize]
    }

    pub fn set_button(&mut self, button: Button, state: ControlState) {
        self.buttons[button as usize] = state;
    }

    pub fn widget(&self, widget: InputWidget) -> ControlState {
        self.widgets[widget as usize]
    }

    pub fn is_clickable(&self, button: Button) -> bool {
        self.button(button).is_clickable()
    }

    pub fn is_enabled(&self, widget: InputWidget) -> bool {
        self.widget(widget).is_clickable()
    }

    /// Locks every editable input, including the coordinates checkbox.
    pub fn disable_inputs(&mut self) {
        self.set_inputs(ControlState::Unclickable);
    }

    pub fn enable_inputs(&mut self) {
        self.set_inputs(ControlState::Clickable);
    }

    fn set_inputs(&mut self, state: ControlState) {
        self.widgets = [state; 5];
        self.set_button(Button::CoordinatesEnabled, state);
    }

    /// Start disabled, Stop enabled.
    pub fn show_running(&mut self) {
        self.set_button(Button::Start, ControlState::Unclickable);
        self.set_button(Button::Stop, ControlState::Clickable);
    }

    /// Start enabled, Stop disabled.
    pub fn show_idle(&mut self) {
        self.set_button(Button::Start, ControlState::Clickable);
        self.set_button(Button::Stop, ControlState::Unclickable);
    }
}

/// Append-only on-screen log. Cleared only by an explicit action.
#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    lines: VecDeque<String>,
    /// Maximum lines kept; 0 keeps everything.
    capacity: usize,
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
        if self.capacity != 0 {
            while self.lines.len() > self.capacity {
                self.lines.pop_front();
            }
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Newline-terminated text of the whole log.
    #[cfg(test)]
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_states_are_start_ready() {
        let states = ControlStates::default();
        assert!(states.is_clickable(Button::Start));
        assert!(!states.is_clickable(Button::Stop));
        assert!(states.is_clickable(Button::CoordinatesEnabled));
        assert!(InputWidget::ALL.iter().all(|&w| states.is_enabled(w)));
    }

    #[test]
    fn test_disable_and_enable_inputs() {
        let mut states = ControlStates::default();
        states.show_running();
        states.disable_inputs();
        assert!(InputWidget::ALL.iter().all(|&w| !states.is_enabled(w)));
        assert!(!states.is_clickable(Button::CoordinatesEnabled));
        assert!(states.is_clickable(Button::Stop));

        states.enable_inputs();
        states.show_idle();
        assert_eq!(states, ControlStates::default());
    }

    #[test]
    fn test_log_text_is_newline_terminated() {
        let mut log = ActivityLog::default();
        log.push("first");
        log.push(String::from("second"));
        assert_eq!(log.text(), "first\nsecond\n");

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.text(), "");
    }

    #[test]
    fn test_log_capacity_evicts_oldest() {
        let mut log = ActivityLog::with_capacity(2);
        for line in ["a", "b", "c"] {
            log.push(line);
        }
        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_unbounded_log_keeps_everything() {
        let mut log = ActivityLog::default();
        for i in 0..500 {
            log.push(format!("line {}", i));
        }
        assert_eq!(log.len(), 500);
    }
}
