//! Automation state shared between the UI thread and the click worker.
//!
//! `AutomationState` is owned by the UI controller. The part the worker also
//! touches lives in `SharedState` behind an `Arc`, and every field in it has
//! exactly one writer per direction:
//! - `run`: the UI writes `Running` and `StopRequested`, the worker writes
//!   `Acknowledged` and `Completed`
//! - `target`: written by the UI, re-read by the worker before every click
//! - `stats` and `phase`: written by the worker, read by the UI
//!
//! No locks are involved; every cell is a single atomic.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use crate::automation::input::{ClickKind, MouseButton, Point};
use crate::automation::worker::WorkerConfig;

/// Lifecycle of one worker run, as seen by both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RunSignal {
    /// No worker has been launched.
    Idle = 0,
    /// Worker launched and clicking.
    Running = 1,
    /// UI asked the worker to stop.
    StopRequested = 2,
    /// Worker saw a stop (request or hotkey) and is leaving its loop.
    Acknowledged = 3,
    /// Worker finished; the UI may release it.
    Completed = 4,
}

impl RunSignal {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RunSignal::Running,
            2 => RunSignal::StopRequested,
            3 => RunSignal::Acknowledged,
            4 => RunSignal::Completed,
            _ => RunSignal::Idle,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RunSignal::Idle => "Idle",
            RunSignal::Running => "Running",
            RunSignal::StopRequested => "Stop requested",
            RunSignal::Acknowledged => "Acknowledged",
            RunSignal::Completed => "Completed",
        }
    }
}

/// Atomic cell holding a [`RunSignal`].
#[derive(Debug, Default)]
pub struct RunCell(AtomicU8);

impl RunCell {
    pub fn load(&self) -> RunSignal {
        RunSignal::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// Moves to `to` if the current value is one of `from`.
    fn transition(&self, from: &[RunSignal], to: RunSignal) -> bool {
        from.iter().any(|&state| {
            self.0
                .compare_exchange(state as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        })
    }

    /// UI: marks a new run as started. Fails while a worker is still alive.
    pub fn launch(&self) -> bool {
        self.transition(&[RunSignal::Idle, RunSignal::Completed], RunSignal::Running)
    }

    /// UI: asks a running worker to stop.
    pub fn request_stop(&self) -> bool {
        self.transition(&[RunSignal::Running], RunSignal::StopRequested)
    }

    /// Worker: records that it is leaving the click loop.
    pub fn acknowledge(&self) -> bool {
        self.transition(
            &[RunSignal::Running, RunSignal::StopRequested],
            RunSignal::Acknowledged,
        )
    }

    /// Worker: last write before the thread returns.
    pub fn complete(&self) {
        self.0.store(RunSignal::Completed as u8, Ordering::SeqCst);
    }

    /// UI: returns to `Idle` once no worker exists.
    pub fn reset(&self) {
        self.0.store(RunSignal::Idle as u8, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.load() == RunSignal::StopRequested
    }

    pub fn is_completed(&self) -> bool {
        self.load() == RunSignal::Completed
    }
}

/// Click target, packed into one atomic so x and y are always read together.
#[derive(Debug, Default)]
pub struct TargetCell(AtomicU64);

impl TargetCell {
    pub fn store(&self, point: Point) {
        let packed = ((point.x as u32 as u64) << 32) | point.y as u32 as u64;
        self.0.store(packed, Ordering::SeqCst);
    }

    pub fn load(&self) -> Point {
        let packed = self.0.load(Ordering::SeqCst);
        Point::new((packed >> 32) as u32 as i32, packed as u32 as i32)
    }
}

/// Click counters. Written only by the worker.
#[derive(Debug, Default)]
pub struct ClickStats {
    total: AtomicU64,
    per_button: [AtomicU64; 4],
}

/// Point-in-time copy of [`ClickStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total: u64,
    pub per_button: [u64; 4],
}

impl StatsSnapshot {
    pub fn for_button(&self, button: MouseButton) -> u64 {
        self.per_button[button.index()]
    }
}

impl ClickStats {
    pub fn record(&self, button: MouseButton, clicks: u64) {
        self.total.fetch_add(clicks, Ordering::Relaxed);
        self.per_button[button.index()].fetch_add(clicks, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let mut per_button = [0; 4];
        for (slot, counter) in per_button.iter_mut().zip(&self.per_button) {
            *slot = counter.load(Ordering::Relaxed);
        }
        StatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            per_button,
        }
    }
}

/// Where the worker currently is in its state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerPhase {
    Idle = 0,
    Delaying = 1,
    Clicking = 2,
    Exiting = 3,
}

impl WorkerPhase {
    pub fn label(self) -> &'static str {
        match self {
            WorkerPhase::Idle => "Idle",
            WorkerPhase::Delaying => "Delaying",
            WorkerPhase::Clicking => "Clicking",
            WorkerPhase::Exiting => "Exiting",
        }
    }
}

#[derive(Debug, Default)]
pub struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub fn store(&self, phase: WorkerPhase) {
        self.0.store(phase as u8, Ordering::SeqCst);
    }

    pub fn load(&self) -> WorkerPhase {
        match self.0.load(Ordering::SeqCst) {
            1 => WorkerPhase::Delaying,
            2 => WorkerPhase::Clicking,
            3 => WorkerPhase::Exiting,
            _ => WorkerPhase::Idle,
        }
    }
}

/// State visible to both the UI and the worker.
#[derive(Debug, Default)]
pub struct SharedState {
    pub run: RunCell,
    pub target: TargetCell,
    pub stats: ClickStats,
    pub phase: PhaseCell,
}

/// Everything the UI edits and tracks for one session.
#[derive(Debug)]
pub struct AutomationState {
    /// Milliseconds between clicks. Never negative after [`sanitize`](Self::sanitize).
    pub interval_ms: i64,
    /// Milliseconds to wait before the first click.
    pub launch_delay_ms: i64,
    /// "Use custom coordinates" checkbox.
    pub coords_enabled: bool,
    pub coordinates: [i32; 2],
    pub click_kind: ClickKind,
    pub mouse_button: MouseButton,
    /// Stop was requested and the worker has not completed yet.
    pub awaiting_exit: bool,
    /// `awaiting_exit` as of the previous frame.
    pub prev_awaiting_exit: bool,
    /// Waiting for the hotkey to snapshot the cursor.
    pub capturing_position: bool,
    pub shared: Arc<SharedState>,
}

impl Default for AutomationState {
    fn default() -> Self {
        Self {
            interval_ms: 1,
            launch_delay_ms: 1,
            coords_enabled: false,
            coordinates: [0, 0],
            click_kind: ClickKind::Single,
            mouse_button: MouseButton::Left,
            awaiting_exit: false,
            prev_awaiting_exit: false,
            capturing_position: false,
            shared: Arc::new(SharedState::default()),
        }
    }
}

impl AutomationState {
    /// Clamps negative interval and delay input to zero.
    pub fn sanitize(&mut self) {
        self.interval_ms = self.interval_ms.max(0);
        self.launch_delay_ms = self.launch_delay_ms.max(0);
    }

    /// Target the worker should click. (0, 0) means the live cursor.
    pub fn target(&self) -> Point {
        if self.coords_enabled {
            Point::new(self.coordinates[0], self.coordinates[1])
        } else {
            Point::default()
        }
    }

    /// Makes the current target visible to the worker.
    pub fn publish_target(&self) {
        self.shared.target.store(self.target());
    }

    /// Snapshot of the settings a worker runs with.
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            interval_ms: self.interval_ms.max(0) as u64,
            launch_delay_ms: self.launch_delay_ms.max(0) as u64,
            button_code: self.mouse_button.code(),
            kind_code: self.click_kind.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = AutomationState::default();
        assert_eq!(state.interval_ms, 1);
        assert_eq!(state.launch_delay_ms, 1);
        assert_eq!(state.click_kind, ClickKind::Single);
        assert_eq!(state.mouse_button, MouseButton::Left);
        assert!(!state.awaiting_exit && !state.prev_awaiting_exit && !state.capturing_position);
        assert_eq!(state.shared.run.load(), RunSignal::Idle);
    }

    #[test]
    fn test_sanitize_clamps_negative_to_zero() {
        let mut state = AutomationState {
            interval_ms: -250,
            launch_delay_ms: -1,
            ..Default::default()
        };
        state.sanitize();
        assert_eq!(state.interval_ms, 0);
        assert_eq!(state.launch_delay_ms, 0);

        state.interval_ms = 40;
        state.sanitize();
        assert_eq!(state.interval_ms, 40);
    }

    #[test]
    fn test_target_ignores_coordinates_when_disabled() {
        let mut state = AutomationState {
            coordinates: [300, 200],
            ..Default::default()
        };
        assert_eq!(state.target(), Point::default());

        state.coords_enabled = true;
        state.publish_target();
        assert_eq!(state.shared.target.load(), Point::new(300, 200));
    }

    #[test]
    fn test_target_cell_keeps_negative_coordinates() {
        let cell = TargetCell::default();
        cell.store(Point::new(-1920, 45));
        assert_eq!(cell.load(), Point::new(-1920, 45));
        cell.store(Point::new(i32::MAX, i32::MIN));
        assert_eq!(cell.load(), Point::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_run_signal_transitions() {
        let run = RunCell::default();
        assert!(!run.request_stop());
        assert!(run.launch());
        assert!(!run.launch());

        assert!(run.request_stop());
        assert!(run.is_stop_requested());
        assert!(run.acknowledge());
        assert!(!run.request_stop());

        run.complete();
        assert!(run.is_completed());
        assert!(run.launch());
    }

    #[test]
    fn test_hotkey_acknowledge_from_running() {
        let run = RunCell::default();
        run.launch();
        assert!(run.acknowledge());
        assert_eq!(run.load(), RunSignal::Acknowledged);
    }

    #[test]
    fn test_stats_record_per_button() {
        let stats = ClickStats::default();
        stats.record(MouseButton::Left, 1);
        stats.record(MouseButton::SideTop, 2);
        stats.record(MouseButton::Left, 2);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total, 5);
        assert_eq!(snapshot.for_button(MouseButton::Left), 3);
        assert_eq!(snapshot.for_button(MouseButton::SideTop), 2);
        assert_eq!(snapshot.for_button(MouseButton::Right), 0);
    }

    #[test]
    fn test_worker_config_snapshot() {
        let state = AutomationState {
            interval_ms: 50,
            launch_delay_ms: 0,
            click_kind: ClickKind::Double,
            mouse_button: MouseButton::Right,
            coords_enabled: true,
            coordinates: [10, 20],
            ..Default::default()
        };
        let config = state.worker_config();
        assert_eq!(config.interval_ms, 50);
        assert_eq!(config.launch_delay_ms, 0);
        assert_eq!(config.button_code, MouseButton::Right.code());
        assert_eq!(config.kind_code, ClickKind::Double.code());
    }
}
