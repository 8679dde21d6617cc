//! Background click worker.
//!
//! Runs on its own thread: waits the launch delay once, then loops
//! (check stop → resolve target → inject → count → sleep) until the UI asks
//! it to stop or the hotkey is held down. Its final act is marking the run
//! `Completed`, which is the only thing the UI waits for.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::automation::input::{build_click, decode_action, ClickKind, MouseButton, Positioning};
use crate::automation::platform::InputBackend;
use crate::automation::state::{SharedState, WorkerPhase};
use crate::logging::Logger;

/// Settings snapshotted from the UI when the worker is launched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerConfig {
    pub interval_ms: u64,
    pub launch_delay_ms: u64,
    pub button_code: u8,
    pub kind_code: u8,
}

/// Why the click loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    StopRequested,
    Hotkey,
}

/// Messages from the worker to the UI's activity log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerNotice {
    /// The OS accepted fewer records than were sent.
    ClickFailed {
        requested: usize,
        accepted: usize,
        os_error: u32,
    },
    /// The configured button or click kind could not be decoded.
    UnknownAction { button_code: u8, kind_code: u8 },
    /// Live-cursor target requested but the cursor could not be read.
    CursorUnavailable(String),
    /// The hotkey stopped the worker without the Stop button.
    HotkeyStop,
    Exited { reason: ExitReason, clicks: u64 },
}

impl WorkerNotice {
    /// Text appended to the activity log.
    pub fn message(&self) -> String {
        match self {
            WorkerNotice::ClickFailed {
                requested,
                accepted,
                os_error,
            } => format!(
                "Click failed! Sent {}/{} inputs. (GetLastError() = 0x{:x})",
                accepted, requested, os_error
            ),
            WorkerNotice::UnknownAction {
                button_code,
                kind_code,
            } => format!(
                "Unrecognized mouse button/click type (button={}, type={}), no input will be sent.",
                button_code, kind_code
            ),
            WorkerNotice::CursorUnavailable(reason) => {
                format!("Could not read the cursor position: {}", reason)
            }
            WorkerNotice::HotkeyStop => {
                "Hotkey pressed, the auto-clicker stopped itself.".to_string()
            }
            WorkerNotice::Exited { clicks, .. } => {
                format!("Clicking thread exited after {} simulated clicks.", clicks)
            }
        }
    }
}

/// One run of the auto-clicker.
pub struct ClickWorker {
    config: WorkerConfig,
    shared: Arc<SharedState>,
    backend: Arc<dyn InputBackend>,
    logger: Logger,
    notices: Sender<WorkerNotice>,
    hotkey_vk: u16,
}

impl ClickWorker {
    pub fn new(
        config: WorkerConfig,
        shared: Arc<SharedState>,
        backend: Arc<dyn InputBackend>,
        logger: Logger,
        notices: Sender<WorkerNotice>,
        hotkey_vk: u16,
    ) -> Self {
        Self {
            config,
            shared,
            backend,
            logger,
            notices,
            hotkey_vk,
        }
    }

    /// Starts the worker on a named thread.
    ///
    /// The caller must have moved the run signal to `Running` first.
    pub fn spawn(self) -> io::Result<WorkerHandle> {
        let handle = thread::Builder::new()
            .name("click-worker".to_string())
            .spawn(move || self.run())?;
        Ok(WorkerHandle { handle })
    }

    /// Runs the worker to completion on the current thread.
    pub fn run(self) {
        let config = self.config;
        self.logger.info(format!(
            "Click worker started: interval {}ms, launch delay {}ms, target {:?}",
            config.interval_ms,
            config.launch_delay_ms,
            self.shared.target.load()
        ));

        let action = decode_action(config.button_code, config.kind_code);
        if action.is_none() {
            self.logger.warn(format!(
                "Unrecognized click action (button={}, type={})",
                config.button_code, config.kind_code
            ));
            self.notify(WorkerNotice::UnknownAction {
                button_code: config.button_code,
                kind_code: config.kind_code,
            });
        }

        if config.launch_delay_ms != 0 {
            self.shared.phase.store(WorkerPhase::Delaying);
            thread::sleep(Duration::from_millis(config.launch_delay_ms));
        }

        self.shared.phase.store(WorkerPhase::Clicking);
        let interval = Duration::from_millis(config.interval_ms);
        let mut clicks = 0;

        let reason = loop {
            if self.shared.run.is_stop_requested() {
                break ExitReason::StopRequested;
            }
            if self.backend.is_key_down(self.hotkey_vk) {
                break ExitReason::Hotkey;
            }

            if let Some((button, kind)) = action {
                clicks += self.click_once(button, kind);
            }

            thread::sleep(interval);
        };

        self.shared.run.acknowledge();
        self.shared.phase.store(WorkerPhase::Exiting);

        if reason == ExitReason::Hotkey {
            self.notify(WorkerNotice::HotkeyStop);
        }
        self.notify(WorkerNotice::Exited { reason, clicks });
        self.logger.info(format!(
            "Click worker exiting ({:?}), {} clicks",
            reason, clicks
        ));

        self.shared.phase.store(WorkerPhase::Idle);
        self.shared.run.complete();
    }

    /// Sends one logical click. Returns the number of clicks counted.
    fn click_once(&self, button: MouseButton, kind: ClickKind) -> u64 {
        let target = self.shared.target.load();
        let (point, positioning) = if target.is_origin() {
            match self.backend.cursor_position() {
                Ok(point) => (point, Positioning::Cursor),
                Err(e) => {
                    self.logger.warn(format!("Cursor query failed: {:#}", e));
                    self.notify(WorkerNotice::CursorUnavailable(format!("{:#}", e)));
                    return 0;
                }
            }
        } else {
            (target, Positioning::Absolute)
        };

        let records = build_click(button, kind, point, positioning);
        let outcome = self.backend.send_input(&records);

        if outcome.accepted != records.len() {
            self.logger.warn(format!(
                "Click failed: {}/{} inputs accepted (GetLastError() = 0x{:x})",
                outcome.accepted,
                records.len(),
                outcome.os_error
            ));
            self.notify(WorkerNotice::ClickFailed {
                requested: records.len(),
                accepted: outcome.accepted,
                os_error: outcome.os_error,
            });
            return 0;
        }

        self.shared.stats.record(button, kind.presses());
        kind.presses()
    }

    fn notify(&self, notice: WorkerNotice) {
        // The UI may already be gone during shutdown
        let _ = self.notices.send(notice);
    }
}

/// Ownership of a launched worker thread.
#[derive(Debug)]
pub struct WorkerHandle {
    handle: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Releases the thread after it has reported completion.
    ///
    /// Joins if the thread has already returned; otherwise detaches it, since
    /// it is past its last shared write and will return on its own.
    pub fn release(self, logger: &Logger) {
        if self.handle.is_finished() {
            if let Err(e) = self.handle.join() {
                logger.error(format!("Click worker thread panicked: {:?}", e));
            }
        }
    }
}
