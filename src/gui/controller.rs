//! Start/stop/capture protocol, run once per frame.
//!
//! The render pass draws the widgets and reports what the user clicked as a
//! [`FrameActions`]; [`Controller::process_frame`] then applies it. The
//! controller never blocks: worker shutdown is observed by polling the run
//! signal across frames.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::automation::input::Point;
use crate::automation::platform::InputBackend;
use crate::automation::state::AutomationState;
use crate::automation::worker::{ClickWorker, WorkerHandle, WorkerNotice};
use crate::config::Settings;
use crate::gui::state::{ActivityLog, Button, ControlStates};
use crate::logging::Logger;

/// User actions collected while rendering one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameActions {
    pub start: bool,
    pub stop: bool,
    pub capture: bool,
    pub clear_log: bool,
}

pub struct Controller {
    pub state: AutomationState,
    pub controls: ControlStates,
    pub log: ActivityLog,
    worker: Option<WorkerHandle>,
    backend: Arc<dyn InputBackend>,
    logger: Logger,
    notice_tx: Sender<WorkerNotice>,
    notice_rx: Receiver<WorkerNotice>,
    hotkey_vk: u16,
}

impl Controller {
    pub fn new(backend: Arc<dyn InputBackend>, logger: Logger, settings: &Settings) -> Self {
        let (notice_tx, notice_rx) = channel();
        Self {
            state: AutomationState::default(),
            controls: ControlStates::default(),
            log: ActivityLog::with_capacity(settings.log_capacity),
            worker: None,
            backend,
            logger,
            notice_tx,
            notice_rx,
            hotkey_vk: settings.hotkey_vk,
        }
    }

    pub fn hotkey_vk(&self) -> u16 {
        self.hotkey_vk
    }

    /// True while a worker thread is owned by the UI.
    pub fn worker_active(&self) -> bool {
        self.worker.is_some()
    }

    /// Worker thread status for the debug window.
    pub fn worker_thread_state(&self) -> &'static str {
        match &self.worker {
            None => "none",
            Some(handle) if handle.is_finished() => "finished",
            Some(_) => "running",
        }
    }

    /// True while something must be polled on the next frame.
    pub fn needs_polling(&self) -> bool {
        self.worker_active() || self.state.awaiting_exit || self.state.capturing_position
    }

    /// Capture is offered only with custom coordinates on and no worker.
    pub fn can_capture(&self) -> bool {
        self.state.coords_enabled
            && self.controls.is_clickable(Button::Start)
            && !self.state.awaiting_exit
            && !self.worker_active()
    }

    /// Appends a line to the on-screen log and mirrors it to the diagnostic log.
    pub fn log_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.logger.info(&line);
        self.log.push(line);
    }

    /// Applies one frame of user actions and worker progress.
    pub fn process_frame(&mut self, actions: FrameActions) {
        self.drain_notices();

        self.state.sanitize();
        if !self.state.coords_enabled {
            self.state.capturing_position = false;
        }
        self.state.publish_target();

        if actions.capture {
            self.begin_capture();
        }
        self.poll_capture();

        if actions.start {
            self.start();
        }
        if actions.stop {
            self.stop();
        }
        if actions.clear_log {
            self.clear_log();
        }

        self.track_worker_exit();
    }

    /// Start button: launches a worker on a new thread.
    pub fn start(&mut self) {
        self.start_with(ClickWorker::spawn);
    }

    /// Start with a custom launcher, so launch failure can be exercised.
    pub fn start_with<F>(&mut self, launch: F)
    where
        F: FnOnce(ClickWorker) -> io::Result<WorkerHandle>,
    {
        if !self.controls.is_clickable(Button::Start) || self.state.awaiting_exit {
            return;
        }

        // Lock the controls before anything else so a second Start cannot land
        self.controls.show_running();
        self.controls.disable_inputs();
        self.state.capturing_position = false;

        self.state.sanitize();
        self.state.publish_target();
        let config = self.state.worker_config();

        self.log_line(format!(
            "Launching auto-clicker with {}ms delay.",
            config.interval_ms
        ));

        if !self.state.shared.run.launch() {
            self.logger
                .warn(format!("Run signal was {:?} at launch", self.state.shared.run.load()));
            self.state.shared.run.reset();
            self.state.shared.run.launch();
        }

        let worker = ClickWorker::new(
            config,
            self.state.shared.clone(),
            self.backend.clone(),
            self.logger.clone(),
            self.notice_tx.clone(),
            self.hotkey_vk,
        );

        match launch(worker) {
            Ok(handle) => self.worker = Some(handle),
            Err(e) => {
                self.state.shared.run.reset();
                self.controls.show_idle();
                self.controls.enable_inputs();
                self.logger.error(format!("Worker launch failed: {}", e));
                self.log_line(format!(
                    "Failed to launch clicking thread. (GetLastError() returned 0x{:x})",
                    e.raw_os_error().unwrap_or(0)
                ));
            }
        }
    }

    /// Stop button: asks the worker to stop and waits for it across frames.
    pub fn stop(&mut self) {
        if !self.controls.is_clickable(Button::Stop) || self.state.awaiting_exit {
            return;
        }

        // A worker that already stopped itself is picked up by track_worker_exit
        self.state.shared.run.request_stop();
        self.state.awaiting_exit = true;
        self.log_line("Signaled clicking thread to exit, please wait...");
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.log_line("The log was cleared.");
    }

    /// Capture button: waits for the hotkey to snapshot the cursor.
    pub fn begin_capture(&mut self) {
        if self.can_capture() {
            self.state.capturing_position = true;
        }
    }

    fn poll_capture(&mut self) {
        if !self.state.capturing_position || !self.backend.is_key_down(self.hotkey_vk) {
            return;
        }
        self.state.capturing_position = false;

        match self.backend.cursor_position() {
            Ok(Point { x, y }) => {
                self.state.coordinates = [x, y];
                self.state.publish_target();
                self.log_line(format!(
                    "Captured mouse coordinates and auto-filled coords section. (X={}, Y={})",
                    x, y
                ));
            }
            Err(e) => self.log_line(format!("{:#}", e)),
        }
    }

    /// Detects the worker's completion and restores the start-ready state.
    fn track_worker_exit(&mut self) {
        let completed = self.state.shared.run.is_completed();

        if self.state.awaiting_exit {
            self.state.prev_awaiting_exit = true;
            self.state.awaiting_exit = !completed;
        }

        if !self.state.awaiting_exit && self.state.prev_awaiting_exit {
            self.state.prev_awaiting_exit = false;
            self.finish_run();
        } else if completed
            && !self.state.awaiting_exit
            && !self.controls.is_clickable(Button::Start)
        {
            // Worker exited on its own (hotkey)
            self.finish_run();
        }
    }

    fn finish_run(&mut self) {
        self.drain_notices();
        self.controls.enable_inputs();
        self.controls.show_idle();
        if let Some(handle) = self.worker.take() {
            handle.release(&self.logger);
        }
        self.state.shared.run.reset();
    }

    fn drain_notices(&mut self) {
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.log_line(notice.message());
        }
    }
}
