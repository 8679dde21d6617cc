//! OS input facilities used by the click worker and the UI controller.
//!
//! `InputBackend` is the seam between the automation core and the platform:
//! input injection, instantaneous key state, and the cursor position. The
//! Win32 implementation wraps `SendInput`, `GetAsyncKeyState` and
//! `GetCursorPos`; tests use a scripted double instead.

use anyhow::Result;
use std::sync::Arc;

use crate::automation::input::{InputRecord, Point};

/// Result of handing a batch of records to the OS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InjectOutcome {
    /// Records the OS accepted.
    pub accepted: usize,
    /// Last OS error code when fewer records were accepted than sent.
    pub os_error: u32,
}

/// Platform facilities needed to synthesize clicks.
pub trait InputBackend: Send + Sync {
    /// Injects `records` in order and reports how many were accepted.
    fn send_input(&self, records: &[InputRecord]) -> InjectOutcome;

    /// Returns true while the key with virtual-key code `vk` is held down.
    fn is_key_down(&self, vk: u16) -> bool;

    /// Returns the current cursor position in screen coordinates.
    fn cursor_position(&self) -> Result<Point>;
}

/// Returns the input backend for the current platform.
pub fn default_backend() -> Result<Arc<dyn InputBackend>> {
    #[cfg(windows)]
    {
        Ok(Arc::new(win32::Win32Input))
    }
    #[cfg(not(windows))]
    {
        Err(anyhow::anyhow!(
            "synthetic mouse input is only supported on Windows"
        ))
    }
}

/// Maps a screen coordinate to the 0..=65535 absolute range of a desktop
/// axis starting at `origin` and spanning `extent` pixels.
///
/// Rounds up so the OS, which maps back with `floor(v * extent / 65536)`,
/// lands on the same pixel. Coordinates off the desktop are clamped.
#[cfg_attr(not(windows), allow(dead_code))]
pub fn normalize_absolute(coord: i32, origin: i32, extent: i32) -> i32 {
    let extent = i64::from(extent.max(1));
    let offset = (i64::from(coord) - i64::from(origin)).clamp(0, extent - 1);
    ((offset * 65536 + extent - 1) / extent).min(65535) as i32
}

#[cfg(windows)]
mod win32 {
    use anyhow::{anyhow, Result};

    use windows::Win32::Foundation::{GetLastError, POINT};
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        GetAsyncKeyState, SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_ABSOLUTE,
        MOUSEEVENTF_MOVE, MOUSEEVENTF_VIRTUALDESK, MOUSEINPUT, MOUSE_EVENT_FLAGS,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        GetCursorPos, GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN,
        SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN,
    };

    use super::{normalize_absolute, InjectOutcome, InputBackend};
    use crate::automation::input::{InputRecord, Point, Positioning};

    /// Win32 implementation of [`InputBackend`].
    pub struct Win32Input;

    fn to_mouse_input(record: &InputRecord) -> MOUSEINPUT {
        let button_flags = MOUSE_EVENT_FLAGS(record.flags);
        match record.positioning {
            Positioning::Cursor => MOUSEINPUT {
                mouseData: record.mouse_data as _,
                dwFlags: button_flags,
                ..Default::default()
            },
            Positioning::Absolute => {
                let (left, top, width, height) = unsafe {
                    (
                        GetSystemMetrics(SM_XVIRTUALSCREEN),
                        GetSystemMetrics(SM_YVIRTUALSCREEN),
                        GetSystemMetrics(SM_CXVIRTUALSCREEN),
                        GetSystemMetrics(SM_CYVIRTUALSCREEN),
                    )
                };
                MOUSEINPUT {
                    dx: normalize_absolute(record.point.x, left, width),
                    dy: normalize_absolute(record.point.y, top, height),
                    mouseData: record.mouse_data as _,
                    dwFlags: button_flags
                        | MOUSEEVENTF_MOVE
                        | MOUSEEVENTF_ABSOLUTE
                        | MOUSEEVENTF_VIRTUALDESK,
                    ..Default::default()
                }
            }
        }
    }

    impl InputBackend for Win32Input {
        fn send_input(&self, records: &[InputRecord]) -> InjectOutcome {
            if records.is_empty() {
                return InjectOutcome {
                    accepted: 0,
                    os_error: 0,
                };
            }

            let inputs: Vec<INPUT> = records
                .iter()
                .map(|record| INPUT {
                    r#type: INPUT_MOUSE,
                    Anonymous: INPUT_0 {
                        mi: to_mouse_input(record),
                    },
                })
                .collect();

            let accepted =
                unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) } as usize;
            let os_error = if accepted == inputs.len() {
                0
            } else {
                unsafe { GetLastError() }.0
            };

            InjectOutcome { accepted, os_error }
        }

        fn is_key_down(&self, vk: u16) -> bool {
            let state = unsafe { GetAsyncKeyState(vk as i32) };
            // High bit set = key is down right now
            state < 0
        }

        fn cursor_position(&self) -> Result<Point> {
            let mut pt = POINT::default();
            unsafe { GetCursorPos(&mut pt) }.map_err(|e| {
                anyhow!(
                    "GetCursorPos() returned FALSE. (GetLastError() = 0x{:x})",
                    e.code().0 as u32
                )
            })?;
            Ok(Point::new(pt.x, pt.y))
        }
    }
}

#[cfg(test)]
pub mod mock {
    //! Scripted input backend for tests.

    use anyhow::{anyhow, Result};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;

    use super::{InjectOutcome, InputBackend};
    use crate::automation::input::{InputRecord, Point};

    /// Records every batch it is given and replays scripted key/cursor state.
    #[derive(Default)]
    pub struct MockInput {
        batches: Mutex<Vec<Vec<InputRecord>>>,
        batch_times: Mutex<Vec<Instant>>,
        cursor: Mutex<Option<Point>>,
        key_down: AtomicBool,
        key_polls: AtomicUsize,
        accept_limit: Mutex<Option<usize>>,
    }

    impl MockInput {
        pub fn with_cursor(point: Point) -> Self {
            let mock = Self::default();
            mock.set_cursor(point);
            mock
        }

        pub fn set_cursor(&self, point: Point) {
            *self.cursor.lock().unwrap() = Some(point);
        }

        pub fn set_key_down(&self, down: bool) {
            self.key_down.store(down, Ordering::SeqCst);
        }

        /// Accept at most `limit` records per batch.
        pub fn limit_accepted(&self, limit: Option<usize>) {
            *self.accept_limit.lock().unwrap() = limit;
        }

        pub fn batches(&self) -> Vec<Vec<InputRecord>> {
            self.batches.lock().unwrap().clone()
        }

        /// When each batch was handed over, in order.
        pub fn batch_times(&self) -> Vec<Instant> {
            self.batch_times.lock().unwrap().clone()
        }

        pub fn batch_count(&self) -> usize {
            self.batches.lock().unwrap().len()
        }

        pub fn key_polls(&self) -> usize {
            self.key_polls.load(Ordering::SeqCst)
        }
    }

    impl InputBackend for MockInput {
        fn send_input(&self, records: &[InputRecord]) -> InjectOutcome {
            self.batches.lock().unwrap().push(records.to_vec());
            self.batch_times.lock().unwrap().push(Instant::now());
            let accepted = match *self.accept_limit.lock().unwrap() {
                Some(limit) => records.len().min(limit),
                None => records.len(),
            };
            let os_error = if accepted == records.len() { 0 } else { 87 };
            InjectOutcome { accepted, os_error }
        }

        fn is_key_down(&self, _vk: u16) -> bool {
            self.key_polls.fetch_add(1, Ordering::SeqCst);
            self.key_down.load(Ordering::SeqCst)
        }

        fn cursor_position(&self) -> Result<Point> {
            self.cursor
                .lock()
                .unwrap()
                .ok_or_else(|| anyhow!("GetCursorPos() returned FALSE. (GetLastError() = 0x5)"))
        }
    }
}
