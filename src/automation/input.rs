//! Synthetic mouse input sequences.
//!
//! Translates a logical click (button, click kind, target point) into the
//! ordered press/release records that are handed to the OS injection
//! facility. Nothing here touches the OS: the target point is resolved by the
//! caller, which keeps the builder pure and testable.

/// `MOUSEEVENTF_*` flag values as defined by the Win32 `MOUSEINPUT` structure.
pub const MOUSEEVENTF_LEFTDOWN: u32 = 0x0002;
pub const MOUSEEVENTF_LEFTUP: u32 = 0x0004;
pub const MOUSEEVENTF_RIGHTDOWN: u32 = 0x0008;
pub const MOUSEEVENTF_RIGHTUP: u32 = 0x0010;
pub const MOUSEEVENTF_XDOWN: u32 = 0x0080;
pub const MOUSEEVENTF_XUP: u32 = 0x0100;

/// `mouseData` values selecting the side button for X events.
pub const XBUTTON1: u32 = 0x0001;
pub const XBUTTON2: u32 = 0x0002;

/// A point in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// (0, 0) means "click wherever the cursor is".
    pub fn is_origin(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Number of press/release pairs per logical click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClickKind {
    #[default]
    Single,
    Double,
}

impl ClickKind {
    pub const ALL: [ClickKind; 2] = [ClickKind::Single, ClickKind::Double];

    pub fn label(self) -> &'static str {
        match self {
            ClickKind::Single => "Single Click",
            ClickKind::Double => "Double Click",
        }
    }

    /// Press/release pairs emitted per click; also the stats increment.
    pub fn presses(self) -> u64 {
        match self {
            ClickKind::Single => 1,
            ClickKind::Double => 2,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

/// Physical mouse button to simulate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    /// Upper side button (XBUTTON2, usually "forward").
    SideTop,
    /// Lower side button (XBUTTON1, usually "back").
    SideBottom,
}

/// OS codes for one button: flags for the press and release records and the
/// `mouseData` value they carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonCodes {
    pub down: u32,
    pub up: u32,
    pub data: u32,
}

impl MouseButton {
    pub const ALL: [MouseButton; 4] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::SideTop,
        MouseButton::SideBottom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MouseButton::Left => "Left",
            MouseButton::Right => "Right",
            MouseButton::SideTop => "Side (Top)",
            MouseButton::SideBottom => "Side (Bottom)",
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|button| button.code() == code)
    }

    /// Index into per-button tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn os_codes(self) -> ButtonCodes {
        match self {
            MouseButton::Left => ButtonCodes {
                down: MOUSEEVENTF_LEFTDOWN,
                up: MOUSEEVENTF_LEFTUP,
                data: 0,
            },
            MouseButton::Right => ButtonCodes {
                down: MOUSEEVENTF_RIGHTDOWN,
                up: MOUSEEVENTF_RIGHTUP,
                data: 0,
            },
            MouseButton::SideTop => ButtonCodes {
                down: MOUSEEVENTF_XDOWN,
                up: MOUSEEVENTF_XUP,
                data: XBUTTON2,
            },
            MouseButton::SideBottom => ButtonCodes {
                down: MOUSEEVENTF_XDOWN,
                up: MOUSEEVENTF_XUP,
                data: XBUTTON1,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    Press,
    Release,
}

/// How a record places the pointer before pressing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Positioning {
    /// Button event only; the pointer stays where it is.
    Cursor,
    /// Move to `point` on the virtual desktop first.
    Absolute,
}

/// One low-level mouse record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputRecord {
    pub action: ButtonAction,
    pub button: MouseButton,
    /// Target in screen coordinates. For `Positioning::Cursor` this is where
    /// the cursor was read, kept for diagnostics.
    pub point: Point,
    pub positioning: Positioning,
    /// `MOUSEEVENTF_*` button flag for this record.
    pub flags: u32,
    /// `mouseData` (side-button selector, otherwise 0).
    pub mouse_data: u32,
}

/// Builds the record sequence for one logical click at `point`:
/// press, release (and again for a double click).
pub fn build_click(
    button: MouseButton,
    kind: ClickKind,
    point: Point,
    positioning: Positioning,
) -> Vec<InputRecord> {
    let codes = button.os_codes();
    let record = |action, flags| InputRecord {
        action,
        button,
        point,
        positioning,
        flags,
        mouse_data: codes.data,
    };

    (0..kind.presses())
        .flat_map(|_| {
            [
                record(ButtonAction::Press, codes.down),
                record(ButtonAction::Release, codes.up),
            ]
        })
        .collect()
}

/// Decodes the numeric button/kind codes a worker was configured with.
///
/// `None` means one of the codes is not recognized; the caller logs a
/// warning and sends nothing.
pub fn decode_action(button_code: u8, kind_code: u8) -> Option<(MouseButton, ClickKind)> {
    Some((
        MouseButton::from_code(button_code)?,
        ClickKind::from_code(kind_code)?,
    ))
}
