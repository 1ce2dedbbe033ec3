use crate::{CoreResult, MacroError};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Declares [`VirtualKey`] together with its code and name lookup tables.
///
/// Entries must be listed in ascending code order so the derived ordering
/// matches the numeric virtual-key space.
macro_rules! virtual_keys {
    ($($(#[$meta:meta])* $name:ident = $code:literal),+ $(,)?) => {
        /// Platform virtual-key code for a physical or logical key.
        ///
        /// The same numeric space is used for capture and playback, so a
        /// recorded key replays as exactly the key that was observed.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u8)]
        pub enum VirtualKey {
            $($(#[$meta])* #[allow(missing_docs)] $name = $code),+
        }

        impl VirtualKey {
            /// Every key in the model, ordered by virtual-key code.
            pub const ALL: &'static [VirtualKey] = &[$(VirtualKey::$name),+];

            /// Resolve a native virtual-key code. Unmapped codes return `None`.
            pub fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(VirtualKey::$name),)+
                    _ => None,
                }
            }

            /// Resolve a symbolic key name as it appears in macro text.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($name) => Some(VirtualKey::$name),)+
                    _ => None,
                }
            }

            /// Symbolic name used in rendered macro text.
            pub fn name(self) -> &'static str {
                match self {
                    $(VirtualKey::$name => stringify!($name)),+
                }
            }
        }
    };
}

virtual_keys! {
    Cancel = 0x03,
    Back = 0x08,
    Tab = 0x09,
    Clear = 0x0C,
    Return = 0x0D,
    Shift = 0x10,
    Control = 0x11,
    /// ALT key.
    Menu = 0x12,
    Pause = 0x13,
    /// CAPS LOCK key.
    Capital = 0x14,
    Kana = 0x15,
    Junja = 0x17,
    Final = 0x18,
    Kanji = 0x19,
    Escape = 0x1B,
    Convert = 0x1C,
    NonConvert = 0x1D,
    Accept = 0x1E,
    ModeChange = 0x1F,
    Space = 0x20,
    /// PAGE UP key.
    Prior = 0x21,
    /// PAGE DOWN key.
    Next = 0x22,
    End = 0x23,
    Home = 0x24,
    Left = 0x25,
    Up = 0x26,
    Right = 0x27,
    Down = 0x28,
    Select = 0x29,
    Print = 0x2A,
    Execute = 0x2B,
    /// PRINT SCREEN key.
    Snapshot = 0x2C,
    Insert = 0x2D,
    Delete = 0x2E,
    Help = 0x2F,
    D0 = 0x30,
    D1 = 0x31,
    D2 = 0x32,
    D3 = 0x33,
    D4 = 0x34,
    D5 = 0x35,
    D6 = 0x36,
    D7 = 0x37,
    D8 = 0x38,
    D9 = 0x39,
    A = 0x41,
    B = 0x42,
    C = 0x43,
    D = 0x44,
    E = 0x45,
    F = 0x46,
    G = 0x47,
    H = 0x48,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    L = 0x4C,
    M = 0x4D,
    N = 0x4E,
    O = 0x4F,
    P = 0x50,
    Q = 0x51,
    R = 0x52,
    S = 0x53,
    T = 0x54,
    U = 0x55,
    V = 0x56,
    W = 0x57,
    X = 0x58,
    Y = 0x59,
    Z = 0x5A,
    LWin = 0x5B,
    RWin = 0x5C,
    Apps = 0x5D,
    Sleep = 0x5F,
    NumPad0 = 0x60,
    NumPad1 = 0x61,
    NumPad2 = 0x62,
    NumPad3 = 0x63,
    NumPad4 = 0x64,
    NumPad5 = 0x65,
    NumPad6 = 0x66,
    NumPad7 = 0x67,
    NumPad8 = 0x68,
    NumPad9 = 0x69,
    Multiply = 0x6A,
    Add = 0x6B,
    Separator = 0x6C,
    Subtract = 0x6D,
    Decimal = 0x6E,
    Divide = 0x6F,
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,
    F13 = 0x7C,
    F14 = 0x7D,
    F15 = 0x7E,
    F16 = 0x7F,
    F17 = 0x80,
    F18 = 0x81,
    F19 = 0x82,
    F20 = 0x83,
    F21 = 0x84,
    F22 = 0x85,
    F23 = 0x86,
    F24 = 0x87,
    NumLock = 0x90,
    Scroll = 0x91,
    LShift = 0xA0,
    RShift = 0xA1,
    LControl = 0xA2,
    RControl = 0xA3,
    LMenu = 0xA4,
    RMenu = 0xA5,
    BrowserBack = 0xA6,
    BrowserForward = 0xA7,
    BrowserRefresh = 0xA8,
    BrowserStop = 0xA9,
    BrowserSearch = 0xAA,
    BrowserFavorites = 0xAB,
    BrowserHome = 0xAC,
    VolumeMute = 0xAD,
    VolumeDown = 0xAE,
    VolumeUp = 0xAF,
    MediaNextTrack = 0xB0,
    MediaPrevTrack = 0xB1,
    MediaStop = 0xB2,
    MediaPlayPause = 0xB3,
    LaunchMail = 0xB4,
    LaunchMediaSelect = 0xB5,
    LaunchApp1 = 0xB6,
    LaunchApp2 = 0xB7,
    /// `;:` on US layouts.
    Oem1 = 0xBA,
    Plus = 0xBB,
    Comma = 0xBC,
    Minus = 0xBD,
    Period = 0xBE,
    /// `/?` on US layouts.
    Oem2 = 0xBF,
    /// `` `~ `` on US layouts.
    Oem3 = 0xC0,
    /// `[{` on US layouts.
    Oem4 = 0xDB,
    /// `\|` on US layouts.
    Oem5 = 0xDC,
    /// `]}` on US layouts.
    Oem6 = 0xDD,
    /// `'"` on US layouts.
    Oem7 = 0xDE,
    Oem8 = 0xDF,
    Oem102 = 0xE2,
    ProcessKey = 0xE5,
    Packet = 0xE7,
    Attn = 0xF6,
    CrSel = 0xF7,
    ExSel = 0xF8,
    EraseEof = 0xF9,
    Play = 0xFA,
    Zoom = 0xFB,
    Pa1 = 0xFD,
    OemClear = 0xFE,
}

impl VirtualKey {
    /// Native virtual-key code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VirtualKey {
    type Err = MacroError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        VirtualKey::from_name(s.trim()).ok_or_else(|| MacroError::UnknownKey {
            name: s.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
