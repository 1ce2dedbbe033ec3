use crate::{CoreResult, MacroError};

use std::{fmt, panic::Location};

use error_location::ErrorLocation;

/// Non-zero native window handle that playback is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetWindow(isize);

impl TargetWindow {
    /// Wrap a raw handle. Zero is rejected with `InvalidWindowHandle`.
    #[track_caller]
    pub fn new(raw: isize) -> CoreResult<Self> {
        if raw == 0 {
            return Err(MacroError::InvalidWindowHandle {
                handle: raw,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(Self(raw))
    }

    /// The raw handle value.
    pub fn raw(self) -> isize {
        self.0
    }

    /// The window that currently has keyboard focus.
    #[cfg(target_os = "windows")]
    #[track_caller]
    pub fn foreground() -> CoreResult<Self> {
        use windows::Win32::UI::WindowsAndMessaging::GetForegroundWindow;

        let hwnd = unsafe { GetForegroundWindow() };
        Self::new(hwnd.0)
    }

    /// There is no native handle to target on this platform.
    #[cfg(not(target_os = "windows"))]
    #[track_caller]
    pub fn foreground() -> CoreResult<Self> {
        Self::new(0)
    }

    #[cfg(target_os = "windows")]
    pub(crate) fn hwnd(self) -> windows::Win32::Foundation::HWND {
        windows::Win32::Foundation::HWND(self.0)
    }
}

impl fmt::Display for TargetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
