use crate::{
    CoreResult, MacroError, Transition, VirtualKey,
    playback::{KeyInjector, TargetWindow},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::trace;

/// Injector backed by the operating system's input APIs.
///
/// On Windows this uses `SetForegroundWindow`, `SendInput` and
/// `PostMessageW`. Elsewhere synthetic input goes through `enigo`, focus
/// requests always succeed, and message posting is unsupported.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeInjector;

impl NativeInjector {
    /// Create an injector.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "windows")]
impl KeyInjector for NativeInjector {
    fn ensure_foreground(&mut self, window: TargetWindow) -> bool {
        use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, SetForegroundWindow};

        let hwnd = window.hwnd();
        if unsafe { GetForegroundWindow() } == hwnd {
            return true;
        }
        unsafe { SetForegroundWindow(hwnd) }.as_bool()
    }

    #[track_caller]
    fn send_input(&mut self, key: VirtualKey, transition: Transition) -> CoreResult<()> {
        use windows::Win32::UI::Input::KeyboardAndMouse::{
            INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP,
            SendInput, VIRTUAL_KEY,
        };

        let flags = match transition {
            Transition::Down => KEYBD_EVENT_FLAGS(0),
            Transition::Up => KEYEVENTF_KEYUP,
        };

        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(u16::from(key.code())),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };

        let inserted = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if inserted == 0 {
            return Err(MacroError::InjectionFailed {
                reason: format!("SendInput rejected {:?} {}", transition, key),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        trace!(%key, ?transition, "SendInput delivered");
        Ok(())
    }

    #[track_caller]
    fn post_message(
        &mut self,
        window: TargetWindow,
        key: VirtualKey,
        transition: Transition,
    ) -> CoreResult<()> {
        use crate::playback::transition_lparam;
        use windows::Win32::{
            Foundation::{LPARAM, WPARAM},
            UI::{
                Input::KeyboardAndMouse::{MAPVK_VK_TO_VSC_EX, MapVirtualKeyW},
                WindowsAndMessaging::{PostMessageW, WM_KEYDOWN, WM_KEYUP},
            },
        };

        let scan_code = unsafe { MapVirtualKeyW(u32::from(key.code()), MAPVK_VK_TO_VSC_EX) };
        let message = match transition {
            Transition::Down => WM_KEYDOWN,
            Transition::Up => WM_KEYUP,
        };
        let lparam = transition_lparam(scan_code, transition) as i32 as isize;

        unsafe {
            PostMessageW(
                window.hwnd(),
                message,
                WPARAM(usize::from(key.code())),
                LPARAM(lparam),
            )
        }
        .map_err(|e| MacroError::InjectionFailed {
            reason: format!("PostMessageW to {} failed: {}", window, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        trace!(%key, ?transition, %window, "Keyboard message posted");
        Ok(())
    }
}

#[cfg(not(target_os = "windows"))]
impl KeyInjector for NativeInjector {
    fn ensure_foreground(&mut self, _window: TargetWindow) -> bool {
        true
    }

    #[track_caller]
    fn send_input(&mut self, key: VirtualKey, transition: Transition) -> CoreResult<()> {
        use enigo::{Direction, Enigo, Keyboard, Settings};

        // Enigo is not Send, so playback creates one per transition.
        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| MacroError::InjectionFailed {
                reason: format!("Failed to create Enigo: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let direction = match transition {
            Transition::Down => Direction::Press,
            Transition::Up => Direction::Release,
        };

        enigo
            .key(enigo_key(key), direction)
            .map_err(|e| MacroError::InjectionFailed {
                reason: format!("Failed to send {:?} {}: {}", transition, key, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        trace!(%key, ?transition, "Synthetic key delivered");
        Ok(())
    }

    #[track_caller]
    fn post_message(
        &mut self,
        window: TargetWindow,
        key: VirtualKey,
        transition: Transition,
    ) -> CoreResult<()> {
        Err(MacroError::InjectionFailed {
            reason: format!(
                "Posting {:?} {} to window {} requires Windows",
                transition, key, window
            ),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[cfg(not(target_os = "windows"))]
fn enigo_key(key: VirtualKey) -> enigo::Key {
    use enigo::Key;

    match key {
        VirtualKey::Back => Key::Backspace,
        VirtualKey::Tab => Key::Tab,
        VirtualKey::Return => Key::Return,
        VirtualKey::Shift | VirtualKey::LShift | VirtualKey::RShift => Key::Shift,
        VirtualKey::Control | VirtualKey::LControl | VirtualKey::RControl => Key::Control,
        VirtualKey::Menu | VirtualKey::LMenu | VirtualKey::RMenu => Key::Alt,
        VirtualKey::Capital => Key::CapsLock,
        VirtualKey::Escape => Key::Escape,
        VirtualKey::Space => Key::Space,
        VirtualKey::Prior => Key::PageUp,
        VirtualKey::Next => Key::PageDown,
        VirtualKey::End => Key::End,
        VirtualKey::Home => Key::Home,
        VirtualKey::Left => Key::LeftArrow,
        VirtualKey::Up => Key::UpArrow,
        VirtualKey::Right => Key::RightArrow,
        VirtualKey::Down => Key::DownArrow,
        VirtualKey::Delete => Key::Delete,
        VirtualKey::LWin | VirtualKey::RWin => Key::Meta,
        VirtualKey::F1 => Key::F1,
        VirtualKey::F2 => Key::F2,
        VirtualKey::F3 => Key::F3,
        VirtualKey::F4 => Key::F4,
        VirtualKey::F5 => Key::F5,
        VirtualKey::F6 => Key::F6,
        VirtualKey::F7 => Key::F7,
        VirtualKey::F8 => Key::F8,
        VirtualKey::F9 => Key::F9,
        VirtualKey::F10 => Key::F10,
        VirtualKey::F11 => Key::F11,
        VirtualKey::F12 => Key::F12,
        other => {
            let code = other.code();
            if other.name().len() == 1 || (b'0'..=b'9').contains(&code) {
                // Letters and digits share their ASCII code.
                Key::Unicode(char::from(code).to_ascii_lowercase())
            } else {
                Key::Other(u32::from(code))
            }
        }
    }
}
