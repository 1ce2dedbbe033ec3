use crate::{
    CoreResult, KeyEventStream, MacroError,
    capture::{CaptureBackend, CaptureSink},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

#[cfg(target_os = "windows")]
use {
    crate::Transition,
    std::{
        cell::RefCell,
        sync::mpsc,
        thread::{self, JoinHandle},
    },
    tracing::warn,
    windows::Win32::{
        Foundation::{LPARAM, LRESULT, WPARAM},
        System::Threading::GetCurrentThreadId,
        UI::WindowsAndMessaging::{
            CallNextHookEx, DispatchMessageW, GetMessageW, HC_ACTION, KBDLLHOOKSTRUCT, MSG,
            PM_NOREMOVE, PeekMessageW, PostThreadMessageW, SetWindowsHookExW, TranslateMessage,
            UnhookWindowsHookEx, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_QUIT, WM_SYSKEYDOWN,
            WM_SYSKEYUP, WM_USER,
        },
    },
};

#[cfg(target_os = "windows")]
thread_local! {
    // Only the hook thread ever touches this.
    static ACTIVE_SINK: RefCell<Option<CaptureSink>> = const { RefCell::new(None) };
}

#[cfg(target_os = "windows")]
struct HookThread {
    thread_id: u32,
    handle: JoinHandle<KeyEventStream>,
}

/// Global low-level keyboard hook (`WH_KEYBOARD_LL`).
///
/// The hook lives on a dedicated thread that owns the sink and pumps its
/// message queue; low-level hooks are only called while the installing
/// thread is inside `GetMessageW`. Uninstalling posts `WM_QUIT` to that
/// thread, joins it, and returns the finished stream.
#[derive(Default)]
pub struct KeyboardHook {
    #[cfg(target_os = "windows")]
    worker: Option<HookThread>,
}

impl KeyboardHook {
    /// Create an idle hook.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_os = "windows")]
impl CaptureBackend for KeyboardHook {
    #[track_caller]
    #[instrument(skip_all)]
    fn install(&mut self, sink: CaptureSink) -> CoreResult<()> {
        if self.worker.is_some() {
            return Err(MacroError::AlreadyRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, String>>();

        let handle = thread::Builder::new()
            .name("key-capture".to_string())
            .spawn(move || run_hook_thread(sink, ready_tx))
            .map_err(|e| MacroError::CaptureSetupFailed {
                reason: format!("Failed to spawn capture thread: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                info!(thread_id, "Keyboard hook installed");
                self.worker = Some(HookThread { thread_id, handle });
                Ok(())
            }
            Ok(Err(reason)) => {
                let _ = handle.join();
                Err(MacroError::CaptureSetupFailed {
                    reason,
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            Err(_) => {
                let _ = handle.join();
                Err(MacroError::CaptureSetupFailed {
                    reason: "Capture thread exited before reporting readiness".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }

    #[track_caller]
    #[instrument(skip_all)]
    fn uninstall(&mut self) -> CoreResult<KeyEventStream> {
        let worker = self.worker.take().ok_or(MacroError::NotRecording {
            location: ErrorLocation::from(Location::caller()),
        })?;

        unsafe { PostThreadMessageW(worker.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }.map_err(
            |e| MacroError::CaptureTeardownFailed {
                reason: format!("Failed to signal capture thread: {}", e),
                location: ErrorLocation::from(Location::caller()),
            },
        )?;

        let stream = worker
            .handle
            .join()
            .map_err(|_| MacroError::CaptureTeardownFailed {
                reason: "Capture thread panicked".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(event_count = stream.len(), "Keyboard hook removed");

        Ok(stream)
    }
}

#[cfg(not(target_os = "windows"))]
impl CaptureBackend for KeyboardHook {
    #[track_caller]
    #[instrument(skip_all)]
    fn install(&mut self, _sink: CaptureSink) -> CoreResult<()> {
        debug!("Global keyboard capture is not available on this platform");
        Err(MacroError::CaptureSetupFailed {
            reason: "Low-level keyboard hooks require Windows".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    #[instrument(skip_all)]
    fn uninstall(&mut self) -> CoreResult<KeyEventStream> {
        info!("No keyboard hook to remove");
        Err(MacroError::NotRecording {
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[cfg(target_os = "windows")]
fn run_hook_thread(sink: CaptureSink, ready: mpsc::Sender<Result<u32, String>>) -> KeyEventStream {
    ACTIVE_SINK.with(|cell| *cell.borrow_mut() = Some(sink));

    let mut msg = MSG::default();
    // Force the message queue into existence so WM_QUIT can be posted to us.
    let _ = unsafe { PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE) };

    let hook = match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_proc), None, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(format!("SetWindowsHookExW failed: {}", e)));
            return take_sink_stream();
        }
    };

    let thread_id = unsafe { GetCurrentThreadId() };
    if ready.send(Ok(thread_id)).is_err() {
        let _ = unsafe { UnhookWindowsHookEx(hook) };
        return take_sink_stream();
    }

    // 0 means WM_QUIT, -1 means the queue is broken; stop on either.
    while unsafe { GetMessageW(&mut msg, None, 0, 0) }.0 > 0 {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    if let Err(e) = unsafe { UnhookWindowsHookEx(hook) } {
        warn!(error = %e, "UnhookWindowsHookEx failed");
    }

    take_sink_stream()
}

#[cfg(target_os = "windows")]
fn take_sink_stream() -> KeyEventStream {
    ACTIVE_SINK
        .with(|cell| cell.borrow_mut().take())
        .map(CaptureSink::into_stream)
        .unwrap_or_default()
}

#[cfg(target_os = "windows")]
unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 {
        let transition = match wparam.0 as u32 {
            WM_KEYDOWN | WM_SYSKEYDOWN => Some(Transition::Down),
            WM_KEYUP | WM_SYSKEYUP => Some(Transition::Up),
            _ => None,
        };

        if let Some(transition) = transition {
            let info = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };
            ACTIVE_SINK.with(|cell| {
                if let Ok(mut slot) = cell.try_borrow_mut() {
                    if let Some(sink) = slot.as_mut() {
                        sink.handle(info.vkCode, transition);
                    }
                }
            });
        }
    }

    // Never swallow input.
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}
