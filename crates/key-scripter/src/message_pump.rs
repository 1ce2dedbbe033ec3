//! Main-thread message loop.
//!
//! On Windows `global-hotkey` delivers `WM_HOTKEY` to the thread that
//! registered the hotkeys, so that thread must run a message loop for the
//! life of the app. Elsewhere the pump just parks until it is told to quit.

#[cfg(not(target_os = "windows"))]
use std::sync::mpsc;

use tracing::{debug, warn};

#[cfg(target_os = "windows")]
use windows::Win32::{
    Foundation::{LPARAM, WPARAM},
    System::Threading::GetCurrentThreadId,
    UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, MSG, PM_NOREMOVE, PeekMessageW, PostThreadMessageW,
        TranslateMessage, WM_QUIT, WM_USER,
    },
};

/// Message loop owned by the thread that created it.
pub struct MessagePump {
    #[cfg(not(target_os = "windows"))]
    quit_rx: mpsc::Receiver<()>,
}

/// Ends a [`MessagePump::run`] from any thread.
#[derive(Clone)]
pub struct QuitHandle {
    #[cfg(target_os = "windows")]
    thread_id: u32,
    #[cfg(not(target_os = "windows"))]
    quit_tx: mpsc::Sender<()>,
}

impl MessagePump {
    /// Create a pump for the calling thread.
    #[cfg(target_os = "windows")]
    pub fn new() -> (Self, QuitHandle) {
        let mut msg = MSG::default();
        // Force the queue into existence so a quit posted before run() is kept.
        let _ = unsafe { PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE) };
        let thread_id = unsafe { GetCurrentThreadId() };

        (Self {}, QuitHandle { thread_id })
    }

    /// Create a pump for the calling thread.
    #[cfg(not(target_os = "windows"))]
    pub fn new() -> (Self, QuitHandle) {
        let (quit_tx, quit_rx) = mpsc::channel();
        (Self { quit_rx }, QuitHandle { quit_tx })
    }

    /// Dispatch messages until [`QuitHandle::quit`] is called.
    #[cfg(target_os = "windows")]
    pub fn run(self) {
        let mut msg = MSG::default();
        loop {
            let result = unsafe { GetMessageW(&mut msg, None, 0, 0) }.0;
            if result == 0 {
                break;
            }
            if result < 0 {
                warn!("GetMessageW failed, leaving message loop");
                break;
            }
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        debug!("Message pump stopped");
    }

    /// Block until [`QuitHandle::quit`] is called.
    #[cfg(not(target_os = "windows"))]
    pub fn run(self) {
        if self.quit_rx.recv().is_err() {
            warn!("All quit handles dropped, leaving message loop");
        }
        debug!("Message pump stopped");
    }
}

impl QuitHandle {
    /// Ask the pump to return from `run`.
    #[cfg(target_os = "windows")]
    pub fn quit(&self) {
        if let Err(e) =
            unsafe { PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
        {
            warn!(error = %e, "Failed to post WM_QUIT to the main thread");
        }
    }

    /// Ask the pump to return from `run`.
    #[cfg(not(target_os = "windows"))]
    pub fn quit(&self) {
        if self.quit_tx.send(()).is_err() {
            debug!("Message pump already stopped");
        }
    }
}
