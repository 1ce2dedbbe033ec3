//! Global hotkey handler.
//!
//! Registers the recording and playback hotkeys and turns their events into
//! [`AppCommand`]s. Recording starts on the *release* of the recording
//! hotkey so the key is already up when the capture hook is installed;
//! stopping is left to the recorder's own control action.

use crate::{AppCommand, AppError, AppResult, AppState, config::HotkeyConfig};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use error_location::ErrorLocation;
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey},
};
use key_scripter_core::VirtualKey;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Registration IDs of the two global hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyIds {
    /// ID of the recording hotkey.
    pub record: u32,
    /// ID of the playback hotkey.
    pub playback: u32,
}

/// Map a virtual key to the code `global-hotkey` registers.
///
/// Only keys that make sense as a bare, unmodified global hotkey are
/// supported.
#[track_caller]
pub fn hotkey_code(key: VirtualKey) -> AppResult<Code> {
    use VirtualKey as V;

    let code = match key {
        V::F1 => Code::F1,
        V::F2 => Code::F2,
        V::F3 => Code::F3,
        V::F4 => Code::F4,
        V::F5 => Code::F5,
        V::F6 => Code::F6,
        V::F7 => Code::F7,
        V::F8 => Code::F8,
        V::F9 => Code::F9,
        V::F10 => Code::F10,
        V::F11 => Code::F11,
        V::F12 => Code::F12,
        V::F13 => Code::F13,
        V::F14 => Code::F14,
        V::F15 => Code::F15,
        V::F16 => Code::F16,
        V::F17 => Code::F17,
        V::F18 => Code::F18,
        V::F19 => Code::F19,
        V::F20 => Code::F20,
        V::F21 => Code::F21,
        V::F22 => Code::F22,
        V::F23 => Code::F23,
        V::F24 => Code::F24,
        V::Pause => Code::Pause,
        V::Scroll => Code::ScrollLock,
        V::Snapshot => Code::PrintScreen,
        V::Insert => Code::Insert,
        V::Home => Code::Home,
        V::End => Code::End,
        V::Prior => Code::PageUp,
        V::Next => Code::PageDown,
        V::NumPad0 => Code::Numpad0,
        V::NumPad1 => Code::Numpad1,
        V::NumPad2 => Code::Numpad2,
        V::NumPad3 => Code::Numpad3,
        V::NumPad4 => Code::Numpad4,
        V::NumPad5 => Code::Numpad5,
        V::NumPad6 => Code::Numpad6,
        V::NumPad7 => Code::Numpad7,
        V::NumPad8 => Code::Numpad8,
        V::NumPad9 => Code::Numpad9,
        other => {
            return Err(AppError::HotkeyRegistrationFailed {
                reason: format!("{} cannot be used as a global hotkey", other),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    Ok(code)
}

/// Global hotkey handler.
pub struct HotkeyHandler {
    ids: HotkeyIds,
    state: Arc<Mutex<AppState>>,
    command_tx: mpsc::Sender<AppCommand>,
    /// Set when the recording hotkey goes down while idle.
    record_armed: AtomicBool,
}

impl HotkeyHandler {
    /// Register both configured hotkeys, without modifiers.
    ///
    /// Must be called on a thread with a message pump so that `WM_HOTKEY`
    /// messages are dispatched on Windows. The returned
    /// [`GlobalHotKeyManager`] must be kept alive on that thread for the
    /// hotkeys to remain registered.
    #[track_caller]
    #[instrument(skip(config))]
    pub fn register_hotkeys(config: &HotkeyConfig) -> AppResult<(GlobalHotKeyManager, HotkeyIds)> {
        let record_key = config.record_key()?;
        let playback_key = config.playback_key()?;

        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let record = HotKey::new(None, hotkey_code(record_key)?);
        let playback = HotKey::new(None, hotkey_code(playback_key)?);

        for (key, hotkey) in [(record_key, record), (playback_key, playback)] {
            manager
                .register(hotkey)
                .map_err(|e| AppError::HotkeyRegistrationFailed {
                    reason: format!("Failed to register {}: {}", key, e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        info!(
            record = %record_key,
            playback = %playback_key,
            "Global hotkeys registered"
        );

        Ok((
            manager,
            HotkeyIds {
                record: record.id(),
                playback: playback.id(),
            },
        ))
    }

    /// Create a handler for previously registered hotkeys.
    ///
    /// The handler is `Send` and can live on any thread; it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(
        ids: HotkeyIds,
        state: Arc<Mutex<AppState>>,
        command_tx: mpsc::Sender<AppCommand>,
    ) -> Self {
        Self {
            ids,
            state,
            command_tx,
            record_armed: AtomicBool::new(false),
        }
    }

    /// Run the hotkey handler event loop until shutdown is signalled.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // GlobalHotKeyEvent::receiver() is a blocking crossbeam receiver;
        // one blocking task forwards its events. It exits on the first
        // failed send after event_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if let Err(e) = self.handle_hotkey(event.id, event.state).await {
                        warn!(error = ?e, "Failed to handle hotkey");
                    }
                }
            }
        }

        drop(event_rx);

        // The forwarder may be parked in recv() until another hotkey event.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// React to one hotkey transition.
    #[instrument(skip(self))]
    pub async fn handle_hotkey(&self, id: u32, key_state: HotKeyState) -> AppResult<()> {
        if id == self.ids.record {
            self.handle_record_hotkey(key_state).await
        } else if id == self.ids.playback {
            if matches!(key_state, HotKeyState::Pressed) {
                self.send(AppCommand::TogglePlayback).await?;
            }
            Ok(())
        } else {
            debug!(id, "Ignoring unknown hotkey");
            Ok(())
        }
    }

    async fn handle_record_hotkey(&self, key_state: HotKeyState) -> AppResult<()> {
        let idle = self.state.lock().await.is_idle();

        match key_state {
            HotKeyState::Pressed => {
                // While recording, the capture hook owns this key.
                self.record_armed.store(idle, Ordering::SeqCst);
            }
            HotKeyState::Released => {
                let armed = self.record_armed.swap(false, Ordering::SeqCst);
                if armed && idle {
                    let session_id = Uuid::new_v4();
                    self.send(AppCommand::StartRecording { session_id }).await?;
                    debug!(session_id = %session_id, "Recording requested");
                }
            }
        }

        Ok(())
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", e.0, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
