use crate::{AppCommand, AppError, AppResult, AppState, OutputHandler, config::Config};

use std::{fs, panic::Location, path::Path, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use key_scripter_core::{
    ControlHotkeyMap, KeyInjector, MacroProgram, PlaybackEngine, Recorder, StopHandle,
    TargetWindow,
};
use tokio::{
    sync::{Mutex, mpsc, watch},
    task::JoinHandle,
    time::Instant,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Main application state machine.
///
/// Runs on the async runtime thread and is the only place that changes
/// [`AppState`]. The hotkey handler reads the shared state to decide which
/// command to send; the recorder's control action and the playback task
/// report back through the same command channel.
pub struct App {
    config: Config,
    state: Arc<Mutex<AppState>>,
    recorder: Option<Recorder>,
    engine: Arc<Mutex<PlaybackEngine>>,
    stop_handle: StopHandle,
    playback_cancel: Option<CancellationToken>,
    playback_task: Option<JoinHandle<()>>,
    output_handler: OutputHandler,
    last_macro: Option<String>,
    command_tx: mpsc::Sender<AppCommand>,
    command_rx: mpsc::Receiver<AppCommand>,
    shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Create the app around the shared state and its command channel.
    pub fn new(
        config: Config,
        state: Arc<Mutex<AppState>>,
        command_tx: mpsc::Sender<AppCommand>,
        command_rx: mpsc::Receiver<AppCommand>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        let engine = PlaybackEngine::new();
        let stop_handle = engine.stop_handle();

        Self {
            config,
            state,
            recorder: None,
            engine: Arc::new(Mutex::new(engine)),
            stop_handle,
            playback_cancel: None,
            playback_task: None,
            output_handler: OutputHandler::new(),
            last_macro: None,
            command_tx,
            command_rx,
            shutdown_tx,
        }
    }

    /// Run the main application event loop until shutdown.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> AppResult<()> {
        info!("Key-Scripter starting");

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd).await {
                        break;
                    }
                }

                result = tokio::signal::ctrl_c() => {
                    match result {
                        Ok(()) => info!("Ctrl+C received"),
                        Err(e) => error!(error = ?e, "Failed to listen for Ctrl+C"),
                    }
                    break;
                }
            }
        }

        self.shutdown().await;

        let _ = self.shutdown_tx.send(true);
        info!("Key-Scripter shut down successfully");

        Ok(())
    }

    /// Apply one command. Returns `false` when the app should exit.
    pub(crate) async fn handle_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::StartRecording { session_id } => {
                if let Err(e) = self.start_recording(session_id).await {
                    error!(session_id = %session_id, error = ?e, "Failed to start recording");
                }
            }
            AppCommand::StopRecording { session_id } => {
                if let Err(e) = self.stop_recording(session_id).await {
                    error!(session_id = %session_id, error = ?e, "Failed to finish recording");
                }
            }
            AppCommand::TogglePlayback => {
                if let Err(e) = self.toggle_playback().await {
                    error!(error = ?e, "Failed to toggle playback");
                }
            }
            AppCommand::PlaybackFinished { session_id } => {
                self.finish_playback(session_id).await;
            }
            AppCommand::Shutdown => {
                info!("Shutdown requested");
                return false;
            }
        }
        true
    }

    /// Install the capture hook for a new session.
    #[instrument(skip(self))]
    async fn start_recording(&mut self, session_id: Uuid) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.is_idle() {
            debug!(state = ?*state, "Ignoring start request, app is busy");
            return Ok(());
        }

        let record_key = self.config.hotkeys.record_key()?;
        let playback_key = self.config.hotkeys.playback_key()?;

        // Runs on the capture thread, so it must not block.
        let command_tx = self.command_tx.clone();
        let controls = ControlHotkeyMap::new()
            .bind(record_key, move || {
                if let Err(e) = command_tx.try_send(AppCommand::StopRecording { session_id }) {
                    warn!(session_id = %session_id, error = %e, "Failed to request recording stop");
                }
            })
            .reserve(playback_key);

        let mut recorder =
            Recorder::new(controls).with_render_options(self.config.script.render_options());
        recorder.start_recording()?;

        self.recorder = Some(recorder);
        *state = AppState::Recording {
            session_id,
            started_at: std::time::Instant::now(),
        };

        info!(session_id = %session_id, stop_key = %record_key, "Recording started");

        Ok(())
    }

    /// Remove the capture hook and deliver the rendered macro.
    #[instrument(skip(self))]
    async fn stop_recording(&mut self, session_id: Uuid) -> AppResult<()> {
        let started_at = {
            let mut state = self.state.lock().await;
            let started_at = match *state {
                AppState::Recording {
                    session_id: current,
                    started_at,
                } if current == session_id => started_at,
                _ => {
                    debug!(state = ?*state, "Ignoring stop for a session that is not recording");
                    return Ok(());
                }
            };
            *state = AppState::Idle;
            started_at
        };

        let mut recorder = self.recorder.take().ok_or_else(|| AppError::NoMacro {
            reason: "Recording state had no recorder".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let text = recorder.stop_recording()?;

        info!(
            session_id = %session_id,
            duration_ms = started_at.elapsed().as_millis() as u64,
            line_count = text.lines().count(),
            "Recording stopped"
        );

        if text.is_empty() {
            info!(session_id = %session_id, "Nothing was recorded, keeping previous macro");
            return Ok(());
        }

        self.last_macro = Some(text.clone());

        let path = self.config.macro_path()?;
        self.output_handler
            .output_macro(&text, &path, self.config.behavior.copy_to_clipboard)
    }

    /// Start playback when idle, stop it while playing.
    #[instrument(skip(self))]
    async fn toggle_playback(&mut self) -> AppResult<()> {
        let mut state = self.state.lock().await;

        match *state {
            AppState::Recording { session_id, .. } => {
                debug!(session_id = %session_id, "Ignoring playback toggle while recording");
                Ok(())
            }
            AppState::Playing { session_id } => {
                if let Some(cancel) = self.playback_cancel.as_ref() {
                    cancel.cancel();
                }
                self.stop_handle.stop();
                info!(session_id = %session_id, "Playback stop requested");
                Ok(())
            }
            AppState::Idle => {
                let path = self.config.macro_path()?;
                let text = load_macro(&path, self.last_macro.as_deref())?;
                let program = parse_macro(&text)?;
                let target = TargetWindow::foreground()?;

                let session_id = Uuid::new_v4();
                let cancel = CancellationToken::new();
                let engine = Arc::clone(&self.engine);
                let command_tx = self.command_tx.clone();
                let loop_playback = self.config.behavior.loop_playback;
                let task_cancel = cancel.clone();

                info!(
                    session_id = %session_id,
                    target = %target,
                    instruction_count = program.len(),
                    loop_playback,
                    "Playback started"
                );

                let handle = tokio::spawn(async move {
                    match run_playback(&*engine, target, &program, loop_playback, &task_cancel)
                        .await
                    {
                        Ok(runs) => info!(session_id = %session_id, runs, "Playback finished"),
                        Err(e) => error!(session_id = %session_id, error = ?e, "Playback failed"),
                    }

                    if command_tx
                        .send(AppCommand::PlaybackFinished { session_id })
                        .await
                        .is_err()
                    {
                        debug!(session_id = %session_id, "App stopped before playback finished");
                    }
                });

                self.playback_cancel = Some(cancel);
                self.playback_task = Some(handle);
                *state = AppState::Playing { session_id };

                Ok(())
            }
        }
    }

    async fn finish_playback(&mut self, session_id: Uuid) {
        let mut state = self.state.lock().await;
        if *state == (AppState::Playing { session_id }) {
            *state = AppState::Idle;
            self.playback_cancel = None;
            self.playback_task = None;
        } else {
            debug!(session_id = %session_id, state = ?*state, "Stale playback completion");
        }
    }

    /// Stop whatever is running before the runtime goes away.
    async fn shutdown(&mut self) {
        let current = *self.state.lock().await;

        match current {
            AppState::Recording { session_id, .. } => {
                if let Err(e) = self.stop_recording(session_id).await {
                    warn!(session_id = %session_id, error = ?e, "Failed to save recording on exit");
                }
            }
            AppState::Playing { session_id } => {
                if let Some(cancel) = self.playback_cancel.take() {
                    cancel.cancel();
                }
                self.stop_handle.stop();

                // Let the cancelled run release every key before exiting.
                if let Some(handle) = self.playback_task.take() {
                    match tokio::time::timeout(Duration::from_secs(1), handle).await {
                        Ok(Ok(())) => debug!(session_id = %session_id, "Playback task stopped"),
                        Ok(Err(e)) => warn!(error = ?e, "Playback task panicked"),
                        Err(_) => warn!("Playback task did not stop within timeout"),
                    }
                }
                *self.state.lock().await = AppState::Idle;
            }
            AppState::Idle => {}
        }
    }
}

/// Read the macro to play: the saved file if present, else the last
/// recording held in memory.
#[track_caller]
pub(crate) fn load_macro(path: &Path, last_recording: Option<&str>) -> AppResult<String> {
    if path.exists() {
        let text = fs::read_to_string(path)?;
        debug!(macro_path = ?path, text_len = text.len(), "Macro loaded from file");
        return Ok(text);
    }

    last_recording
        .map(str::to_string)
        .ok_or_else(|| AppError::NoMacro {
            reason: format!("Nothing recorded yet and {:?} does not exist", path),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Parse macro text, logging every line that had to be skipped.
#[track_caller]
pub(crate) fn parse_macro(text: &str) -> AppResult<MacroProgram> {
    let parsed = MacroProgram::parse(text);

    for skipped in &parsed.skipped {
        warn!(
            line = skipped.line_number,
            text = %skipped.text,
            reason = %skipped.reason,
            "Skipping macro line"
        );
    }

    if parsed.program.is_empty() {
        return Err(AppError::NoMacro {
            reason: "Macro has no playable instructions".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(parsed.program)
}

/// Play `program` into `target`, repeating while `loop_playback` is set.
///
/// Returns how many runs were started. Each run is a child of `cancel`, so
/// cancelling it stops the current run or the next one to start.
pub(crate) async fn run_playback<I: KeyInjector>(
    engine: &Mutex<PlaybackEngine<I>>,
    target: TargetWindow,
    program: &MacroProgram,
    loop_playback: bool,
    cancel: &CancellationToken,
) -> AppResult<usize> {
    let mut engine = engine.lock().await;
    engine.connect_window(target);

    let mut runs = 0;
    while !cancel.is_cancelled() {
        let started = Instant::now();
        let outcome = engine.play_with_parent(program, cancel).await?;
        runs += 1;

        let report = outcome.report();
        debug!(
            run = runs,
            duration_ms = started.elapsed().as_millis() as u64,
            executed = report.instructions_executed,
            delivered = report.delivered,
            foreground_denied = report.foreground_denied,
            message_failures = report.message_failures,
            "Playback run ended"
        );

        if outcome.is_cancelled() || !loop_playback {
            break;
        }
    }

    Ok(runs)
}
