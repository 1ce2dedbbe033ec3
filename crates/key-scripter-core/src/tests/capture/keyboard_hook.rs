use crate::{CaptureBackend, CaptureSink, ControlHotkeyMap, KeyboardHook, MacroError};

use std::sync::Arc;

/// WHAT: Installing the hook off Windows fails with CaptureSetupFailed
/// WHY: The recorder must stay idle instead of pretending to capture
#[test]
#[cfg(not(target_os = "windows"))]
fn given_unsupported_platform_when_installing_then_capture_setup_failed() {
    // Given: A keyboard hook
    let mut hook = KeyboardHook::new();

    // When: Installing it
    let result = hook.install(CaptureSink::new(Arc::new(ControlHotkeyMap::new())));

    // Then: Setup fails and there is nothing to uninstall
    assert!(matches!(result, Err(MacroError::CaptureSetupFailed { .. })));
    assert!(matches!(
        hook.uninstall(),
        Err(MacroError::NotRecording { .. })
    ));
}

/// WHAT: The real hook installs and tears down on a desktop session
/// WHY: Verifies the capture thread starts, pumps and joins cleanly
#[test]
#[cfg(target_os = "windows")]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_desktop_when_installing_and_uninstalling_then_stream_returned() {
    // Given: A keyboard hook
    let mut hook = KeyboardHook::new();

    // When: Installing, then immediately removing it
    hook.install(CaptureSink::new(Arc::new(ControlHotkeyMap::new())))
        .unwrap();
    let second = hook.install(CaptureSink::new(Arc::new(ControlHotkeyMap::new())));
    let stream = hook.uninstall().unwrap();

    // Then: A second install is refused and the stream comes back
    assert!(matches!(second, Err(MacroError::AlreadyRecording { .. })));
    assert!(stream.len() < 16);
}
