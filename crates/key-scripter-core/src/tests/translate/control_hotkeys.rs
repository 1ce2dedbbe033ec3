use crate::{ControlHotkeyMap, VirtualKey};

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// WHAT: Triggering a bound key runs its action
/// WHY: The stop-recording hotkey is delivered through this action
#[test]
fn given_bound_key_when_triggered_then_action_runs() {
    // Given: F9 bound to a counter
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let controls = ControlHotkeyMap::new().bind(VirtualKey::F9, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // When: Triggering F9 twice and an unbound key once
    assert!(controls.trigger(VirtualKey::F9));
    assert!(controls.trigger(VirtualKey::F9));
    assert!(!controls.trigger(VirtualKey::A));

    // Then: The action ran twice
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

/// WHAT: Reserved keys are filtered but have no action
/// WHY: The playback hotkey must stay out of recordings without stopping them
#[test]
fn given_reserved_key_when_triggered_then_filtered_without_action() {
    // Given: F10 reserved
    let controls = ControlHotkeyMap::new().reserve(VirtualKey::F10);

    // When/Then: It is a control key but triggering does nothing
    assert!(controls.contains(VirtualKey::F10));
    assert!(!controls.trigger(VirtualKey::F10));
    assert_eq!(controls.len(), 1);
    assert!(!controls.contains(VirtualKey::F9));
}
