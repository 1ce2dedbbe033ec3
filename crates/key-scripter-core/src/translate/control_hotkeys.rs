use crate::VirtualKey;

use std::{collections::HashMap, fmt};

/// Side effect run when a control hotkey is released during capture.
pub type ControlAction = Box<dyn Fn() + Send + Sync>;

/// Keys that steer the recorder instead of being recorded.
///
/// Every key in the map is kept out of the translated program. Bound keys
/// also run their action on release; reserved keys are only filtered.
/// Actions run on the capture thread and must return quickly.
#[derive(Default)]
pub struct ControlHotkeyMap {
    entries: HashMap<VirtualKey, Option<ControlAction>>,
}

impl ControlHotkeyMap {
    /// Create an empty map; nothing is filtered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `action` to `key`, replacing any previous binding.
    pub fn bind<F>(mut self, key: VirtualKey, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.entries.insert(key, Some(Box::new(action)));
        self
    }

    /// Filter `key` from recordings without attaching an action.
    pub fn reserve(mut self, key: VirtualKey) -> Self {
        self.entries.insert(key, None);
        self
    }

    /// Whether `key` is a control hotkey.
    pub fn contains(&self, key: VirtualKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Run the action bound to `key`. Returns whether an action ran.
    pub fn trigger(&self, key: VirtualKey) -> bool {
        match self.entries.get(&key) {
            Some(Some(action)) => {
                action();
                true
            }
            _ => false,
        }
    }

    /// Number of control hotkeys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keys are filtered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ControlHotkeyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("ControlHotkeyMap")
            .field("keys", &keys)
            .finish()
    }
}
