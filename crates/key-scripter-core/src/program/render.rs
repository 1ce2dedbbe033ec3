use crate::program::{MacroInstruction, MacroProgram};

/// Receiver identifier used when none is configured.
pub const DEFAULT_TARGET_NAME: &str = "_keyboard";

/// Key enum namespace used when none is configured.
pub const DEFAULT_KEY_NAMESPACE: &str = "VKey";

pub(crate) const PRESS_VERB: &str = "Press";
pub(crate) const RELEASE_VERB: &str = "Release";
pub(crate) const SLEEP_VERB: &str = "Sleep";

/// Identifiers embedded in rendered macro text.
///
/// The target name lets the output drop into a larger automation script
/// that exposes a keyboard object under a different identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Receiver in front of every call, e.g. `_keyboard`.
    pub target_name: String,
    /// Enum namespace in front of every key, e.g. `VKey`.
    pub key_namespace: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target_name: DEFAULT_TARGET_NAME.to_string(),
            key_namespace: DEFAULT_KEY_NAMESPACE.to_string(),
        }
    }
}

impl RenderOptions {
    /// Options with a custom receiver and the default key namespace.
    pub fn with_target_name(target_name: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            ..Self::default()
        }
    }

    /// Render a single instruction as one line, without a terminator.
    pub fn render_instruction(&self, instruction: &MacroInstruction) -> String {
        match instruction {
            MacroInstruction::Press(key) => format!(
                "{}.{}({}.{});",
                self.target_name,
                PRESS_VERB,
                self.key_namespace,
                key.name()
            ),
            MacroInstruction::Release(key) => format!(
                "{}.{}({}.{});",
                self.target_name,
                RELEASE_VERB,
                self.key_namespace,
                key.name()
            ),
            MacroInstruction::Wait(duration) => format!(
                "{}.{}({});",
                self.target_name,
                SLEEP_VERB,
                duration.as_millis()
            ),
        }
    }
}

impl MacroProgram {
    /// Render with the default `_keyboard` / `VKey` identifiers.
    pub fn render(&self) -> String {
        self.render_with(&RenderOptions::default())
    }

    /// Render one instruction per line. No trailing line terminator; an empty
    /// program renders to an empty string.
    pub fn render_with(&self, options: &RenderOptions) -> String {
        self.iter()
            .map(|instruction| options.render_instruction(instruction))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
