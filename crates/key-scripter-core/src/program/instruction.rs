use crate::VirtualKey;

use std::{slice, time::Duration};

/// One step of a macro program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroInstruction {
    /// Press (key down).
    Press(VirtualKey),
    /// Release (key up).
    Release(VirtualKey),
    /// Pause before the next instruction.
    Wait(Duration),
}

impl MacroInstruction {
    /// The key this instruction acts on, if any.
    pub fn key(&self) -> Option<VirtualKey> {
        match self {
            MacroInstruction::Press(key) | MacroInstruction::Release(key) => Some(*key),
            MacroInstruction::Wait(_) => None,
        }
    }

    /// The same instruction with any wait cut down to whole milliseconds.
    fn to_whole_millis(self) -> Self {
        match self {
            MacroInstruction::Wait(duration) => MacroInstruction::Wait(Duration::new(
                duration.as_secs(),
                duration.subsec_millis() * 1_000_000,
            )),
            other => other,
        }
    }
}

/// Ordered Press/Release/Wait sequence; the portable result of translation.
///
/// Waits are stored in whole milliseconds, the precision of the text form,
/// so rendering and parsing back always gives an equal program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroProgram {
    instructions: Vec<MacroInstruction>,
}

impl MacroProgram {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: MacroInstruction) {
        self.instructions.push(instruction.to_whole_millis());
    }

    /// Number of instructions, waits included.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program does nothing.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterate instructions in execution order.
    pub fn iter(&self) -> slice::Iter<'_, MacroInstruction> {
        self.instructions.iter()
    }

    /// Borrow the instructions as a slice.
    pub fn instructions(&self) -> &[MacroInstruction] {
        &self.instructions
    }

    /// Total replay time: the sum of every `Wait`.
    pub fn total_duration(&self) -> Duration {
        self.instructions
            .iter()
            .filter_map(|instruction| match instruction {
                MacroInstruction::Wait(duration) => Some(*duration),
                _ => None,
            })
            .sum()
    }

    /// Number of Press/Release instructions.
    pub fn key_instruction_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|instruction| instruction.key().is_some())
            .count()
    }
}

impl From<Vec<MacroInstruction>> for MacroProgram {
    fn from(instructions: Vec<MacroInstruction>) -> Self {
        instructions.into_iter().collect()
    }
}

impl FromIterator<MacroInstruction> for MacroProgram {
    fn from_iter<T: IntoIterator<Item = MacroInstruction>>(iter: T) -> Self {
        Self {
            instructions: iter
                .into_iter()
                .map(MacroInstruction::to_whole_millis)
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MacroProgram {
    type Item = &'a MacroInstruction;
    type IntoIter = slice::Iter<'a, MacroInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
