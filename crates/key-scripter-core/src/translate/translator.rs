use crate::{
    KeyEventStream, Transition, VirtualKey,
    program::{MacroInstruction, MacroProgram},
    translate::ControlHotkeyMap,
};

use std::{collections::BTreeSet, time::Duration};

use tracing::{debug, instrument};

/// Turns a raw capture log into a minimal macro program.
///
/// One left-to-right scan tracks which keys are held. Auto-repeat `Down`s of
/// a held key are dropped and control hotkeys are filtered out. A control
/// hotkey `Down` ends the program after the last emitted `Release`, so only
/// the presses of a chord still being built are lost. Keys held across the
/// whole take keep their press.
/// Each surviving key instruction is preceded by the gap since the previous
/// one, measured from the start of recording for the first.
#[derive(Debug, Default, Clone, Copy)]
pub struct Translator;

impl Translator {
    /// Translate `stream`, filtering every key in `controls`.
    #[instrument(skip_all, fields(event_count = stream.len()))]
    pub fn translate(stream: &KeyEventStream, controls: &ControlHotkeyMap) -> MacroProgram {
        let mut held: BTreeSet<VirtualKey> = BTreeSet::new();
        let mut emitted: Vec<(MacroInstruction, Duration)> = Vec::with_capacity(stream.len());
        // emitted[..complete] ends with a Release
        let mut complete = 0;

        for event in stream {
            if controls.contains(event.key) {
                if event.transition == Transition::Down {
                    debug!(
                        key = %event.key,
                        discarded = emitted.len() - complete,
                        "Control hotkey pressed, truncating"
                    );
                    emitted.truncate(complete);
                    break;
                }
                continue;
            }

            match event.transition {
                Transition::Down => {
                    if held.insert(event.key) {
                        emitted.push((MacroInstruction::Press(event.key), event.timestamp));
                    }
                }
                Transition::Up => {
                    held.remove(&event.key);
                    emitted.push((MacroInstruction::Release(event.key), event.timestamp));
                    complete = emitted.len();
                }
            }
        }

        let mut program = MacroProgram::new();
        let mut previous = Duration::ZERO;
        for (instruction, timestamp) in emitted {
            program.push(MacroInstruction::Wait(timestamp.saturating_sub(previous)));
            program.push(instruction);
            previous = timestamp;
        }

        debug!(
            instruction_count = program.len(),
            duration_ms = program.total_duration().as_millis() as u64,
            "Translated capture"
        );

        program
    }
}
