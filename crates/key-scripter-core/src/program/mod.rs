mod instruction;
mod parse;
mod render;

pub use {
    instruction::{MacroInstruction, MacroProgram},
    parse::{LineError, ParsedProgram, SkippedLine},
    render::{DEFAULT_KEY_NAMESPACE, DEFAULT_TARGET_NAME, RenderOptions},
};
