use crate::{
    VirtualKey,
    program::{
        MacroInstruction, MacroProgram,
        render::{PRESS_VERB, RELEASE_VERB, SLEEP_VERB},
    },
};

use std::time::Duration;

use thiserror::Error;

const LEGACY_PRESS_VERB: &str = "KeyDown";
const LEGACY_RELEASE_VERB: &str = "KeyUp";
const COMMENT_PREFIX: &str = "//";

/// Why a macro line was not turned into an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// The line is not shaped like `receiver.Verb(argument);`.
    #[error("Expected `<target>.<Verb>(<argument>);`")]
    MalformedCall,

    /// The call names a verb the player does not understand.
    #[error("Unknown verb '{verb}'")]
    UnknownVerb {
        /// The method name as written.
        verb: String,
    },

    /// The key argument does not name a known virtual key.
    #[error("Unknown key '{name}'")]
    UnknownKey {
        /// The key argument as written.
        name: String,
    },

    /// The sleep argument is not a non-negative integer number of milliseconds.
    #[error("Invalid sleep duration '{value}'")]
    InvalidDuration {
        /// The sleep argument as written.
        value: String,
    },
}

/// A line that `MacroProgram::parse` could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// One-based line number in the source text.
    pub line_number: usize,
    /// The offending line, trimmed.
    pub text: String,
    /// What was wrong with it.
    pub reason: LineError,
}

/// Result of parsing macro text: everything usable, plus what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProgram {
    /// Instructions recovered from well-formed lines, in source order.
    pub program: MacroProgram,
    /// Lines that were skipped and why.
    pub skipped: Vec<SkippedLine>,
}

impl ParsedProgram {
    /// Whether every non-blank, non-comment line was understood.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl MacroProgram {
    /// Parse rendered macro text back into a program.
    ///
    /// Parsing never fails as a whole. Blank lines and `//` comments are
    /// ignored, and every other line that cannot be understood is reported in
    /// [`ParsedProgram::skipped`] while the rest of the text is still used.
    /// Any receiver name is accepted, so text rendered with a custom target
    /// parses the same way as the default.
    pub fn parse(text: &str) -> ParsedProgram {
        let mut parsed = ParsedProgram::default();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            match parse_line(line) {
                Ok(instruction) => parsed.program.push(instruction),
                Err(reason) => parsed.skipped.push(SkippedLine {
                    line_number: index + 1,
                    text: line.to_string(),
                    reason,
                }),
            }
        }

        parsed
    }
}

fn parse_line(line: &str) -> Result<MacroInstruction, LineError> {
    let (verb, argument) = split_call(line)?;

    match verb {
        PRESS_VERB | LEGACY_PRESS_VERB => parse_key(argument).map(MacroInstruction::Press),
        RELEASE_VERB | LEGACY_RELEASE_VERB => parse_key(argument).map(MacroInstruction::Release),
        SLEEP_VERB => parse_millis(argument).map(MacroInstruction::Wait),
        other => Err(LineError::UnknownVerb {
            verb: other.to_string(),
        }),
    }
}

/// Split `receiver.Verb(argument);` into its verb and trimmed argument.
fn split_call(line: &str) -> Result<(&str, &str), LineError> {
    let body = line.strip_suffix(';').unwrap_or(line).trim_end();
    let body = body.strip_suffix(')').ok_or(LineError::MalformedCall)?;
    let (callee, argument) = body.split_once('(').ok_or(LineError::MalformedCall)?;
    let (receiver, verb) = callee.trim().rsplit_once('.').ok_or(LineError::MalformedCall)?;

    if receiver.trim().is_empty() || verb.is_empty() || argument.contains(['(', ')']) {
        return Err(LineError::MalformedCall);
    }

    Ok((verb, argument.trim()))
}

fn parse_key(argument: &str) -> Result<VirtualKey, LineError> {
    // `VKey.Return` or bare `Return`
    let name = argument
        .rsplit_once('.')
        .map_or(argument, |(_, name)| name)
        .trim();

    VirtualKey::from_name(name).ok_or_else(|| LineError::UnknownKey {
        name: argument.to_string(),
    })
}

fn parse_millis(argument: &str) -> Result<Duration, LineError> {
    argument
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| LineError::InvalidDuration {
            value: argument.to_string(),
        })
}
