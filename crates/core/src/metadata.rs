//! Meta-data file parsing and rendering.
//!
//! A meta-data file carries one program as `;`-separated operation commands
//! between two descriptor lines:
//!
//! ```text
//! Start Program Meta-Data Code:
//! S(start)0; A(start)0; I(hard drive)18; P(run)9;
//! M(allocate)2100050; A(end)0; S(end)0.
//! End Program Meta-Data Code.
//! ```
//!
//! Commands may span lines. The final `S(end)` may be closed by `;` or `.`.

use std::io;
use std::path::PathBuf;

use crate::common::constants::{MAX_LINE_LENGTH, MAX_OP_VALUE_DIGITS};
use crate::program::{Boundary, Operation, Program, ProgramError};

const START_DESCRIPTOR: &str = "Start Program Meta-Data Code";
const END_DESCRIPTOR: &str = "End Program Meta-Data Code";

/// Every operation name accepted in a command.
const OP_NAMES: [&str; 9] = [
    "access",
    "allocate",
    "end",
    "hard drive",
    "keyboard",
    "printer",
    "monitor",
    "run",
    "start",
];

/// Errors raised while loading a meta-data file.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The file could not be read.
    #[error("MD File Access Error ({path}): {source}")]
    FileAccess {
        /// Requested path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The start or end descriptor is missing or malformed.
    #[error("MD Corrupt Descriptor Error")]
    CorruptDescriptor,

    /// Input ended before `S(end)`.
    #[error("Op Command Access Error")]
    OpCommandAccess,

    /// A command starts with an unknown letter.
    #[error("Corrupt Op Command Letter Error: {0:?}")]
    CorruptLetter(String),

    /// A command name is unknown, unterminated or does not fit its letter.
    #[error("Corrupt Op Command Name Error: {0:?}")]
    CorruptName(String),

    /// A command value is missing, too long or not followed by a terminator.
    #[error("Corrupt Op Command Value Error: {0:?}")]
    CorruptValue(String),

    /// The number of `start` and `end` commands differ.
    #[error("Unbalanced Start-End Code Error ({starts} start, {ends} end)")]
    UnbalancedStartEnd {
        /// Count of `start` commands.
        starts: usize,
        /// Count of `end` commands.
        ends: usize,
    },

    /// The commands are individually valid but do not form a program.
    #[error("Program Structure Error: {0}")]
    Structure(#[from] ProgramError),
}

/// Parses the contents of a meta-data file into a validated program.
///
/// # Errors
///
/// Returns a [`MetadataError`] describing the first problem found.
pub fn parse_str(text: &str) -> Result<Program, MetadataError> {
    let (descriptor, mut rest) = text
        .trim_start()
        .split_once(':')
        .ok_or(MetadataError::CorruptDescriptor)?;
    if descriptor.trim() != START_DESCRIPTOR {
        return Err(MetadataError::CorruptDescriptor);
    }

    let mut ops = Vec::new();
    let (mut starts, mut ends) = (0usize, 0usize);
    loop {
        let (op, terminator, remaining) = parse_command(rest)?;
        rest = remaining;
        match op {
            Operation::System(Boundary::Start) | Operation::Process(Boundary::Start) => {
                starts += 1;
            }
            Operation::System(Boundary::End) | Operation::Process(Boundary::End) => ends += 1,
            _ => {}
        }
        let last = op == Operation::System(Boundary::End);
        if terminator == '.' && !last {
            return Err(MetadataError::CorruptValue(op.to_string()));
        }
        ops.push(op);
        if last {
            break;
        }
    }

    if starts != ends {
        return Err(MetadataError::UnbalancedStartEnd { starts, ends });
    }

    match rest.trim_start().strip_prefix(END_DESCRIPTOR) {
        Some(tail) if tail.trim_start().starts_with('.') => {}
        _ => return Err(MetadataError::CorruptDescriptor),
    }

    Ok(Program::new(ops)?)
}

/// Parses one command at the front of `src`.
///
/// Returns the operation, its terminator (`;` or `.`) and the unread input.
fn parse_command(src: &str) -> Result<(Operation, char, &str), MetadataError> {
    let s = src.trim_start();
    let snippet = || command_snippet(s);

    let mut chars = s.chars();
    let letter = chars.next().ok_or(MetadataError::OpCommandAccess)?;
    if !matches!(letter, 'S' | 'A' | 'P' | 'M' | 'I' | 'O') {
        return Err(MetadataError::CorruptLetter(snippet()));
    }

    let after_letter = chars.as_str();
    let Some(after_paren) = after_letter.strip_prefix('(') else {
        return Err(MetadataError::CorruptName(snippet()));
    };
    let Some((name, after_name)) = after_paren.split_once(')') else {
        return Err(MetadataError::CorruptName(snippet()));
    };
    if !OP_NAMES.contains(&name) {
        return Err(MetadataError::CorruptName(snippet()));
    }

    let digits = after_name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after_name.len());
    if digits == 0 || digits > MAX_OP_VALUE_DIGITS {
        return Err(MetadataError::CorruptValue(snippet()));
    }
    let (number, after_value) = after_name.split_at(digits);
    let value: u32 = number
        .parse()
        .map_err(|_| MetadataError::CorruptValue(snippet()))?;

    let after_value = after_value.trim_start();
    let terminator = match after_value.chars().next() {
        Some(c @ (';' | '.')) => c,
        Some(_) => return Err(MetadataError::CorruptValue(snippet())),
        None => return Err(MetadataError::OpCommandAccess),
    };

    let op = Operation::from_parts(letter, name, value)
        .ok_or_else(|| MetadataError::CorruptName(snippet()))?;
    Ok((op, terminator, &after_value[terminator.len_utf8()..]))
}

/// The text of a command up to its terminator, for error messages.
fn command_snippet(s: &str) -> String {
    let end = s.find([';', '\n']).unwrap_or(s.len());
    s[..end].trim().to_string()
}

/// Renders a program in meta-data file format.
///
/// Commands are wrapped so that no line exceeds the generator line width.
pub fn render(program: &Program) -> String {
    let mut out = format!("{START_DESCRIPTOR}:\n");
    let mut line = String::new();
    let ops = program.operations();
    for (i, op) in ops.iter().enumerate() {
        let token = if i + 1 == ops.len() {
            format!("{op};")
        } else {
            format!("{op}; ")
        };
        if !line.is_empty() && line.len() + token.trim_end().len() > MAX_LINE_LENGTH {
            out.push_str(line.trim_end());
            out.push('\n');
            line.clear();
        }
        line.push_str(&token);
    }
    out.push_str(line.trim_end());
    out.push('\n');
    out.push_str(END_DESCRIPTOR);
    out.push_str(".\n");
    out
}

/// One line per operation, for diagnostic display.
pub fn display_lines(program: &Program) -> Vec<String> {
    program
        .operations()
        .iter()
        .map(|op| format!("Op code: {} / {} / {}", op.letter(), op.name(), op.operand()))
        .collect()
}
