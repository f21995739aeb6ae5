//! Typed operations and validated programs.
//!
//! A program is the ordered operation sequence read from a meta-data file:
//! `S(start)`, one `A(start) … A(end)` block per process, then `S(end)`.
//! Operations are a closed sum type so every consumer matches exhaustively.

use std::fmt;

use crate::common::constants::{FIELD_DIVISOR, SEGMENT_DIVISOR};

/// Start or end marker of a system run or a process block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Opening marker (`start`).
    Start,
    /// Closing marker (`end`).
    End,
}

impl Boundary {
    /// Operation-code name of the marker.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// I/O device named by an input or output operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Device {
    /// `hard drive` (input or output).
    HardDrive,
    /// `keyboard` (input only).
    Keyboard,
    /// `monitor` (output only).
    Monitor,
    /// `printer` (output only).
    Printer,
}

impl Device {
    /// Operation-code name of the device.
    pub const fn name(self) -> &'static str {
        match self {
            Self::HardDrive => "hard drive",
            Self::Keyboard => "keyboard",
            Self::Monitor => "monitor",
            Self::Printer => "printer",
        }
    }

    const fn supports_input(self) -> bool {
        matches!(self, Self::HardDrive | Self::Keyboard)
    }

    const fn supports_output(self) -> bool {
        matches!(self, Self::HardDrive | Self::Monitor | Self::Printer)
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "hard drive" => Some(Self::HardDrive),
            "keyboard" => Some(Self::Keyboard),
            "monitor" => Some(Self::Monitor),
            "printer" => Some(Self::Printer),
            _ => None,
        }
    }
}

/// Memory-management action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemoryAction {
    /// Reserve a region.
    Allocate,
    /// Touch an offset inside a previously reserved region.
    Access,
}

impl MemoryAction {
    /// Operation-code name of the action.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Allocate => "allocate",
            Self::Access => "access",
        }
    }
}

/// Memory request decoded from a packed `segment/base/offset` operand.
///
/// The operand packs three fields as `segment * 1_000_000 + base * 1000 + offset`,
/// so base and offset are each limited to `0..1000`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemoryRequest {
    /// Segment id.
    pub segment: u32,
    /// Base address.
    pub base: u32,
    /// Offset (granted maximum on allocate, requested offset on access).
    pub offset: u32,
}

impl MemoryRequest {
    /// Creates a request from its three fields.
    pub const fn new(segment: u32, base: u32, offset: u32) -> Self {
        Self {
            segment,
            base,
            offset,
        }
    }

    /// Decodes a packed operand.
    pub const fn decode(operand: u32) -> Self {
        Self {
            segment: operand / SEGMENT_DIVISOR,
            base: (operand / FIELD_DIVISOR) % FIELD_DIVISOR,
            offset: operand % FIELD_DIVISOR,
        }
    }

    /// Packs the request back into an operand.
    pub const fn encode(self) -> u32 {
        self.segment * SEGMENT_DIVISOR + self.base * FIELD_DIVISOR + self.offset
    }
}

impl fmt::Display for MemoryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.segment, self.base, self.offset)
    }
}

/// A single operation of a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `S(start)` / `S(end)`: bounds the whole program.
    System(Boundary),
    /// `A(start)` / `A(end)`: bounds one process.
    Process(Boundary),
    /// `P(run)n`: `n` processor cycles.
    Compute {
        /// Cycle count.
        cycles: u32,
    },
    /// `I(device)n`: `n` I/O cycles of input.
    Input {
        /// Source device.
        device: Device,
        /// Cycle count.
        cycles: u32,
    },
    /// `O(device)n`: `n` I/O cycles of output.
    Output {
        /// Destination device.
        device: Device,
        /// Cycle count.
        cycles: u32,
    },
    /// `M(allocate)n` / `M(access)n`: MMU request.
    Memory {
        /// Allocate or access.
        action: MemoryAction,
        /// Decoded operand.
        request: MemoryRequest,
    },
}

impl Operation {
    /// Builds an operation from its letter, name and operand.
    ///
    /// Returns `None` when the letter is unknown or the name does not belong to
    /// the letter (for example `P(keyboard)`).
    pub fn from_parts(letter: char, name: &str, value: u32) -> Option<Self> {
        let boundary = || match name {
            "start" => Some(Boundary::Start),
            "end" => Some(Boundary::End),
            _ => None,
        };
        match letter {
            'S' => boundary().map(Self::System),
            'A' => boundary().map(Self::Process),
            'P' => (name == "run").then_some(Self::Compute { cycles: value }),
            'I' => Device::from_name(name)
                .filter(|d| d.supports_input())
                .map(|device| Self::Input {
                    device,
                    cycles: value,
                }),
            'O' => Device::from_name(name)
                .filter(|d| d.supports_output())
                .map(|device| Self::Output {
                    device,
                    cycles: value,
                }),
            'M' => {
                let action = match name {
                    "allocate" => MemoryAction::Allocate,
                    "access" => MemoryAction::Access,
                    _ => return None,
                };
                Some(Self::Memory {
                    action,
                    request: MemoryRequest::decode(value),
                })
            }
            _ => None,
        }
    }

    /// Operation-code letter.
    pub const fn letter(&self) -> char {
        match self {
            Self::System(_) => 'S',
            Self::Process(_) => 'A',
            Self::Compute { .. } => 'P',
            Self::Input { .. } => 'I',
            Self::Output { .. } => 'O',
            Self::Memory { .. } => 'M',
        }
    }

    /// Operation-code name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::System(b) | Self::Process(b) => b.name(),
            Self::Compute { .. } => "run",
            Self::Input { device, .. } | Self::Output { device, .. } => device.name(),
            Self::Memory { action, .. } => action.name(),
        }
    }

    /// Numeric operand as written in the meta-data file.
    pub const fn operand(&self) -> u32 {
        match self {
            Self::System(_) | Self::Process(_) => 0,
            Self::Compute { cycles }
            | Self::Input { cycles, .. }
            | Self::Output { cycles, .. } => *cycles,
            Self::Memory { request, .. } => request.encode(),
        }
    }

    /// Real-time cost in milliseconds; zero for untimed operations.
    pub const fn cost_ms(&self, process_cycle_ms: u32, io_cycle_ms: u32) -> u64 {
        match self {
            Self::Compute { cycles } => *cycles as u64 * process_cycle_ms as u64,
            Self::Input { cycles, .. } | Self::Output { cycles, .. } => {
                *cycles as u64 * io_cycle_ms as u64
            }
            Self::System(_) | Self::Process(_) | Self::Memory { .. } => 0,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}){}", self.letter(), self.name(), self.operand())
    }
}

/// Structural errors in an operation sequence.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    /// The sequence does not open with `S(start)`.
    #[error("program must begin with S(start)")]
    MissingSystemStart,

    /// The sequence ends before `S(end)`.
    #[error("program must end with S(end)")]
    MissingSystemEnd,

    /// `A(start)` found while a process block is still open.
    #[error("operation {index}: A(start) inside an open process")]
    NestedProcessStart {
        /// Position in the sequence.
        index: usize,
    },

    /// `A(end)` found with no open process block.
    #[error("operation {index}: A(end) without a matching A(start)")]
    UnmatchedProcessEnd {
        /// Position in the sequence.
        index: usize,
    },

    /// `S(end)` reached while a process block is still open.
    #[error("operation {index}: S(end) inside an open process")]
    UnterminatedProcess {
        /// Position in the sequence.
        index: usize,
    },

    /// A process operation (or a second `S(start)`) outside any process block.
    #[error("operation {index}: {op} outside a process")]
    OperationOutsideProcess {
        /// Position in the sequence.
        index: usize,
        /// Rendered operation.
        op: String,
    },

    /// Operations after `S(end)`.
    #[error("operation {index}: {op} after S(end)")]
    TrailingOperation {
        /// Position in the sequence.
        index: usize,
        /// Rendered operation.
        op: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    ExpectSystemStart,
    BetweenProcesses,
    InProcess,
    Finished,
}

/// A validated, immutable operation sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    ops: Vec<Operation>,
}

impl Program {
    /// Validates `ops` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns a [`ProgramError`] if the start/end markers are missing,
    /// unbalanced or nested, or if a process operation sits outside a block.
    pub fn new(ops: Vec<Operation>) -> Result<Self, ProgramError> {
        let mut scan = Scan::ExpectSystemStart;
        for (index, op) in ops.iter().enumerate() {
            scan = match (scan, op) {
                (Scan::ExpectSystemStart, Operation::System(Boundary::Start)) => {
                    Scan::BetweenProcesses
                }
                (Scan::ExpectSystemStart, _) => return Err(ProgramError::MissingSystemStart),

                (Scan::BetweenProcesses, Operation::Process(Boundary::Start)) => Scan::InProcess,
                (Scan::BetweenProcesses, Operation::System(Boundary::End)) => Scan::Finished,
                (Scan::BetweenProcesses, Operation::Process(Boundary::End)) => {
                    return Err(ProgramError::UnmatchedProcessEnd { index });
                }
                (Scan::BetweenProcesses, _) => {
                    return Err(ProgramError::OperationOutsideProcess {
                        index,
                        op: op.to_string(),
                    });
                }

                (Scan::InProcess, Operation::Process(Boundary::End)) => Scan::BetweenProcesses,
                (Scan::InProcess, Operation::Process(Boundary::Start)) => {
                    return Err(ProgramError::NestedProcessStart { index });
                }
                (Scan::InProcess, Operation::System(Boundary::End)) => {
                    return Err(ProgramError::UnterminatedProcess { index });
                }
                (Scan::InProcess, Operation::System(Boundary::Start)) => {
                    return Err(ProgramError::OperationOutsideProcess {
                        index,
                        op: op.to_string(),
                    });
                }
                (Scan::InProcess, _) => Scan::InProcess,

                (Scan::Finished, _) => {
                    return Err(ProgramError::TrailingOperation {
                        index,
                        op: op.to_string(),
                    });
                }
            };
        }

        match scan {
            Scan::Finished => Ok(Self { ops }),
            Scan::ExpectSystemStart => Err(ProgramError::MissingSystemStart),
            Scan::InProcess => Err(ProgramError::UnterminatedProcess { index: ops.len() }),
            Scan::BetweenProcesses => Err(ProgramError::MissingSystemEnd),
        }
    }

    /// Builds a program from the bodies of its processes, adding every marker.
    ///
    /// # Errors
    ///
    /// Returns a [`ProgramError`] if a body contains a boundary operation.
    pub fn from_processes<I, B>(processes: I) -> Result<Self, ProgramError>
    where
        I: IntoIterator<Item = B>,
        B: IntoIterator<Item = Operation>,
    {
        let mut ops = vec![Operation::System(Boundary::Start)];
        for body in processes {
            ops.push(Operation::Process(Boundary::Start));
            ops.extend(body);
            ops.push(Operation::Process(Boundary::End));
        }
        ops.push(Operation::System(Boundary::End));
        Self::new(ops)
    }

    /// All operations, markers included.
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// Operation at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Operation> {
        self.ops.get(index)
    }

    /// Number of operations, markers included.
    pub const fn len(&self) -> usize {
        self.ops.len()
    }

    /// Always false for a validated program; present for API symmetry.
    pub const fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of process blocks.
    pub fn process_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Operation::Process(Boundary::Start)))
            .count()
    }
}
