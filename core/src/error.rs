use thiserror::Error;

use crate::constants::{MEMORY_SIZE, STACK_DEPTH};

/// Faults raised while loading or executing a program.
///
/// These are deterministic bugs in the loaded ROM, not transient conditions:
/// the interpreter surfaces them from [`crate::Chip8::step`] without retrying
/// and leaves the machine state as it was before the faulting instruction.
/// Instruction-level variants carry the offending word and program counter so
/// the host can report where execution died.
#[derive(Debug, Error)]
pub enum Chip8Error {
    /// The word's family or sub-opcode has no handler.
    #[error("no operation matches opcode {opcode:#06X} at pc {pc:#06X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    /// A call instruction ran with the fixed-depth call stack already full.
    #[error("call {opcode:#06X} at pc {pc:#06X} overflows the {}-frame call stack", STACK_DEPTH)]
    StackOverflow { opcode: u16, pc: u16 },

    /// A return instruction ran with no call frame to pop.
    #[error("return at pc {pc:#06X} with an empty call stack")]
    StackUnderflow { opcode: u16, pc: u16 },

    /// An instruction's memory range runs past the end of memory.
    #[error(
        "opcode {opcode:#06X} at pc {pc:#06X} addresses {len} bytes at {addr:#06X}, \
         past the end of memory"
    )]
    AddressOutOfRange {
        addr: u16,
        len: usize,
        opcode: u16,
        pc: u16,
    },

    /// The program counter left addressable memory.
    #[error("program counter {pc:#06X} is past the last instruction boundary")]
    PcOutOfRange { pc: u16 },

    /// The loaded image does not fit in memory at its start address.
    #[error("{len} bytes at {addr:#06X} do not fit in {}-byte memory", MEMORY_SIZE)]
    RomTooLarge { addr: u16, len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
