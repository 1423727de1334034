//! A disassembler for a small slice of the 8086 instruction set: the
//! register, memory and immediate forms of `mov`, `add` and `sub`.

pub mod cursor;
pub mod decode;
pub mod error;
pub mod fields;
pub mod format;
pub mod input;
pub mod table;

pub use decode::{disassemble, Decoder, Instruction, Operand, BITS_DIRECTIVE};
pub use error::DecodeError;
