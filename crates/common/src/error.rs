//! Decode errors for SVM word streams.

use thiserror::Error;

/// Errors that occur while decoding instruction words or image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The opcode byte of an instruction word is not a known opcode.
    #[error("unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    /// Byte stream length is not a multiple of 4.
    #[error("invalid byte stream length: {0} (must be multiple of 4)")]
    InvalidLength(usize),
}
