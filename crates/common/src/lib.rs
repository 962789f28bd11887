//! SVM common types and instruction encoding.
//!
//! This crate provides the foundational data structures shared by the VM
//! and the assembler:
//!
//! - [`Opcode`], [`Ext`], [`Arg`], [`Register`] — the closed symbol domains
//!   of the instruction set
//! - [`Instruction`] — the packed 32-bit instruction word with
//!   encode/decode
//! - [`CodeImage`] — an immutable word stream plus stack-size metadata
//! - [`DecodeError`] — errors from decoding words and byte streams
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime cost)
//! and has no other dependencies.

pub mod arg;
pub mod error;
pub mod ext;
pub mod image;
pub mod instruction;
pub mod opcode;

// Re-export commonly used types at the crate root.
pub use arg::{Arg, Register, REGISTER_COUNT};
pub use error::DecodeError;
pub use ext::Ext;
pub use image::{CodeImage, ImageMeta};
pub use instruction::Instruction;
pub use opcode::Opcode;
