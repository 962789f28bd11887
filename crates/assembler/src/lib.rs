//! SVM assembler — whitespace-separated mnemonic text ↔ packed words.
//!
//! Assembly is a single pass over the token stream: instructions emit as
//! they parse, unknown mnemonics define labels, and forward references are
//! patched from a recorded patch list once the source has been read.
//!
//! # Usage
//!
//! ```
//! use svm_assembler::{assemble, disassemble};
//!
//! let image = assemble("mov r0 5\ncmp r0 7\nmov.eq r0 99\nend\n").unwrap();
//! let text = disassemble(&image);
//! assert_eq!(text, "mov r0 5\ncmp r0 7\nmov.eq r0 99\nend\n");
//! ```
//!
//! # Roundtrip guarantee
//!
//! `assemble(disassemble(image))` reproduces the exact word stream for any
//! image the assembler produced. The disassembler emits canonical text;
//! the assembler also accepts non-canonical spellings (hex or binary
//! literals, comments, labels, arbitrary whitespace).

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use svm_common::CodeImage;

/// Assemble source text into a code image.
///
/// Returns the first error encountered; on error no image is produced.
pub fn assemble(source: &str) -> Result<CodeImage, AsmError> {
    parser::assemble(source)
}

/// Disassemble a code image into canonical assembly text.
pub fn disassemble(image: &CodeImage) -> String {
    disassembler::disassemble(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use svm_common::{Arg, Ext, Instruction, Opcode, Register};

    fn w(op: Opcode, ext: Ext, arg1: Arg, arg2: Arg) -> i32 {
        Instruction::new(op, ext, arg1, arg2).encode()
    }

    #[test]
    fn assemble_minimal() {
        let image = assemble("end").unwrap();
        assert_eq!(image.words(), &[0x0000_0001]);
    }

    #[test]
    fn assemble_empty_source() {
        let image = assemble("").unwrap();
        assert!(image.is_empty());
    }

    #[test]
    fn assemble_mov_immediate() {
        let image = assemble("mov r0 5\nend\n").unwrap();
        assert_eq!(
            image.words(),
            &[
                w(Opcode::Mov, Ext::None, Arg::Reg(Register::R0), Arg::Imm),
                5,
                w(Opcode::End, Ext::None, Arg::None, Arg::None),
            ]
        );
    }

    #[test]
    fn assemble_with_comments_and_blanks() {
        let source = "\
# boot sequence
mov r0 5   # seed

end
";
        let image = assemble(source).unwrap();
        assert_eq!(image.len(), 3);
    }

    #[test]
    fn roundtrip_assemble_disassemble_assemble() {
        let source = "mov r0 5\ncmp r0 7\nmov.eq r0 99\npush r0 r2\npop r0 r2\nend\n";
        let first = assemble(source).unwrap();
        let canonical = disassemble(&first);
        let second = assemble(&canonical).unwrap();
        assert_eq!(first.words(), second.words());
    }

    #[test]
    fn roundtrip_preserves_negative_immediates() {
        let image = assemble("mov r0 0xffffffff\nend\n").unwrap();
        let canonical = disassemble(&image);
        assert_eq!(canonical, "mov r0 0xffffffff\nend\n");
        assert_eq!(assemble(&canonical).unwrap().words(), image.words());
    }

    #[test]
    fn error_missing_argument() {
        let err = assemble("mov r0").unwrap_err();
        assert!(matches!(err, AsmError::ExpectedToken { .. }));
    }

    #[test]
    fn error_undefined_label() {
        let err = assemble("jmp nowhere\nend\n").unwrap_err();
        assert_eq!(
            err,
            AsmError::UndefinedLabel {
                name: "nowhere".to_string(),
                at: 1
            }
        );
    }

    #[test]
    fn error_pop_immediate() {
        let err = assemble("pop 5\n").unwrap_err();
        assert_eq!(
            err,
            AsmError::ArgConstraintUnsatisfied {
                opcode: "pop",
                position: 1,
                constraint: "can only be a register",
            }
        );
    }
}
