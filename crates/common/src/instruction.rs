//! Instruction word packing and unpacking.
//!
//! Every instruction occupies one 32-bit word, packed little-endian:
//! ```text
//! Byte 0: opcode
//! Byte 1: extension (predicate suffix)
//! Byte 2: arg1 type (NONE, register, or IMM)
//! Byte 3: arg2 type (same domain)
//! ```
//! An IMM slot's literal value is the raw signed word that follows, arg1's
//! literal before arg2's when both are immediate, so a full instruction
//! spans one to three words.

use crate::arg::Arg;
use crate::error::DecodeError;
use crate::ext::Ext;
use crate::opcode::Opcode;

/// A single decoded SVM instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub op: Opcode,
    /// Predicate suffix; flag selector for CLF.
    pub ext: Ext,
    /// First argument slot.
    pub arg1: Arg,
    /// Second argument slot.
    pub arg2: Arg,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(op: Opcode, ext: Ext, arg1: Arg, arg2: Arg) -> Self {
        Self {
            op,
            ext,
            arg1,
            arg2,
        }
    }

    /// Pack this instruction into one code word.
    pub fn encode(&self) -> i32 {
        i32::from_le_bytes([
            self.op as u8,
            self.ext as u8,
            self.arg1.to_byte(),
            self.arg2.to_byte(),
        ])
    }

    /// Unpack a code word.
    ///
    /// The opcode byte is validated; unknown opcodes are a decode error so
    /// the VM can report them. Extension and argument bytes decode
    /// leniently, with invalid values mapping to their NONE semantics.
    pub fn decode(word: i32) -> Result<Self, DecodeError> {
        let bytes = word.to_le_bytes();
        Ok(Self {
            op: Opcode::try_from(bytes[0])?,
            ext: Ext::from_byte(bytes[1]),
            arg1: Arg::from_byte(bytes[2]),
            arg2: Arg::from_byte(bytes[3]),
        })
    }

    /// Number of immediate literal words following this instruction.
    pub fn imm_count(&self) -> usize {
        usize::from(self.arg1.is_imm()) + usize::from(self.arg2.is_imm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::Register;

    #[test]
    fn encode_decode_roundtrip_simple() {
        let instr = Instruction::new(Opcode::Nop, Ext::None, Arg::None, Arg::None);
        assert_eq!(Instruction::decode(instr.encode()), Ok(instr));
    }

    #[test]
    fn encode_decode_roundtrip_with_args() {
        let instr = Instruction::new(
            Opcode::Mov,
            Ext::Eq,
            Arg::Reg(Register::R0),
            Arg::Imm,
        );
        assert_eq!(Instruction::decode(instr.encode()), Ok(instr));
    }

    #[test]
    fn byte_layout_is_little_endian() {
        let instr = Instruction::new(
            Opcode::Mov,
            Ext::Eq,
            Arg::Reg(Register::R0),
            Arg::Imm,
        );
        let bytes = instr.encode().to_le_bytes();
        assert_eq!(bytes[0], 2); // mov
        assert_eq!(bytes[1], 1); // eq
        assert_eq!(bytes[2], 1); // r0
        assert_eq!(bytes[3], 17); // imm
    }

    #[test]
    fn smallest_halting_word() {
        let instr = Instruction::new(Opcode::End, Ext::None, Arg::None, Arg::None);
        assert_eq!(instr.encode(), 0x0000_0001);
    }

    #[test]
    fn decode_rejects_unknown_opcode() {
        assert_eq!(
            Instruction::decode(0x0000_00FF_u32 as i32),
            Err(DecodeError::UnknownOpcode(0xFF))
        );
    }

    #[test]
    fn decode_tolerates_invalid_ext_and_args() {
        // opcode nop, ext byte 0x77, arg bytes 0x99/0x42 -- all out of range.
        let word = i32::from_le_bytes([0, 0x77, 0x99, 0x42]);
        let instr = Instruction::decode(word).unwrap();
        assert_eq!(instr.ext, Ext::None);
        assert_eq!(instr.arg1, Arg::None);
        assert_eq!(instr.arg2, Arg::None);
    }

    #[test]
    fn imm_count() {
        let none = Instruction::new(Opcode::Ret, Ext::None, Arg::None, Arg::None);
        let one = Instruction::new(Opcode::Jmp, Ext::None, Arg::Imm, Arg::None);
        let two = Instruction::new(Opcode::Cmp, Ext::None, Arg::Imm, Arg::Imm);
        assert_eq!(none.imm_count(), 0);
        assert_eq!(one.imm_count(), 1);
        assert_eq!(two.imm_count(), 2);
    }
}
