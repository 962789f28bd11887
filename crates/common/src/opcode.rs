//! Opcode definitions for the SVM instruction set.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute ensures each variant has a stable byte value;
/// the assignment is part of the bytecode format and must not change.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Does nothing.
    Nop = 0,
    /// Terminates execution.
    End = 1,
    /// Write the source operand into the destination register.
    Mov = 2,
    /// Push a literal, a single register, or an ascending register range.
    Push = 3,
    /// Pop into a single register or a register range (highest first).
    Pop = 4,
    /// Destination += source.
    Add = 5,
    /// Destination -= source.
    Sub = 6,
    /// Destination *= source.
    Mul = 7,
    /// Destination /= source. Division by zero is not trapped.
    Div = 8,
    /// Bitwise AND.
    And = 9,
    /// Bitwise OR.
    Or = 10,
    /// Bitwise XOR.
    Xor = 11,
    /// Shift left; the count is the low five bits of the source.
    Shl = 12,
    /// Arithmetic shift right; the count is the low five bits of the source.
    Shr = 13,
    /// Signed compare; accumulates EQ/NE/LT/LE/GT/GE flags.
    Cmp = 14,
    /// Clear the flag named by the suffix, or all flags without a suffix.
    Clf = 15,
    /// Jump to an address inside the code image.
    Jmp = 16,
    /// Invoke: push the return pc to the call stack, then jump.
    Inv = 17,
    /// Return: pop the most recent pc from the call stack.
    Ret = 18,
    /// Invoke the host syscall port with the operand as syscall number.
    Sys = 19,
}

/// All valid opcodes, in encoding order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 20] = [
    Opcode::Nop,
    Opcode::End,
    Opcode::Mov,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
    Opcode::Shl,
    Opcode::Shr,
    Opcode::Cmp,
    Opcode::Clf,
    Opcode::Jmp,
    Opcode::Inv,
    Opcode::Ret,
    Opcode::Sys,
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Nop),
            1 => Ok(Opcode::End),
            2 => Ok(Opcode::Mov),
            3 => Ok(Opcode::Push),
            4 => Ok(Opcode::Pop),
            5 => Ok(Opcode::Add),
            6 => Ok(Opcode::Sub),
            7 => Ok(Opcode::Mul),
            8 => Ok(Opcode::Div),
            9 => Ok(Opcode::And),
            10 => Ok(Opcode::Or),
            11 => Ok(Opcode::Xor),
            12 => Ok(Opcode::Shl),
            13 => Ok(Opcode::Shr),
            14 => Ok(Opcode::Cmp),
            15 => Ok(Opcode::Clf),
            16 => Ok(Opcode::Jmp),
            17 => Ok(Opcode::Inv),
            18 => Ok(Opcode::Ret),
            19 => Ok(Opcode::Sys),
            _ => Err(DecodeError::UnknownOpcode(value)),
        }
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::End => "end",
            Opcode::Mov => "mov",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Shl => "shl",
            Opcode::Shr => "shr",
            Opcode::Cmp => "cmp",
            Opcode::Clf => "clf",
            Opcode::Jmp => "jmp",
            Opcode::Inv => "inv",
            Opcode::Ret => "ret",
            Opcode::Sys => "sys",
        }
    }

    /// Looks up an opcode by its assembly mnemonic.
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        ALL_OPCODES.iter().find(|op| op.mnemonic() == name).copied()
    }
}
