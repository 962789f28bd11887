//! Parser and emitter: tokens → packed words, labels and patches.
//!
//! Assembly is a single pass. Instructions emit as soon as they parse;
//! label references that cannot be resolved yet leave a placeholder word
//! and a patch entry, rewritten once the whole source has been read.

use std::collections::HashMap;

use svm_common::{Arg, CodeImage, Ext, Instruction, Opcode, Register};

use crate::error::AsmError;
use crate::lexer::Cursor;

/// Shape constraint for one argument slot of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    /// The slot must stay empty.
    None,
    /// Register or immediate, but present.
    Any,
    /// The slot must name a register.
    RegOnly,
}

impl Constraint {
    fn describe(self) -> &'static str {
        match self {
            Constraint::None => "must be empty",
            Constraint::Any => "can be anything, but not empty",
            Constraint::RegOnly => "can only be a register",
        }
    }

    fn admits(self, arg: Arg) -> bool {
        match self {
            Constraint::None => arg == Arg::None,
            Constraint::Any => arg != Arg::None,
            Constraint::RegOnly => matches!(arg, Arg::Reg(_)),
        }
    }
}

/// Per-opcode argument shape.
struct OpMeta {
    argc: usize,
    arg1: Constraint,
    arg2: Constraint,
    /// PUSH/POP range forms: the second register may be omitted.
    arg2_optional: bool,
}

fn op_meta(op: Opcode) -> OpMeta {
    use Constraint::*;
    match op {
        Opcode::Nop | Opcode::End | Opcode::Clf | Opcode::Ret => OpMeta {
            argc: 0,
            arg1: None,
            arg2: None,
            arg2_optional: false,
        },
        Opcode::Jmp | Opcode::Inv | Opcode::Sys => OpMeta {
            argc: 1,
            arg1: Any,
            arg2: None,
            arg2_optional: false,
        },
        Opcode::Mov
        | Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Shl
        | Opcode::Shr
        | Opcode::Cmp => OpMeta {
            argc: 2,
            arg1: Any,
            arg2: Any,
            arg2_optional: false,
        },
        Opcode::Push => OpMeta {
            argc: 2,
            arg1: Any,
            arg2: RegOnly,
            arg2_optional: true,
        },
        Opcode::Pop => OpMeta {
            argc: 2,
            arg1: RegOnly,
            arg2: RegOnly,
            arg2_optional: true,
        },
    }
}

/// Classify an argument token. Anything that is not a register name is an
/// immediate slot; whether it is a numeric literal or a label reference is
/// decided at emission time.
fn parse_arg(token: &str) -> Arg {
    match Register::from_name(token) {
        Some(reg) => Arg::Reg(reg),
        None => Arg::Imm,
    }
}

/// Parse a numeric literal: decimal, `0x` hex, or `0b` binary.
///
/// Hex and binary accept the full unsigned 32-bit range so any bit pattern
/// is expressible. Tokens that fail to parse are label references.
pub(crate) fn parse_int(token: &str) -> Option<i32> {
    if let Some(hex) = token.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok().map(|v| v as i32)
    } else if let Some(bin) = token.strip_prefix("0b") {
        u32::from_str_radix(bin, 2).ok().map(|v| v as i32)
    } else {
        token.parse::<u32>().ok().map(|v| v as i32)
    }
}

/// A forward reference awaiting its label's offset.
struct Patch {
    name: String,
    at: usize,
}

#[derive(Default)]
struct Assembler {
    code: Vec<i32>,
    labels: HashMap<String, i32>,
    patches: Vec<Patch>,
}

impl Assembler {
    fn statement(&mut self, first: &str, cursor: &mut Cursor<'_>) -> Result<(), AsmError> {
        let Some(op) = Opcode::from_mnemonic(first) else {
            // Not a mnemonic: a label bound to the current emit offset.
            // A trailing colon on the defining token is cosmetic.
            let name = first.strip_suffix(':').unwrap_or(first);
            self.labels
                .entry(name.to_string())
                .or_insert(self.code.len() as i32);
            return Ok(());
        };

        let meta = op_meta(op);

        // Optional predicate suffix.
        let ext = match cursor.peek_token().and_then(Ext::from_suffix) {
            Some(ext) => {
                cursor.next_token();
                ext
            }
            None => Ext::None,
        };

        let mut arg1 = Arg::None;
        let mut arg1_token = "";
        if meta.argc > 0 {
            let token = cursor.next_token().ok_or_else(|| AsmError::ExpectedToken {
                after: first.to_string(),
            })?;
            arg1 = parse_arg(token);
            arg1_token = token;
            if !meta.arg1.admits(arg1) {
                return Err(AsmError::ArgConstraintUnsatisfied {
                    opcode: op.mnemonic(),
                    position: 1,
                    constraint: meta.arg1.describe(),
                });
            }
        }

        let mut arg2 = Arg::None;
        let mut arg2_token = "";
        if meta.argc > 1 {
            if meta.arg2_optional {
                // Range forms: the second operand is only ever a register,
                // so anything else belongs to the next statement.
                if let Some(token) = cursor.peek_token() {
                    if Register::from_name(token).is_some() {
                        cursor.next_token();
                        arg2 = parse_arg(token);
                        arg2_token = token;
                    }
                }
            } else {
                let token = cursor.next_token().ok_or_else(|| AsmError::ExpectedToken {
                    after: arg1_token.to_string(),
                })?;
                arg2 = parse_arg(token);
                arg2_token = token;
                if !meta.arg2.admits(arg2) {
                    return Err(AsmError::ArgConstraintUnsatisfied {
                        opcode: op.mnemonic(),
                        position: 2,
                        constraint: meta.arg2.describe(),
                    });
                }
            }
        }

        self.code.push(Instruction::new(op, ext, arg1, arg2).encode());
        if arg1.is_imm() {
            self.emit_literal(arg1_token);
        }
        if arg2.is_imm() {
            self.emit_literal(arg2_token);
        }
        Ok(())
    }

    /// Emit an immediate word: a parsed literal, a known label's offset, or
    /// a placeholder plus a patch entry for a forward reference.
    fn emit_literal(&mut self, token: &str) {
        let word = match parse_int(token) {
            Some(value) => value,
            None => match self.labels.get(token) {
                Some(&location) => location,
                None => {
                    self.patches.push(Patch {
                        name: token.to_string(),
                        at: self.code.len(),
                    });
                    0
                }
            },
        };
        self.code.push(word);
    }

    fn patch_labels(&mut self) -> Result<(), AsmError> {
        for patch in &self.patches {
            let location =
                self.labels
                    .get(&patch.name)
                    .ok_or_else(|| AsmError::UndefinedLabel {
                        name: patch.name.clone(),
                        at: patch.at,
                    })?;
            self.code[patch.at] = *location;
        }
        Ok(())
    }
}

/// Assemble source text into a code image.
pub(crate) fn assemble(source: &str) -> Result<CodeImage, AsmError> {
    let mut asm = Assembler::default();
    let mut cursor = Cursor::new(source);

    while let Some(token) = cursor.next_token() {
        asm.statement(token, &mut cursor)?;
    }
    asm.patch_labels()?;

    Ok(CodeImage::new(asm.code))
}
