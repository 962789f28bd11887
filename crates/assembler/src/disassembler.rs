//! Disassembler: code image → canonical assembly text.
//!
//! Output is flat text, one instruction per line, lowercase mnemonics with
//! dotted suffixes. Immediate words print as decimal when non-negative and
//! as `0x` bit patterns otherwise, so every line re-assembles to the exact
//! words it came from. Label names are gone; references appear as numeric
//! offsets.

use std::fmt::Write as _;

use svm_common::{Arg, CodeImage, Ext, Instruction};

/// Disassemble an image into canonical, re-assemblable text.
pub(crate) fn disassemble(image: &CodeImage) -> String {
    let words = image.words();
    let mut lines = Vec::new();
    let mut index = 0;

    while index < words.len() {
        let word = words[index];
        index += 1;

        let Ok(instr) = Instruction::decode(word) else {
            // Not produced by the assembler; keep the raw word visible.
            lines.push(format!("# 0x{:08x}", word as u32));
            continue;
        };

        let mut line = String::from(instr.op.mnemonic());
        if instr.ext != Ext::None {
            line.push('.');
            line.push_str(instr.ext.suffix());
        }

        for arg in [instr.arg1, instr.arg2] {
            match arg {
                Arg::None => {}
                Arg::Reg(reg) => {
                    line.push(' ');
                    line.push_str(reg.name());
                }
                Arg::Imm => {
                    let value = words.get(index).copied().unwrap_or(0);
                    index += 1;
                    if value >= 0 {
                        let _ = write!(line, " {value}");
                    } else {
                        let _ = write!(line, " 0x{:08x}", value as u32);
                    }
                }
            }
        }

        lines.push(line);
    }

    let mut result = lines.join("\n");
    if !result.is_empty() {
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use svm_common::arg::ALL_REGISTERS;
    use svm_common::Opcode;

    fn r(n: usize) -> Arg {
        Arg::Reg(ALL_REGISTERS[n])
    }

    fn w(op: Opcode, ext: Ext, arg1: Arg, arg2: Arg) -> i32 {
        Instruction::new(op, ext, arg1, arg2).encode()
    }

    #[test]
    fn empty_image() {
        assert_eq!(disassemble(&CodeImage::new(vec![])), "");
    }

    #[test]
    fn bare_opcodes() {
        let image = CodeImage::new(vec![
            w(Opcode::Nop, Ext::None, Arg::None, Arg::None),
            w(Opcode::End, Ext::None, Arg::None, Arg::None),
        ]);
        assert_eq!(disassemble(&image), "nop\nend\n");
    }

    #[test]
    fn suffix_and_registers() {
        let image = CodeImage::new(vec![w(Opcode::Mov, Ext::Eq, r(0), r(15))]);
        assert_eq!(disassemble(&image), "mov.eq r0 r15\n");
    }

    #[test]
    fn immediate_operands() {
        let image = CodeImage::new(vec![w(Opcode::Mov, Ext::None, r(3), Arg::Imm), 99]);
        assert_eq!(disassemble(&image), "mov r3 99\n");
    }

    #[test]
    fn both_immediates_in_order() {
        let image = CodeImage::new(vec![w(Opcode::Cmp, Ext::None, Arg::Imm, Arg::Imm), 5, 7]);
        assert_eq!(disassemble(&image), "cmp 5 7\n");
    }

    #[test]
    fn negative_immediate_prints_as_bit_pattern() {
        let image = CodeImage::new(vec![w(Opcode::Mov, Ext::None, r(0), Arg::Imm), -1]);
        assert_eq!(disassemble(&image), "mov r0 0xffffffff\n");
    }

    #[test]
    fn clf_suffix_is_the_flag_selector() {
        let image = CodeImage::new(vec![w(Opcode::Clf, Ext::Lt, Arg::None, Arg::None)]);
        assert_eq!(disassemble(&image), "clf.lt\n");
    }

    #[test]
    fn unknown_word_is_kept_as_comment() {
        let image = CodeImage::new(vec![0x0000_00FF_u32 as i32]);
        assert_eq!(disassemble(&image), "# 0x000000ff\n");
    }
}
