//! The execution cycle: fetch, decode, operand read, predicate check,
//! effect, flag side effects.

use svm_common::{Arg, CodeImage, Instruction, Opcode};

use crate::error::VmError;
use crate::machine::Vm;
use crate::task::Task;

/// Resolve one argument slot to a value.
///
/// Register slots read the register file; IMM slots consume the next code
/// word and advance the pc. This happens for both slots in order on every
/// cycle, before the predicate is evaluated, so immediate words are skipped
/// even when the instruction's effect is suppressed.
fn operand(code: &CodeImage, task: &mut Task, arg: Arg, at: usize) -> Result<i32, VmError> {
    match arg {
        Arg::None => Ok(0),
        Arg::Reg(r) => Ok(task.registers[r.index()]),
        Arg::Imm => {
            let word = code.word(task.pc).ok_or(VmError::CodeOverflow { at })?;
            task.pc += 1;
            Ok(word)
        }
    }
}

/// Validate a jump target against the code image.
fn jump_target(code: &CodeImage, target: i32, at: usize) -> Result<usize, VmError> {
    usize::try_from(target)
        .ok()
        .filter(|&t| t < code.len())
        .ok_or(VmError::JmpOverflow { at, target })
}

/// Shared shape of MOV and the arithmetic/logic ops: write `f(dst, src)`
/// into the destination register and note the NZ/Z side effect.
fn write_dst(
    task: &mut Task,
    instr: &Instruction,
    src: i32,
    at: usize,
    f: fn(i32, i32) -> i32,
) -> Result<(), VmError> {
    let reg = instr.arg1.reg().ok_or(VmError::ArgNotReg { at })?;
    let result = f(task.registers[reg.index()], src);
    task.registers[reg.index()] = result;
    task.flags.note_result(result);
    Ok(())
}

fn push(task: &mut Task, instr: &Instruction, v1: i32, at: usize) -> Result<(), VmError> {
    match (instr.arg1, instr.arg2) {
        // Literal form: push the consumed immediate.
        (Arg::Imm, _) => task.push_word(v1, at),
        (Arg::Reg(r), Arg::None) => {
            let value = task.registers[r.index()];
            task.push_word(value, at)
        }
        (Arg::Reg(lo), Arg::Reg(hi)) => {
            if lo >= hi {
                return Err(VmError::PushArgBadOrder { at });
            }
            let count = hi.index() - lo.index() + 1;
            if task.sp + count > task.stack_capacity() {
                return Err(VmError::StackOverflow { at });
            }
            for r in lo.index()..=hi.index() {
                let value = task.registers[r];
                task.push_word(value, at)?;
            }
            Ok(())
        }
        _ => Err(VmError::ArgNotReg { at }),
    }
}

fn pop(task: &mut Task, instr: &Instruction, at: usize) -> Result<(), VmError> {
    match (instr.arg1, instr.arg2) {
        (Arg::Reg(r), Arg::None) => {
            let value = task.pop_word(at)?;
            task.registers[r.index()] = value;
            Ok(())
        }
        (Arg::Reg(lo), Arg::Reg(hi)) => {
            if lo >= hi {
                return Err(VmError::PushArgBadOrder { at });
            }
            let count = hi.index() - lo.index() + 1;
            if task.sp < count {
                return Err(VmError::StackUnderflow { at });
            }
            // Highest register first, so a matched push/pop pair
            // round-trips the register values.
            for r in (lo.index()..=hi.index()).rev() {
                task.registers[r] = task.pop_word(at)?;
            }
            Ok(())
        }
        _ => Err(VmError::ArgNotReg { at }),
    }
}

impl Vm<'_> {
    /// Advance the current task by exactly one instruction (one to three
    /// words), or return an error without advancing further.
    ///
    /// The VM's running flag is cleared only for terminal conditions: END
    /// and code overflow. Division by zero is not trapped and panics, as
    /// documented in the non-goals.
    pub fn cycle(&mut self) -> Result<(), VmError> {
        if !self.running {
            return Err(VmError::NotRunning);
        }
        let code = self.code.ok_or(VmError::NotRunning)?;
        let cur = self.current.ok_or(VmError::TaskNotFound)?;
        let task = self.slots[cur].as_mut().ok_or(VmError::TaskNotFound)?;

        if task.pc >= code.len() {
            self.running = false;
            return Err(VmError::CodeOverflow { at: task.pc });
        }

        let at = task.pc;
        let word = code.word(at).expect("pc bounds checked above");
        task.pc += 1;

        let instr = match Instruction::decode(word) {
            Ok(instr) => instr,
            Err(_) => {
                return Err(VmError::UnknownInstruction {
                    at,
                    opcode: word.to_le_bytes()[0],
                });
            }
        };

        // Operand read consumes IMM words unconditionally; a truncated
        // immediate is terminal like any other code overflow.
        let v1 = match operand(code, task, instr.arg1, at) {
            Ok(value) => value,
            Err(e) => {
                self.running = false;
                return Err(e);
            }
        };
        let v2 = match operand(code, task, instr.arg2, at) {
            Ok(value) => value,
            Err(e) => {
                self.running = false;
                return Err(e);
            }
        };

        let take = task.flags.test(instr.ext);

        match instr.op {
            Opcode::Nop => {}

            Opcode::End => {
                self.running = false;
            }

            Opcode::Mov => {
                if take {
                    write_dst(task, &instr, v2, at, |_, src| src)?;
                }
            }

            Opcode::Add => {
                if take {
                    write_dst(task, &instr, v2, at, i32::wrapping_add)?;
                }
            }

            Opcode::Sub => {
                if take {
                    write_dst(task, &instr, v2, at, i32::wrapping_sub)?;
                }
            }

            Opcode::Mul => {
                if take {
                    write_dst(task, &instr, v2, at, i32::wrapping_mul)?;
                }
            }

            Opcode::Div => {
                if take {
                    write_dst(task, &instr, v2, at, i32::wrapping_div)?;
                }
            }

            Opcode::And => {
                if take {
                    write_dst(task, &instr, v2, at, |dst, src| dst & src)?;
                }
            }

            Opcode::Or => {
                if take {
                    write_dst(task, &instr, v2, at, |dst, src| dst | src)?;
                }
            }

            Opcode::Xor => {
                if take {
                    write_dst(task, &instr, v2, at, |dst, src| dst ^ src)?;
                }
            }

            Opcode::Shl => {
                if take {
                    write_dst(task, &instr, v2, at, |dst, src| dst.wrapping_shl(src as u32))?;
                }
            }

            Opcode::Shr => {
                if take {
                    write_dst(task, &instr, v2, at, |dst, src| dst.wrapping_shr(src as u32))?;
                }
            }

            Opcode::Push => {
                if take {
                    push(task, &instr, v1, at)?;
                }
            }

            Opcode::Pop => {
                if take {
                    pop(task, &instr, at)?;
                }
            }

            Opcode::Cmp => {
                // Accumulates: bits are only set, never cleared here.
                if v1 == v2 {
                    task.flags.eq = true;
                }
                if v1 != v2 {
                    task.flags.ne = true;
                }
                if v1 > v2 {
                    task.flags.gt = true;
                }
                if v1 >= v2 {
                    task.flags.ge = true;
                }
                if v1 < v2 {
                    task.flags.lt = true;
                }
                if v1 <= v2 {
                    task.flags.le = true;
                }
            }

            Opcode::Clf => {
                // The suffix slot doubles as the flag selector here.
                task.flags.set(instr.ext, false);
            }

            Opcode::Jmp => {
                if take {
                    task.pc = jump_target(code, v1, at)?;
                }
            }

            Opcode::Inv => {
                if take {
                    if task.rpc >= task.call_stack_capacity() {
                        return Err(VmError::CallStackOverflow { at });
                    }
                    let target = jump_target(code, v1, at)?;
                    task.call_stack[task.rpc] = task.pc as i32;
                    task.rpc += 1;
                    task.pc = target;
                }
            }

            Opcode::Ret => {
                if task.rpc == 0 {
                    return Err(VmError::CallStackUnderflow { at });
                }
                task.rpc -= 1;
                task.pc = task.call_stack[task.rpc] as usize;
            }

            Opcode::Sys => {
                self.port.syscall(&mut task.registers, v1);
            }
        }

        Ok(())
    }
}
