//! CLI command implementations.

use std::fs;

use svm_assembler::AsmError;
use svm_common::CodeImage;
use svm_vm::{Vm, VmError};

use crate::screen::ScreenPort;

const DEFAULT_MAX_CYCLES: u64 = 128;
const WORDS_PER_LINE: usize = 4;

fn assemble_file(path: &str) -> Result<CodeImage, i32> {
    let source = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        AsmError::FileOpenFailed {
            path: path.to_string(),
        }
        .exit_code()
    })?;

    svm_assembler::assemble(&source).map_err(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    })
}

/// Assemble a source file and print the bytecode words to stdout.
///
/// Nothing reaches stdout unless the whole file assembles.
pub fn asm(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: asm requires an input file");
        eprintln!("Usage: svm asm FILE");
        return Err(1);
    }

    let image = assemble_file(&args[0])?;

    for (i, word) in image.words().iter().enumerate() {
        print!("0x{:08x}", *word as u32);
        if (i + 1) % WORDS_PER_LINE == 0 || i + 1 == image.len() {
            println!();
        } else {
            print!(", ");
        }
    }

    Ok(())
}

/// Assemble and execute a source file with the demo screen device.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: svm run FILE");
        return Err(1);
    }

    let image = assemble_file(&args[0])?;

    let max_cycles = match std::env::var("MAX_CYCLES") {
        Ok(value) => value.parse::<u64>().map_err(|_| {
            eprintln!("error: MAX_CYCLES must be a non-negative number");
            1
        })?,
        Err(_) => DEFAULT_MAX_CYCLES,
    };

    let mut vm = Vm::new(Box::new(ScreenPort::new()));
    vm.load(&image).map_err(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    })?;

    match svm_vm::run(&mut vm, max_cycles) {
        Ok(cycles) => {
            eprintln!("execution ended after {cycles} cycles");
            Ok(())
        }
        Err(VmError::Generic) => {
            eprintln!("max cycles reached ({max_cycles})");
            Err(VmError::Generic.exit_code())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(e.exit_code())
        }
    }
}
