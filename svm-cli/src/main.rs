//! SVM command-line driver — assemble and run SVM programs.
//!
//! Exit codes:
//! - 0: success
//! - assembler errors: the assembler error ordinal (3..=6)
//! - VM errors: the VM error ordinal (1..=15)
//! - 1: usage errors

mod commands;
mod screen;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "asm" => commands::asm(&args[2..]),
        "run" => commands::run(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("SVM - Small Virtual Machine");
    eprintln!();
    eprintln!("Usage: svm <command> FILE");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  help      Print this message");
    eprintln!("  asm FILE  Assemble FILE and print the bytecode words");
    eprintln!("  run FILE  Assemble and run FILE with the demo screen device");
    eprintln!();
    eprintln!("The MAX_CYCLES environment variable caps the cycle budget for");
    eprintln!("run (default 128, 0 = unlimited).");
}
