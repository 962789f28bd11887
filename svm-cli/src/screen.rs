//! Demo screen device: the default syscall handler for `svm run`.
//!
//! Models a row of four 8x8 monochrome devices as one 8x32 cell grid.
//! Syscall numbers:
//! - 1: sleep r0 milliseconds
//! - 2: set cell (x = r0, y = r1) to r2
//! - 3: render the grid to stdout
//!
//! Unknown numbers are ignored.

use std::thread;
use std::time::Duration;

use svm_common::REGISTER_COUNT;
use svm_vm::SyscallPort;

const DEVICES: usize = 4;
const HEIGHT: usize = 8;
const WIDTH: usize = 8 * DEVICES;

pub struct ScreenPort {
    cells: [[bool; WIDTH]; HEIGHT],
}

impl ScreenPort {
    pub fn new() -> Self {
        Self {
            cells: [[false; WIDTH]; HEIGHT],
        }
    }

    fn set(&mut self, x: i32, y: i32, value: bool) {
        let Some(x) = usize::try_from(x).ok().filter(|&x| x < WIDTH) else {
            eprintln!("screen overflow (x={x})");
            return;
        };
        let Some(y) = usize::try_from(y).ok().filter(|&y| y < HEIGHT) else {
            eprintln!("screen overflow (y={y})");
            return;
        };
        self.cells[y][x] = value;
    }

    fn render(&self) {
        for row in &self.cells {
            let mut line = String::with_capacity(WIDTH * 2);
            for &on in row.iter() {
                line.push(if on { '1' } else { '0' });
                line.push(' ');
            }
            println!("{}", line.trim_end());
        }
    }
}

impl Default for ScreenPort {
    fn default() -> Self {
        Self::new()
    }
}

impl SyscallPort for ScreenPort {
    fn syscall(&mut self, registers: &mut [i32; REGISTER_COUNT], num: i32) {
        match num {
            1 => {
                let ms = registers[0].max(0) as u64;
                thread::sleep(Duration::from_millis(ms));
            }
            2 => self.set(registers[0], registers[1], registers[2] != 0),
            3 => self.render(),
            _ => {}
        }
    }
}
