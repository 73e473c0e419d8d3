//! What the kernel actually does once it has a console: greet, then stop.

use crate::config::{KERNEL_NAME, PANIC_COLOR};
use crate::multiboot::BootError;
use crate::version::{FormatError, Version, VERSION_TEXT_CAPACITY};
use crate::vga_console::{Color, ColorCode, Console, Surface};
use core::fmt::{self, Write};
use log::{debug, info};
use thiserror::Error;

/// Where the kernel is in its (short) life. `Halted` and `Panicked` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Booting,
    Running,
    Halted,
    Panicked,
}

impl Stage {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Stage::Halted | Stage::Panicked)
    }

    /// The stage a normal boot moves on to.
    const fn next(self) -> Option<Stage> {
        match self {
            Stage::Booting => Some(Stage::Running),
            Stage::Running => Some(Stage::Halted),
            Stage::Halted | Stage::Panicked => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("kernel is already {from:?}, cannot move to {to:?}")]
    Terminal { from: Stage, to: Stage },
    #[error("kernel cannot go from {from:?} back to {to:?}")]
    OutOfOrder { from: Stage, to: Stage },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error(transparent)]
    Boot(#[from] BootError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

#[derive(Debug)]
pub struct Lifecycle {
    stage: Stage,
}

impl Lifecycle {
    pub const fn new() -> Lifecycle {
        Lifecycle { stage: Stage::Booting }
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Booting -> Running.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        self.move_to(Stage::Running)
    }

    /// Running -> Halted.
    pub fn halt(&mut self) -> Result<(), LifecycleError> {
        self.move_to(Stage::Halted)
    }

    /// Any live stage -> Panicked.
    pub fn panic(&mut self) -> Result<(), LifecycleError> {
        self.move_to(Stage::Panicked)
    }

    fn move_to(&mut self, to: Stage) -> Result<(), LifecycleError> {
        let from = self.stage;
        if from.is_terminal() {
            return Err(LifecycleError::Terminal { from, to });
        }
        let in_order = match to {
            Stage::Running | Stage::Halted => from.next() == Some(to),
            Stage::Panicked => true,
            Stage::Booting => false,
        };
        if !in_order {
            return Err(LifecycleError::OutOfOrder { from, to });
        }
        debug!("kernel stage {:?} -> {:?}", from, to);
        self.stage = to;
        Ok(())
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::new()
    }
}

const fn on_black(foreground: Color) -> ColorCode {
    ColorCode::new(foreground, Color::Black)
}

/// Writes the boot greeting, version included.
pub fn greet<S: Surface>(console: &mut Console<S>, version: &Version) -> Result<(), FormatError> {
    let mut version_text = [0u8; VERSION_TEXT_CAPACITY];
    let version_text = version.render(&mut version_text)?;

    console.set_color(on_black(Color::LightGreen));
    console.write_text(b"Hello World!\n\0");
    console.write_text(b"Welcome to \0");
    console.write_text(KERNEL_NAME.as_bytes());
    console.write_text(b" v\0");

    console.set_color(on_black(Color::LightCyan));
    console.write(version_text, version_text.len());

    console.set_color(on_black(Color::White));
    console.write_text(b"\n\nKernel loaded successfully!\0");
    console.write_text(b"\nSystem initialized and ready.\0");

    console.write_text(b"\n\n\0");
    console.set_color(on_black(Color::LightRed));
    console.write_text(KERNEL_NAME.as_bytes());
    console.set_color(on_black(Color::White));
    console.write_text(b" - A learning journey into OS development\n\0");

    console.set_color(on_black(Color::LightGray));
    console.write_text(b"Status: Basic terminal output working!\n\0");
    Ok(())
}

/// Boots through to the halted stage. The caller is expected to stop the processor afterwards.
pub fn run<S: Surface>(
    console: &mut Console<S>,
    lifecycle: &mut Lifecycle,
    version: &Version,
) -> Result<(), KernelError> {
    lifecycle.start()?;
    console.initialize();
    info!("{} v{} starting", KERNEL_NAME, version);
    greet(console, version)?;
    info!("greeting written, halting");
    lifecycle.halt()?;
    Ok(())
}

/// Replaces the whole screen with the panic message.
pub fn draw_panic<S: Surface>(console: &mut Console<S>, message: fmt::Arguments) {
    console.set_color(PANIC_COLOR);
    console.clear();
    console.write_text(b"KERNEL PANIC: \0");
    // the console itself never fails; a failing Display impl just cuts the message short.
    let _ = console.write_fmt(message);
    console.write_text(b"\nSystem halted.\0");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vga_console::{MemorySurface, BUFFER_HEIGHT, BUFFER_WIDTH};

    fn row_text(console: &Console<MemorySurface>, y: usize) -> String {
        let row = console.surface().row(y);
        String::from_utf8_lossy(&row).trim_end().to_string()
    }

    #[test]
    fn lifecycle_happy_path() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.stage(), Stage::Booting);
        lifecycle.start().unwrap();
        assert_eq!(lifecycle.stage(), Stage::Running);
        lifecycle.halt().unwrap();
        assert_eq!(lifecycle.stage(), Stage::Halted);
    }

    #[test]
    fn terminal_stages_stay_put() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.panic().unwrap();
        assert_eq!(
            lifecycle.start(),
            Err(LifecycleError::Terminal { from: Stage::Panicked, to: Stage::Running })
        );
        assert!(lifecycle.halt().is_err());
        assert!(lifecycle.panic().is_err());
        assert_eq!(lifecycle.stage(), Stage::Panicked);

        let mut halted = Lifecycle::new();
        halted.start().unwrap();
        halted.halt().unwrap();
        assert!(halted.panic().is_err());
        assert_eq!(halted.stage(), Stage::Halted);
    }

    #[test]
    fn cannot_start_twice() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.start().unwrap();
        assert_eq!(
            lifecycle.start(),
            Err(LifecycleError::OutOfOrder { from: Stage::Running, to: Stage::Running })
        );
    }

    #[test]
    fn cannot_halt_before_running() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(
            lifecycle.halt(),
            Err(LifecycleError::OutOfOrder { from: Stage::Booting, to: Stage::Halted })
        );
        assert_eq!(lifecycle.stage(), Stage::Booting);
        // panicking is allowed from any live stage
        lifecycle.panic().unwrap();
    }

    #[test]
    fn greeting_layout() {
        let mut console = Console::new(MemorySurface::new());
        greet(&mut console, &Version::new(0, 1, 0).with_build(7)).unwrap();

        assert_eq!(row_text(&console, 0), "Hello World!");
        assert_eq!(row_text(&console, 1), "Welcome to Level OS v0.1.0+build7");
        assert_eq!(row_text(&console, 2), "");
        assert_eq!(row_text(&console, 3), "Kernel loaded successfully!");
        assert_eq!(row_text(&console, 4), "System initialized and ready.");
        assert_eq!(row_text(&console, 6), "Level OS - A learning journey into OS development");
        assert_eq!(row_text(&console, 7), "Status: Basic terminal output working!");
        assert_eq!(console.cursor(), (0, 8));
    }

    #[test]
    fn greeting_colors() {
        let mut console = Console::new(MemorySurface::new());
        greet(&mut console, &Version::new(0, 1, 0)).unwrap();
        let surface = console.surface();

        assert_eq!(surface.read_cell(0, 0).color, on_black(Color::LightGreen));
        // "Welcome to Level OS v" is 21 bytes, the version follows in cyan
        assert_eq!(surface.read_cell(20, 1).color, on_black(Color::LightGreen));
        assert_eq!(surface.read_cell(21, 1).color, on_black(Color::LightCyan));
        assert_eq!(surface.read_cell(0, 3).color, on_black(Color::White));
        assert_eq!(surface.read_cell(0, 6).color, on_black(Color::LightRed));
        assert_eq!(surface.read_cell(8, 6).color, on_black(Color::White));
        assert_eq!(surface.read_cell(0, 7).color, on_black(Color::LightGray));
    }

    #[test]
    fn run_ends_halted() {
        let mut console = Console::new(MemorySurface::new());
        let mut lifecycle = Lifecycle::new();
        run(&mut console, &mut lifecycle, &Version::new(0, 1, 0)).unwrap();
        assert_eq!(lifecycle.stage(), Stage::Halted);
        assert_eq!(row_text(&console, 1), "Welcome to Level OS v0.1.0");
    }

    #[test]
    fn run_refuses_after_panic() {
        let mut console = Console::new(MemorySurface::new());
        let mut lifecycle = Lifecycle::new();
        lifecycle.panic().unwrap();
        draw_panic(&mut console, format_args!("early"));

        let err = run(&mut console, &mut lifecycle, &Version::new(0, 1, 0)).unwrap_err();
        assert!(matches!(err, KernelError::Lifecycle(LifecycleError::Terminal { .. })));
        // the panic screen stays up
        assert_eq!(row_text(&console, 0), "KERNEL PANIC: early");
        assert_eq!(console.surface().read_cell(0, 0).color, PANIC_COLOR);
    }

    #[test]
    fn run_after_halt_leaves_screen_alone() {
        let mut console = Console::new(MemorySurface::new());
        let mut lifecycle = Lifecycle::new();
        run(&mut console, &mut lifecycle, &Version::new(0, 1, 0)).unwrap();
        console.write_text(b"after\0");

        assert!(run(&mut console, &mut lifecycle, &Version::new(0, 1, 0)).is_err());
        assert_eq!(row_text(&console, 8), "after");
        assert_eq!(console.cursor(), (5, 8));
    }

    #[test]
    fn panic_screen() {
        let mut console = Console::new(MemorySurface::new());
        console.write_text(b"something before\0");
        draw_panic(&mut console, format_args!("out of {}", "cheese"));

        assert_eq!(row_text(&console, 0), "KERNEL PANIC: out of cheese");
        assert_eq!(row_text(&console, 1), "System halted.");
        for y in 0..BUFFER_HEIGHT {
            for x in 0..BUFFER_WIDTH {
                assert_eq!(console.surface().read_cell(x, y).color, PANIC_COLOR);
            }
        }
    }
}
