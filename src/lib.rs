#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod config;
pub mod kernel;
pub mod multiboot;
pub mod serial;
pub mod string;
pub mod version;
pub mod vga_console;
