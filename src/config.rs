//! Compile-time kernel configuration.
//!
//! Nothing here is read at runtime: the version comes from the package manifest, the build
//! number from `LEVEL_OS_BUILD_NUMBER` (see `build.rs`), and the log level from cargo features.

use crate::version::Version;
use crate::vga_console::{Color, ColorCode};
use log::LevelFilter;

pub const KERNEL_NAME: &str = "Level OS";

pub const VERSION_MAJOR: u32 = parse_u32(env!("CARGO_PKG_VERSION_MAJOR"));
pub const VERSION_MINOR: u32 = parse_u32(env!("CARGO_PKG_VERSION_MINOR"));
pub const VERSION_PATCH: u32 = parse_u32(env!("CARGO_PKG_VERSION_PATCH"));
pub const BUILD_NUMBER: u32 = parse_u32(env!("LEVEL_OS_BUILD_NUMBER"));

pub const VERSION: Version =
    Version::new(VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH).with_build(BUILD_NUMBER);

/// White on red, used by the panic screen.
pub const PANIC_COLOR: ColorCode = ColorCode::new(Color::White, Color::Red);

/// The most verbose level the kernel logs at, picked by the `log-*` features.
/// When several are enabled the most verbose one wins.
pub const LOG_LEVEL: LevelFilter = if cfg!(feature = "log-trace") {
    LevelFilter::Trace
} else if cfg!(feature = "log-debug") {
    LevelFilter::Debug
} else if cfg!(feature = "log-info") {
    LevelFilter::Info
} else if cfg!(feature = "log-warn") {
    LevelFilter::Warn
} else if cfg!(feature = "log-error") {
    LevelFilter::Error
} else {
    LevelFilter::Off
};

const fn parse_u32(digits: &str) -> u32 {
    let bytes = digits.as_bytes();
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "version component is not a number");
        value = value * 10 + (digit - b'0') as u32;
        i += 1;
    }
    value
}
