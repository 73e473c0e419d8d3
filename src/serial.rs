//! COM1 as a log sink.
//!
//! The port is write-only from our side: no interrupts, no receive path. Each log record becomes
//! one `[LEVEL] target: message` line.

use crate::arch::{inb, outb};
use core::fmt::{self, Write};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

#[derive(Debug, Clone, Copy)]
pub struct SerialPort {
    base: u16,
}

impl SerialPort {
    pub const COM1: SerialPort = SerialPort { base: 0x3F8 };

    /// Programs the UART for 115200 baud, 8N1, FIFOs on.
    pub fn init(&self) {
        unsafe {
            outb(self.base + 1, 0x00); // no interrupts
            outb(self.base + 3, 0x80); // DLAB on
            outb(self.base, 0x01); // divisor low: 115200 baud
            outb(self.base + 1, 0x00); // divisor high
            outb(self.base + 3, 0x03); // 8 bits, no parity, one stop bit
            outb(self.base + 2, 0xC7); // enable and clear FIFOs, 14 byte threshold
            outb(self.base + 4, 0x0B); // DTR, RTS, OUT2
        }
    }

    #[inline]
    fn can_transmit(&self) -> bool {
        unsafe { inb(self.base + 5) & 0x20 != 0 }
    }

    pub fn send(&self, byte: u8) {
        while !self.can_transmit() {
            core::hint::spin_loop();
        }
        unsafe { outb(self.base, byte) }
    }
}

impl Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.send(b'\r');
            }
            self.send(byte);
        }
        Ok(())
    }
}

/// Formats one record the way it appears on the wire.
pub fn write_record(out: &mut impl Write, record: &Record) -> fmt::Result {
    writeln!(out, "[{:<5}] {}: {}", record.level(), record.target(), record.args())
}

pub struct SerialLogger {
    port: SerialPort,
}

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut port = self.port;
            // nothing sensible to do if the line doesn't make it out
            let _ = write_record(&mut port, record);
        }
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger { port: SerialPort::COM1 };

/// Brings up COM1 and routes the `log` macros to it.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    LOGGER.port.init();
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn record_line_format() {
        let mut line = String::new();
        write_record(
            &mut line,
            &Record::builder()
                .level(Level::Info)
                .target("level_os::kernel")
                .args(format_args!("console ready"))
                .build(),
        )
        .unwrap();
        assert_eq!(line, "[INFO ] level_os::kernel: console ready\n");
    }
}
