//! Turning version numbers into text without an allocator.

use core::fmt;
use thiserror::Error;

/// Digits in the largest `u32`.
pub const MAX_DIGITS: usize = 10;

/// Room for `4294967295.4294967295.4294967295+build4294967295`.
pub const VERSION_TEXT_CAPACITY: usize = 4 * MAX_DIGITS + 3 + "build".len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("text needs {needed} bytes but only {available} are available")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Writes the decimal digits of `value` to the front of `out` and returns them.
pub fn format_unsigned(mut value: u32, out: &mut [u8]) -> Result<&[u8], FormatError> {
    let mut digits = [0u8; MAX_DIGITS];
    let mut len = 0;
    loop {
        digits[len] = b'0' + (value % 10) as u8;
        len += 1;
        value /= 10;
        if value == 0 {
            break;
        }
    }

    if len > out.len() {
        return Err(FormatError::BufferTooSmall { needed: len, available: out.len() });
    }
    // digits came out least significant first
    for (slot, digit) in out.iter_mut().zip(digits[..len].iter().rev()) {
        *slot = *digit;
    }
    Ok(&out[..len])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: Option<u32>,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Version {
        Version { major, minor, patch, build: None }
    }

    pub const fn with_build(self, build: u32) -> Version {
        Version { build: Some(build), ..self }
    }

    /// Renders `major.minor.patch`, plus `+buildN` when a build number is set, into `out`.
    pub fn render<'a>(&self, out: &'a mut [u8]) -> Result<&'a [u8], FormatError> {
        let mut text = TextWriter { out, len: 0 };
        text.number(self.major)?;
        text.bytes(b".")?;
        text.number(self.minor)?;
        text.bytes(b".")?;
        text.number(self.patch)?;
        if let Some(build) = self.build {
            text.bytes(b"+build")?;
            text.number(build)?;
        }
        let len = text.len;
        Ok(&text.out[..len])
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buffer = [0u8; VERSION_TEXT_CAPACITY];
        let text = self.render(&mut buffer).map_err(|_| fmt::Error)?;
        // only digits, dots and "+build" in there
        f.write_str(core::str::from_utf8(text).map_err(|_| fmt::Error)?)
    }
}

struct TextWriter<'a> {
    out: &'a mut [u8],
    len: usize,
}

impl TextWriter<'_> {
    fn bytes(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        let end = self.len + bytes.len();
        if end > self.out.len() {
            return Err(FormatError::BufferTooSmall { needed: end, available: self.out.len() });
        }
        self.out[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    fn number(&mut self, value: u32) -> Result<(), FormatError> {
        let mut digits = [0u8; MAX_DIGITS];
        let digits = format_unsigned(value, &mut digits)?;
        self.bytes(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_zero() {
        let mut buffer = [0u8; 4];
        assert_eq!(format_unsigned(0, &mut buffer), Ok(&b"0"[..]));
    }

    #[test]
    fn formats_multi_digit() {
        let mut buffer = [0u8; MAX_DIGITS];
        assert_eq!(format_unsigned(42, &mut buffer), Ok(&b"42"[..]));
        assert_eq!(format_unsigned(u32::MAX, &mut buffer), Ok(&b"4294967295"[..]));
    }

    #[test]
    fn rejects_small_buffer() {
        let mut buffer = [0u8; 2];
        assert_eq!(
            format_unsigned(100, &mut buffer),
            Err(FormatError::BufferTooSmall { needed: 3, available: 2 })
        );
    }

    #[test]
    fn renders_plain_version() {
        let mut buffer = [0u8; VERSION_TEXT_CAPACITY];
        let text = Version::new(0, 1, 0).render(&mut buffer).unwrap();
        assert_eq!(text, b"0.1.0");
    }

    #[test]
    fn renders_build_suffix() {
        let mut buffer = [0u8; VERSION_TEXT_CAPACITY];
        let text = Version::new(0, 1, 0).with_build(42).render(&mut buffer).unwrap();
        assert_eq!(text, b"0.1.0+build42");
    }

    #[test]
    fn components_above_nine_render_in_full() {
        let version = Version::new(12, 0, 305).with_build(100);
        let mut buffer = [0u8; VERSION_TEXT_CAPACITY];
        assert_eq!(version.render(&mut buffer).unwrap(), b"12.0.305+build100");
        assert_eq!(format!("{version}"), "12.0.305+build100");
    }

    #[test]
    fn render_reports_overflow() {
        let mut buffer = [0u8; 4];
        assert_eq!(
            Version::new(0, 1, 0).render(&mut buffer),
            Err(FormatError::BufferTooSmall { needed: 5, available: 4 })
        );
    }

    #[test]
    fn capacity_fits_largest_version() {
        let max = Version::new(u32::MAX, u32::MAX, u32::MAX).with_build(u32::MAX);
        let mut buffer = [0u8; VERSION_TEXT_CAPACITY];
        assert_eq!(max.render(&mut buffer).unwrap().len(), VERSION_TEXT_CAPACITY);
    }

    proptest! {
        #[test]
        fn matches_std_formatting(value in any::<u32>()) {
            let mut buffer = [0u8; MAX_DIGITS];
            let digits = format_unsigned(value, &mut buffer).unwrap();
            let expected = value.to_string();
            prop_assert_eq!(digits, expected.as_bytes());
        }
    }
}
