use crate::arch;
use crate::string::length_of;
use core::fmt;
use volatile::Volatile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0x0,
    Blue = 0x1,
    Green = 0x2,
    Cyan = 0x3,
    Red = 0x4,
    Magenta = 0x5,
    Brown = 0x6,
    LightGray = 0x7,
    DarkGray = 0x8,
    LightBlue = 0x9,
    LightGreen = 0xA,
    LightCyan = 0xB,
    LightRed = 0xC,
    Pink = 0xD,
    Yellow = 0xE,
    White = 0xF,
}

/// VGA attribute byte: foreground in the low nibble, background in the high one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    pub const fn new(foreground: Color, background: Color) -> ColorCode {
        ColorCode(((background as u8) << 4) | (foreground as u8))
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn foreground_bits(self) -> u8 {
        self.0 & 0x0F
    }

    #[inline]
    pub const fn background_bits(self) -> u8 {
        self.0 >> 4
    }
}

/// Light grey on black, what the screen looks like after `initialize`.
pub const DEFAULT_COLOR: ColorCode = ColorCode::new(Color::LightGray, Color::Black);

/// One text cell. The layout matches the hardware: character in the low byte, attribute in the high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Char {
    pub byte: u8,
    pub color: ColorCode,
}

impl Char {
    pub const fn new(byte: u8, color: ColorCode) -> Char {
        Char { byte, color }
    }

    pub const fn blank(color: ColorCode) -> Char {
        Char { byte: b' ', color }
    }

    /// The 16-bit word the display hardware reads for this cell.
    #[cfg(test)]
    const fn to_u16(self) -> u16 {
        (self.byte as u16) | ((self.color.0 as u16) << 8)
    }
}

pub const BUFFER_WIDTH: usize = 80;
pub const BUFFER_HEIGHT: usize = 25;
pub const BUFFER_SIZE: usize = BUFFER_WIDTH * BUFFER_HEIGHT;

/// Something the console can draw cells onto.
///
/// Coordinates handed to a surface are always inside the grid; the console wraps them first.
pub trait Surface {
    fn write_cell(&mut self, x: usize, y: usize, cell: Char);
    fn read_cell(&self, x: usize, y: usize) -> Char;
    /// Moves the visible cursor, if the surface has one.
    fn set_cursor(&mut self, _x: usize, _y: usize) {}
}

#[repr(transparent)]
struct Buffer {
    cells: [Volatile<Char>; BUFFER_SIZE],
}

/// The memory-mapped VGA text buffer.
pub struct VgaBuffer {
    buffer: &'static mut Buffer,
}

impl VgaBuffer {
    pub const ADDRESS: usize = 0xB8000;

    /// # Safety
    /// The VGA text buffer must be identity mapped at [`VgaBuffer::ADDRESS`] and nothing else may
    /// hold a `VgaBuffer` at the same time.
    pub unsafe fn new() -> VgaBuffer {
        VgaBuffer { buffer: &mut *(Self::ADDRESS as *mut Buffer) }
    }
}

impl Surface for VgaBuffer {
    #[inline]
    fn write_cell(&mut self, x: usize, y: usize, cell: Char) {
        self.buffer.cells[y * BUFFER_WIDTH + x].write(cell);
    }

    #[inline]
    fn read_cell(&self, x: usize, y: usize) -> Char {
        self.buffer.cells[y * BUFFER_WIDTH + x].read()
    }

    fn set_cursor(&mut self, x: usize, y: usize) {
        let pos = y * BUFFER_WIDTH + x;
        unsafe {
            // 0x3D4/5 - the CRT controller index/data ports.
            // register 0x0E takes the high byte of the position, 0x0F the low byte.
            arch::outb(0x3D4, 0x0E);
            arch::outb(0x3D5, ((pos >> 8) & 0xFF) as u8);
            arch::outb(0x3D4, 0x0F);
            arch::outb(0x3D5, (pos & 0xFF) as u8);
        }
    }
}

/// An ordinary in-memory grid. Used by tests and by the host preview.
#[derive(Clone)]
pub struct MemorySurface {
    cells: [Char; BUFFER_SIZE],
    cursor: (usize, usize),
}

impl MemorySurface {
    pub const fn new() -> MemorySurface {
        MemorySurface {
            cells: [Char::new(0, ColorCode(0)); BUFFER_SIZE],
            cursor: (0, 0),
        }
    }

    /// The character bytes of row `y`.
    pub fn row(&self, y: usize) -> [u8; BUFFER_WIDTH] {
        let mut out = [0u8; BUFFER_WIDTH];
        for (x, byte) in out.iter_mut().enumerate() {
            *byte = self.cells[y * BUFFER_WIDTH + x].byte;
        }
        out
    }

    /// Where the last `set_cursor` call put the visible cursor.
    pub fn hardware_cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn cells(&self) -> &[Char] {
        &self.cells
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        MemorySurface::new()
    }
}

impl Surface for MemorySurface {
    fn write_cell(&mut self, x: usize, y: usize, cell: Char) {
        self.cells[y * BUFFER_WIDTH + x] = cell;
    }

    fn read_cell(&self, x: usize, y: usize) -> Char {
        self.cells[y * BUFFER_WIDTH + x]
    }

    fn set_cursor(&mut self, x: usize, y: usize) {
        self.cursor = (x, y);
    }
}

/// Cursor and color bookkeeping on top of a [`Surface`].
///
/// Output never scrolls: running off the last row wraps to the top and overwrites what is there.
pub struct Console<S: Surface> {
    column: usize,
    row: usize,
    color: ColorCode,
    surface: S,
}

impl<S: Surface> Console<S> {
    /// Takes ownership of `surface` and initializes it.
    pub fn new(surface: S) -> Console<S> {
        let mut console = Console {
            column: 0,
            row: 0,
            color: DEFAULT_COLOR,
            surface,
        };
        console.initialize();
        console
    }

    /// Resets the cursor and the color, then clears the screen.
    pub fn initialize(&mut self) {
        self.column = 0;
        self.row = 0;
        self.color = DEFAULT_COLOR;
        self.clear();
    }

    #[inline]
    pub fn set_color(&mut self, color: ColorCode) {
        self.color = color;
    }

    #[inline]
    pub fn color(&self) -> ColorCode {
        self.color
    }

    /// `(column, row)` of the next write.
    #[inline]
    pub fn cursor(&self) -> (usize, usize) {
        (self.column, self.row)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Writes a single cell without touching the cursor.
    ///
    /// Off-screen coordinates trip a debug assertion; release builds wrap them onto the grid.
    pub fn write_cell_at(&mut self, byte: u8, color: ColorCode, x: usize, y: usize) {
        debug_assert!(
            x < BUFFER_WIDTH && y < BUFFER_HEIGHT,
            "cell ({}, {}) is outside the {}x{} screen",
            x,
            y,
            BUFFER_WIDTH,
            BUFFER_HEIGHT
        );
        self.surface
            .write_cell(x % BUFFER_WIDTH, y % BUFFER_HEIGHT, Char::new(byte, color));
    }

    pub fn put_char(&mut self, byte: u8) {
        self.put_char_raw(byte);
        self.sync_cursor();
    }

    /// Writes the first `count` bytes of `bytes`.
    pub fn write(&mut self, bytes: &[u8], count: usize) {
        for byte in &bytes[..count] {
            self.put_char_raw(*byte);
        }
        self.sync_cursor();
    }

    /// Writes a NUL-terminated string (or the whole slice, if it has no NUL).
    pub fn write_text(&mut self, cstring: &[u8]) {
        self.write(cstring, length_of(cstring));
    }

    pub fn clear(&mut self) {
        let blank = Char::blank(self.color);
        for y in 0..BUFFER_HEIGHT {
            for x in 0..BUFFER_WIDTH {
                self.surface.write_cell(x, y, blank);
            }
        }
        self.column = 0;
        self.row = 0;
        self.sync_cursor();
    }

    /// Put a character without updating the visible cursor.
    fn put_char_raw(&mut self, byte: u8) {
        if byte == b'\n' {
            self.new_line();
            return;
        }

        self.surface
            .write_cell(self.column, self.row, Char::new(byte, self.color));

        self.column += 1;
        if self.column == BUFFER_WIDTH {
            self.new_line();
        }
    }

    fn new_line(&mut self) {
        self.column = 0;
        self.row += 1;
        if self.row == BUFFER_HEIGHT {
            self.row = 0;
        }
    }

    #[inline]
    fn sync_cursor(&mut self) {
        self.surface.set_cursor(self.column, self.row);
    }
}

impl<S: Surface> fmt::Write for Console<S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            match c {
                ' '..='~' | '\n' => self.put_char_raw(c as u8),
                '\t' => {
                    for _ in 0..4 {
                        self.put_char_raw(b' ');
                    }
                }
                _ => self.put_char_raw(b'?'),
            }
        }
        self.sync_cursor();
        Ok(())
    }
}

#[cfg(target_os = "none")]
pub use kernel_console::*;

#[cfg(target_os = "none")]
mod kernel_console {
    use super::{Console, VgaBuffer};
    use core::fmt;
    use spin::{Lazy, Mutex};

    /// The console on the real screen.
    pub static CONSOLE: Lazy<Mutex<Console<VgaBuffer>>> =
        Lazy::new(|| Mutex::new(Console::new(unsafe { VgaBuffer::new() })));

    #[doc(hidden)]
    pub fn _print(args: fmt::Arguments) {
        use core::fmt::Write;
        // writing to the console can't fail.
        let _ = CONSOLE.lock().write_fmt(args);
    }
}

#[cfg(target_os = "none")]
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::vga_console::_print(format_args!($($arg)*)));
}

#[cfg(target_os = "none")]
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}
