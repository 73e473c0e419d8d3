// byte-level memory and string helpers, usable before anything else is set up.
// counts larger than the slices they apply to are caller bugs and hit the normal bounds check.

/// Number of bytes before the first NUL. A slice without a NUL counts in full.
pub fn length_of(cstring: &[u8]) -> usize {
    let mut length = 0;
    while length < cstring.len() && cstring[length] != 0 {
        length += 1;
    }
    length
}

/// Sets the first `count` bytes of `dest` to `value`, truncated to a byte.
pub fn fill(dest: &mut [u8], value: i32, count: usize) -> &mut [u8] {
    let byte = value as u8;
    for slot in dest[..count].iter_mut() {
        *slot = byte;
    }
    dest
}

/// Copies `count` bytes from `src` into `dest`, front to back.
pub fn copy<'a>(dest: &'a mut [u8], src: &[u8], count: usize) -> &'a mut [u8] {
    for (d, s) in dest[..count].iter_mut().zip(&src[..count]) {
        *d = *s;
    }
    dest
}

/// Compares the first `count` bytes of `a` and `b`.
///
/// Returns 0 when they match, otherwise `a[i] - b[i]` for the first index where they differ.
pub fn compare(a: &[u8], b: &[u8], count: usize) -> i32 {
    for (x, y) in a[..count].iter().zip(&b[..count]) {
        if x != y {
            return *x as i32 - *y as i32;
        }
    }
    0
}
