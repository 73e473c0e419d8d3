// the handful of privileged x86 instructions the kernel needs.
// on other architectures these degrade to spin loops so the library still builds for host tests.

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use core::arch::asm;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[inline]
pub unsafe fn outb(port: u16, value: u8) {
    asm!("out dx, al", in("dx") port, in("al") value, options(nomem, nostack, preserves_flags));
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[inline]
pub unsafe fn inb(port: u16) -> u8 {
    let ret: u8;
    asm!("in al, dx", in("dx") port, out("al") ret, options(nomem, nostack, preserves_flags));
    ret
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
#[inline]
pub unsafe fn outb(_port: u16, _value: u8) {}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
#[inline]
pub unsafe fn inb(_port: u16) -> u8 {
    0
}

/// Masks external interrupts (`cli`).
#[inline]
pub fn disable_interrupts() {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    unsafe {
        asm!("cli", options(nomem, nostack));
    }
}

/// Parks the processor until the next hardware event (`hlt`).
#[inline]
pub fn halt() {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    unsafe {
        asm!("hlt", options(nomem, nostack, preserves_flags));
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    core::hint::spin_loop();
}

/// Halts forever. With interrupts masked nothing ever wakes us up again.
pub fn halt_forever() -> ! {
    loop {
        halt();
    }
}
