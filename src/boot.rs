// multiboot header and the very first instructions we run.
// the loader drops us in 32-bit protected mode with paging off, EAX = magic and EBX = info.
// all that's missing is a stack, then we go straight to `kernel_main`.
// esp has to be 16-byte aligned at the call: 8 bytes of padding plus the two 4-byte arguments.

use core::arch::global_asm;

global_asm!(
    r#"
    .set MB_ALIGN,    1 << 0
    .set MB_MEMINFO,  1 << 1
    .set MB_FLAGS,    MB_ALIGN | MB_MEMINFO
    .set MB_MAGIC,    {magic}
    .set MB_CHECKSUM, -(MB_MAGIC + MB_FLAGS)

    .section .multiboot, "a"
    .align 4
    .long MB_MAGIC
    .long MB_FLAGS
    .long MB_CHECKSUM

    .section .bss
    .align 16
stack_bottom:
    .skip 16384
stack_top:

    .section .text
    .global _start
_start:
    mov esp, offset stack_top
    sub esp, 8
    push ebx
    push eax
    call kernel_main
1:
    cli
    hlt
    jmp 1b
    "#,
    magic = const level_os::multiboot::HEADER_MAGIC,
);
