// the parts of the multiboot v1 handoff we look at.
// https://www.gnu.org/software/grub/manual/multiboot/multiboot.html

use thiserror::Error;

/// Goes in our image header so the loader recognizes us.
pub const HEADER_MAGIC: u32 = 0x1BADB002;
/// The loader leaves this in EAX. Anything else means we weren't started by a multiboot loader.
pub const BOOTLOADER_MAGIC: u32 = 0x2BADB002;
/// Set in `flags` when `mem_lower`/`mem_upper` are valid.
pub const INFO_MEMORY: u32 = 0x00000001;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MultibootInfo {
    pub flags: u32,
    pub mem_lower: u32,
    pub mem_upper: u32,
    // the real struct goes on for a while (120 bytes total), none of which we use.
    _rest: [u8; 120 - 3 * 4],
}

impl MultibootInfo {
    #[cfg(test)]
    const fn new(flags: u32, mem_lower: u32, mem_upper: u32) -> MultibootInfo {
        MultibootInfo { flags, mem_lower, mem_upper, _rest: [0; 120 - 3 * 4] }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BootError {
    #[error("bootloader magic number incorrect: {found:#010x}")]
    BadMagic { found: u32 },
    #[error("multiboot info pointer is null")]
    NullInfo,
    #[error("basic multiboot memory info missing (flags {flags:#x})")]
    MissingMemoryInfo { flags: u32 },
}

/// Checks what the loader handed us.
pub fn verify(magic: u32, info: Option<&MultibootInfo>) -> Result<&MultibootInfo, BootError> {
    if magic != BOOTLOADER_MAGIC {
        return Err(BootError::BadMagic { found: magic });
    }
    let info = info.ok_or(BootError::NullInfo)?;
    if info.flags & INFO_MEMORY == 0 {
        return Err(BootError::MissingMemoryInfo { flags: info.flags });
    }
    Ok(info)
}
