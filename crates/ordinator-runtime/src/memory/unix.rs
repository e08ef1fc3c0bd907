//! Unix stack mapping using mmap

use super::{round_to_page, Stack};
use ordinator_core::constants::FALLBACK_PAGE_SIZE;
use ordinator_core::error::{MemoryError, SchedResult};
use nix::errno::Errno;
use nix::unistd::{sysconf, SysconfVar};
use std::sync::OnceLock;

/// System page size, queried once
pub(crate) fn page_size() -> usize {
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
    *PAGE_SIZE.get_or_init(|| match sysconf(SysconfVar::PAGE_SIZE) {
        Ok(Some(size)) if size > 0 => size as usize,
        _ => FALLBACK_PAGE_SIZE,
    })
}

impl Stack {
    /// Map a stack with at least `size` usable bytes plus one guard page
    pub(crate) fn new(size: usize) -> SchedResult<Self> {
        let page = page_size();
        let usable = round_to_page(size.max(page), page).ok_or(MemoryError::InvalidSize)?;
        let mapped = usable.checked_add(page).ok_or(MemoryError::InvalidSize)?;

        let base = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                mapped,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS | libc::MAP_NORESERVE,
                -1,
                0,
            )
        };

        if base == libc::MAP_FAILED {
            return Err(MemoryError::AllocationFailed(Errno::last() as i32).into());
        }

        // Guard page at the low end: stacks grow down into it
        let ret = unsafe { libc::mprotect(base, page, libc::PROT_NONE) };
        if ret != 0 {
            let errno = Errno::last() as i32;
            unsafe {
                libc::munmap(base, mapped);
            }
            return Err(MemoryError::ProtectionFailed(errno).into());
        }

        Ok(Self {
            base: base as *mut u8,
            mapped,
            size: usable,
        })
    }
}

impl Drop for Stack {
    fn drop(&mut self) {
        let ret = unsafe { libc::munmap(self.base as *mut libc::c_void, self.mapped) };
        debug_assert_eq!(ret, 0, "munmap of routine stack failed");
    }
}
