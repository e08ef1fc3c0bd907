//! Routine stack memory
//!
//! Each routine on the manual-stack backend owns one `Stack`: an anonymous
//! private mapping with a `PROT_NONE` guard page below the usable range,
//! so running off the end faults instead of corrupting a neighbour.
//!
//! ```text
//!   base                bottom                              top
//!    | guard (no access) | usable stack (grows downward) <-- |
//! ```

mod unix;

pub(crate) use unix::page_size;

/// Owned, guard-protected stack mapping
///
/// Never handed out beyond the backend that owns it.
pub(crate) struct Stack {
    /// Start of the mapping (guard page)
    base: *mut u8,

    /// Whole mapping length (guard + usable)
    mapped: usize,

    /// Usable bytes above the guard page
    size: usize,
}

impl Stack {
    /// Lowest usable address
    #[inline]
    pub(crate) fn bottom(&self) -> *mut u8 {
        unsafe { self.base.add(self.mapped - self.size) }
    }

    /// One past the highest usable address (initial stack pointer side)
    #[inline]
    pub(crate) fn top(&self) -> *mut u8 {
        unsafe { self.base.add(self.mapped) }
    }

    /// Usable bytes
    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// Check if `addr` falls inside the usable range
    #[inline]
    pub(crate) fn contains(&self, addr: usize) -> bool {
        addr >= self.bottom() as usize && addr < self.top() as usize
    }
}

/// Round `size` up to a multiple of `page`, or `None` on overflow
#[inline]
pub(crate) fn round_to_page(size: usize, page: usize) -> Option<usize> {
    debug_assert!(page.is_power_of_two());
    size.checked_add(page - 1).map(|s| s & !(page - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_page() {
        assert_eq!(round_to_page(1, 4096), Some(4096));
        assert_eq!(round_to_page(4096, 4096), Some(4096));
        assert_eq!(round_to_page(4097, 4096), Some(8192));
        assert_eq!(round_to_page(usize::MAX, 4096), None);
    }

    #[test]
    fn test_stack_layout() {
        let page = page_size();
        let stack = Stack::new(40 * 1024 + 1).unwrap();

        assert_eq!(stack.size() % page, 0);
        assert!(stack.size() > 40 * 1024);
        assert_eq!(stack.top() as usize - stack.bottom() as usize, stack.size());
        assert_eq!(stack.bottom() as usize % page, 0);
    }

    #[test]
    fn test_stack_is_writable_end_to_end() {
        let stack = Stack::new(64 * 1024).unwrap();
        unsafe {
            stack.bottom().write(0xAB);
            stack.top().sub(1).write(0xCD);
            assert_eq!(stack.bottom().read(), 0xAB);
            assert_eq!(stack.top().sub(1).read(), 0xCD);
        }
    }

    #[test]
    fn test_contains() {
        let stack = Stack::new(32 * 1024).unwrap();
        let bottom = stack.bottom() as usize;
        let top = stack.top() as usize;

        assert!(stack.contains(bottom));
        assert!(stack.contains(top - 1));
        assert!(!stack.contains(top));
        assert!(!stack.contains(bottom - 1));
    }
}
