use std::{
    alloc::{self, Layout},
    ptr::NonNull,
};

use super::AllocStrategy;

/// The process allocator. Default strategy of every container.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

// SAFETY: delegates to the global allocator and aborts on failure.
unsafe impl AllocStrategy for Global {
    fn allocate(&self, layout: Layout) -> NonNull<u8> {
        // SAFETY: callers never pass a zero-sized layout.
        let ptr = unsafe { alloc::alloc(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => ptr,
            None => alloc::handle_alloc_error(layout),
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: `ptr` was returned by `allocate` with this layout.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}
