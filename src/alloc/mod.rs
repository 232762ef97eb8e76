//! Pluggable allocation strategies for behavior tables.
//!
//! A strategy hands out raw blocks for a [`Layout`] and takes them back. Each
//! behavior table owns one strategy instance for its whole (immortal)
//! lifetime, so strategies must be `Default + Send + Sync + 'static`.
//!
//! Zero-sized layouts never reach a strategy: the helpers in this module
//! short-circuit them to a dangling, well-aligned pointer.

use std::{alloc::Layout, ptr::NonNull};

mod counting;
mod global;

pub use counting::{AllocStats, Counting};
pub use global::Global;

/// Source of raw storage for erased values.
///
/// # Safety
///
/// `allocate` must return a block valid for reads and writes of
/// `layout.size()` bytes and aligned to `layout.align()`, which stays valid
/// until passed back to `deallocate` with the same layout. Failure to allocate
/// must not return; implementations abort through
/// [`std::alloc::handle_alloc_error`] or diverge otherwise.
pub unsafe trait AllocStrategy: Default + Send + Sync + 'static {
    /// Allocates a block for `layout`. `layout.size()` is never zero.
    fn allocate(&self, layout: Layout) -> NonNull<u8>;

    /// Releases a block obtained from [`AllocStrategy::allocate`].
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this strategy with the same `layout`
    /// and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Allocates uninitialized room for `n` values of `T`.
pub(crate) fn allocate_n<T, A: AllocStrategy>(alloc: &A, n: usize) -> NonNull<T> {
    let layout = array_layout::<T>(n);
    if layout.size() == 0 {
        return NonNull::dangling();
    }
    alloc.allocate(layout).cast()
}

/// Releases room for `n` values of `T` without dropping them.
///
/// # Safety
///
/// `ptr` must come from [`allocate_n`] with the same `alloc` and `n`.
pub(crate) unsafe fn deallocate_n<T, A: AllocStrategy>(alloc: &A, ptr: NonNull<T>, n: usize) {
    let layout = array_layout::<T>(n);
    if layout.size() == 0 {
        return;
    }
    // SAFETY: forwarded from the caller.
    unsafe { alloc.deallocate(ptr.cast(), layout) }
}

fn array_layout<T>(n: usize) -> Layout {
    match Layout::array::<T>(n) {
        Ok(layout) => layout,
        Err(_) => capacity_overflow(),
    }
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}
