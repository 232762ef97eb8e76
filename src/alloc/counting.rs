use std::{
    alloc::Layout,
    ptr::NonNull,
    sync::atomic::{AtomicUsize, Ordering},
};

use serde::Serialize;

use super::{AllocStrategy, Global};

/// Point-in-time view of a [`Counting`] strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocStats {
    pub allocations: usize,
    pub deallocations: usize,
    pub live_bytes: usize,
}

impl AllocStats {
    /// Blocks handed out and not yet returned.
    ///
    /// After a [`Counting::reset`] with blocks still live, returns of those
    /// blocks are not matched by any counted allocation; the count then
    /// bottoms out at zero.
    pub fn live_blocks(&self) -> usize {
        self.allocations.saturating_sub(self.deallocations)
    }
}

/// Strategy wrapper that counts blocks and bytes passing through `inner`.
///
/// Every behavior table owns its own instance, so the counters describe a
/// single (type, strategy) pair. Reach them through the table's
/// `allocator()` accessor.
#[derive(Debug, Default)]
pub struct Counting<A: AllocStrategy = Global> {
    inner: A,
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    live_bytes: AtomicUsize,
}

impl<A: AllocStrategy> Counting<A> {
    pub fn snapshot(&self) -> AllocStats {
        AllocStats {
            allocations: self.allocations.load(Ordering::Relaxed),
            deallocations: self.deallocations.load(Ordering::Relaxed),
            live_bytes: self.live_bytes.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.allocations.store(0, Ordering::Relaxed);
        self.deallocations.store(0, Ordering::Relaxed);
        self.live_bytes.store(0, Ordering::Relaxed);
    }
}

// SAFETY: forwards every block untouched to `inner`.
unsafe impl<A: AllocStrategy> AllocStrategy for Counting<A> {
    fn allocate(&self, layout: Layout) -> NonNull<u8> {
        let ptr = self.inner.allocate(layout);
        self.allocations.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_add(layout.size(), Ordering::Relaxed);
        ptr
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded from the caller.
        unsafe { self.inner.deallocate(ptr, layout) };
        self.deallocations.fetch_add(1, Ordering::Relaxed);
        let _ = self
            .live_bytes
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |live| {
                Some(live.saturating_sub(layout.size()))
            });
    }
}
