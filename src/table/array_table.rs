use std::{any::Any, marker::PhantomData, ptr::NonNull};

use crate::{
    alloc::{AllocStrategy, allocate_n, deallocate_n},
    dynamic::{Element, TypeTag},
};

/// Behavior table for a contiguous buffer of erased elements.
///
/// Buffers are addressed by their first element and an element count; the
/// table knows the element size, so `advance` is the only pointer arithmetic
/// callers need.
///
/// # Safety
///
/// Every `unsafe` method requires its pointers to address buffers allocated by
/// this table, with the stated number of initialized elements.
pub trait ArrayTable: Send + Sync + 'static {
    fn type_tag(&self) -> TypeTag;

    fn allocator(&self) -> &dyn Any;

    /// Allocates room for `n` elements, all uninitialized.
    fn allocate(&self, n: usize) -> NonNull<u8>;

    /// Releases room for `n` elements without dropping any of them.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, n: usize);

    /// Drops `n` live elements and releases the buffer.
    unsafe fn destroy_deallocate(&self, ptr: NonNull<u8>, n: usize);

    /// Fills `n` uninitialized slots with clones of one default value.
    unsafe fn construct_default(&self, ptr: NonNull<u8>, n: usize);

    /// Clone-constructs the element at `src` into the uninitialized `dst`.
    unsafe fn construct_copy(&self, dst: NonNull<u8>, src: NonNull<u8>);

    /// Drops the element at `ptr`, leaving the slot uninitialized.
    unsafe fn destruct(&self, ptr: NonNull<u8>);

    /// Allocates a new buffer holding clones of `n` elements from `src`.
    unsafe fn make_copy(&self, src: NonNull<u8>, n: usize) -> NonNull<u8>;

    /// Moves the first `min(old_len, new_len)` elements of `src` into a new
    /// buffer of `new_len` elements, drops the remaining tail of `src`,
    /// releases `src` and default-constructs the rest.
    ///
    /// `src` is consumed even when filling the new buffer unwinds; the
    /// partially built buffer is then dropped and released as well.
    unsafe fn relocate(&self, src: NonNull<u8>, old_len: usize, new_len: usize) -> NonNull<u8>;

    /// Pointer to the element `n` positions after `ptr`.
    unsafe fn advance(&self, ptr: NonNull<u8>, n: usize) -> NonNull<u8>;
}

/// Partially initialized buffer that cleans up after itself on unwind.
///
/// Elements are written in order; dropping the guard drops the ones written
/// so far and releases the whole allocation.
pub(crate) struct Filling<'t, T> {
    table: &'t dyn ArrayTable,
    ptr: NonNull<T>,
    written: usize,
    capacity: usize,
}

impl<'t, T> Filling<'t, T> {
    pub(crate) fn new(table: &'t dyn ArrayTable, capacity: usize) -> Self {
        Self {
            table,
            ptr: table.allocate(capacity).cast(),
            written: 0,
            capacity,
        }
    }

    pub(crate) fn push(&mut self, value: T) {
        debug_assert!(self.written < self.capacity);
        // SAFETY: `written < capacity`, so the slot is allocated and unused.
        unsafe { self.ptr.add(self.written).write(value) };
        self.written += 1;
    }

    /// Moves `n` elements from `src` to the end of the written prefix.
    ///
    /// # Safety
    ///
    /// `src` must hold `n` live elements that the caller gives up without
    /// dropping, and `written + n` must not exceed the capacity.
    pub(crate) unsafe fn adopt(&mut self, src: NonNull<T>, n: usize) {
        debug_assert!(self.written + n <= self.capacity);
        // SAFETY: forwarded from the caller; the ranges belong to different
        // allocations.
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), self.ptr.add(self.written).as_ptr(), n)
        };
        self.written += n;
    }

    pub(crate) fn written(&self) -> usize {
        self.written
    }

    /// Hands the completed buffer over to the caller.
    pub(crate) fn finish(self) -> NonNull<u8> {
        debug_assert_eq!(self.written, self.capacity);
        let ptr = self.ptr.cast();
        std::mem::forget(self);
        ptr
    }
}

impl<T> Drop for Filling<'_, T> {
    fn drop(&mut self) {
        // SAFETY: exactly `written` leading elements are initialized and the
        // buffer was allocated by `table` for `capacity` elements.
        unsafe {
            std::ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.written).drop_in_place();
            self.table.deallocate(self.ptr.cast(), self.capacity);
        }
    }
}

pub(crate) struct TypedArrayTable<T, A> {
    alloc: A,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Element, A: AllocStrategy> TypedArrayTable<T, A> {
    pub(crate) fn new() -> Self {
        Self {
            alloc: A::default(),
            _marker: PhantomData,
        }
    }
}

impl<T: Element, A: AllocStrategy> ArrayTable for TypedArrayTable<T, A> {
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn allocator(&self) -> &dyn Any {
        &self.alloc
    }

    fn allocate(&self, n: usize) -> NonNull<u8> {
        allocate_n::<T, A>(&self.alloc, n).cast()
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, n: usize) {
        unsafe { deallocate_n::<T, A>(&self.alloc, ptr.cast(), n) }
    }

    unsafe fn destroy_deallocate(&self, ptr: NonNull<u8>, n: usize) {
        let ptr = ptr.cast::<T>();
        // SAFETY: `n` live elements start at `ptr`.
        unsafe {
            std::ptr::slice_from_raw_parts_mut(ptr.as_ptr(), n).drop_in_place();
            deallocate_n::<T, A>(&self.alloc, ptr, n);
        }
    }

    unsafe fn construct_default(&self, ptr: NonNull<u8>, n: usize) {
        let ptr = ptr.cast::<T>();
        let filler = T::default();
        for i in 0..n {
            // SAFETY: the caller owns `n` uninitialized slots at `ptr`.
            unsafe { ptr.add(i).write(filler.clone()) };
        }
    }

    unsafe fn construct_copy(&self, dst: NonNull<u8>, src: NonNull<u8>) {
        let value = unsafe { src.cast::<T>().as_ref() }.clone();
        unsafe { dst.cast::<T>().write(value) };
    }

    unsafe fn destruct(&self, ptr: NonNull<u8>) {
        unsafe { ptr.cast::<T>().drop_in_place() };
    }

    unsafe fn make_copy(&self, src: NonNull<u8>, n: usize) -> NonNull<u8> {
        let src = src.cast::<T>();
        let mut out = Filling::<T>::new(self, n);
        for i in 0..n {
            // SAFETY: `i < n` and `src` holds `n` live elements.
            out.push(unsafe { src.add(i).as_ref() }.clone());
        }
        out.finish()
    }

    unsafe fn relocate(&self, src: NonNull<u8>, old_len: usize, new_len: usize) -> NonNull<u8> {
        let src = src.cast::<T>();
        let kept = old_len.min(new_len);
        let mut out = Filling::<T>::new(self, new_len);
        // SAFETY: `src` holds `old_len` live elements. The first `kept` move
        // into `out`, the tail is dropped in place, and `src` is released
        // before any element code runs to fill the rest.
        unsafe {
            out.adopt(src, kept);
            std::ptr::slice_from_raw_parts_mut(src.add(kept).as_ptr(), old_len - kept)
                .drop_in_place();
            deallocate_n::<T, A>(&self.alloc, src, old_len);
        }
        if kept < new_len {
            let filler = T::default();
            while out.written() < new_len {
                out.push(filler.clone());
            }
        }
        out.finish()
    }

    unsafe fn advance(&self, ptr: NonNull<u8>, n: usize) -> NonNull<u8> {
        unsafe { ptr.cast::<T>().add(n).cast() }
    }
}
