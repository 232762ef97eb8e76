//! Homogeneous type-erased sequence.
//!
//! A [`DynArray`] owns a contiguous buffer of elements of one concrete type
//! and a reference to that type's array table. The element count is stored
//! explicitly; the buffer is always fully initialized.
//!
//! ```
//! use typeless::dyn_array;
//!
//! let mut words = dyn_array!["Hello".to_string(), " ".into(), "World".into(), "!".into()];
//! words.resize(2);
//! assert_eq!(words.join::<String, String>().unwrap(), "Hello ");
//! ```

use std::{any::type_name, fmt, mem, ptr::NonNull};

use crate::{
    alloc::{AllocStrategy, Global},
    dynamic::{Element, TypeTag},
    error::{Result, TypelessError},
    table::{ArrayTable, Filling, array_table},
};

mod transform;

/// Owning handle to a buffer of elements of a type chosen at construction.
///
/// A default array is untyped and empty; [`DynArray::set_type`] binds an
/// element type without adding elements.
pub struct DynArray {
    table: Option<&'static dyn ArrayTable>,
    buf: NonNull<u8>,
    len: usize,
}

// SAFETY: every element type is `Dynamic`, hence `Send + Sync`, and the
// buffer is exclusively owned by the array.
unsafe impl Send for DynArray {}
unsafe impl Sync for DynArray {}

impl Default for DynArray {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a [`DynArray`] from a list of elements, like `vec!`.
#[macro_export]
macro_rules! dyn_array {
    () => {
        $crate::DynArray::new()
    };
    ($($item:expr),+ $(,)?) => {
        $crate::DynArray::from_vec(::std::vec![$($item),+])
    };
}

impl DynArray {
    /// An untyped, empty array.
    pub const fn new() -> Self {
        Self {
            table: None,
            buf: NonNull::dangling(),
            len: 0,
        }
    }

    /// Clones `items` into a new array using the global allocation strategy.
    pub fn from_slice<T: Element>(items: &[T]) -> Self {
        Self::from_slice_in::<T, Global>(items)
    }

    pub fn from_slice_in<T: Element, A: AllocStrategy>(items: &[T]) -> Self {
        let table = array_table::<T, A>();
        let mut out = Filling::<T>::new(table, items.len());
        for item in items {
            out.push(item.clone());
        }
        Self::from_filled(table, out)
    }

    /// Moves the elements of `items` into a new array.
    pub fn from_vec<T: Element>(items: Vec<T>) -> Self {
        Self::from_vec_in::<T, Global>(items)
    }

    pub fn from_vec_in<T: Element, A: AllocStrategy>(items: Vec<T>) -> Self {
        let table = array_table::<T, A>();
        let mut out = Filling::<T>::new(table, items.len());
        for item in items {
            out.push(item);
        }
        Self::from_filled(table, out)
    }

    pub(crate) fn from_filled<T>(table: &'static dyn ArrayTable, out: Filling<'_, T>) -> Self {
        let len = out.written();
        Self {
            table: Some(table),
            buf: out.finish(),
            len,
        }
    }

    /// Drops the contents and rebinds the array to an empty buffer of `T`.
    pub fn set_type<T: Element>(&mut self) {
        self.set_type_in::<T, Global>();
    }

    pub fn set_type_in<T: Element, A: AllocStrategy>(&mut self) {
        self.destroy();
        let table = array_table::<T, A>();
        self.buf = table.allocate(0);
        self.table = Some(table);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn table(&self) -> Option<&'static dyn ArrayTable> {
        self.table
    }

    /// Element type, [`TypeTag::null`] for an untyped array.
    pub fn type_tag(&self) -> TypeTag {
        self.table.map_or_else(TypeTag::null, |table| table.type_tag())
    }

    pub fn type_name(&self) -> &'static str {
        self.type_tag().name()
    }

    pub fn has_type<T: 'static>(&self) -> bool {
        self.type_tag() == TypeTag::of::<T>()
    }

    /// Elements as a slice of `T`.
    ///
    /// An untyped array is an empty slice of any type.
    pub fn data<T: 'static>(&self) -> Option<&[T]> {
        self.typed().ok()
    }

    pub fn data_mut<T: 'static>(&mut self) -> Option<&mut [T]> {
        self.typed_mut().ok()
    }

    /// The element at `index`, if the array holds `T`s and `index < len`.
    pub fn at<T: 'static>(&self, index: usize) -> Option<&T> {
        self.data::<T>()?.get(index)
    }

    pub fn at_mut<T: 'static>(&mut self, index: usize) -> Option<&mut T> {
        self.data_mut::<T>()?.get_mut(index)
    }

    /// The element at `index` without checking type or bounds.
    ///
    /// # Safety
    ///
    /// The array must hold `T`s and `index` must be below [`DynArray::len`].
    pub unsafe fn at_unchecked<T: 'static>(&self, index: usize) -> &T {
        debug_assert!(self.has_type::<T>());
        debug_assert!(
            index < self.len,
            "index {index} out of bounds for length {}",
            self.len
        );
        // SAFETY: forwarded from the caller.
        unsafe { self.buf.cast::<T>().add(index).as_ref() }
    }

    /// Drops the element at `index` and constructs `value` in its slot.
    pub fn set<T: 'static>(&mut self, index: usize, value: T) -> Result<()> {
        let table = self.expect_type::<T>()?;
        if index >= self.len {
            return Err(TypelessError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        // SAFETY: `index < len`, so the slot holds a live `T`; it is
        // re-initialized right after being dropped.
        unsafe {
            let slot = table.advance(self.buf, index);
            table.destruct(slot);
            slot.cast::<T>().write(value);
        }
        Ok(())
    }

    /// Changes the element count, keeping the leading elements.
    ///
    /// New slots are default-constructed and dropped slots are destroyed. An
    /// untyped array has no element type to construct and stays empty.
    ///
    /// If constructing a new slot panics, every element is dropped and the
    /// array is left empty, still bound to its element type.
    pub fn resize(&mut self, new_len: usize) {
        if new_len == self.len {
            return;
        }
        let Some(table) = self.table else {
            return;
        };
        tracing::trace!(
            ty = table.type_tag().name(),
            old = self.len,
            new = new_len,
            "resizing array"
        );
        let (buf, len) = (self.buf, self.len);
        self.buf = table.allocate(0);
        self.len = 0;
        // SAFETY: `buf` holds `len` live elements and was detached from
        // `self`, so an unwind out of `relocate` cannot reach it again.
        self.buf = unsafe { table.relocate(buf, len, new_len) };
        self.len = new_len;
    }

    /// Moves the contents out, leaving this array untyped and empty.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Drops every element, releases the buffer and leaves the array untyped
    /// and empty. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if let Some(table) = self.table.take() {
            // SAFETY: the buffer holds `len` live elements owned by `self`.
            unsafe { table.destroy_deallocate(self.buf, self.len) };
        }
        self.invalidate();
    }

    /// Forgets the buffer without dropping or releasing it.
    pub fn invalidate(&mut self) {
        self.table = None;
        self.buf = NonNull::dangling();
        self.len = 0;
    }

    /// Raw pointer to the first element.
    pub fn begin(&mut self) -> *mut u8 {
        self.buf.as_ptr()
    }

    /// Raw pointer one past the last element.
    pub fn end(&mut self) -> *mut u8 {
        self.end_ptr().as_ptr()
    }

    pub fn cbegin(&self) -> *const u8 {
        self.buf.as_ptr().cast_const()
    }

    pub fn cend(&self) -> *const u8 {
        self.end_ptr().as_ptr().cast_const()
    }

    fn end_ptr(&self) -> NonNull<u8> {
        match self.table {
            // SAFETY: one past the end of the live range is in bounds.
            Some(table) => unsafe { table.advance(self.buf, self.len) },
            None => self.buf,
        }
    }

    fn expect_type<T: 'static>(&self) -> Result<&'static dyn ArrayTable> {
        let table = self.table.filter(|_| self.has_type::<T>());
        table.ok_or(TypelessError::TypeMismatch {
            expected: self.type_name(),
            found: type_name::<T>(),
        })
    }

    fn typed<T: 'static>(&self) -> Result<&[T]> {
        if self.table.is_none() {
            return Ok(&[]);
        }
        self.expect_type::<T>()?;
        // SAFETY: the buffer holds `len` live `T`s.
        Ok(unsafe { std::slice::from_raw_parts(self.buf.cast().as_ptr(), self.len) })
    }

    fn typed_mut<T: 'static>(&mut self) -> Result<&mut [T]> {
        if self.table.is_none() {
            return Ok(&mut []);
        }
        self.expect_type::<T>()?;
        // SAFETY: the buffer holds `len` live `T`s and `&mut self` is
        // exclusive.
        Ok(unsafe { std::slice::from_raw_parts_mut(self.buf.cast().as_ptr(), self.len) })
    }
}

impl Clone for DynArray {
    fn clone(&self) -> Self {
        match self.table {
            Some(table) => Self {
                table: Some(table),
                // SAFETY: the buffer holds `len` live elements.
                buf: unsafe { table.make_copy(self.buf, self.len) },
                len: self.len,
            },
            None => Self::new(),
        }
    }
}

impl Drop for DynArray {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<T: Element> FromIterator<T> for DynArray {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl fmt::Debug for DynArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynArray")
            .field("type", &self.type_name())
            .field("len", &self.len)
            .finish()
    }
}
