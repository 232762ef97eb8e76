//! Single-value type-erased container.
//!
//! A [`ValueBox`] owns one heap slot and a reference to the behavior table of
//! the concrete type stored there. Copying, dropping, comparing, rendering and
//! arithmetic all go through the table; only construction and typed access
//! name the concrete type.
//!
//! ```
//! use typeless::ValueBox;
//!
//! let a = ValueBox::new(123);
//! let b = ValueBox::new(456);
//! let sum = (&a + &b).unwrap();
//! assert!(sum.eq_value(&579));
//! assert_eq!(sum.to_string(), "579");
//!
//! let text = ValueBox::new(String::from("Hello"));
//! assert!((&a + &text).unwrap().is_empty());
//! ```

use std::{fmt, mem, ptr::NonNull};

use crate::{
    alloc::{AllocStrategy, Global},
    dynamic::{Accumulate, Dynamic, EqualFn, Stringify, TypeTag},
    table::{ValueTable, same_table, value_table},
};

mod ops;

#[derive(Clone, Copy)]
struct Held {
    table: &'static dyn ValueTable,
    slot: NonNull<u8>,
}

/// Two slots of the same dynamic type and the table to operate on them.
#[derive(Clone, Copy)]
pub(crate) struct Matched {
    pub(crate) table: &'static dyn ValueTable,
    pub(crate) lhs: NonNull<u8>,
    pub(crate) rhs: NonNull<u8>,
}

/// Owning handle to one value of a type chosen at construction.
///
/// The default box is empty. Dropping a box drops its value and releases the
/// slot through the table's allocation strategy.
#[derive(Default)]
pub struct ValueBox {
    held: Option<Held>,
}

// SAFETY: every stored type is `Dynamic`, hence `Send + Sync`, and the slot is
// exclusively owned by the box.
unsafe impl Send for ValueBox {}
unsafe impl Sync for ValueBox {}

impl ValueBox {
    /// Boxes `value` using the global allocation strategy.
    pub fn new<T: Dynamic>(value: T) -> Self {
        Self::new_in::<T, Global>(value)
    }

    /// Boxes `value` using the allocation strategy `A`.
    pub fn new_in<T: Dynamic, A: AllocStrategy>(value: T) -> Self {
        let table = value_table::<T, A>();
        let slot = table.allocate();
        // SAFETY: the table allocated the slot for exactly one `T`.
        unsafe { slot.cast::<T>().write(value) };
        Self {
            held: Some(Held { table, slot }),
        }
    }

    pub(crate) fn from_slot(table: &'static dyn ValueTable, slot: NonNull<u8>) -> Self {
        Self {
            held: Some(Held { table, slot }),
        }
    }

    /// Replaces the held value, and its dynamic type, with `value`.
    pub fn set<T: Dynamic>(&mut self, value: T) {
        self.set_in::<T, Global>(value);
    }

    pub fn set_in<T: Dynamic, A: AllocStrategy>(&mut self, value: T) {
        *self = Self::new_in::<T, A>(value);
    }

    /// Moves the contents out, leaving this box empty.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.held, &mut other.held);
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_none()
    }

    /// Returns the value if it is a `T`.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        let held = self.held.filter(|_| self.has_type::<T>())?;
        // SAFETY: the dynamic type is `T`.
        Some(unsafe { held.slot.cast::<T>().as_ref() })
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        let held = self.held.filter(|_| self.has_type::<T>())?;
        // SAFETY: the dynamic type is `T` and `&mut self` is exclusive.
        Some(unsafe { held.slot.cast::<T>().as_mut() })
    }

    /// Returns the value as a `T` without checking the dynamic type.
    ///
    /// # Safety
    ///
    /// The box must be non-empty and hold a `T`.
    pub unsafe fn get_unchecked<T: 'static>(&self) -> &T {
        debug_assert!(
            self.has_type::<T>(),
            "ValueBox does not hold a {}",
            std::any::type_name::<T>()
        );
        match self.held {
            // SAFETY: forwarded from the caller.
            Some(held) => unsafe { held.slot.cast::<T>().as_ref() },
            None => unsafe { std::hint::unreachable_unchecked() },
        }
    }

    /// Raw address of the held value, null when empty.
    pub fn data(&self) -> *const u8 {
        self.held
            .map_or(std::ptr::null(), |held| held.slot.as_ptr().cast_const())
    }

    /// The behavior table of the held value.
    pub fn table(&self) -> Option<&'static dyn ValueTable> {
        self.held.map(|held| held.table)
    }

    /// Drops the held value, releases its slot and leaves the box empty.
    /// Calling it on an empty box does nothing.
    pub fn destroy(&mut self) {
        if let Some(held) = self.held.take() {
            // SAFETY: the box owned the slot and forgets it here.
            unsafe { held.table.destroy_deallocate(held.slot) };
        }
    }

    /// Forgets the held value without dropping or releasing it.
    ///
    /// The slot leaks unless ownership was handed elsewhere first (for
    /// instance through [`ValueBox::data`]).
    pub fn invalidate(&mut self) {
        self.held = None;
    }

    /// Dynamic type of the held value, [`TypeTag::null`] when empty.
    pub fn type_tag(&self) -> TypeTag {
        self.held
            .map_or_else(TypeTag::null, |held| held.table.type_tag())
    }

    pub fn type_name(&self) -> &'static str {
        self.type_tag().name()
    }

    pub fn has_type<T: 'static>(&self) -> bool {
        self.type_tag() == TypeTag::of::<T>()
    }

    /// Whether the box holds a `T` equal to `value`.
    ///
    /// Types without native equality never compare equal.
    pub fn eq_value<T: Dynamic>(&self, value: &T) -> bool {
        match (self.get::<T>(), T::equality()) {
            (Some(held), Some(eq)) => eq(held, value),
            _ => false,
        }
    }

    /// Both slots and the left table, when the boxes share a dynamic type.
    pub(crate) fn matched(&self, other: &Self) -> Option<Matched> {
        let (lhs, rhs) = (self.held?, other.held?);
        let same = same_table(lhs.table, rhs.table)
            || lhs.table.type_tag() == rhs.table.type_tag();
        same.then_some(Matched {
            table: lhs.table,
            lhs: lhs.slot,
            rhs: rhs.slot,
        })
    }
}

impl Clone for ValueBox {
    fn clone(&self) -> Self {
        Self {
            held: self.held.map(|held| Held {
                table: held.table,
                // SAFETY: the slot holds a live value of the table's type.
                slot: unsafe { held.table.make_copy(held.slot) },
            }),
        }
    }
}

impl Drop for ValueBox {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl PartialEq for ValueBox {
    /// Empty boxes and boxes of different dynamic types are never equal.
    fn eq(&self, other: &Self) -> bool {
        self.matched(other)
            // SAFETY: both slots hold live values of the table's type.
            .is_some_and(|m| unsafe { m.table.equal(m.lhs, m.rhs) })
    }
}

impl fmt::Display for ValueBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.held {
            // SAFETY: the slot holds a live value of the table's type.
            Some(held) => f.write_str(&unsafe { held.table.to_string(held.slot) }),
            None => f.write_str("null"),
        }
    }
}

impl fmt::Debug for ValueBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.held {
            Some(held) => write!(f, "ValueBox({}: {})", held.table.type_tag(), self),
            None => f.write_str("ValueBox(null)"),
        }
    }
}

impl Stringify for ValueBox {
    fn stringify(&self) -> String {
        self.to_string()
    }
}

impl Dynamic for ValueBox {
    fn equality() -> Option<EqualFn<Self>> {
        Some(<ValueBox as PartialEq>::eq)
    }
}

impl Accumulate<ValueBox> for String {
    fn accumulate(&mut self, value: &ValueBox) {
        self.push_str(&value.to_string());
    }
}

#[cfg(test)]
mod value_box_test;
