use std::{any::Any, marker::PhantomData, ptr::NonNull};

use crate::{
    alloc::{AllocStrategy, allocate_n, deallocate_n},
    dynamic::{Arithmetic, Dynamic, EqualFn, TypeTag, stringizer},
    error::{Operation, Result, TypelessError},
};

/// Behavior table for a single erased value.
///
/// One instance exists per (concrete type, allocation strategy) pair and
/// lives for the rest of the process; see [`registry`](super::registry).
/// Slots are raw pointers to storage the table allocated.
///
/// # Safety
///
/// Every `unsafe` method requires its slot arguments to be live slots
/// produced by this table (or by a table for the same concrete type) that are
/// not concurrently mutated.
pub trait ValueTable: Send + Sync + 'static {
    fn type_tag(&self) -> TypeTag;

    /// The allocation strategy owned by this table.
    fn allocator(&self) -> &dyn Any;

    /// Allocates an uninitialized slot for one value.
    fn allocate(&self) -> NonNull<u8>;

    /// Drops the value in `slot` and releases the slot.
    unsafe fn destroy_deallocate(&self, slot: NonNull<u8>);

    /// Allocates a fresh slot holding a clone of `src`.
    unsafe fn make_copy(&self, src: NonNull<u8>) -> NonNull<u8>;

    /// Native equality, or `false` when the type has none.
    unsafe fn equal(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> bool;

    unsafe fn less(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<bool>;

    /// Returns a fresh slot holding `lhs + rhs`.
    unsafe fn sum(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<NonNull<u8>>;

    unsafe fn difference(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<NonNull<u8>>;

    unsafe fn product(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<NonNull<u8>>;

    unsafe fn quotient(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<NonNull<u8>>;

    unsafe fn to_string(&self, slot: NonNull<u8>) -> String;
}

pub(crate) struct TypedValueTable<T, A> {
    alloc: A,
    equal: Option<EqualFn<T>>,
    arithmetic: Option<Arithmetic<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Dynamic, A: AllocStrategy> TypedValueTable<T, A> {
    pub(crate) fn new() -> Self {
        Self {
            alloc: A::default(),
            equal: T::equality(),
            arithmetic: T::arithmetic(),
            _marker: PhantomData,
        }
    }

    /// Moves `value` into a fresh slot.
    pub(crate) fn store(&self, value: T) -> NonNull<u8> {
        let slot = allocate_n::<T, A>(&self.alloc, 1);
        // SAFETY: freshly allocated and sized for one `T`.
        unsafe { slot.as_ptr().write(value) };
        slot.cast()
    }

    fn ops(&self, op: Operation) -> Result<&Arithmetic<T>> {
        self.arithmetic.as_ref().ok_or(TypelessError::Unsupported {
            op,
            type_name: std::any::type_name::<T>(),
        })
    }

    unsafe fn apply(
        &self,
        op: Operation,
        lhs: NonNull<u8>,
        rhs: NonNull<u8>,
    ) -> Result<NonNull<u8>> {
        let ops = self.ops(op)?;
        let f = match op {
            Operation::Add => ops.add,
            Operation::Sub => ops.sub,
            Operation::Mul => ops.mul,
            Operation::Div => ops.div,
            Operation::Less => unreachable!("ordering is not an arithmetic result"),
        };
        // SAFETY: both slots hold a live `T`.
        let value = unsafe { f(value_ref(lhs), value_ref(rhs)) };
        Ok(self.store(value))
    }
}

/// # Safety
///
/// `slot` must hold a live `T` that outlives the returned reference.
unsafe fn value_ref<'a, T>(slot: NonNull<u8>) -> &'a T {
    unsafe { slot.cast::<T>().as_ref() }
}

impl<T: Dynamic, A: AllocStrategy> ValueTable for TypedValueTable<T, A> {
    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn allocator(&self) -> &dyn Any {
        &self.alloc
    }

    fn allocate(&self) -> NonNull<u8> {
        allocate_n::<T, A>(&self.alloc, 1).cast()
    }

    unsafe fn destroy_deallocate(&self, slot: NonNull<u8>) {
        let slot = slot.cast::<T>();
        // SAFETY: the slot holds a live `T` allocated by this table.
        unsafe {
            slot.as_ptr().drop_in_place();
            deallocate_n::<T, A>(&self.alloc, slot, 1);
        }
    }

    unsafe fn make_copy(&self, src: NonNull<u8>) -> NonNull<u8> {
        // Clone before allocating so a panicking clone leaks nothing.
        let value = unsafe { value_ref::<T>(src) }.clone();
        self.store(value)
    }

    unsafe fn equal(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> bool {
        match self.equal {
            // SAFETY: both slots hold a live `T`.
            Some(eq) => unsafe { eq(value_ref(lhs), value_ref(rhs)) },
            None => false,
        }
    }

    unsafe fn less(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<bool> {
        let ops = self.ops(Operation::Less)?;
        // SAFETY: both slots hold a live `T`.
        Ok(unsafe { (ops.less)(value_ref(lhs), value_ref(rhs)) })
    }

    unsafe fn sum(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<NonNull<u8>> {
        unsafe { self.apply(Operation::Add, lhs, rhs) }
    }

    unsafe fn difference(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<NonNull<u8>> {
        unsafe { self.apply(Operation::Sub, lhs, rhs) }
    }

    unsafe fn product(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<NonNull<u8>> {
        unsafe { self.apply(Operation::Mul, lhs, rhs) }
    }

    unsafe fn quotient(&self, lhs: NonNull<u8>, rhs: NonNull<u8>) -> Result<NonNull<u8>> {
        unsafe { self.apply(Operation::Div, lhs, rhs) }
    }

    unsafe fn to_string(&self, slot: NonNull<u8>) -> String {
        stringizer::to_string(unsafe { value_ref::<T>(slot) })
    }
}
