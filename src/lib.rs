//! Type-erased containers with per-type behavior tables.
//!
//! [`ValueBox`] holds one value and [`DynArray`] a homogeneous sequence of a
//! type picked at construction. Both are fixed-size handles: every operation
//! after construction is dispatched through a behavior table that the
//! [`table::registry`] creates once per (type, allocation strategy) pair.

pub mod alloc;
pub mod dyn_array;
pub mod dynamic;
pub mod error;
pub mod table;
pub mod value_box;

pub use alloc::{AllocStats, AllocStrategy, Counting, Global};
pub use dyn_array::DynArray;
pub use dynamic::{Accumulate, Arithmetic, Dynamic, Element, Stringify, TypeTag};
pub use error::{Operation, Result, TypelessError};
pub use value_box::ValueBox;
