//! Per-type behavior tables and the process-wide registry that owns them.
//!
//! A container stores a `&'static` reference to one table and routes every
//! operation through it. Tables for the same (type, strategy) pair are the
//! same object, so comparing table pointers is a valid "same dynamic type"
//! test.

mod array_table;
pub mod registry;
mod value_table;

pub use array_table::ArrayTable;
pub use registry::{RegistryStats, array_table, stats, value_table};
pub use value_table::ValueTable;

pub(crate) use array_table::Filling;

/// Address-only identity check for two table references.
pub(crate) fn same_table<T: ?Sized>(a: &T, b: &T) -> bool {
    std::ptr::addr_eq(a as *const T, b as *const T)
}
