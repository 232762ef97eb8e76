//! Capabilities a concrete type lends to the erased containers.
//!
//! Every type stored in a [`ValueBox`](crate::ValueBox) or
//! [`DynArray`](crate::DynArray) implements [`Dynamic`]. The trait's default
//! methods describe a type with no native equality and no native
//! ordering/arithmetic; implementations opt into either one. A behavior table
//! reads both answers once, when it is built, and never branches on the type
//! category again.
//!
//! ```
//! use typeless::{Dynamic, Stringify, ValueBox};
//!
//! #[derive(Clone)]
//! struct Opaque(u8);
//!
//! impl Stringify for Opaque {}
//! impl Dynamic for Opaque {}
//!
//! let a = ValueBox::new(Opaque(1));
//! let b = a.clone();
//! assert!(a != b); // no native equality
//! assert!(a.less_than(&b).is_err()); // no native ordering
//! ```

use std::ops::{Add, Div, Mul, Sub};

mod accumulate;
pub mod stringizer;
mod type_tag;

pub use accumulate::Accumulate;
pub use stringizer::Stringify;
pub use type_tag::TypeTag;

/// Native equality of a concrete type.
pub type EqualFn<T> = fn(&T, &T) -> bool;

/// Native ordering and arithmetic of a concrete type.
pub struct Arithmetic<T> {
    pub less: fn(&T, &T) -> bool,
    pub add: fn(&T, &T) -> T,
    pub sub: fn(&T, &T) -> T,
    pub mul: fn(&T, &T) -> T,
    pub div: fn(&T, &T) -> T,
}

impl<T> Clone for Arithmetic<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Arithmetic<T> {}

impl<T> Arithmetic<T>
where
    T: PartialOrd
        + Clone
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>,
{
    /// The type's own operators. Overflow and division by zero behave exactly
    /// as the operators do.
    pub fn native() -> Self {
        Self {
            less: |a, b| a < b,
            add: |a, b| a.clone() + b.clone(),
            sub: |a, b| a.clone() - b.clone(),
            mul: |a, b| a.clone() * b.clone(),
            div: |a, b| a.clone() / b.clone(),
        }
    }
}

/// A type that can live inside the erased containers.
pub trait Dynamic: Stringify + Clone + Send + Sync + 'static {
    /// Native equality. `None` makes every comparison report "not equal".
    fn equality() -> Option<EqualFn<Self>> {
        None
    }

    /// Native ordering and arithmetic. `None` makes them fail with
    /// [`TypelessError::Unsupported`](crate::TypelessError::Unsupported).
    fn arithmetic() -> Option<Arithmetic<Self>> {
        None
    }
}

/// Array element: a [`Dynamic`] type with a default value for fresh slots.
pub trait Element: Dynamic + Default {}

impl<T: Dynamic + Default> Element for T {}

macro_rules! arithmetic_dynamic {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Dynamic for $ty {
                fn equality() -> Option<EqualFn<Self>> {
                    Some(<$ty as PartialEq>::eq)
                }

                fn arithmetic() -> Option<Arithmetic<Self>> {
                    Some(Arithmetic::native())
                }
            }
        )*
    };
}

macro_rules! equality_dynamic {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Dynamic for $ty {
                fn equality() -> Option<EqualFn<Self>> {
                    Some(<$ty as PartialEq>::eq)
                }
            }
        )*
    };
}

arithmetic_dynamic!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);
equality_dynamic!(bool, char, String, &'static str, ());

impl<T> Dynamic for Vec<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn equality() -> Option<EqualFn<Self>> {
        Some(<Vec<T> as PartialEq>::eq)
    }
}

impl<T> Dynamic for Option<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn equality() -> Option<EqualFn<Self>> {
        Some(<Option<T> as PartialEq>::eq)
    }
}

#[cfg(test)]
mod dynamic_test;
