//! Text rendering used by behavior tables.
//!
//! [`Stringify`] is the customization point: implement it to control how a
//! type renders. The default method renders the type's name, which is what
//! every type without a dedicated rendering falls back to.

use std::any;

pub trait Stringify {
    fn stringify(&self) -> String {
        any::type_name::<Self>().to_owned()
    }
}

/// Renders `value` through its [`Stringify`] implementation.
pub fn to_string<T: Stringify + ?Sized>(value: &T) -> String {
    value.stringify()
}

macro_rules! display_stringify {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Stringify for $ty {
                fn stringify(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

// Floats keep six fractional digits: 456789.0 renders as "456789.000000".
macro_rules! fixed_stringify {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Stringify for $ty {
                fn stringify(&self) -> String {
                    format!("{:.6}", self)
                }
            }
        )*
    };
}

display_stringify!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool
);
fixed_stringify!(f32, f64);

impl Stringify for char {
    fn stringify(&self) -> String {
        String::from(*self)
    }
}

impl Stringify for String {
    fn stringify(&self) -> String {
        self.clone()
    }
}

impl Stringify for &str {
    fn stringify(&self) -> String {
        (*self).to_owned()
    }
}

impl Stringify for () {}

impl<T> Stringify for Vec<T> {}

impl<T> Stringify for Option<T> {}
