//! Ordering and arithmetic between boxes.
//!
//! Boxes of different dynamic types (or empty boxes) never fail here:
//! ordering answers `false` and arithmetic answers an empty box. Types without
//! native ordering or arithmetic fail with
//! [`TypelessError::Unsupported`](crate::TypelessError::Unsupported).

use std::ops::{Add, Div, Mul, Sub};

use crate::error::Result;

use super::{Matched, ValueBox};

impl ValueBox {
    pub fn less_than(&self, other: &Self) -> Result<bool> {
        self.ordered(other, |m| unsafe { m.table.less(m.lhs, m.rhs) })
    }

    pub fn greater_than(&self, other: &Self) -> Result<bool> {
        self.ordered(other, |m| unsafe { m.table.less(m.rhs, m.lhs) })
    }

    pub fn less_equal(&self, other: &Self) -> Result<bool> {
        self.ordered(other, |m| unsafe {
            Ok(m.table.less(m.lhs, m.rhs)? || m.table.equal(m.lhs, m.rhs))
        })
    }

    pub fn greater_equal(&self, other: &Self) -> Result<bool> {
        self.ordered(other, |m| unsafe {
            Ok(m.table.less(m.rhs, m.lhs)? || m.table.equal(m.lhs, m.rhs))
        })
    }

    // SAFETY: `matched` only pairs live slots of the table's own type, which
    // is all the closures above rely on.
    fn ordered(
        &self,
        other: &Self,
        compare: impl FnOnce(Matched) -> Result<bool>,
    ) -> Result<bool> {
        match self.matched(other) {
            Some(m) => compare(m),
            None => Ok(false),
        }
    }
}

macro_rules! arithmetic_op {
    ($trait:ident, $method:ident, $table_op:ident) => {
        impl $trait<&ValueBox> for &ValueBox {
            type Output = Result<ValueBox>;

            fn $method(self, rhs: &ValueBox) -> Result<ValueBox> {
                let Some(m) = self.matched(rhs) else {
                    return Ok(ValueBox::default());
                };
                // SAFETY: both slots hold live values of the table's type.
                let slot = unsafe { m.table.$table_op(m.lhs, m.rhs) }?;
                Ok(ValueBox::from_slot(m.table, slot))
            }
        }

        impl $trait for ValueBox {
            type Output = Result<ValueBox>;

            fn $method(self, rhs: ValueBox) -> Result<ValueBox> {
                (&self).$method(&rhs)
            }
        }
    };
}

arithmetic_op!(Add, add, sum);
arithmetic_op!(Sub, sub, difference);
arithmetic_op!(Mul, mul, product);
arithmetic_op!(Div, div, quotient);
