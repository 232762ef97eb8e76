//! Typed traversals over a [`DynArray`].
//!
//! Each one names the element type it expects and fails with
//! [`TypelessError::TypeMismatch`](crate::TypelessError::TypeMismatch) when
//! the array holds something else. Untyped arrays are empty and accept any
//! element type.

use crate::{
    dynamic::{Accumulate, Element},
    error::Result,
    table::Filling,
};

use super::DynArray;

impl DynArray {
    /// Calls `f` on every element in index order.
    pub fn for_each<T: 'static>(&self, f: impl FnMut(&T)) -> Result<()> {
        self.typed::<T>()?.iter().for_each(f);
        Ok(())
    }

    /// Copies the elements matching `keep` to the front of a new array of the
    /// same length.
    ///
    /// The trailing slots, one per rejected element, hold `T::default()`.
    /// Callers that need only the matches count them separately.
    pub fn filter<T: Element>(&self, mut keep: impl FnMut(&T) -> bool) -> Result<DynArray> {
        let items = self.typed::<T>()?;
        let Some(table) = self.table else {
            return Ok(DynArray::new());
        };

        let mut out = Filling::<T>::new(table, items.len());
        for item in items.iter().filter(|&item| keep(item)) {
            out.push(item.clone());
        }
        if out.written() < items.len() {
            let filler = T::default();
            while out.written() < items.len() {
                out.push(filler.clone());
            }
        }
        Ok(DynArray::from_filled(table, out))
    }

    /// Folds the elements into `R::default()` with `R`'s native accumulation.
    pub fn join<T: 'static, R: Default + Accumulate<T>>(&self) -> Result<R> {
        self.join_with(|item: &T, acc: &mut R| acc.accumulate(item))
    }

    /// Folds the elements left to right into `R::default()`.
    pub fn join_with<T: 'static, R: Default>(
        &self,
        mut combine: impl FnMut(&T, &mut R),
    ) -> Result<R> {
        let mut acc = R::default();
        for item in self.typed::<T>()? {
            combine(item, &mut acc);
        }
        Ok(acc)
    }
}
