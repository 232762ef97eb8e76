//! Process-wide store of behavior tables.
//!
//! Tables are created on first request for a (concrete type, allocation
//! strategy) pair, leaked, and handed out as `&'static` references from then
//! on. They are never torn down. Two requests for the same pair always return
//! the same table, so pointer equality of tables implies equality of dynamic
//! types.

use std::{
    any::{TypeId, type_name},
    sync::LazyLock,
};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{
    alloc::AllocStrategy,
    dynamic::{Dynamic, Element},
};

use super::{
    array_table::{ArrayTable, TypedArrayTable},
    value_table::{TypedValueTable, ValueTable},
};

type TableKey = (TypeId, TypeId);

struct Registry {
    values: RwLock<FxHashMap<TableKey, &'static dyn ValueTable>>,
    arrays: RwLock<FxHashMap<TableKey, &'static dyn ArrayTable>>,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| Registry {
    values: RwLock::new(FxHashMap::default()),
    arrays: RwLock::new(FxHashMap::default()),
});

/// Number of tables created so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub value_tables: usize,
    pub array_tables: usize,
}

fn key<T: 'static, A: 'static>() -> TableKey {
    (TypeId::of::<T>(), TypeId::of::<A>())
}

/// Returns the single-value table for `T` allocated through `A`.
pub fn value_table<T: Dynamic, A: AllocStrategy>() -> &'static dyn ValueTable {
    let key = key::<T, A>();
    if let Some(table) = REGISTRY.values.read().get(&key) {
        return *table;
    }

    let mut values = REGISTRY.values.write();
    *values.entry(key).or_insert_with(|| {
        tracing::debug!(
            ty = type_name::<T>(),
            strategy = type_name::<A>(),
            "creating value table"
        );
        let table: &'static dyn ValueTable =
            Box::leak(Box::new(TypedValueTable::<T, A>::new()));
        table
    })
}

/// Returns the array table for elements of `T` allocated through `A`.
pub fn array_table<T: Element, A: AllocStrategy>() -> &'static dyn ArrayTable {
    let key = key::<T, A>();
    if let Some(table) = REGISTRY.arrays.read().get(&key) {
        return *table;
    }

    let mut arrays = REGISTRY.arrays.write();
    *arrays.entry(key).or_insert_with(|| {
        tracing::debug!(
            ty = type_name::<T>(),
            strategy = type_name::<A>(),
            "creating array table"
        );
        let table: &'static dyn ArrayTable =
            Box::leak(Box::new(TypedArrayTable::<T, A>::new()));
        table
    })
}

pub fn stats() -> RegistryStats {
    RegistryStats {
        value_tables: REGISTRY.values.read().len(),
        array_tables: REGISTRY.arrays.read().len(),
    }
}
