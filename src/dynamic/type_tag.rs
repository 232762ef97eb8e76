use std::{
    any::{self, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

/// Marker standing in for "no type" in empty containers.
struct Null;

/// Run-time identity of a concrete type.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// diagnostics. Empty containers report [`TypeTag::null`].
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// Token reported by empty containers.
    pub fn null() -> Self {
        Self {
            id: TypeId::of::<Null>(),
            name: "null",
        }
    }

    pub fn is_null(&self) -> bool {
        self.id == TypeId::of::<Null>()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
