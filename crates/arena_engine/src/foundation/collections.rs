//! Identity and handle types shared by the registry, grids and pools

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Registry key of a live entity
    ///
    /// Keys are generational: a key for a reclaimed entity never resolves to
    /// an entity registered later in the same slot.
    pub struct EntityId;
}

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Identity of one physical entity instance
///
/// Stable for the lifetime of the instance, including every trip through
/// an object pool. Registry membership is keyed on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocate a process-unique instance id
    pub fn fresh() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw value; callers are responsible for uniqueness
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Underlying value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity key tagged with the entity variant it refers to
///
/// Lets one spatial grid per entity type hold plain keys while keeping
/// bullet grids and hostile grids distinct types.
pub struct TypedHandle<T> {
    key: EntityId,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> TypedHandle<T> {
    /// Create a new typed handle from a key
    pub const fn new(key: EntityId) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying key
    pub const fn key(&self) -> EntityId {
        self.key
    }
}

// Manual impls: derives would demand the same traits from `T`.
impl<T> Clone for TypedHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedHandle<T> {}

impl<T> PartialEq for TypedHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for TypedHandle<T> {}

impl<T> Hash for TypedHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> fmt::Debug for TypedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedHandle").field(&self.key).finish()
    }
}

impl<T> From<TypedHandle<T>> for EntityId {
    fn from(handle: TypedHandle<T>) -> Self {
        handle.key
    }
}
