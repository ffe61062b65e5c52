//! Object pooling for frequently spawned entities
//!
//! Bullets and hostiles are spawned and destroyed at a high rate. Instead of
//! allocating a fresh instance for every spawn, an [`ObjectPool`] keeps a
//! FIFO queue of spare instances and reinitializes one on demand.
//!
//! The pool is a performance optimization only: a reused instance and a
//! freshly built one are indistinguishable after [`Poolable::reinitialize`].
//!
//! ```text
//!   acquire(args) ──► free queue non-empty? ──yes──► pop_front + reinitialize
//!                            │
//!                            no ──► factory() + reinitialize   (pool grows)
//!
//!   release(instance) ──► deactivate ──► push_back
//! ```

use crate::foundation::collections::InstanceId;
use std::collections::VecDeque;
#[cfg(debug_assertions)]
use std::collections::HashSet;

/// Instances an [`ObjectPool`] can recycle
pub trait Poolable {
    /// Everything needed to bring an instance back to a freshly spawned state
    type SpawnArgs;

    /// Overwrite every mutable field from `args` and mark the instance active
    fn reinitialize(&mut self, args: &Self::SpawnArgs);

    /// Mark the instance logically destroyed
    fn deactivate(&mut self);

    /// Physical identity of this instance
    fn instance_id(&self) -> InstanceId;
}

/// Reusable-instance allocator with a pre-warmed free queue
///
/// There is no hard cap: when the queue runs dry, `acquire` builds a new
/// instance and the pool ends up owning it once it is released.
pub struct ObjectPool<T: Poolable> {
    free: VecDeque<T>,
    factory: Box<dyn Fn() -> T>,
    prewarm: usize,
    allocated: usize,
    #[cfg(debug_assertions)]
    free_ids: HashSet<InstanceId>,
}

impl<T: Poolable> ObjectPool<T> {
    /// Create a pool holding `prewarm` inert instances built by `factory`
    pub fn new(prewarm: usize, factory: impl Fn() -> T + 'static) -> Self {
        let mut pool = Self {
            free: VecDeque::with_capacity(prewarm),
            factory: Box::new(factory),
            prewarm,
            allocated: 0,
            #[cfg(debug_assertions)]
            free_ids: HashSet::with_capacity(prewarm),
        };

        for _ in 0..prewarm {
            let instance = pool.build();
            pool.enqueue(instance);
        }

        log::info!(
            "Created ObjectPool<{}> with {} pre-warmed instances",
            std::any::type_name::<T>(),
            prewarm
        );
        pool
    }

    fn build(&mut self) -> T {
        self.allocated += 1;
        (self.factory)()
    }

    fn enqueue(&mut self, instance: T) {
        #[cfg(debug_assertions)]
        {
            let newly_free = self.free_ids.insert(instance.instance_id());
            assert!(
                newly_free,
                "instance {} released to the pool twice without an acquire",
                instance.instance_id()
            );
        }
        self.free.push_back(instance);
    }

    /// Hand out an active instance initialized from `args`
    pub fn acquire(&mut self, args: &T::SpawnArgs) -> T {
        let mut instance = match self.free.pop_front() {
            Some(instance) => {
                #[cfg(debug_assertions)]
                self.free_ids.remove(&instance.instance_id());
                instance
            }
            None => {
                let instance = self.build();
                log::debug!(
                    "ObjectPool<{}> exhausted, grew to {} instances (prewarm {})",
                    std::any::type_name::<T>(),
                    self.allocated,
                    self.prewarm
                );
                instance
            }
        };
        instance.reinitialize(args);
        instance
    }

    /// Deactivate `instance` and return it to the free queue
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the same instance is already free.
    pub fn release(&mut self, mut instance: T) {
        instance.deactivate();
        self.enqueue(instance);
    }

    /// Whether an instance is currently sitting in the free queue
    ///
    /// Linear in the free queue length; meant for assertions and tests.
    pub fn contains(&self, id: InstanceId) -> bool {
        self.free.iter().any(|instance| instance.instance_id() == id)
    }

    /// Number of spare instances ready for reuse
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Total instances this pool has ever built (its backing storage)
    pub const fn allocated(&self) -> usize {
        self.allocated
    }

    /// Instances built on construction
    pub const fn prewarm(&self) -> usize {
        self.prewarm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Shard {
        id: InstanceId,
        value: i32,
        active: bool,
    }

    impl Shard {
        fn inert() -> Self {
            Self {
                id: InstanceId::fresh(),
                value: 0,
                active: false,
            }
        }
    }

    impl Poolable for Shard {
        type SpawnArgs = i32;

        fn reinitialize(&mut self, args: &i32) {
            self.value = *args;
            self.active = true;
        }

        fn deactivate(&mut self) {
            self.active = false;
        }

        fn instance_id(&self) -> InstanceId {
            self.id
        }
    }

    #[test]
    fn test_prewarm_fills_free_queue() {
        let pool = ObjectPool::new(100, Shard::inert);
        assert_eq!(pool.free_len(), 100);
        assert_eq!(pool.allocated(), 100);
        assert_eq!(pool.prewarm(), 100);
    }

    #[test]
    fn test_acquire_reinitializes() {
        let mut pool = ObjectPool::new(1, Shard::inert);
        let shard = pool.acquire(&42);
        assert!(shard.active);
        assert_eq!(shard.value, 42);
        assert_eq!(pool.free_len(), 0);
    }

    #[test]
    fn test_release_deactivates_and_requeues() {
        let mut pool = ObjectPool::new(1, Shard::inert);
        let shard = pool.acquire(&1);
        let id = shard.id;
        pool.release(shard);
        assert_eq!(pool.free_len(), 1);
        assert!(pool.contains(id));

        // FIFO: the released instance comes back out with fresh state
        let again = pool.acquire(&9);
        assert_eq!(again.id, id);
        assert_eq!(again.value, 9);
        assert!(again.active);
    }

    #[test]
    fn test_exhausted_pool_grows() {
        let mut pool = ObjectPool::new(100, Shard::inert);
        let live: Vec<Shard> = (0..100).map(|i| pool.acquire(&i)).collect();
        assert_eq!(pool.free_len(), 0);

        let extra = pool.acquire(&100);
        assert!(extra.active);
        assert_eq!(pool.allocated(), 101);
        assert!(live.iter().all(|s| s.id != extra.id));
    }

    #[test]
    fn test_acquire_release_cycles_do_not_grow_storage() {
        let mut pool = ObjectPool::new(4, Shard::inert);
        for i in 0..1000 {
            let shard = pool.acquire(&i);
            pool.release(shard);
        }
        assert_eq!(pool.allocated(), 4);
        assert_eq!(pool.free_len(), 4);
    }

    #[test]
    fn test_storage_bounded_by_high_water_mark() {
        let mut pool = ObjectPool::new(2, Shard::inert);
        for _ in 0..50 {
            let a = pool.acquire(&0);
            let b = pool.acquire(&0);
            let c = pool.acquire(&0);
            pool.release(a);
            pool.release(b);
            pool.release(c);
        }
        assert_eq!(pool.allocated(), 3);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "released to the pool twice")]
    fn test_double_release_panics_in_debug() {
        let mut pool = ObjectPool::new(0, Shard::inert);
        let shard = pool.acquire(&0);
        let twin = Shard {
            id: shard.id,
            value: 0,
            active: true,
        };
        pool.release(shard);
        pool.release(twin);
    }
}
