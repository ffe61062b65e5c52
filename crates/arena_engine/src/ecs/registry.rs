//! Live entity set
//!
//! [`EntityRegistry`] owns entity lifetime identity: which entities exist
//! this frame, in which order they update and draw, and when logically
//! destroyed entities are physically removed.
//!
//! Removal happens only in [`EntityRegistry::reclaim_inactive`], called
//! once at the end of each frame. Systems that run earlier in the frame
//! must check the active flag rather than registry membership; a bullet
//! deactivated by a collision stays addressable until reclamation.

use crate::ecs::entity::SimEntity;
use crate::foundation::collections::{EntityId, InstanceId, SlotMap, TypedHandle};
use crate::foundation::math::WorldBounds;
use crate::physics::{Collidable, ColliderLookup};
use crate::render::RenderSink;
use std::collections::HashMap;

/// Destination for entities leaving the registry during reclamation
///
/// Implementations route pooled variants back to their pool and simply
/// drop the rest.
pub trait Reclaim<E> {
    /// Take ownership of an inactive entity removed from the live set
    fn reclaim(&mut self, entity: E);
}

/// Reclaimer that drops every entity it receives
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardReclaimer;

impl<E> Reclaim<E> for DiscardReclaimer {
    fn reclaim(&mut self, _entity: E) {}
}

/// Owner of the live entity set
pub struct EntityRegistry<E> {
    entities: SlotMap<EntityId, E>,
    order: Vec<EntityId>,
    by_instance: HashMap<InstanceId, EntityId>,
}

impl<E: SimEntity> EntityRegistry<E> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            order: Vec::new(),
            by_instance: HashMap::new(),
        }
    }

    /// Add `entity` unless an entity with the same instance id is live
    ///
    /// Idempotent on identity: registering an instance that is already
    /// present returns the existing key and discards the duplicate.
    pub fn register(&mut self, entity: E) -> EntityId {
        let instance = entity.instance_id();
        if let Some(&existing) = self.by_instance.get(&instance) {
            log::debug!("Instance {} already registered as {:?}; ignoring", instance, existing);
            return existing;
        }

        let id = self.entities.insert(entity);
        self.order.push(id);
        self.by_instance.insert(instance, id);
        id
    }

    /// Register each entity in sequence, preserving relative order
    pub fn register_many(&mut self, entities: impl IntoIterator<Item = E>) -> Vec<EntityId> {
        entities.into_iter().map(|entity| self.register(entity)).collect()
    }

    /// Advance every live entity in registration order
    pub fn update(&mut self, dt: f32, world: WorldBounds) {
        for id in &self.order {
            if let Some(entity) = self.entities.get_mut(*id) {
                entity.update(dt, world);
            }
        }
    }

    /// Update variant without world bounds
    ///
    /// Entities cannot bounds-check without a viewport, so this is a
    /// programming error rather than a silently defaulted call.
    ///
    /// # Panics
    ///
    /// Always. Use [`EntityRegistry::update`].
    pub fn update_unbounded(&mut self, _dt: f32) -> ! {
        panic!("EntityRegistry::update_unbounded is unsupported: world bounds are required, use update(dt, world)");
    }

    /// Draw every live entity in registration order, back to front
    pub fn draw(&self, surface: &mut dyn RenderSink) {
        for entity in self.iter().map(|(_, entity)| entity) {
            entity.draw(surface);
        }
    }

    /// Remove every inactive entity, handing each to `reclaimer`
    ///
    /// Call exactly once per frame, after every system that may deactivate
    /// entities has run. Returns the number of entities removed.
    pub fn reclaim_inactive(&mut self, reclaimer: &mut impl Reclaim<E>) -> usize {
        let entities = &mut self.entities;
        let by_instance = &mut self.by_instance;
        let mut removed = 0;

        self.order.retain(|&id| {
            let inactive = entities.get(id).is_some_and(|entity| !entity.is_active());
            if !inactive {
                return true;
            }
            if let Some(entity) = entities.remove(id) {
                by_instance.remove(&entity.instance_id());
                reclaimer.reclaim(entity);
                removed += 1;
            }
            false
        });

        removed
    }

    /// Drop every entity without returning any to a pool
    ///
    /// Only for full scene teardown.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.order.clear();
        self.by_instance.clear();
    }

    /// Live entity behind `id`
    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.entities.get(id)
    }

    /// Mutable live entity behind `id`
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut E> {
        self.entities.get_mut(id)
    }

    /// Whether `id` refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Key of the live entity with this instance id
    pub fn find_instance(&self, instance: InstanceId) -> Option<EntityId> {
        self.by_instance.get(&instance).copied()
    }

    /// Iterate live entities in registration order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &E)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.entities.get(id).map(|entity| (id, entity)))
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is live
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<E: SimEntity> Default for EntityRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SimEntity, T> ColliderLookup<TypedHandle<T>> for EntityRegistry<E> {
    fn collider(&self, handle: TypedHandle<T>) -> Option<&dyn Collidable> {
        self.entities.get(handle.key()).map(|entity| entity as &dyn Collidable)
    }
}
