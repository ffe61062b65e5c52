//! Per-frame simulation
//!
//! [`SimulationStep::step`] runs one frame in a fixed order:
//!
//! 1. Rebuild the bullet and hostile grids from active live entities.
//! 2. Apply movement input and advance every entity.
//! 3. Fire bullets for this frame's shoot commands.
//! 4. Detect bullet/hostile collisions, deactivate both sides and queue
//!    a destruction record per destroyed hostile.
//! 5. Decay the combo, then drain at most `max_destructions_per_frame`
//!    records into score and observer notifications.
//! 6. Run the periodic hostile spawner.
//! 7. Reclaim inactive entities into their pools.
//!
//! Grids are built before anything spawns, so an entity spawned in step 3
//! or 6 cannot collide until the next frame. Reclamation is last so every
//! entity deactivated this frame stays addressable until the frame ends.

use crate::config::{GameConfig, MAX_PLAYERS};
use crate::entities::{Bullet, BulletSpawn, Entity, EntityKind, EntitySnapshot, Hostile, HostileSpawn, Player};
use crate::scoring::ScoreBoard;
use crate::spawner::{self, HostileSpawner, ShootCommand};
use arena_engine::config::ConfigError;
use arena_engine::ecs::{EntityRegistry, Reclaim};
use arena_engine::events::{DestructionQueue, EventBus, EventHandler};
use arena_engine::foundation::collections::{EntityId, TypedHandle};
use arena_engine::foundation::math::{Vec2, WorldBounds};
use arena_engine::foundation::memory::ObjectPool;
use arena_engine::foundation::time::Stopwatch;
use arena_engine::physics::{Collidable, CollisionDetector, CollisionKind};
use arena_engine::render::RenderSink;
use arena_engine::spatial::SpatialGrid;
use std::time::Duration;

/// Collision kind reported by the bullet/hostile pass
pub const BULLET_HITS_HOSTILE: CollisionKind = CollisionKind("bullet-hostile");

/// A hostile destroyed this frame, waiting for its consequences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestructionRecord {
    /// The destroyed entity
    pub destroyed: EntitySnapshot,
    /// The entity that destroyed it
    pub cause: EntitySnapshot,
}

/// Observer payload for one drained destruction record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestructionNotice {
    /// The drained record
    pub record: DestructionRecord,
    /// Points awarded for it
    pub points: u64,
    /// Combo count after it was applied
    pub combo: u32,
    /// Total score after it was applied
    pub score: u64,
}

/// External input for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    /// Movement direction per player slot; zero stands still
    pub movement: [Vec2; MAX_PLAYERS],
    /// Shoot requests in submission order
    pub shots: Vec<ShootCommand>,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            movement: [Vec2::zeros(); MAX_PLAYERS],
            shots: Vec::new(),
        }
    }
}

impl FrameInput {
    /// No movement, no shots
    pub fn idle() -> Self {
        Self::default()
    }

    /// Set the movement direction of `slot`; unknown slots are ignored
    pub fn with_movement(mut self, slot: usize, direction: Vec2) -> Self {
        if let Some(movement) = self.movement.get_mut(slot) {
            *movement = direction;
        }
        self
    }

    /// Append a shoot request
    pub fn with_shot(mut self, shot: ShootCommand) -> Self {
        self.shots.push(shot);
        self
    }
}

/// Counters and phase timings of the last frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames stepped so far
    pub frame: u64,
    /// Bullets filed into this frame's grid
    pub grid_bullets: usize,
    /// Hostiles filed into this frame's grid
    pub grid_hostiles: usize,
    /// Bullets fired this frame
    pub spawned_bullets: usize,
    /// Hostiles spawned by the timer this frame
    pub spawned_hostiles: usize,
    /// Collision events produced
    pub collisions: usize,
    /// Candidate pairs tested by the detector
    pub pairs_tested: usize,
    /// Destruction records drained
    pub drained: usize,
    /// Destruction records still queued after the drain
    pub pending: usize,
    /// Entities reclaimed at the end of the frame
    pub reclaimed: usize,
    /// Live entities after reclamation
    pub live: usize,
    /// Time spent rebuilding grids
    pub grid_time: Duration,
    /// Time spent moving entities and firing
    pub update_time: Duration,
    /// Time spent in collision detection
    pub collision_time: Duration,
    /// Time spent draining destruction records
    pub drain_time: Duration,
    /// Time spent spawning hostiles and reclaiming
    pub reclaim_time: Duration,
}

/// Bullet and hostile pools, the destination of reclaimed entities
struct Pools {
    bullets: ObjectPool<Bullet>,
    hostiles: ObjectPool<Hostile>,
}

impl Reclaim<Entity> for Pools {
    fn reclaim(&mut self, entity: Entity) {
        match entity {
            Entity::Bullet(bullet) => self.bullets.release(bullet),
            Entity::Hostile(hostile) => self.hostiles.release(hostile),
            Entity::Player(_) => {}
        }
    }
}

/// Owner of all simulation state; one [`step`](Self::step) per frame
pub struct SimulationStep {
    config: GameConfig,
    world: WorldBounds,
    registry: EntityRegistry<Entity>,
    players: Vec<EntityId>,
    pools: Pools,
    bullet_grid: SpatialGrid<TypedHandle<Bullet>>,
    hostile_grid: SpatialGrid<TypedHandle<Hostile>>,
    detector: CollisionDetector<TypedHandle<Hostile>>,
    destructions: DestructionQueue<DestructionRecord>,
    observers: EventBus<DestructionNotice>,
    scoreboard: ScoreBoard,
    spawner: HostileSpawner,
    stats: FrameStats,
}

impl SimulationStep {
    /// Build a scene from `config` with players placed and pools prewarmed
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = HostileSpawner::new(&config.hostile);
        Ok(Self::build(config, spawner))
    }

    /// Like [`SimulationStep::new`] with deterministic hostile placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = HostileSpawner::seeded(&config.hostile, seed);
        Ok(Self::build(config, spawner))
    }

    fn build(config: GameConfig, spawner: HostileSpawner) -> Self {
        let world = config.world_bounds();
        let cell_size = config.grid.cell_size;

        let bullet_extent = config.bullet.extent;
        let hostile_extent = config.hostile.extent;
        let pools = Pools {
            bullets: ObjectPool::new(config.pools.bullet_prewarm, move || Bullet::inert(bullet_extent)),
            hostiles: ObjectPool::new(config.pools.hostile_prewarm, move || Hostile::inert(hostile_extent)),
        };

        let mut simulation = Self {
            world,
            registry: EntityRegistry::new(),
            players: Vec::new(),
            pools,
            bullet_grid: SpatialGrid::new(world.width, world.height, cell_size),
            hostile_grid: SpatialGrid::new(world.width, world.height, cell_size),
            detector: CollisionDetector::new(BULLET_HITS_HOSTILE),
            destructions: DestructionQueue::new(),
            observers: EventBus::new(),
            scoreboard: ScoreBoard::new(&config.scoring),
            spawner,
            stats: FrameStats::default(),
            config,
        };
        simulation.place_players();
        simulation
    }

    fn place_players(&mut self) {
        let player = &self.config.player;
        let center = Vec2::new(self.world.width / 2.0, self.world.height / 2.0) - player.extent.half();
        let offset = self.world.width * player.spawn_offset;

        let placements: Vec<Vec2> = match player.count {
            0 => Vec::new(),
            1 => vec![center],
            _ => vec![center - Vec2::new(offset, 0.0), center + Vec2::new(offset, 0.0)],
        };

        self.players = placements
            .into_iter()
            .enumerate()
            .map(|(slot, position)| {
                self.registry
                    .register(Entity::Player(Player::new(slot, position, player.extent, player.speed)))
            })
            .collect();
    }

    /// Advance the simulation by one frame
    pub fn step(&mut self, dt: f32, input: &FrameInput) -> &FrameStats {
        let mut stats = FrameStats {
            frame: self.stats.frame + 1,
            ..FrameStats::default()
        };
        let mut watch = Stopwatch::start_new();

        // 1. Grids reflect this frame's state before anything moves or spawns
        self.rebuild_grids();
        stats.grid_bullets = self.bullet_grid.len();
        stats.grid_hostiles = self.hostile_grid.len();
        stats.grid_time = watch.lap();

        // 2. Motion and bounds deactivation
        for (slot, direction) in input.movement.iter().enumerate() {
            if let Some(player) = self.player_mut(slot) {
                player.set_direction(*direction);
            }
        }
        self.registry.update(dt, self.world);

        // 3. Input-driven spawns; not visible to collision until next frame
        for shot in &input.shots {
            if self.fire(*shot).is_some() {
                stats.spawned_bullets += 1;
            }
        }
        stats.update_time = watch.lap();

        // 4. Collisions
        let (collisions, pairs_tested) = self.resolve_collisions();
        stats.collisions = collisions;
        stats.pairs_tested = pairs_tested;
        stats.collision_time = watch.lap();

        // 5. Bounded consequence processing
        self.scoreboard.tick(dt);
        stats.drained = self.drain_destructions();
        stats.pending = self.destructions.len();
        stats.drain_time = watch.lap();

        // 6. Periodic spawner
        if let Some(spawn) = self.spawner.tick(dt, self.world) {
            self.spawn_hostile(spawn);
            stats.spawned_hostiles += 1;
        }

        // 7. Reclamation, exactly once per frame
        stats.reclaimed = self.registry.reclaim_inactive(&mut self.pools);
        stats.live = self.registry.len();
        stats.reclaim_time = watch.lap();

        log::trace!(
            "Frame {}: {} bullets, {} hostiles, {} collisions, {} drained, {} pending, {} reclaimed",
            stats.frame,
            stats.grid_bullets,
            stats.grid_hostiles,
            stats.collisions,
            stats.drained,
            stats.pending,
            stats.reclaimed
        );

        self.stats = stats;
        &self.stats
    }

    fn rebuild_grids(&mut self) {
        self.bullet_grid.clear();
        self.hostile_grid.clear();

        for (id, entity) in self.registry.iter() {
            if !entity.is_active() {
                continue;
            }
            match entity.kind() {
                EntityKind::Bullet => {
                    self.bullet_grid.insert(TypedHandle::new(id), &entity.bounds());
                }
                EntityKind::Hostile => {
                    self.hostile_grid.insert(TypedHandle::new(id), &entity.bounds());
                }
                EntityKind::Player => {}
            }
        }
    }

    fn resolve_collisions(&mut self) -> (usize, usize) {
        let events = self.detector.detect(
            &self.bullet_grid,
            &self.hostile_grid,
            self.config.grid.cell_size,
            &self.registry,
        );

        for event in &events {
            let bullet_id = event.a.key();
            let hostile_id = event.b.key();

            let Some(bullet) = self.registry.get_mut(bullet_id) else {
                continue;
            };
            bullet.deactivate();
            let cause = bullet.snapshot(bullet_id);

            let Some(hostile) = self.registry.get_mut(hostile_id) else {
                continue;
            };
            hostile.deactivate();
            self.destructions.push(DestructionRecord {
                destroyed: hostile.snapshot(hostile_id),
                cause,
            });
        }

        (events.len(), self.detector.last_pairs_tested)
    }

    fn drain_destructions(&mut self) -> usize {
        let cap = self.config.scoring.max_destructions_per_frame;
        let mut drained = 0;

        for record in self.destructions.drain_bounded(cap) {
            let points = self.scoreboard.award();
            let notice = DestructionNotice {
                record,
                points,
                combo: self.scoreboard.combo().count(),
                score: self.scoreboard.score(),
            };
            self.observers.dispatch(&notice);
            drained += 1;
        }

        if !self.destructions.is_empty() {
            log::debug!(
                "Destruction backlog: {} records deferred to next frame",
                self.destructions.len()
            );
        }
        drained
    }

    /// Fire one shot; ignored for unknown or inactive players
    ///
    /// Returns the registry key of the new bullet.
    pub fn fire(&mut self, shot: ShootCommand) -> Option<EntityId> {
        let player = self.player(shot.player)?;
        let spawn = spawner::bullet_spawn(player, shot.aim, &self.config.bullet);
        log::trace!(
            "Player {} fires from ({:.1}, {:.1}) towards ({:.2}, {:.2})",
            shot.player,
            spawn.position.x,
            spawn.position.y,
            spawn.direction.x,
            spawn.direction.y
        );
        Some(self.spawn_bullet(spawn))
    }

    /// Acquire a bullet from the pool and register it
    pub fn spawn_bullet(&mut self, spawn: BulletSpawn) -> EntityId {
        let bullet = self.pools.bullets.acquire(&spawn);
        self.registry.register(Entity::Bullet(bullet))
    }

    /// Acquire a hostile from the pool and register it
    pub fn spawn_hostile(&mut self, spawn: HostileSpawn) -> EntityId {
        log::trace!("Hostile spawned at ({:.1}, {:.1})", spawn.position.x, spawn.position.y);
        let hostile = self.pools.hostiles.acquire(&spawn);
        self.registry.register(Entity::Hostile(hostile))
    }

    /// Spawn `count` hostiles at random top-edge positions right away
    pub fn spawn_hostile_batch(&mut self, count: usize) -> Vec<EntityId> {
        self.spawner
            .spawn_batch(count, self.world)
            .into_iter()
            .map(|spawn| self.spawn_hostile(spawn))
            .collect()
    }

    /// Fire `count` bullets evenly around player `slot`
    pub fn spawn_bullet_ring(&mut self, slot: usize, count: usize) -> Vec<EntityId> {
        let Some(player) = self.player(slot) else {
            return Vec::new();
        };
        spawner::bullet_ring(player, count, &self.config.bullet)
            .into_iter()
            .map(|spawn| self.spawn_bullet(spawn))
            .collect()
    }

    /// Add a destruction observer after the existing ones
    pub fn subscribe(&mut self, handler: impl EventHandler<DestructionNotice> + 'static) {
        self.observers.subscribe(Box::new(handler));
    }

    /// Draw every live entity in registration order
    pub fn draw(&self, surface: &mut dyn RenderSink) {
        self.registry.draw(surface);
    }

    /// Tear the scene down and place fresh players
    ///
    /// Live pooled entities are dropped, not returned; the pools refill on
    /// demand.
    pub fn restart(&mut self) {
        self.registry.clear();
        self.destructions.clear();
        self.bullet_grid.clear();
        self.hostile_grid.clear();
        self.scoreboard.reset();
        self.stats = FrameStats::default();
        self.place_players();
    }

    /// Active player in `slot`
    pub fn player(&self, slot: usize) -> Option<&Player> {
        let id = *self.players.get(slot)?;
        self.registry
            .get(id)
            .filter(|entity| entity.is_active())
            .and_then(Entity::as_player)
    }

    fn player_mut(&mut self, slot: usize) -> Option<&mut Player> {
        let id = *self.players.get(slot)?;
        self.registry.get_mut(id).and_then(Entity::as_player_mut)
    }

    /// Live entities
    pub const fn registry(&self) -> &EntityRegistry<Entity> {
        &self.registry
    }

    /// Mutable live entities
    pub fn registry_mut(&mut self) -> &mut EntityRegistry<Entity> {
        &mut self.registry
    }

    /// Bullet grid as built in the last frame
    pub const fn bullet_grid(&self) -> &SpatialGrid<TypedHandle<Bullet>> {
        &self.bullet_grid
    }

    /// Hostile grid as built in the last frame
    pub const fn hostile_grid(&self) -> &SpatialGrid<TypedHandle<Hostile>> {
        &self.hostile_grid
    }

    /// Bullet pool
    pub const fn bullet_pool(&self) -> &ObjectPool<Bullet> {
        &self.pools.bullets
    }

    /// Hostile pool
    pub const fn hostile_pool(&self) -> &ObjectPool<Hostile> {
        &self.pools.hostiles
    }

    /// Destruction records not yet drained
    pub fn pending_destructions(&self) -> usize {
        self.destructions.len()
    }

    /// Score and combo state
    pub const fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    /// Statistics of the last frame
    pub const fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Active configuration
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// World bounds
    pub const fn world(&self) -> WorldBounds {
        self.world
    }
}
