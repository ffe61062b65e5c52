//! Spawn requests
//!
//! Turns shoot commands into bullet spawn arguments and runs the periodic
//! hostile spawner. Nothing here touches the registry; the simulation
//! acquires from the pools and registers what these functions describe.

use crate::config::{BulletConfig, HostileConfig};
use crate::entities::{BulletSpawn, HostileSpawn, Player};
use arena_engine::foundation::math::{utils, Extent, Vec2, WorldBounds};
use nalgebra::Rotation2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where a shot is aimed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aim {
    /// Fixed direction (keyboard); zero means straight up
    Direction(Vec2),
    /// World-space target point (mouse); the shot heads from the player centre towards it
    Toward(Vec2),
}

/// One "shoot requested" input for a player this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootCommand {
    /// Player slot
    pub player: usize,
    /// Aim of the shot
    pub aim: Aim,
}

impl ShootCommand {
    /// Shot in a fixed direction
    pub const fn direction(player: usize, direction: Vec2) -> Self {
        Self {
            player,
            aim: Aim::Direction(direction),
        }
    }

    /// Shot towards a target point
    pub const fn toward(player: usize, target: Vec2) -> Self {
        Self {
            player,
            aim: Aim::Toward(target),
        }
    }
}

impl Aim {
    /// Unit travel direction for a shot fired by `player`
    pub fn resolve(self, player: &Player) -> Vec2 {
        match self {
            Self::Direction(direction) if direction == Vec2::zeros() => Vec2::new(0.0, -1.0),
            Self::Direction(direction) => direction.normalize(),
            Self::Toward(target) => utils::normalize_or_zero(target - player.center()),
        }
    }
}

/// Bullet top-left offset from the player's top-left for a given direction
///
/// Axis-aligned shots leave from the matching edge, centred on the other
/// axis; diagonal and zero shots leave from the centre.
pub fn spawn_offset(direction: Vec2, player: Extent, bullet: Extent) -> Vec2 {
    let cx = player.width / 2.0 - bullet.width / 2.0;
    let cy = player.height / 2.0 - bullet.height / 2.0;

    match (direction.x == 0.0, direction.y == 0.0) {
        (true, false) => {
            let y = if direction.y < 0.0 { 0.0 } else { player.height - bullet.height };
            Vec2::new(cx, y)
        }
        (false, true) => {
            let x = if direction.x < 0.0 { 0.0 } else { player.width - bullet.width };
            Vec2::new(x, cy)
        }
        _ => Vec2::new(cx, cy),
    }
}

/// Spawn arguments for a shot by `player`
pub fn bullet_spawn(player: &Player, aim: Aim, bullet: &BulletConfig) -> BulletSpawn {
    let direction = aim.resolve(player);
    let position = player.position() + spawn_offset(direction, player.extent(), bullet.extent);
    BulletSpawn {
        position,
        direction,
        speed: bullet.speed,
        owner: player.slot(),
    }
}

/// Spawn arguments for `count` bullets evenly spaced around `player`
pub fn bullet_ring(player: &Player, count: usize, bullet: &BulletConfig) -> Vec<BulletSpawn> {
    let position = player.position() + spawn_offset(Vec2::zeros(), player.extent(), bullet.extent);
    let step = std::f32::consts::TAU / count.max(1) as f32;

    (0..count)
        .map(|i| BulletSpawn {
            position,
            direction: Rotation2::new(step * i as f32) * Vec2::x(),
            speed: bullet.speed,
            owner: player.slot(),
        })
        .collect()
}

/// Periodic hostile spawner
///
/// Hostiles appear just above the top edge at a uniformly random column
/// and descend with the configured velocity.
#[derive(Debug, Clone)]
pub struct HostileSpawner {
    interval: f32,
    accumulator: f32,
    extent: Extent,
    velocity: Vec2,
    rng: StdRng,
}

impl HostileSpawner {
    /// Spawner seeded from OS entropy
    pub fn new(config: &HostileConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Spawner with a deterministic seed
    pub fn seeded(config: &HostileConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &HostileConfig, rng: StdRng) -> Self {
        Self {
            interval: config.spawn_interval,
            accumulator: 0.0,
            extent: config.extent,
            velocity: config.velocity,
            rng,
        }
    }

    /// Advance the timer; yields one spawn when the interval elapses
    pub fn tick(&mut self, dt: f32, world: WorldBounds) -> Option<HostileSpawn> {
        self.accumulator += dt;
        if self.accumulator < self.interval {
            return None;
        }
        self.accumulator = 0.0;
        Some(self.random_spawn(world))
    }

    /// `count` spawns placed immediately, independent of the timer
    pub fn spawn_batch(&mut self, count: usize, world: WorldBounds) -> Vec<HostileSpawn> {
        (0..count).map(|_| self.random_spawn(world)).collect()
    }

    fn random_spawn(&mut self, world: WorldBounds) -> HostileSpawn {
        let span = world.width - self.extent.width;
        let x = if span > 0.0 { self.rng.gen_range(0.0..span) } else { 0.0 };
        HostileSpawn {
            position: Vec2::new(x, -self.extent.height),
            velocity: self.velocity,
        }
    }

    /// Seconds accumulated towards the next spawn
    pub const fn accumulator(&self) -> f32 {
        self.accumulator
    }
}
