//! Game entities
//!
//! Three variants share one tagged union, [`Entity`], so the registry can
//! own them by value and dispatch without trait objects. Bullets and
//! hostiles are pooled; players live for the whole scene.

use arena_engine::ecs::SimEntity;
use arena_engine::foundation::collections::{EntityId, InstanceId};
use arena_engine::foundation::math::{utils, Extent, Rect, Vec2, WorldBounds};
use arena_engine::foundation::memory::Poolable;
use arena_engine::physics::Collidable;
use arena_engine::render::{Color, RenderSink};

/// Variant tag of an [`Entity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Player-controlled ship
    Player,
    /// Player projectile
    Bullet,
    /// Descending enemy
    Hostile,
}

/// Player ship
#[derive(Debug, Clone)]
pub struct Player {
    instance: InstanceId,
    slot: usize,
    position: Vec2,
    extent: Extent,
    speed: f32,
    direction: Vec2,
    active: bool,
}

impl Player {
    /// Create an active player in `slot` with its top-left at `position`
    pub fn new(slot: usize, position: Vec2, extent: Extent, speed: f32) -> Self {
        Self {
            instance: InstanceId::fresh(),
            slot,
            position,
            extent,
            speed,
            direction: Vec2::zeros(),
            active: true,
        }
    }

    /// Player slot (0 or 1)
    pub const fn slot(&self) -> usize {
        self.slot
    }

    /// Set the movement intent for the next update; normalised when non-zero
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = utils::normalize_or_zero(direction);
    }

    /// Current movement intent
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Top-left position
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Sprite extent
    pub const fn extent(&self) -> Extent {
        self.extent
    }

    /// Centre of the sprite
    pub fn center(&self) -> Vec2 {
        self.position + self.extent.half()
    }
}

/// Arguments for (re)initialising a pooled [`Bullet`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletSpawn {
    /// Top-left spawn position
    pub position: Vec2,
    /// Unit travel direction
    pub direction: Vec2,
    /// Travel speed (pixels per second)
    pub speed: f32,
    /// Slot of the firing player
    pub owner: usize,
}

/// Player projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    instance: InstanceId,
    position: Vec2,
    direction: Vec2,
    speed: f32,
    extent: Extent,
    owner: usize,
    active: bool,
}

impl Bullet {
    /// Inert pool instance
    pub fn inert(extent: Extent) -> Self {
        Self {
            instance: InstanceId::fresh(),
            position: Vec2::zeros(),
            direction: Vec2::zeros(),
            speed: 0.0,
            extent,
            owner: 0,
            active: false,
        }
    }

    /// Slot of the firing player
    pub const fn owner(&self) -> usize {
        self.owner
    }

    /// Unit travel direction
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }
}

impl Poolable for Bullet {
    type SpawnArgs = BulletSpawn;

    fn reinitialize(&mut self, args: &BulletSpawn) {
        self.position = args.position;
        self.direction = args.direction;
        self.speed = args.speed;
        self.owner = args.owner;
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn instance_id(&self) -> InstanceId {
        self.instance
    }
}

/// Arguments for (re)initialising a pooled [`Hostile`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostileSpawn {
    /// Top-left spawn position
    pub position: Vec2,
    /// Velocity (pixels per second)
    pub velocity: Vec2,
}

/// Descending enemy
#[derive(Debug, Clone)]
pub struct Hostile {
    instance: InstanceId,
    position: Vec2,
    velocity: Vec2,
    extent: Extent,
    active: bool,
}

impl Hostile {
    /// Inert pool instance
    pub fn inert(extent: Extent) -> Self {
        Self {
            instance: InstanceId::fresh(),
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            extent,
            active: false,
        }
    }

    /// Current velocity
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl Poolable for Hostile {
    type SpawnArgs = HostileSpawn;

    fn reinitialize(&mut self, args: &HostileSpawn) {
        self.position = args.position;
        self.velocity = args.velocity;
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn instance_id(&self) -> InstanceId {
        self.instance
    }
}

/// Any simulated entity
#[derive(Debug, Clone)]
pub enum Entity {
    /// Player ship
    Player(Player),
    /// Player projectile
    Bullet(Bullet),
    /// Descending enemy
    Hostile(Hostile),
}

impl Entity {
    /// Variant tag
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Bullet(_) => EntityKind::Bullet,
            Self::Hostile(_) => EntityKind::Hostile,
        }
    }

    /// Mark the entity logically destroyed
    pub fn deactivate(&mut self) {
        match self {
            Self::Player(player) => player.active = false,
            Self::Bullet(bullet) => bullet.deactivate(),
            Self::Hostile(hostile) => hostile.deactivate(),
        }
    }

    /// Owning player slot: the player itself, or the bullet's shooter
    pub const fn owner(&self) -> Option<usize> {
        match self {
            Self::Player(player) => Some(player.slot),
            Self::Bullet(bullet) => Some(bullet.owner),
            Self::Hostile(_) => None,
        }
    }

    /// Player behind this entity, if any
    pub const fn as_player(&self) -> Option<&Player> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Mutable player behind this entity, if any
    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Frozen copy of the observable state, keyed by registry `id`
    pub fn snapshot(&self, id: EntityId) -> EntitySnapshot {
        EntitySnapshot {
            id,
            instance: self.instance_id(),
            kind: self.kind(),
            position: self.position(),
            bounds: self.bounds(),
            owner: self.owner(),
        }
    }

    const fn tint(&self) -> Color {
        match self {
            Self::Player(player) if player.slot == 0 => Color::WHITE,
            Self::Player(_) => Color::CYAN,
            Self::Bullet(_) => Color::YELLOW,
            Self::Hostile(_) => Color::RED,
        }
    }
}

impl Collidable for Entity {
    fn is_active(&self) -> bool {
        match self {
            Self::Player(player) => player.active,
            Self::Bullet(bullet) => bullet.active,
            Self::Hostile(hostile) => hostile.active,
        }
    }

    fn bounds(&self) -> Rect {
        match self {
            Self::Player(player) => Rect::from_position(player.position, player.extent),
            Self::Bullet(bullet) => Rect::from_position(bullet.position, bullet.extent),
            Self::Hostile(hostile) => Rect::from_position(hostile.position, hostile.extent),
        }
    }
}

impl SimEntity for Entity {
    fn instance_id(&self) -> InstanceId {
        match self {
            Self::Player(player) => player.instance,
            Self::Bullet(bullet) => bullet.instance,
            Self::Hostile(hostile) => hostile.instance,
        }
    }

    fn position(&self) -> Vec2 {
        match self {
            Self::Player(player) => player.position,
            Self::Bullet(bullet) => bullet.position,
            Self::Hostile(hostile) => hostile.position,
        }
    }

    fn update(&mut self, dt: f32, world: WorldBounds) {
        match self {
            Self::Player(player) => {
                // Players are clamped, never deactivated by bounds
                let next = player.position + player.direction * player.speed * dt;
                player.position = Vec2::new(
                    utils::clamp(next.x, 0.0, world.width - player.extent.width),
                    utils::clamp(next.y, 0.0, world.height - player.extent.height),
                );
            }
            Self::Bullet(bullet) => {
                if !bullet.active {
                    return;
                }
                bullet.position += bullet.direction * bullet.speed * dt;
                let (x, y) = (bullet.position.x, bullet.position.y);
                if x < -bullet.extent.width
                    || x > world.width
                    || y < -bullet.extent.height
                    || y > world.height
                {
                    bullet.active = false;
                }
            }
            Self::Hostile(hostile) => {
                if !hostile.active {
                    return;
                }
                hostile.position += hostile.velocity * dt;
                let (x, y) = (hostile.position.x, hostile.position.y);
                if y > world.height || x + hostile.extent.width < 0.0 || x > world.width {
                    hostile.active = false;
                }
            }
        }
    }

    fn draw(&self, surface: &mut dyn RenderSink) {
        if self.is_active() {
            surface.draw_sprite(self.bounds(), self.tint());
        }
    }
}

/// Frozen entity state carried by deferred destruction records
///
/// Records may drain frames after the entity was reclaimed, so they carry
/// a copy rather than a reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    /// Registry key at capture time; may be stale once drained
    pub id: EntityId,
    /// Physical instance
    pub instance: InstanceId,
    /// Variant tag
    pub kind: EntityKind,
    /// Top-left position at capture time
    pub position: Vec2,
    /// Bounds at capture time
    pub bounds: Rect,
    /// Owning player slot, if any
    pub owner: Option<usize>,
}
