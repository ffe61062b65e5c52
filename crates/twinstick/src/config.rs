//! Game configuration
//!
//! Every tunable of the simulation lives here. Defaults reproduce the
//! arcade cabinet feel; a TOML or RON file can override any section.

use arena_engine::config::{Config, ConfigError};
use arena_engine::foundation::math::{Extent, Vec2, WorldBounds};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Player slots supported by input and scene setup
pub const MAX_PLAYERS: usize = 2;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield size
    pub world: WorldConfig,

    /// Broad-phase grid
    pub grid: GridConfig,

    /// Pool prewarm targets
    pub pools: PoolConfig,

    /// Player tuning
    pub player: PlayerConfig,

    /// Bullet tuning
    pub bullet: BulletConfig,

    /// Hostile tuning
    pub hostile: HostileConfig,

    /// Score and destruction processing
    pub scoring: ScoringConfig,
}

/// Playfield size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width in pixels
    pub width: f32,

    /// World height in pixels
    pub height: f32,
}

/// Broad-phase grid configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell edge length; should be commensurate with entity size
    pub cell_size: f32,
}

/// Pool prewarm targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Bullets allocated up front
    pub bullet_prewarm: usize,

    /// Hostiles allocated up front
    pub hostile_prewarm: usize,
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Sprite extent
    pub extent: Extent,

    /// Movement speed (pixels per second)
    pub speed: f32,

    /// Players placed at scene setup, up to [`MAX_PLAYERS`]
    pub count: usize,

    /// Horizontal distance of each player from the world centre, as a
    /// fraction of world width
    pub spawn_offset: f32,
}

/// Bullet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    /// Sprite extent
    pub extent: Extent,

    /// Travel speed (pixels per second)
    pub speed: f32,
}

/// Hostile configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileConfig {
    /// Sprite extent
    pub extent: Extent,

    /// Velocity given to every spawned hostile (pixels per second)
    pub velocity: Vec2,

    /// Seconds between periodic spawns
    pub spawn_interval: f32,
}

/// Scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points per destroyed hostile before the combo multiplier
    pub base_points: u64,

    /// Seconds a combo survives without another kill
    pub combo_timeout: f32,

    /// Kills per multiplier step
    pub combo_step: u32,

    /// Destruction records processed per frame at most
    pub max_destructions_per_frame: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size: 64.0 }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            bullet_prewarm: 100,
            hostile_prewarm: 100,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            extent: Extent::square(32.0),
            speed: 200.0,
            count: 2,
            spawn_offset: 0.05,
        }
    }
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            extent: Extent::square(8.0),
            speed: 400.0,
        }
    }
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self {
            extent: Extent::square(24.0),
            velocity: Vec2::new(0.0, 60.0),
            spawn_interval: 2.0,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_points: 100,
            combo_timeout: 3.0,
            combo_step: 3,
            max_destructions_per_frame: 10,
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// World bounds as passed to entity updates
    pub const fn world_bounds(&self) -> WorldBounds {
        WorldBounds::new(self.world.width, self.world.height)
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(message: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(message.into()))
        }

        // NaN fails both tests, so it is rejected along with zero and negatives
        fn positive(value: f32) -> bool {
            value.is_finite() && value > 0.0
        }

        if !positive(self.world.width) || !positive(self.world.height) {
            return invalid(format!(
                "world extents must be positive, got {}x{}",
                self.world.width, self.world.height
            ));
        }
        if !positive(self.grid.cell_size) {
            return invalid(format!("grid cell_size must be positive, got {}", self.grid.cell_size));
        }
        if self.scoring.max_destructions_per_frame == 0 {
            return invalid("scoring.max_destructions_per_frame must be at least 1");
        }
        if self.scoring.combo_step == 0 {
            return invalid("scoring.combo_step must be at least 1");
        }
        if !positive(self.scoring.combo_timeout) {
            return invalid(format!(
                "scoring combo_timeout must be positive, got {}",
                self.scoring.combo_timeout
            ));
        }
        if !positive(self.hostile.spawn_interval) {
            return invalid(format!(
                "hostile spawn_interval must be positive, got {}",
                self.hostile.spawn_interval
            ));
        }
        if self.player.count > MAX_PLAYERS {
            return invalid(format!(
                "at most {MAX_PLAYERS} players are supported, got {}",
                self.player.count
            ));
        }

        for (name, extent) in [
            ("player", self.player.extent),
            ("bullet", self.bullet.extent),
            ("hostile", self.hostile.extent),
        ] {
            if !positive(extent.width) || !positive(extent.height) {
                return invalid(format!(
                    "{name} extent must be positive, got {}x{}",
                    extent.width, extent.height
                ));
            }
        }

        for (name, value) in [
            ("player speed", self.player.speed),
            ("player spawn_offset", self.player.spawn_offset),
            ("bullet speed", self.bullet.speed),
            ("hostile velocity x", self.hostile.velocity.x),
            ("hostile velocity y", self.hostile.velocity.y),
        ] {
            if !value.is_finite() {
                return invalid(format!("{name} must be finite, got {value}"));
            }
        }

        Ok(())
    }

    /// Load configuration from `path`, falling back to defaults
    ///
    /// A missing, unreadable or invalid file is logged and replaced by
    /// [`GameConfig::default`].
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path).and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => {
                log::info!("Loaded game configuration from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Using default game configuration ({}): {err}", path.display());
                Self::default()
            }
        }
    }
}
