//! Whole-frame scenarios across grid, pools, detector and registry

use crate::config::GameConfig;
use crate::entities::{Bullet, BulletSpawn, Entity, EntityKind, Hostile, HostileSpawn};
use crate::session::Session;
use crate::simulation::{DestructionNotice, FrameInput, SimulationStep, BULLET_HITS_HOSTILE};
use crate::spawner::ShootCommand;
use arena_engine::ecs::{EntityRegistry, SimEntity};
use arena_engine::foundation::collections::{EntityId, TypedHandle};
use arena_engine::foundation::math::{Extent, Vec2};
use arena_engine::foundation::memory::Poolable;
use arena_engine::physics::{Collidable, CollisionDetector};
use arena_engine::spatial::SpatialGrid;
use std::cell::RefCell;
use std::rc::Rc;

const DT: f32 = 1.0 / 60.0;

fn quiet_simulation() -> SimulationStep {
    let mut config = GameConfig::default();
    config.hostile.spawn_interval = 1000.0;
    SimulationStep::with_seed(config, 11).unwrap()
}

fn still_bullet(simulation: &mut SimulationStep, x: f32, y: f32) -> EntityId {
    simulation.spawn_bullet(BulletSpawn {
        position: Vec2::new(x, y),
        direction: Vec2::new(0.0, -1.0),
        speed: 0.0,
        owner: 0,
    })
}

fn still_hostile(simulation: &mut SimulationStep, x: f32, y: f32) -> EntityId {
    simulation.spawn_hostile(HostileSpawn {
        position: Vec2::new(x, y),
        velocity: Vec2::zeros(),
    })
}

fn count_kind(simulation: &SimulationStep, kind: EntityKind) -> usize {
    simulation
        .registry()
        .iter()
        .filter(|(_, entity)| entity.kind() == kind)
        .count()
}

fn record_notices(simulation: &mut SimulationStep) -> Rc<RefCell<Vec<DestructionNotice>>> {
    let notices = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notices);
    simulation.subscribe(move |notice: &DestructionNotice| {
        sink.borrow_mut().push(*notice);
        false
    });
    notices
}

#[test]
fn test_overlapping_bullet_and_hostile_collide_once() {
    let mut registry = EntityRegistry::<Entity>::new();

    let mut bullet = Bullet::inert(Extent::square(8.0));
    bullet.reinitialize(&BulletSpawn {
        position: Vec2::new(100.0, 100.0),
        direction: Vec2::new(0.0, -1.0),
        speed: 400.0,
        owner: 0,
    });
    let mut hostile = Hostile::inert(Extent::square(24.0));
    hostile.reinitialize(&HostileSpawn {
        position: Vec2::new(102.0, 102.0),
        velocity: Vec2::new(0.0, 60.0),
    });
    let bullet_id = registry.register(Entity::Bullet(bullet));
    let hostile_id = registry.register(Entity::Hostile(hostile));

    let mut bullets: SpatialGrid<TypedHandle<Bullet>> = SpatialGrid::new(800.0, 600.0, 64.0);
    let mut hostiles: SpatialGrid<TypedHandle<Hostile>> = SpatialGrid::new(800.0, 600.0, 64.0);
    bullets.insert(TypedHandle::new(bullet_id), &registry.get(bullet_id).unwrap().bounds());
    hostiles.insert(TypedHandle::new(hostile_id), &registry.get(hostile_id).unwrap().bounds());

    let mut detector = CollisionDetector::new(BULLET_HITS_HOSTILE);
    let events = detector.detect(&bullets, &hostiles, 64.0, &registry);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].a.key(), bullet_id);
    assert_eq!(events[0].b.key(), hostile_id);
    assert_eq!(events[0].kind, BULLET_HITS_HOSTILE);

    for event in &events {
        registry.get_mut(event.a.key()).unwrap().deactivate();
        registry.get_mut(event.b.key()).unwrap().deactivate();
    }
    assert!(!registry.get(bullet_id).unwrap().is_active());
    assert!(!registry.get(hostile_id).unwrap().is_active());
}

#[test]
fn test_collision_frame_destroys_both_and_notifies() {
    let mut simulation = quiet_simulation();
    let notices = record_notices(&mut simulation);
    let bullet_id = still_bullet(&mut simulation, 100.0, 100.0);
    let hostile_id = still_hostile(&mut simulation, 102.0, 102.0);
    let bullet_instance = simulation.registry().get(bullet_id).unwrap().instance_id();
    let hostile_instance = simulation.registry().get(hostile_id).unwrap().instance_id();

    let stats = simulation.step(DT, &FrameInput::idle()).clone();
    assert_eq!(stats.collisions, 1);
    assert_eq!(stats.drained, 1);
    assert_eq!(stats.reclaimed, 2);

    assert!(!simulation.registry().contains(bullet_id));
    assert!(!simulation.registry().contains(hostile_id));
    assert!(simulation.bullet_pool().contains(bullet_instance));
    assert!(simulation.hostile_pool().contains(hostile_instance));

    let notices = notices.borrow();
    assert_eq!(notices.len(), 1);
    let notice = notices[0];
    assert_eq!(notice.record.destroyed.instance, hostile_instance);
    assert_eq!(notice.record.destroyed.kind, EntityKind::Hostile);
    assert_eq!(notice.record.cause.instance, bullet_instance);
    assert_eq!(notice.record.cause.owner, Some(0));
    assert_eq!(notice.points, 100);
    assert_eq!(notice.score, 100);
    assert_eq!(simulation.scoreboard().score(), 100);
}

#[test]
fn test_every_observer_sees_each_destruction() {
    let mut simulation = quiet_simulation();
    simulation.subscribe(|_: &DestructionNotice| true);
    let notices = record_notices(&mut simulation);
    still_bullet(&mut simulation, 100.0, 100.0);
    still_hostile(&mut simulation, 102.0, 102.0);

    let stats = simulation.step(DT, &FrameInput::idle()).clone();
    assert_eq!(stats.drained, 1);
    assert_eq!(notices.borrow().len(), 1);
}

#[test]
fn test_pool_grows_past_prewarm() {
    let mut simulation = quiet_simulation();
    simulation.spawn_hostile_batch(100);
    assert_eq!(simulation.hostile_pool().free_len(), 0);
    assert_eq!(simulation.hostile_pool().allocated(), 100);

    still_hostile(&mut simulation, 10.0, 10.0);
    assert_eq!(simulation.hostile_pool().allocated(), 101);
    assert_eq!(count_kind(&simulation, EntityKind::Hostile), 101);
}

#[test]
fn test_hostile_below_world_is_reclaimed() {
    let mut simulation = quiet_simulation();
    let id = simulation.spawn_hostile(HostileSpawn {
        position: Vec2::new(100.0, 590.0),
        velocity: Vec2::new(0.0, 60.0),
    });
    let instance = simulation.registry().get(id).unwrap().instance_id();

    let stats = simulation.step(0.5, &FrameInput::idle()).clone();
    assert_eq!(stats.reclaimed, 1);
    assert_eq!(stats.collisions, 0);
    assert!(!simulation.registry().contains(id));
    assert!(simulation.hostile_pool().contains(instance));
    assert_eq!(simulation.hostile_pool().free_len(), 100);
}

#[test]
fn test_two_bullets_one_hostile_single_match() {
    let mut simulation = quiet_simulation();
    still_bullet(&mut simulation, 100.0, 100.0);
    still_bullet(&mut simulation, 104.0, 100.0);
    still_hostile(&mut simulation, 102.0, 102.0);

    let stats = simulation.step(DT, &FrameInput::idle()).clone();
    assert_eq!(stats.collisions, 1);
    assert_eq!(stats.drained, 1);
    assert_eq!(count_kind(&simulation, EntityKind::Bullet), 1);
    assert_eq!(count_kind(&simulation, EntityKind::Hostile), 0);

    // The survivor has nothing left to hit
    let stats = simulation.step(DT, &FrameInput::idle()).clone();
    assert_eq!(stats.collisions, 0);
    assert_eq!(count_kind(&simulation, EntityKind::Bullet), 1);
}

#[test]
fn test_bullet_hits_only_one_of_two_hostiles() {
    let mut simulation = quiet_simulation();
    still_bullet(&mut simulation, 120.0, 100.0);
    still_hostile(&mut simulation, 100.0, 96.0);
    still_hostile(&mut simulation, 124.0, 96.0);

    let stats = simulation.step(DT, &FrameInput::idle()).clone();
    assert_eq!(stats.collisions, 1);
    assert_eq!(count_kind(&simulation, EntityKind::Hostile), 1);
}

#[test]
fn test_new_spawn_collides_one_frame_later() {
    let mut simulation = quiet_simulation();
    // Player 0 sits at (344, 284); an upward shot leaves from (356, 284)
    still_hostile(&mut simulation, 350.0, 262.0);
    let shoot = FrameInput::idle().with_shot(ShootCommand::direction(0, Vec2::new(0.0, -1.0)));

    let stats = simulation.step(DT, &shoot).clone();
    assert_eq!(stats.spawned_bullets, 1);
    assert_eq!(stats.grid_bullets, 0);
    assert_eq!(stats.collisions, 0);
    assert_eq!(count_kind(&simulation, EntityKind::Bullet), 1);

    let bullet_key = simulation
        .registry()
        .iter()
        .find(|(_, entity)| entity.kind() == EntityKind::Bullet)
        .map(|(id, _)| id)
        .unwrap();
    let hostile_key = simulation
        .registry()
        .iter()
        .find(|(_, entity)| entity.kind() == EntityKind::Hostile)
        .map(|(id, _)| id)
        .unwrap();
    let bullet_bounds = simulation.registry().get(bullet_key).unwrap().bounds();
    let hostile_bounds = simulation.registry().get(hostile_key).unwrap().bounds();
    assert!(bullet_bounds.intersects(&hostile_bounds), "overlapping from the first frame");

    let stats = simulation.step(DT, &FrameInput::idle()).clone();
    assert_eq!(stats.grid_bullets, 1);
    assert_eq!(stats.collisions, 1);
    assert_eq!(count_kind(&simulation, EntityKind::Bullet), 0);
    assert_eq!(count_kind(&simulation, EntityKind::Hostile), 0);
}

#[test]
fn test_mass_kill_drains_over_frames() {
    let mut simulation = quiet_simulation();
    let notices = record_notices(&mut simulation);
    for i in 0..25 {
        let x = 10.0 + 30.0 * i as f32;
        still_hostile(&mut simulation, x, 100.0);
        still_bullet(&mut simulation, x + 2.0, 102.0);
    }

    let stats = simulation.step(DT, &FrameInput::idle()).clone();
    assert_eq!(stats.collisions, 25);
    assert_eq!(stats.drained, 10);
    assert_eq!(stats.pending, 15);
    assert_eq!(stats.reclaimed, 50);

    let drained: Vec<usize> = (0..3)
        .map(|_| simulation.step(DT, &FrameInput::idle()).drained)
        .collect();
    assert_eq!(drained, vec![10, 5, 0]);
    assert_eq!(simulation.pending_destructions(), 0);

    let notices = notices.borrow();
    assert_eq!(notices.len(), 25);
    assert_eq!(notices.last().map(|notice| notice.combo), Some(25));
    let awarded: u64 = notices.iter().map(|notice| notice.points).sum();
    assert_eq!(awarded, simulation.scoreboard().score());
}

#[test]
fn test_reclaimed_instances_return_to_pool_once() {
    let mut simulation = quiet_simulation();
    let mut doomed = Vec::new();
    for i in 0..5 {
        let x = 50.0 + 100.0 * i as f32;
        let hostile = still_hostile(&mut simulation, x, 300.0);
        let bullet = still_bullet(&mut simulation, x + 4.0, 304.0);
        doomed.push(simulation.registry().get(hostile).unwrap().instance_id());
        doomed.push(simulation.registry().get(bullet).unwrap().instance_id());
    }
    let survivor = still_bullet(&mut simulation, 700.0, 20.0);
    assert_eq!(simulation.bullet_pool().free_len(), 94);

    simulation.step(DT, &FrameInput::idle());

    for instance in &doomed {
        assert!(simulation.registry().find_instance(*instance).is_none());
    }
    assert!(doomed[..].iter().step_by(2).all(|id| simulation.hostile_pool().contains(*id)));
    assert!(doomed[1..].iter().step_by(2).all(|id| simulation.bullet_pool().contains(*id)));
    assert_eq!(simulation.bullet_pool().free_len(), 99);
    assert_eq!(simulation.hostile_pool().free_len(), 100);
    assert!(simulation.registry().contains(survivor));
}

#[test]
fn test_pooled_bullet_is_reused_after_reclaim() {
    let mut simulation = quiet_simulation();
    for _ in 0..300 {
        let shoot = FrameInput::idle().with_shot(ShootCommand::direction(0, Vec2::new(-1.0, 0.0)));
        simulation.step(DT, &shoot);
    }
    // A bullet leaves the left edge in under a second
    assert!(simulation.bullet_pool().allocated() <= 100);
    assert!(count_kind(&simulation, EntityKind::Bullet) < 300);
}

#[test]
fn test_pause_leaves_state_untouched() {
    let mut config = GameConfig::default();
    config.hostile.spawn_interval = 0.5;
    let simulation = SimulationStep::with_seed(config, 5).unwrap();
    let mut session = Session::new(simulation);

    let hostile = still_hostile(session.simulation_mut(), 200.0, 100.0);
    session.simulation_mut().spawn_hostile(HostileSpawn {
        position: Vec2::new(400.0, 100.0),
        velocity: Vec2::new(0.0, 60.0),
    });
    session.frame(0.25, &FrameInput::idle());
    let live = session.simulation().registry().len();
    let positions: Vec<Vec2> = session
        .simulation()
        .registry()
        .iter()
        .map(|(_, entity)| entity.position())
        .collect();

    session.toggle_pause();
    for _ in 0..10 {
        let shoot = FrameInput::idle().with_shot(ShootCommand::direction(0, Vec2::new(0.0, -1.0)));
        assert!(session.frame(0.25, &shoot).is_none());
    }
    let paused_positions: Vec<Vec2> = session
        .simulation()
        .registry()
        .iter()
        .map(|(_, entity)| entity.position())
        .collect();
    assert_eq!(paused_positions, positions);
    assert_eq!(session.simulation().registry().len(), live);
    assert_eq!(session.simulation().stats().frame, 1);

    session.toggle_pause();
    let stats = session.frame(0.25, &FrameInput::idle()).cloned().unwrap();
    assert_eq!(stats.frame, 2);
    assert_eq!(stats.spawned_hostiles, 1, "timer resumes from where it stopped");
    assert!(session.simulation().registry().contains(hostile));
}
