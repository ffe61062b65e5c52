//! Headless twinstick demo
//!
//! Runs a scripted match at a fixed 60 Hz without a window: both players
//! strafe and fire, a stress burst floods the arena midway, and the game
//! is paused for a moment. Draw calls go to a recorder.
//!
//! Usage: `twinstick [config.toml|config.ron]`

use arena_engine::foundation::logging;
use arena_engine::foundation::math::Vec2;
use arena_engine::foundation::time::FrameClock;
use arena_engine::render::DrawRecorder;
use std::cell::Cell;
use std::rc::Rc;
use twinstick::{FrameInput, GameConfig, Session, ShootCommand, SimulationStep};

const FRAMES: u64 = 1200;
const STRESS_FRAME: u64 = 600;
const PAUSE_FRAMES: std::ops::Range<u64> = 900..960;

struct HeadlessDemo {
    session: Session,
    clock: FrameClock,
    surface: DrawRecorder,
    notices: Rc<Cell<usize>>,
}

impl HeadlessDemo {
    fn new(config: GameConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let mut simulation = SimulationStep::new(config)?;

        let notices = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notices);
        simulation.subscribe(move |notice: &twinstick::DestructionNotice| {
            counter.set(counter.get() + 1);
            log::debug!(
                "Hostile {} destroyed by player {:?}: +{} (combo {}, score {})",
                notice.record.destroyed.instance,
                notice.record.cause.owner,
                notice.points,
                notice.combo,
                notice.score
            );
            false
        });

        Ok(Self {
            session: Session::new(simulation),
            clock: FrameClock::fixed(1.0 / 60.0),
            surface: DrawRecorder::default(),
            notices,
        })
    }

    fn scripted_input(frame: u64) -> FrameInput {
        let strafe = if (frame / 120) % 2 == 0 { 1.0 } else { -1.0 };
        let mut input = FrameInput::idle()
            .with_movement(0, Vec2::new(strafe, 0.0))
            .with_movement(1, Vec2::new(-strafe, 0.0));

        if frame % 10 == 0 {
            input = input.with_shot(ShootCommand::direction(0, Vec2::new(0.0, -1.0)));
        }
        if frame % 15 == 0 {
            let target = Vec2::new(400.0, 0.0);
            input = input.with_shot(ShootCommand::toward(1, target));
        }
        input
    }

    fn run(&mut self) {
        log::info!("Running {FRAMES} headless frames");

        for frame in 0..FRAMES {
            let dt = self.clock.tick();

            if frame == STRESS_FRAME {
                let simulation = self.session.simulation_mut();
                simulation.spawn_hostile_batch(50);
                simulation.spawn_bullet_ring(0, 36);
                log::info!("Stress burst: 50 hostiles, 36 bullets");
            }
            if frame == PAUSE_FRAMES.start || frame == PAUSE_FRAMES.end {
                self.session.toggle_pause();
            }

            let input = Self::scripted_input(frame);
            if let Some(stats) = self.session.frame(dt, &input) {
                if stats.pending > 0 {
                    log::debug!("Frame {}: {} destructions pending", stats.frame, stats.pending);
                }
            }

            self.surface.reset();
            self.session.simulation().draw(&mut self.surface);
        }
    }

    fn report(&self) {
        let simulation = self.session.simulation();
        let stats = simulation.stats();
        log::info!(
            "Finished after {} simulated frames ({:.1}s): score {}, {} destructions notified",
            stats.frame,
            self.clock.total_time(),
            simulation.scoreboard().score(),
            self.notices.get()
        );
        log::info!(
            "Live {} entities, {} draw calls last frame, bullet pool {} allocated, hostile pool {} allocated",
            stats.live,
            self.surface.calls().len(),
            simulation.bullet_pool().allocated(),
            simulation.hostile_pool().allocated()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load_or_default(path),
        None => {
            log::info!("No configuration file given; using defaults");
            GameConfig::default()
        }
    };

    let mut demo = HeadlessDemo::new(config)?;
    demo.run();
    demo.report();

    Ok(())
}
