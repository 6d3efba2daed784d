//! Strider demo application
//!
//! Drives the engine core headlessly for a scripted run: the player holds
//! right, jumps over incoming hazards, and collects pickups while the
//! spawner streams objects in from the right edge. Game-progress events
//! and a performance summary are logged instead of rendered.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use strider_engine::prelude::*;

/// Frames to simulate (10 seconds at 60 fps)
const RUN_FRAMES: u64 = 600;

/// Fixed step matching the target frame rate
const STEP: f32 = 1.0 / 60.0;

struct DemoApp {
    engine: Engine,
    rng: StdRng,
    /// Distance accumulated toward the next spawn
    spawn_distance: f32,
    scroll_speed: f32,
}

impl DemoApp {
    fn new() -> Result<Self, EngineError> {
        let config = load_config();
        log::info!(
            "Creating demo engine ({}x{} play area, ground at y={})",
            config.play_width,
            config.play_height,
            config.ground_y
        );

        let mut engine = Engine::new(config)?;
        register_clips(&mut engine);

        engine.events_mut().subscribe(|event| match event {
            GameEvent::StateChanged { from, to, timestamp } => {
                log::debug!("[{timestamp:7.3}s] {from:?} -> {to:?}");
            }
            GameEvent::FatalCollision { object } => {
                log::info!("hit hazard {object:?} - game over");
            }
            GameEvent::PickupCollected { value, .. } => {
                log::info!("collected pickup worth {value}");
            }
        });

        Ok(Self {
            engine,
            rng: StdRng::seed_from_u64(7),
            spawn_distance: 0.0,
            scroll_speed: 180.0,
        })
    }

    fn run(&mut self) {
        log::info!("Starting scripted run ({RUN_FRAMES} frames)...");

        // Tween a display value the way a HUD fade would
        let hud_alpha = Rc::new(Cell::new(0.0f32));
        let hud_clone = Rc::clone(&hud_alpha);
        self.engine
            .timeline_mut()
            .tween(0.0, 1.0, 0.5, Easing::QuadOut, move |v| hud_clone.set(v));

        for frame in 0..RUN_FRAMES {
            self.spawn_objects();

            let input = InputSnapshot {
                // Hop roughly twice a second to clear incoming hazards
                jump_requested: frame % 30 == 0,
                right: true,
                left: false,
                dt: STEP,
            };
            self.engine.step(&input);

            if self.engine.is_game_over() {
                log::info!("run ended on frame {frame}");
                break;
            }
        }

        self.summarize(hud_alpha.get());
    }

    /// Stream hazards and pickups in from the right edge
    fn spawn_objects(&mut self) {
        self.spawn_distance += self.scroll_speed * STEP;
        if self.spawn_distance < 220.0 {
            return;
        }
        self.spawn_distance = 0.0;

        let config = self.engine.config();
        let right_edge = config.play_width + 40.0;
        let ground_y = config.ground_y;
        let velocity = Vec2::new(-self.scroll_speed, 0.0);

        if self.rng.gen_bool(0.6) {
            self.engine.spawn_hazard(
                Vec2::new(right_edge, ground_y + 28.0),
                Vec2::new(20.0, 20.0),
                velocity,
                1,
            );
        } else {
            // Pickups float at jump height
            let lift = self.rng.gen_range(60.0f32..120.0);
            self.engine.spawn_pickup(
                Vec2::new(right_edge, ground_y - lift),
                Vec2::new(16.0, 16.0),
                velocity,
                10,
            );
        }
    }

    fn summarize(&self, hud_alpha: f32) {
        let perf = self.engine.perf();
        let (pool_free, pool_created, pool_reused) = self.engine.objects().pool_stats();

        log::info!("--- run summary ---");
        log::info!("frames stepped:   {}", self.engine.frame_count());
        log::info!("final score:      {}", self.engine.score());
        log::info!("game over:        {}", self.engine.is_game_over());
        log::info!("hud fade value:   {hud_alpha:.2}");
        log::info!(
            "avg frame cost:   {:.3} ms (worst {:.3} ms)",
            perf.average_frame_time() * 1000.0,
            perf.worst_frame_time() * 1000.0
        );
        log::info!("quality factor:   {:.2}", perf.quality_factor());
        log::info!(
            "pool stats:       {pool_created} created, {pool_reused} reused, {pool_free} idle"
        );
        log::info!(
            "collision span:   {:.3} ms",
            perf.span_time(Phase::Collision) * 1000.0
        );
    }
}

/// Register the entity's sprite clips
///
/// Frame values are sprite-sheet cell indices; the one-shot jump and land
/// clips freeze on their final frame.
fn register_clips(engine: &mut Engine) {
    let timeline = engine.timeline_mut();
    timeline.register_clip(AnimationClip::new("idle", vec![0, 1, 2, 1], 4.0, true));
    timeline.register_clip(AnimationClip::new("run", vec![8, 9, 10, 11, 12, 13], 12.0, true));
    timeline.register_clip(AnimationClip::new("jump", vec![16, 17, 18], 12.0, false));
    timeline.register_clip(AnimationClip::new("fall", vec![24, 25], 8.0, true));
    timeline.register_clip(AnimationClip::new("land", vec![32, 33, 34], 12.0, false));
}

/// Load `strider.toml` when present, falling back to defaults
fn load_config() -> GameConfig {
    let path = "strider.toml";
    if Path::new(path).exists() {
        match GameConfig::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {path}");
                return config;
            }
            Err(error) => {
                log::warn!("Failed to load {path}: {error}; using defaults");
            }
        }
    }
    GameConfig::default()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut app = DemoApp::new()?;
    app.run();

    // Shrink pools and frame history before a hypothetical next run
    app.engine.cleanup();
    log::info!("Demo shutdown complete");
    Ok(())
}
