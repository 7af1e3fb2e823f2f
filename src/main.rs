//! Tooth Racer entry point
//!
//! The browser build is driven from JS through `ToothRacer`. Natively this
//! runs a headless autopilot session on the software framebuffer.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::Cell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use tooth_racer::audio::SilentBackend;
    use tooth_racer::renderer::RasterSurface;
    use tooth_racer::sim::autopilot;
    use tooth_racer::{Engine, LoopControl, MemoryStore, Tuning};

    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 600;
    /// Virtual display refresh (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten minutes of game time
    const MAX_FRAMES: u32 = 60 * 600;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let png_path = std::env::args().nth(1);

        let tuning = match std::env::var("TOOTH_RACER_TUNING") {
            Ok(json) => Tuning::from_json(&json)?,
            Err(_) => Tuning::default(),
        };

        let frames = Rc::new(Cell::new(0u32));
        let counter = frames.clone();
        let mut engine = Engine::new(
            RasterSurface::new(WIDTH, HEIGHT)?,
            SilentBackend,
            MemoryStore::new(),
            tuning,
            Box::new(Pcg32::from_rng(&mut rand::rng())),
            move |snapshot| {
                let n = counter.get() + 1;
                counter.set(n);
                if n % 300 == 0 || snapshot.game_over {
                    log::info!(
                        "t={:>5.1}s score={:.0} health={} speed={:.1}",
                        f64::from(n) * FRAME_MS / 1000.0,
                        snapshot.score,
                        snapshot.health,
                        snapshot.effective_speed
                    );
                }
            },
        )?;

        let mut now = 0.0;
        engine.start(now);
        for _ in 0..MAX_FRAMES {
            now += FRAME_MS;
            if let Some(direction) = autopilot::choose_direction(engine.simulation()) {
                engine.steer(direction);
            }
            if engine.frame(now) == LoopControl::Stop {
                break;
            }
        }

        let snapshot = engine.snapshot();
        println!(
            "Final score {:.0} after {} frames ({})",
            snapshot.score,
            frames.get(),
            if snapshot.game_over { "crashed out" } else { "time limit" }
        );

        if let Some(path) = png_path {
            engine.surface().save_png(&path)?;
            println!("Last frame written to {}", path);
        }
        engine.stop();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tooth Racer (native, headless) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page constructs `ToothRacer`; nothing to do here
}
