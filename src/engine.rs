//! Engine facade
//!
//! Owns one simulation together with its drawing surface, audio and score
//! store. The host calls [`Engine::frame`] once per display refresh and stops
//! scheduling frames when it returns [`LoopControl::Stop`].

use rand::RngCore;

use crate::audio::{AudioBackend, AudioSynth, SoundEffect};
use crate::error::EngineError;
use crate::highscore::{ScoreStore, load_high_score};
use crate::input::{Direction, SwipeTracker};
use crate::renderer::{Renderer, Surface};
use crate::sim::{GameEvent, Simulation, Snapshot};
use crate::tuning::Tuning;

/// Facade lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Constructed or reset, loop idle
    Start,
    /// Run in progress, loop active
    Playing,
    /// Run ended, loop stopped until the next start
    GameOver,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Game engine instance
pub struct Engine<S: Surface, A: AudioBackend, K: ScoreStore> {
    sim: Simulation,
    renderer: Renderer,
    surface: S,
    audio: AudioSynth<A>,
    store: K,
    phase: EnginePhase,
    /// Host time of the previous frame (ms)
    last_frame: Option<f64>,
    swipe: SwipeTracker,
    on_snapshot: Box<dyn FnMut(Snapshot)>,
}

impl<S: Surface, A: AudioBackend, K: ScoreStore> Engine<S, A, K> {
    /// Build an engine. The best score is read from `store` once, here.
    pub fn new(
        surface: S,
        audio: A,
        store: K,
        tuning: Tuning,
        rng: Box<dyn RngCore>,
        on_snapshot: impl FnMut(Snapshot) + 'static,
    ) -> Result<Self, EngineError> {
        tuning.validate()?;
        let size = surface.size();
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(EngineError::InvalidSurface {
                width: size.x.max(0.0) as u32,
                height: size.y.max(0.0) as u32,
            });
        }
        let high_score = load_high_score(&store);
        log::info!(
            "Engine created ({}x{}, {} lanes)",
            size.x,
            size.y,
            tuning.lane_count
        );

        Ok(Self {
            sim: Simulation::new(tuning, size, high_score, rng),
            renderer: Renderer::new(),
            surface,
            audio: AudioSynth::new(audio),
            store,
            phase: EnginePhase::Start,
            last_frame: None,
            swipe: SwipeTracker::default(),
            on_snapshot: Box::new(on_snapshot),
        })
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn audio(&self) -> &AudioSynth<A> {
        &self.audio
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.sim.snapshot()
    }

    /// Back to the start screen with a fresh run. Keeps the best score.
    pub fn reset(&mut self) {
        self.audio.silence();
        self.sim.reset();
        self.swipe = SwipeTracker::default();
        self.phase = EnginePhase::Start;
        self.last_frame = None;
        log::info!("Engine reset");
    }

    /// Begin a new run at host time `now_ms`, replacing any previous one
    pub fn start(&mut self, now_ms: f64) {
        self.reset();
        self.phase = EnginePhase::Playing;
        self.last_frame = Some(now_ms);
        self.audio
            .start_continuous(now_ms / 1000.0, self.sim.tuning.melody_interval);
        log::info!("Run started (best {:.0})", self.sim.state.high_score);
    }

    /// Halt the loop and silence audio, leaving the run as it is
    pub fn stop(&mut self) {
        self.audio.silence();
        if self.phase == EnginePhase::Playing {
            self.phase = EnginePhase::Start;
        }
        self.last_frame = None;
    }

    pub fn toggle_audio(&mut self, enabled: bool) {
        self.audio.set_enabled(enabled);
        if enabled && self.phase == EnginePhase::Playing {
            let now = self.last_frame.unwrap_or(0.0) / 1000.0;
            self.audio
                .start_continuous(now, self.sim.tuning.melody_interval);
        }
        log::info!("Audio {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Run one frame: tick, audio, paint, snapshot
    pub fn frame(&mut self, now_ms: f64) -> LoopControl {
        if self.phase != EnginePhase::Playing {
            return LoopControl::Stop;
        }

        let elapsed = self
            .last_frame
            .map_or(0.0, |prev| ((now_ms - prev) / 1000.0) as f32);
        self.last_frame = Some(now_ms);
        let dt = if elapsed.is_finite() {
            elapsed.clamp(0.0, self.sim.tuning.max_frame_dt)
        } else {
            0.0
        };

        self.sim.set_surface_size(self.surface.size());
        let events = self.sim.tick(dt);
        self.audio.retune_engine(self.sim.effective_speed());
        for event in &events {
            self.handle_event(event);
        }
        self.audio
            .service(now_ms / 1000.0, self.sim.state.is_game_over);

        self.renderer.paint(&mut self.surface, &self.sim);
        self.sim.emit_exhaust();
        (self.on_snapshot)(self.sim.snapshot());

        if self.sim.state.is_game_over {
            self.phase = EnginePhase::GameOver;
            self.last_frame = None;
            LoopControl::Stop
        } else {
            LoopControl::Continue
        }
    }

    /// Move the target lane. Ignored once the run is over.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.phase == EnginePhase::GameOver {
            return false;
        }
        let moved = self.sim.steer(direction);
        if moved {
            self.audio.play(SoundEffect::LaneShift);
        }
        moved
    }

    /// Keyboard input (`KeyboardEvent.key`)
    pub fn key_down(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(direction) => self.steer(direction),
            None => false,
        }
    }

    pub fn touch_start(&mut self, x: f32) {
        self.swipe.begin(x);
    }

    pub fn touch_end(&mut self, x: f32) -> bool {
        match self.swipe.end(x, self.sim.tuning.swipe_threshold) {
            Some(direction) => self.steer(direction),
            None => false,
        }
    }

    fn handle_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::HazardHit { health, .. } => {
                log::debug!("Hit! health {}", health);
                self.audio.play(SoundEffect::Crash);
            }
            GameEvent::ShieldBlocked { .. } => self.audio.play(SoundEffect::ShieldDeflect),
            GameEvent::RewardCollected { .. } => self.audio.play(SoundEffect::RewardPickup),
            GameEvent::AreaCleared { removed } => {
                log::debug!("Floss cleared {} hazards", removed);
                self.audio.play(SoundEffect::AreaClear);
            }
            GameEvent::GameOver { new_record, .. } => {
                self.audio.silence();
                if new_record {
                    if let Err(e) = self.store.save(self.sim.state.high_score) {
                        log::warn!("Failed to save high score: {}", e);
                    }
                }
                self.audio.play(SoundEffect::GameOver);
            }
        }
    }
}

impl<S: Surface, A: AudioBackend, K: ScoreStore> Drop for Engine<S, A, K> {
    fn drop(&mut self) {
        self.stop();
        log::debug!("Engine dropped");
    }
}
