//! Procedural audio
//!
//! Everything is synthesized from numbers - no sound files. The synthesizer
//! decides *what* to play; an [`AudioBackend`] turns tones into sound on the
//! host (Web Audio in the browser, nothing elsewhere).

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioBackend;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single decaying tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub waveform: Waveform,
    /// Seconds until the tone has decayed to silence
    pub duration: f64,
    /// Peak gain
    pub volume: f32,
    /// Seconds from now until the tone starts
    pub delay: f64,
}

impl Tone {
    pub const fn new(frequency: f32, waveform: Waveform, duration: f64, volume: f32) -> Self {
        Self {
            frequency,
            waveform,
            duration,
            volume,
            delay: 0.0,
        }
    }

    /// Same tone, starting `delay` seconds later
    pub const fn after(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

/// A buffer of white noise, decayed like a tone
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBurst {
    pub samples: Vec<f32>,
    pub sample_rate: f32,
    pub volume: f32,
}

impl NoiseBurst {
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// The continuous engine sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drone {
    pub frequency: f32,
    pub waveform: Waveform,
    pub volume: f32,
}

/// Host audio output
pub trait AudioBackend {
    /// Wake the output (browsers start it suspended). Returns `false` when
    /// there is no output at all.
    fn resume(&mut self) -> bool;

    /// Output sample rate, if an output exists
    fn sample_rate(&self) -> Option<f32>;

    fn play_tone(&mut self, tone: &Tone);

    fn play_noise(&mut self, burst: &NoiseBurst);

    fn start_drone(&mut self, drone: &Drone);

    /// Glide the drone toward `frequency` with the given time constant
    fn retune_drone(&mut self, frequency: f32, glide: f64);

    fn stop_drone(&mut self);

    /// Stop every delayed tone that has not finished yet
    fn cancel_scheduled(&mut self);
}

/// Backend for hosts without audio output
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn resume(&mut self) -> bool {
        false
    }

    fn sample_rate(&self) -> Option<f32> {
        None
    }

    fn play_tone(&mut self, _tone: &Tone) {}

    fn play_noise(&mut self, _burst: &NoiseBurst) {}

    fn start_drone(&mut self, _drone: &Drone) {}

    fn retune_drone(&mut self, _frequency: f32, _glide: f64) {}

    fn stop_drone(&mut self) {}

    fn cancel_scheduled(&mut self) {}
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Target lane changed
    LaneShift,
    /// Unshielded hazard hit
    Crash,
    /// Hazard absorbed by the shield
    ShieldDeflect,
    /// Any reward collected
    RewardPickup,
    /// Floss wiped the road
    AreaClear,
    /// Run ended
    GameOver,
}

/// Engine drone at rest
pub const ENGINE_DRONE: Drone = Drone {
    frequency: 60.0,
    waveform: Waveform::Triangle,
    volume: 0.05,
};
/// Drone pitch gained per unit of effective speed
const ENGINE_HZ_PER_SPEED: f32 = 5.0;
/// Time constant of the drone pitch glide
const ENGINE_GLIDE: f64 = 0.1;

/// C4, E4, G4, C5
pub const MELODY: [f32; 4] = [261.63, 329.63, 392.00, 523.25];
const MELODY_NOTE: Tone = Tone::new(0.0, Waveform::Sine, 0.2, 0.03);
/// Missed melody ticks replayed at most after a stall
const MELODY_MAX_CATCH_UP: usize = 4;

/// Crash noise length and gain
const CRASH_SECONDS: f32 = 0.2;
const CRASH_VOLUME: f32 = 0.2;

/// Fixed-rate melody timer driven by host time
#[derive(Debug, Clone)]
pub struct MelodyScheduler {
    next_at: f64,
    interval: f64,
    note: usize,
}

impl MelodyScheduler {
    /// First note fires one interval after `now`
    pub fn new(now: f64, interval: f64) -> Self {
        Self {
            next_at: now + interval,
            interval,
            note: 0,
        }
    }

    /// Number of timer firings due by `now`
    pub fn fire(&mut self, now: f64) -> usize {
        let mut fired = 0;
        while now >= self.next_at {
            fired += 1;
            self.next_at += self.interval;
            if fired == MELODY_MAX_CATCH_UP {
                // Long stall (hidden tab): drop the backlog
                self.next_at = now + self.interval;
                break;
            }
        }
        fired
    }

    /// Frequency of the next note in the loop
    pub fn next_note(&mut self) -> f32 {
        let frequency = MELODY[self.note];
        self.note = (self.note + 1) % MELODY.len();
        frequency
    }
}

/// White noise samples in [-1, 1)
pub fn white_noise<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
}

/// Audio manager for the game
pub struct AudioSynth<A: AudioBackend> {
    backend: A,
    enabled: bool,
    drone_on: bool,
    melody: Option<MelodyScheduler>,
    warned_unavailable: bool,
    rng: Pcg32,
}

impl<A: AudioBackend> AudioSynth<A> {
    pub fn new(backend: A) -> Self {
        Self {
            backend,
            enabled: true,
            drone_on: false,
            melody: None,
            warned_unavailable: false,
            rng: Pcg32::from_rng(&mut rand::rng()),
        }
    }

    pub fn backend(&self) -> &A {
        &self.backend
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the drone or the melody is alive
    pub fn is_running(&self) -> bool {
        self.drone_on || self.melody.is_some()
    }

    /// Enable or mute. Muting tears down everything that is playing.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.silence();
        }
    }

    /// Start the drone and the melody, replacing any running ones
    pub fn start_continuous(&mut self, now: f64, melody_interval: f64) {
        self.stop_continuous();
        if !self.enabled || !self.wake() {
            return;
        }
        self.backend.start_drone(&ENGINE_DRONE);
        self.drone_on = true;
        self.melody = Some(MelodyScheduler::new(now, melody_interval));
        log::debug!("Continuous audio started");
    }

    pub fn stop_continuous(&mut self) {
        if self.drone_on {
            self.backend.stop_drone();
            self.drone_on = false;
        }
        self.melody = None;
    }

    /// Stop continuous sounds and any delayed cue still pending
    pub fn silence(&mut self) {
        self.stop_continuous();
        self.backend.cancel_scheduled();
    }

    /// Follow the effective speed with the drone pitch
    pub fn retune_engine(&mut self, effective_speed: f32) {
        if self.drone_on {
            let frequency = ENGINE_DRONE.frequency + effective_speed * ENGINE_HZ_PER_SPEED;
            self.backend.retune_drone(frequency, ENGINE_GLIDE);
        }
    }

    /// Fire melody notes that fell due by `now` (seconds of host time)
    pub fn service(&mut self, now: f64, game_over: bool) {
        let Some(melody) = self.melody.as_mut() else {
            return;
        };
        for _ in 0..melody.fire(now) {
            if !self.enabled || game_over {
                continue;
            }
            let tone = Tone {
                frequency: melody.next_note(),
                ..MELODY_NOTE
            };
            self.backend.play_tone(&tone);
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        match effect {
            SoundEffect::LaneShift => self.tones(&[Tone::new(400.0, Waveform::Sine, 0.05, 0.05)]),
            SoundEffect::Crash => self.play_crash(),
            SoundEffect::ShieldDeflect => {
                self.tones(&[Tone::new(800.0, Waveform::Square, 0.1, 0.1)])
            }
            SoundEffect::RewardPickup => self.tones(&[
                Tone::new(600.0, Waveform::Sine, 0.1, 0.1),
                Tone::new(800.0, Waveform::Sine, 0.1, 0.1).after(0.05),
                Tone::new(1000.0, Waveform::Sine, 0.1, 0.1).after(0.1),
            ]),
            SoundEffect::AreaClear => {
                self.tones(&[Tone::new(1200.0, Waveform::Triangle, 0.5, 0.2)])
            }
            SoundEffect::GameOver => self.tones(&[
                Tone::new(200.0, Waveform::Sawtooth, 0.5, 0.2),
                Tone::new(150.0, Waveform::Sawtooth, 0.5, 0.2).after(0.2),
                Tone::new(100.0, Waveform::Sawtooth, 1.0, 0.3).after(0.4),
            ]),
        }
    }

    fn tones(&mut self, tones: &[Tone]) {
        for tone in tones {
            self.backend.play_tone(tone);
        }
    }

    /// Crash - burst of white noise
    fn play_crash(&mut self) {
        let Some(sample_rate) = self.backend.sample_rate() else {
            return;
        };
        let len = (sample_rate * CRASH_SECONDS) as usize;
        let burst = NoiseBurst {
            samples: white_noise(&mut self.rng, len),
            sample_rate,
            volume: CRASH_VOLUME,
        };
        self.backend.play_noise(&burst);
    }

    /// Resume the output, warning once if there is none
    fn wake(&mut self) -> bool {
        let available = self.backend.resume();
        if !available && !self.warned_unavailable {
            log::warn!("Audio output unavailable - continuing without sound");
            self.warned_unavailable = true;
        }
        available
    }
}

impl<A: AudioBackend> Drop for AudioSynth<A> {
    fn drop(&mut self) {
        self.silence();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Call, RecordingBackend};
    use super::*;

    fn synth() -> AudioSynth<RecordingBackend> {
        AudioSynth::new(RecordingBackend::default())
    }

    #[test]
    fn test_single_drone_when_restarted() {
        let mut synth = synth();
        synth.start_continuous(0.0, 0.25);
        synth.start_continuous(1.0, 0.25);
        synth.start_continuous(2.0, 0.25);
        assert_eq!(synth.backend().live_drones(), 1);
        assert!(synth.is_running());

        synth.stop_continuous();
        assert_eq!(synth.backend().live_drones(), 0);
        assert!(!synth.is_running());
    }

    #[test]
    fn test_disabled_synth_stays_quiet() {
        let mut synth = synth();
        synth.set_enabled(false);
        assert!(!synth.is_enabled());
        synth.start_continuous(0.0, 0.25);
        synth.play(SoundEffect::RewardPickup);
        synth.service(10.0, false);
        assert!(!synth.is_running());
        assert!(synth.backend().tones().is_empty());
        assert_eq!(synth.backend().live_drones(), 0);
    }

    #[test]
    fn test_disabling_tears_everything_down() {
        let mut synth = synth();
        synth.start_continuous(0.0, 0.25);
        synth.set_enabled(false);
        assert!(!synth.is_running());
        assert_eq!(synth.backend().live_drones(), 0);
        assert_eq!(synth.backend().count(&Call::CancelScheduled), 1);
    }

    #[test]
    fn test_melody_loops_on_its_own_clock() {
        let mut synth = synth();
        synth.start_continuous(0.0, 0.25);
        synth.service(0.1, false);
        assert!(synth.backend().tones().is_empty());

        // Five firings regardless of how often we are serviced
        for step in 1..=5 {
            synth.service(0.25 * f64::from(step), false);
        }
        let notes: Vec<f32> = synth.backend().tones().iter().map(|t| t.frequency).collect();
        assert_eq!(notes, vec![MELODY[0], MELODY[1], MELODY[2], MELODY[3], MELODY[0]]);
        assert!(synth.backend().tones().iter().all(|t| t.volume == 0.03));
    }

    #[test]
    fn test_melody_silent_while_game_over() {
        let mut synth = synth();
        synth.start_continuous(0.0, 0.25);
        synth.service(1.0, true);
        assert!(synth.backend().tones().is_empty());
    }

    #[test]
    fn test_melody_drops_backlog_after_stall() {
        let mut melody = MelodyScheduler::new(0.0, 0.25);
        assert_eq!(melody.fire(60.0), MELODY_MAX_CATCH_UP);
        assert_eq!(melody.fire(60.1), 0);
        assert_eq!(melody.fire(60.25), 1);
    }

    #[test]
    fn test_engine_pitch_follows_effective_speed() {
        let mut synth = synth();
        synth.retune_engine(5.0);
        assert_eq!(synth.backend().count(&Call::Retune(85.0)), 0);

        synth.start_continuous(0.0, 0.25);
        synth.retune_engine(5.0);
        synth.retune_engine(2.5);
        assert_eq!(synth.backend().count(&Call::Retune(85.0)), 1);
        assert_eq!(synth.backend().count(&Call::Retune(72.5)), 1);
    }

    #[test]
    fn test_pickup_arpeggio_is_scheduled() {
        let mut synth = synth();
        synth.play(SoundEffect::RewardPickup);
        let tones = synth.backend().tones();
        let shape: Vec<(f32, f64)> = tones.iter().map(|t| (t.frequency, t.delay)).collect();
        assert_eq!(shape, vec![(600.0, 0.0), (800.0, 0.05), (1000.0, 0.1)]);
    }

    #[test]
    fn test_game_over_cue_descends() {
        let mut synth = synth();
        synth.play(SoundEffect::GameOver);
        let tones = synth.backend().tones();
        assert_eq!(tones.len(), 3);
        assert!(tones.windows(2).all(|w| w[0].frequency > w[1].frequency));
        assert!(tones.iter().all(|t| t.waveform == Waveform::Sawtooth));
        assert_eq!(tones[2].duration, 1.0);
    }

    #[test]
    fn test_crash_is_noise() {
        let mut synth = synth();
        synth.play(SoundEffect::Crash);
        assert_eq!(synth.backend().count(&Call::Noise { len: 200, volume: 0.2 }), 1);
    }

    #[test]
    fn test_silent_backend_degrades_quietly() {
        let mut synth = AudioSynth::new(SilentBackend);
        synth.start_continuous(0.0, 0.25);
        synth.play(SoundEffect::Crash);
        synth.service(1.0, false);
        assert!(!synth.is_running());
    }

    #[test]
    fn test_white_noise_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let samples = white_noise(&mut rng, 1000);
        assert_eq!(samples.len(), 1000);
        assert!(samples.iter().all(|s| (-1.0..1.0).contains(s)));
    }
}
