//! Web Audio backend
//!
//! Every tone is a fresh oscillator through its own gain envelope; nodes are
//! dropped once scheduled and the browser collects them after they stop.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use super::{AudioBackend, Drone, NoiseBurst, Tone, Waveform};

/// Envelope floor (exponential ramps cannot reach zero)
const SILENCE: f32 = 0.0001;

/// Audio output through a browser `AudioContext`
pub struct WebAudioBackend {
    ctx: Option<AudioContext>,
    drone: Option<(OscillatorNode, GainNode)>,
    /// Delayed oscillators with their stop time, cancelled on demand
    scheduled: Vec<(OscillatorNode, f64)>,
}

impl Default for WebAudioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudioBackend {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            drone: None,
            scheduled: Vec::new(),
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        waveform: Waveform,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(oscillator_type(waveform));
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Forget delayed tones that have already finished
    fn prune(&mut self, now: f64) {
        self.scheduled.retain(|(_, end)| *end > now);
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

impl AudioBackend for WebAudioBackend {
    fn resume(&mut self) -> bool {
        let Some(ctx) = &self.ctx else {
            return false;
        };
        // Browsers keep the context suspended until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        true
    }

    fn sample_rate(&self) -> Option<f32> {
        self.ctx.as_ref().map(|ctx| ctx.sample_rate())
    }

    fn play_tone(&mut self, tone: &Tone) {
        let Some(ctx) = &self.ctx else { return };
        let Some((osc, gain)) = Self::create_osc(ctx, tone.frequency, tone.waveform) else {
            return;
        };
        let now = ctx.current_time();
        let t = now + tone.delay;
        let end = t + tone.duration;

        gain.gain().set_value_at_time(tone.volume, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(SILENCE, end).ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(end).ok();

        if tone.delay > 0.0 {
            self.prune(now);
            self.scheduled.push((osc, end));
        }
    }

    fn play_noise(&mut self, burst: &NoiseBurst) {
        let Some(ctx) = &self.ctx else { return };
        let Ok(len) = u32::try_from(burst.samples.len()) else {
            return;
        };
        if len == 0 {
            return;
        }
        let Ok(buffer) = ctx.create_buffer(1, len, burst.sample_rate) else {
            return;
        };
        let mut samples = burst.samples.clone();
        if buffer.copy_to_channel(&mut samples, 0).is_err() {
            return;
        }
        let Ok(source) = ctx.create_buffer_source() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };
        source.set_buffer(Some(&buffer));
        if source.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(&ctx.destination()).is_err()
        {
            return;
        }

        let t = ctx.current_time();
        gain.gain().set_value_at_time(burst.volume, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(SILENCE, t + burst.duration())
            .ok();
        source.start().ok();
    }

    fn start_drone(&mut self, drone: &Drone) {
        self.stop_drone();
        let Some(ctx) = &self.ctx else { return };
        let Some((osc, gain)) = Self::create_osc(ctx, drone.frequency, drone.waveform) else {
            return;
        };
        gain.gain().set_value(drone.volume);
        osc.start().ok();
        self.drone = Some((osc, gain));
    }

    fn retune_drone(&mut self, frequency: f32, glide: f64) {
        let (Some(ctx), Some((osc, _))) = (&self.ctx, &self.drone) else {
            return;
        };
        osc.frequency()
            .set_target_at_time(frequency, ctx.current_time(), glide)
            .ok();
    }

    fn stop_drone(&mut self) {
        if let Some((osc, gain)) = self.drone.take() {
            osc.stop().ok();
            osc.disconnect().ok();
            gain.disconnect().ok();
        }
    }

    fn cancel_scheduled(&mut self) {
        let now = self.ctx.as_ref().map_or(0.0, |ctx| ctx.current_time());
        for (osc, end) in self.scheduled.drain(..) {
            if end > now {
                osc.stop().ok();
                osc.disconnect().ok();
            }
        }
    }
}

impl Drop for WebAudioBackend {
    fn drop(&mut self) {
        self.stop_drone();
        self.cancel_scheduled();
    }
}
