//! Browser bindings
//!
//! `ToothRacer` is what the page instantiates: it owns the engine, the
//! pending animation frame and the DOM listeners, and tears all of them down
//! on `destroy()`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Once;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

use crate::audio::WebAudioBackend;
use crate::engine::{Engine, LoopControl};
use crate::highscore::LocalStorageStore;
use crate::renderer::CanvasSurface;
use crate::sim::Snapshot;
use crate::tuning::Tuning;

type WebEngine = Engine<CanvasSurface, WebAudioBackend, LocalStorageStore>;

/// State shared between the handle and its callbacks
struct Shared {
    engine: RefCell<WebEngine>,
    raf_id: Cell<Option<i32>>,
    /// Bumped on every (re)start and stop; stale frames compare unequal
    generation: Cell<u32>,
}

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
    });
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Host time on the `requestAnimationFrame` timeline (ms)
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

/// Hand a snapshot to JS as a plain camelCase object
fn deliver(callback: &js_sys::Function, snapshot: &Snapshot) {
    let value = serde_json::to_string(snapshot)
        .map_err(to_js)
        .and_then(|json| js_sys::JSON::parse(&json));
    match value {
        Ok(value) => {
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                log::warn!("Snapshot callback threw: {:?}", e);
            }
        }
        Err(e) => log::warn!("Failed to convert snapshot: {:?}", e),
    }
}

fn schedule(shared: &Rc<Shared>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let generation = shared.generation.get();
    let weak = Rc::downgrade(shared);
    let closure = Closure::once(move |time: f64| on_frame(weak, generation, time));
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => shared.raf_id.set(Some(id)),
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
    // Holds only a weak reference, so a leaked closure never keeps the engine alive
    closure.forget();
}

fn on_frame(shared: Weak<Shared>, generation: u32, time: f64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    if shared.generation.get() != generation {
        return;
    }
    shared.raf_id.set(None);

    let control = match shared.engine.try_borrow_mut() {
        Ok(mut engine) => engine.frame(time),
        // Re-entered from the snapshot callback; try again next refresh
        Err(_) => LoopControl::Continue,
    };
    if control == LoopControl::Continue {
        schedule(&shared);
    }
}

fn cancel(shared: &Shared) {
    shared.generation.set(shared.generation.get().wrapping_add(1));
    if let Some(id) = shared.raf_id.take() {
        if let Some(window) = web_sys::window() {
            window.cancel_animation_frame(id).ok();
        }
    }
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct ToothRacer {
    shared: Rc<Shared>,
    canvas: HtmlCanvasElement,
    keydown: Closure<dyn FnMut(KeyboardEvent)>,
    touchstart: Closure<dyn FnMut(TouchEvent)>,
    touchend: Closure<dyn FnMut(TouchEvent)>,
    destroyed: bool,
}

#[wasm_bindgen]
impl ToothRacer {
    /// `new ToothRacer(canvas, onSnapshot, tuningJson?)`
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        on_snapshot: js_sys::Function,
        tuning_json: Option<String>,
    ) -> Result<ToothRacer, JsValue> {
        init_logging();

        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(to_js)?,
            None => Tuning::default(),
        };
        let surface = CanvasSurface::from_canvas(canvas.clone()).map_err(to_js)?;
        let rng = Box::new(Pcg32::from_rng(&mut rand::rng()));
        let engine = Engine::new(
            surface,
            WebAudioBackend::new(),
            LocalStorageStore,
            tuning,
            rng,
            move |snapshot| deliver(&on_snapshot, &snapshot),
        )
        .map_err(to_js)?;

        let shared = Rc::new(Shared {
            engine: RefCell::new(engine),
            raf_id: Cell::new(None),
            generation: Cell::new(0),
        });

        // Keyboard
        let keydown = {
            let shared = shared.clone();
            Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Ok(mut engine) = shared.engine.try_borrow_mut() {
                    engine.key_down(&event.key());
                }
            })
        };

        // Swipe
        let touchstart = {
            let shared = shared.clone();
            Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let (Some(touch), Ok(mut engine)) =
                    (event.touches().get(0), shared.engine.try_borrow_mut())
                {
                    engine.touch_start(touch.client_x() as f32);
                }
            })
        };
        let touchend = {
            let shared = shared.clone();
            Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let (Some(touch), Ok(mut engine)) =
                    (event.changed_touches().get(0), shared.engine.try_borrow_mut())
                {
                    engine.touch_end(touch.client_x() as f32);
                }
            })
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("touchstart", touchstart.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("touchend", touchend.as_ref().unchecked_ref())?;

        log::info!("Tooth Racer ready");
        Ok(ToothRacer {
            shared,
            canvas,
            keydown,
            touchstart,
            touchend,
            destroyed: false,
        })
    }

    /// Back to a fresh, idle run
    pub fn reset(&mut self) -> Result<(), JsValue> {
        cancel(&self.shared);
        self.shared.engine.try_borrow_mut().map_err(to_js)?.reset();
        Ok(())
    }

    /// Start a run and the frame loop
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.destroyed {
            return Err(JsValue::from_str("ToothRacer was destroyed"));
        }
        cancel(&self.shared);
        self.shared
            .engine
            .try_borrow_mut()
            .map_err(to_js)?
            .start(now_ms());
        schedule(&self.shared);
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleAudio)]
    pub fn toggle_audio(&mut self, enabled: bool) -> Result<(), JsValue> {
        self.shared
            .engine
            .try_borrow_mut()
            .map_err(to_js)?
            .toggle_audio(enabled);
        Ok(())
    }

    /// Stop the loop, silence audio and detach input listeners
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        cancel(&self.shared);
        if let Ok(mut engine) = self.shared.engine.try_borrow_mut() {
            engine.stop();
        }
        if let Some(window) = web_sys::window() {
            window
                .remove_event_listener_with_callback("keydown", self.keydown.as_ref().unchecked_ref())
                .ok();
        }
        self.canvas
            .remove_event_listener_with_callback(
                "touchstart",
                self.touchstart.as_ref().unchecked_ref(),
            )
            .ok();
        self.canvas
            .remove_event_listener_with_callback("touchend", self.touchend.as_ref().unchecked_ref())
            .ok();
        log::info!("Tooth Racer destroyed");
    }
}

impl Drop for ToothRacer {
    fn drop(&mut self) {
        self.destroy();
    }
}
