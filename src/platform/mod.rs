//! Platform glue
//!
//! Browser bindings live in [`web`] (wasm32 only): canvas surface, Web Audio,
//! LocalStorage, the `requestAnimationFrame` loop and DOM input listeners,
//! exposed to JS as the `ToothRacer` handle. Native hosts drive
//! [`crate::Engine`] directly.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::ToothRacer;
