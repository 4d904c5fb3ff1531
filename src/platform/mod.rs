//! Platform layer
//!
//! Handles browser/native differences for:
//! - Pointer coordinates -> playfield coordinates
//! - The `wasm-bindgen` handle (web only)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::map_pointer;
#[cfg(target_arch = "wasm32")]
pub use web::WebClawMachine;
