//! Browser handle
//!
//! JS owns the canvas, the DOM and `requestAnimationFrame`; it forwards pointer
//! and click events here and paints the JSON snapshot each frame returns.

use std::sync::Once;

use wasm_bindgen::prelude::*;

use super::input::map_pointer;
use crate::machine::ClawMachine;
use crate::persistence::LocalStore;

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
    });
}

#[wasm_bindgen]
pub struct WebClawMachine {
    inner: ClawMachine<LocalStore>,
}

#[wasm_bindgen]
impl WebClawMachine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        init_logging();
        log::info!("Claw machine starting...");
        Self {
            inner: ClawMachine::with_store(LocalStore::default()),
        }
    }

    pub fn start(&mut self) {
        self.inner.start_session();
    }

    pub fn stop(&mut self) {
        self.inner.end_session();
    }

    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Pointer moved over the playfield element
    pub fn pointer_move(&mut self, client_x: f32, rect_left: f32, rect_width: f32) {
        let x = map_pointer(client_x, rect_left, rect_width, self.inner.tuning());
        self.inner.pointer_moved(x);
    }

    pub fn activate(&mut self) -> bool {
        self.inner.request_attempt()
    }

    /// Returns the new 1-based theme index
    pub fn cycle_theme(&mut self) -> u8 {
        self.inner.cycle_theme().index()
    }

    pub fn theme_class(&self) -> String {
        self.inner.theme().as_str().to_string()
    }

    pub fn toggle_rigged(&mut self) -> bool {
        self.inner.toggle_rigged()
    }

    pub fn total_wins(&self) -> u32 {
        self.inner.total_wins()
    }

    /// Step to `now_ms` and return `{snapshot, events}` as JSON
    ///
    /// `snapshot` is null once stopped. Each event carries a `kind`; a `won`
    /// event includes the exact item carried out.
    pub fn frame(&mut self, now_ms: f64) -> String {
        let report = self.inner.frame_report(now_ms);
        report.to_json().unwrap_or_else(|e| {
            log::warn!("Frame serialization failed: {}", e);
            String::new()
        })
    }

    /// Collection browser rows as JSON
    pub fn collection_json(&self) -> String {
        serde_json::to_string(&self.inner.collection()).unwrap_or_else(|e| {
            log::warn!("Collection serialization failed: {}", e);
            "[]".to_string()
        })
    }

    /// `[owned, total, percent]`
    pub fn progress(&self) -> Vec<u32> {
        let (owned, total, percent) = self.inner.progress();
        vec![owned as u32, total as u32, percent]
    }
}

impl Default for WebClawMachine {
    fn default() -> Self {
        Self::new()
    }
}
