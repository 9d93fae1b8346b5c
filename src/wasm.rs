//! WebAssembly bindings for Stair Timeline.
//!
//! Provides a thin wrapper around [`Engine`] for browser environments. The
//! host calls `tick` from `requestAnimationFrame` and reads the frame back as
//! a plain JS object.

use wasm_bindgen::prelude::*;

use crate::{
    Engine,
    schema::{AlgorithmKind, EngineConfig, MemoryPreferences, validate_stairs},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// WebAssembly wrapper for the playback engine.
#[wasm_bindgen]
pub struct WasmEngine {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmEngine {
    /// Create an engine from JSON configuration.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing EngineConfig; missing fields use defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmEngine, JsValue> {
        let config: EngineConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;

        let engine = Engine::with_preferences(config, Box::new(MemoryPreferences::new()));
        Ok(WasmEngine { engine })
    }

    /// Run frame callbacks due at `now_ms` (a `requestAnimationFrame` timestamp).
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) {
        self.engine.tick(now_ms);
    }

    /// Get the current render frame as a JS object.
    #[wasm_bindgen(js_name = getFrame)]
    pub fn get_frame(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.engine.frame())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Get the full playback state as a JS object.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.engine.state())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    #[wasm_bindgen(js_name = playPause)]
    pub fn play_pause(&mut self) {
        self.engine.play_pause();
    }

    #[wasm_bindgen(js_name = resetAnimation)]
    pub fn reset_animation(&mut self) {
        self.engine.reset_animation();
    }

    #[wasm_bindgen(js_name = previousStep)]
    pub fn previous_step(&mut self) {
        self.engine.previous_step();
    }

    #[wasm_bindgen(js_name = nextStep)]
    pub fn next_step(&mut self) {
        self.engine.next_step();
    }

    #[wasm_bindgen(js_name = setCurrentStep)]
    pub fn set_current_step(&mut self, step: i32) {
        self.engine.set_current_step(step as i64);
    }

    /// Jump to the step under a scrub bar at `percent` (0-100).
    #[wasm_bindgen(js_name = scrubTo)]
    pub fn scrub_to(&mut self, percent: f64) {
        self.engine.scrub_to(percent);
    }

    #[wasm_bindgen(js_name = setPlaybackSpeed)]
    pub fn set_playback_speed(&mut self, speed: f64) {
        self.engine.set_playback_speed(speed);
    }

    /// Switch algorithm by name ("dp", "matrix" or "formula").
    #[wasm_bindgen(js_name = setAlgorithm)]
    pub fn set_algorithm(&mut self, kind: &str) -> Result<(), JsValue> {
        let kind: AlgorithmKind = kind
            .parse()
            .map_err(|e| JsValue::from_str(&format!("{e}")))?;
        self.engine.set_algorithm(kind);
        Ok(())
    }

    /// Change the number of stairs from user input.
    #[wasm_bindgen(js_name = setProblemSize)]
    pub fn set_problem_size(&mut self, input: &str) -> Result<(), JsValue> {
        let stairs = validate_stairs(input).map_err(|e| JsValue::from_str(&format!("{e}")))?;
        self.engine.set_problem_size(stairs);
        Ok(())
    }

    #[wasm_bindgen(js_name = getCurrentStep)]
    pub fn get_current_step(&self) -> usize {
        self.engine.state().current_step()
    }

    #[wasm_bindgen(js_name = getTotalSteps)]
    pub fn get_total_steps(&self) -> usize {
        self.engine.state().total_steps()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.engine.state().is_playing()
    }

    /// Answer of the current walkthrough. Exact up to 2^53.
    #[wasm_bindgen(js_name = getResult)]
    pub fn get_result(&self) -> f64 {
        self.engine.result() as f64
    }

    /// Cancel both frame loops (component teardown).
    #[wasm_bindgen]
    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}
