//! Stair Timeline - Step-by-step playback of the climbing-stairs walkthroughs.
//!
//! This crate turns a run of one of three climbing-stairs algorithms into an
//! immutable timeline of narrated steps, plays that timeline back with
//! VCR-style transport controls, and animates an actor climbing the stairs in
//! sync with the active step.
//!
//! # Architecture
//!
//! - `schema`: Step data model, engine configuration, preference stores
//! - `algorithms`: Step sequence builders (dp, matrix, formula)
//! - `playback`: Playback state and transitions, frame callbacks, step clock, scrubbing
//! - `animation`: Actor motion phase machine, climbing paths, stair layout
//! - `render`: Per-frame view handed to a rendering surface
//! - `engine`: Owns all of the above and exposes the transport controls
//!
//! # Example
//!
//! ```rust
//! use stair_timeline::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.play_pause();
//!
//! // Host frame loop at ~60fps.
//! let mut now = 0.0;
//! while engine.state().is_playing() {
//!     engine.tick(now);
//!     now += 16.0;
//! }
//!
//! let last = engine.state().total_steps() - 1;
//! assert_eq!(engine.state().current_step(), last);
//! assert_eq!(engine.result(), 8);
//! ```

pub mod algorithms;
pub mod animation;
pub mod engine;
pub mod playback;
pub mod render;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use engine::{Engine, TickReport};
pub use playback::{Action, PlaybackState, transition};
pub use render::{RenderFrame, RenderSurface};
pub use schema::{AlgorithmKind, EngineConfig, Step};
