//! Playback module - Step state, frame callbacks, step clock and scrubbing.

mod frame;
mod scheduler;
mod scrub;
mod state;

pub use frame::*;
pub use scheduler::*;
pub use scrub::*;
pub use state::*;
