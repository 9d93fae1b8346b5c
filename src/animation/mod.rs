//! Actor animation for the staircase walkthrough.
//!
//! The actor runs on its own frame loop, independent of the step clock, and
//! is re-targeted only when the active step changes:
//!
//! ```text
//!   step change
//!       |
//!       v
//!   NONE --> PREPARE --> MOVING --> ARRIVED --> CELEBRATING --> NONE
//!            (anticipation) (eased path)  (snap)     (pose)
//! ```
//!
//! A step change during any phase aborts the cycle, snaps the actor to the
//! resting point the new step starts from, and restarts at PREPARE.

mod easing;
mod layout;
mod motion;
mod path;

pub use easing::{ease_in_out_quad, lerp};
pub use layout::StairLayout;
pub use motion::{MotionEngine, MotionState, Phase, Pose};
pub use path::{ClimbPath, Point};
