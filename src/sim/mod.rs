//! Frame-driven simulation engines
//!
//! Everything here advances only when told to:
//! - Plinko steps once per fixed frame
//! - Crash advances by elapsed milliseconds
//! - Mines recomputes once per reveal
//! No engine touches the wallet or owns a scheduler.

pub mod clock;
pub mod collision;
pub mod crash;
pub mod mines;
pub mod plinko;

pub use clock::{FrameBudget, FrameClock};
pub use collision::{CollisionResult, ball_pin_collision, ball_wall_collision};
pub use crash::{CurveStatus, GrowthCurve};
pub use mines::{MinesBoard, RevealOutcome};
pub use plinko::{Ball, BallPhase, Landing, Pin, PlinkoBoard, PlinkoPhysics, PlinkoSim};
