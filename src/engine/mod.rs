//! Deterministic tunnel animation engine
//!
//! All animation logic lives here. This module must be pure and deterministic:
//! - One fixed step per display frame
//! - Seeded RNG only
//! - Stable pool iteration order
//! - No rendering or platform dependencies (emits a draw list)

pub mod frame;
pub mod segment;

pub use frame::{DrawCmd, DrawList, EnginePhase, EngineState, FrameInput, advance_frame};
pub use segment::Segment;
