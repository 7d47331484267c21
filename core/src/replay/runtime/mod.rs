//! Replay runtime
//!
//! - **Recorder**: appends every nondeterministic value to the log
//! - **Player**: hands the recorded values back in the same order

mod player;
mod recorder;

pub use player::Player;
pub use recorder::Recorder;
