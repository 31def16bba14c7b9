//! `vantage_core` — math and timing primitives shared by every Vantage crate.
//!
//! | Module  | Responsibility                                         |
//! |---------|--------------------------------------------------------|
//! | `pose`  | Runtime-native pose/projection encodings → `glam::Mat4`|
//! | `time`  | Frame clock producing per-frame `Time` snapshots       |

pub mod pose;
pub mod time;

pub use time::{Time, TimeClock};

// glam is the one math library used across the workspace; re-export it so
// downstream crates agree on the version.
pub use glam;
