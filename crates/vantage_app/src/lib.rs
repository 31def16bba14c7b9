//! Vantage desktop client: companion window, input routing, and the
//! per-frame orchestrator.
//!
//! | Module     | Responsibility                                  |
//! |------------|-------------------------------------------------|
//! | `config`   | Command-line flags and startup options          |
//! | `graphics` | Window surface and render context bootstrap     |
//! | `hands`    | Controller state, action handles, haptics       |
//! | `runner`   | winit event loop and the frame pipeline         |

pub mod config;
pub mod graphics;
pub mod hands;
pub mod runner;

pub use config::AppConfig;
pub use runner::{run, Runner};
