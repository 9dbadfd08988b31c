//! Presentation-facade layer for ttsdeck adapters.
//!
//! Adapters (terminal, web, desktop) construct a [`PanelDeps`] at
//! their composition root and drive everything through the ops API;
//! the session itself never leaks transport concerns, and a host
//! without a speech capability never gets a panel at all.

mod controls;
mod deps;
mod error;
mod samples;

pub use controls::{ControlFlags, SessionOps};
pub use deps::PanelDeps;
pub use error::PanelError;
pub use samples::{SAMPLE_TEXTS, sample_text};
