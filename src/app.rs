//! Application module: the player controller.
//!
//! All player state lives in [`App`](model::App) and changes only through
//! the reducer in `update`: an [`Action`](update::Action) goes in, state
//! mutates, and the engine commands to run come back as
//! [`Effect`](update::Effect)s.

mod model;
mod update;

pub use model::*;
pub use update::*;
