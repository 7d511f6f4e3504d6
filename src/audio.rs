//! Audio engine: rodio behind a command channel.
//!
//! The engine thread owns the output stream and at most one `Sink`. It is
//! commanded through [`EngineCmd`] and answers with stamped
//! [`EngineEvent`]s; the shared [`PlaybackHandle`] exposes the position for
//! progress polling.

mod engine;
mod player;
mod sink;
mod types;

pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
