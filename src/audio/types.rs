//! Engine-facing small types: commands, events, errors and handles.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::library::TagRecord;

/// Why a load could not produce a playable handle.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The decoder rejected the data.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
}

#[derive(Debug)]
pub enum EngineCmd {
    /// Dispose the current sink and build one for `path`. The matching
    /// reply event carries `generation` back.
    Load { generation: u64, path: PathBuf },
    /// Dispose the current sink and go quiet.
    Unload,
    /// Resume the current sink.
    Play,
    /// Pause the current sink, keeping its position.
    Pause,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i64),
    /// Quit the engine thread, optionally fading out over `fade_out_ms`
    /// milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Replies from the engine thread. Each carries the generation of the load
/// it belongs to so the controller can discard stale ones.
#[derive(Debug)]
pub enum EngineEvent {
    /// The handle is built (paused) and playable.
    Loaded {
        generation: u64,
        duration: Option<Duration>,
        /// Extracted tags; all blank when extraction failed.
        tags: TagRecord,
    },
    /// The handle could not be built; nothing is loaded now.
    LoadFailed { generation: u64, error: EngineError },
    /// The handle played through to the end. Fired once per playthrough.
    Finished { generation: u64 },
}

/// Runtime playback position shared with the UI loop.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Elapsed playback time for the current handle.
    pub position: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            position: Duration::ZERO,
            playing: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
