//! The controller's transition table.
//!
//! Every user operation and every engine reply is an [`Action`]; applying
//! one mutates [`App`] and returns the [`Effect`]s (engine commands) the
//! transition requires. Keeping this pure makes the whole playback state
//! machine testable without an audio device or a terminal.

use std::time::Duration;

use crate::library::Track;

use super::model::{App, NowPlaying, Phase};

/// Everything that can happen to the controller.
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the track list. Resets to a clean stopped state; does not
    /// auto-play.
    SelectFiles(Vec<Track>),
    /// Load the track at the given index and play it once ready
    /// (playlist row activation). Out of range is a no-op.
    Select(usize),
    /// Flip play/pause. With no handle this loads and plays track 0.
    TogglePlayPause,
    /// Advance one track. No-op at the last index.
    Next,
    /// Retreat one track. No-op at index 0.
    Prev,
    /// Halt playback and reload track 0 without auto-play.
    Stop,
    /// Seek the live handle by a relative number of seconds.
    StepSeek(i64),
    /// Progress poll while playing.
    Tick { position: Duration },
    /// Engine reply: the stamped load finished and the handle is ready.
    Loaded {
        generation: u64,
        duration: Option<Duration>,
        meta: NowPlaying,
    },
    /// Engine reply: the stamped load failed; the track stays unloaded.
    LoadFailed { generation: u64, error: String },
    /// Engine reply: the current handle played through to the end.
    Finished { generation: u64 },
}

/// Engine commands requested by a transition.
///
/// The runtime forwards these onto the engine channel; the reducer never
/// touches the device itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Dispose the current handle (if any) and build one for `track`.
    /// The reply will carry `generation` back.
    Load { generation: u64, track: Track },
    /// Dispose the current handle and go quiet.
    Unload,
    Play,
    Pause,
    SeekBy(i64),
}

impl App {
    /// Apply one action. This is the only mutation path for playback
    /// state; each match arm is one transition of the state machine.
    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SelectFiles(tracks) => {
                self.tracks = tracks;
                self.selected = 0;
                self.cursor = 0;
                self.phase = Phase::Idle;
                self.playing = false;
                self.play_when_ready = false;
                self.progress = 0;
                self.duration = None;
                self.now_playing = None;
                self.status = None;
                // Invalidate any load still in flight for the old list.
                self.generation += 1;
                vec![Effect::Unload]
            }

            Action::Select(index) => {
                if index >= self.tracks.len() {
                    return Vec::new();
                }
                self.begin_load(index, true)
            }

            Action::TogglePlayPause => match self.phase {
                Phase::Idle => {
                    if self.tracks.is_empty() {
                        Vec::new()
                    } else {
                        self.begin_load(0, true)
                    }
                }
                // Mid-load there is nothing to pause yet; flip what the
                // pending load will do instead.
                Phase::Loading => {
                    self.play_when_ready = !self.play_when_ready;
                    Vec::new()
                }
                Phase::Ready => {
                    if self.playing {
                        self.playing = false;
                        vec![Effect::Pause]
                    } else {
                        self.playing = true;
                        vec![Effect::Play]
                    }
                }
            },

            Action::Next => {
                if self.selected + 1 >= self.tracks.len() {
                    return Vec::new();
                }
                self.begin_load(self.selected + 1, true)
            }

            Action::Prev => {
                if self.tracks.is_empty() || self.selected == 0 {
                    return Vec::new();
                }
                self.begin_load(self.selected - 1, true)
            }

            Action::Stop => {
                if self.tracks.is_empty() {
                    self.phase = Phase::Idle;
                    self.playing = false;
                    self.play_when_ready = false;
                    self.progress = 0;
                    self.duration = None;
                    self.now_playing = None;
                    self.generation += 1;
                    return vec![Effect::Unload];
                }
                self.begin_load(0, false)
            }

            Action::StepSeek(delta) => {
                if self.phase != Phase::Ready {
                    return Vec::new();
                }
                vec![Effect::SeekBy(delta)]
            }

            Action::Tick { position } => {
                if self.phase != Phase::Ready || !self.playing {
                    return Vec::new();
                }
                self.progress = compute_progress(position, self.duration);
                if self.progress >= 100 {
                    self.end_of_track()
                } else {
                    Vec::new()
                }
            }

            Action::Loaded {
                generation,
                duration,
                meta,
            } => {
                if generation != self.generation {
                    // Superseded by a newer load; the engine already
                    // disposed this handle's predecessor and will dispose
                    // this one on the next Load.
                    return Vec::new();
                }
                self.phase = Phase::Ready;
                self.duration = duration;
                self.now_playing = Some(meta);
                self.progress = 0;
                if self.play_when_ready {
                    self.playing = true;
                    vec![Effect::Play]
                } else {
                    self.playing = false;
                    Vec::new()
                }
            }

            Action::LoadFailed { generation, error } => {
                if generation != self.generation {
                    return Vec::new();
                }
                self.phase = Phase::Idle;
                self.playing = false;
                self.play_when_ready = false;
                self.status = Some(error);
                Vec::new()
            }

            Action::Finished { generation } => {
                if generation != self.generation {
                    return Vec::new();
                }
                if self.phase != Phase::Ready || !self.playing {
                    // Already handled via a 100% tick, or the user paused
                    // right at the end.
                    return Vec::new();
                }
                self.end_of_track()
            }
        }
    }

    /// Common entry into `Loading`: stamp a new generation, reset the
    /// per-handle state and ask the engine for a (re)load. The engine
    /// disposes the previous handle before building the new one.
    fn begin_load(&mut self, index: usize, autoplay: bool) -> Vec<Effect> {
        self.selected = index;
        self.cursor = index;
        self.phase = Phase::Loading;
        self.playing = false;
        self.play_when_ready = autoplay;
        self.progress = 0;
        self.duration = None;
        self.now_playing = None;
        self.status = None;
        self.generation += 1;

        vec![Effect::Load {
            generation: self.generation,
            track: self.tracks[index].clone(),
        }]
    }

    /// End-of-track policy: advance once if a next track exists, otherwise
    /// rebuild the final track paused at the start (a drained handle cannot
    /// be replayed, a fresh paused one can). Either way a new generation is
    /// stamped, so repeated 100% ticks and the trailing finished
    /// notification fall into the stale guard.
    fn end_of_track(&mut self) -> Vec<Effect> {
        if self.selected + 1 < self.tracks.len() {
            self.begin_load(self.selected + 1, true)
        } else {
            self.begin_load(self.selected, false)
        }
    }
}

/// Displayed progress: `round(ceil(position) / duration * 100)`, capped to
/// 100. An unknown or zero duration counts as 0% rather than dividing by
/// zero.
pub(crate) fn compute_progress(position: Duration, duration: Option<Duration>) -> u8 {
    let Some(total) = duration.map(|d| d.as_secs_f64()).filter(|t| *t > 0.0) else {
        return 0;
    };

    let pct = (position.as_secs_f64().ceil() / total * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
