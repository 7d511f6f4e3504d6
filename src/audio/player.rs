use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use super::engine::spawn_engine_thread;
use super::types::{EngineCmd, EngineEvent, PlaybackHandle, PlaybackInfo};

/// Facade over the engine thread: command sender, event drain and the
/// shared position handle.
pub struct AudioEngine {
    tx: Sender<EngineCmd>,
    events: Receiver<EngineEvent>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioEngine {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let engine_handle = spawn_engine_thread(rx, event_tx, playback_info.clone());

        Self {
            tx,
            events: event_rx,
            playback: playback_info,
            join: Mutex::new(Some(engine_handle)),
        }
    }

    /// Current playback position as observed by the ticker.
    pub fn position(&self) -> Duration {
        self.playback
            .lock()
            .map(|info| info.position)
            .unwrap_or(Duration::ZERO)
    }

    pub fn send(&self, cmd: EngineCmd) -> Result<(), mpsc::SendError<EngineCmd>> {
        self.tx.send(cmd)
    }

    /// Drain one pending engine event, if any.
    pub fn poll_event(&self) -> Option<EngineEvent> {
        self.events.try_recv().ok()
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(EngineCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
