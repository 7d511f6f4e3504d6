//! MPRIS (D-Bus) service: lets desktop media keys drive the player.
//!
//! The service thread forwards control commands over an `mpsc` channel to
//! the event loop and publishes playback status and current-track metadata
//! from shared state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};
use std::time::Duration;

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::app::PlaybackState;

/// Transport commands arriving from D-Bus, drained by the event loop.
#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    /// Relative seek in whole seconds.
    SeekBy(i64),
}

/// Snapshot of the loaded track as published over D-Bus.
#[derive(Debug, Clone, Default)]
pub struct MprisTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub url: Option<String>,
    pub length: Option<Duration>,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<u64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    /// Publish (or clear) the loaded track. Blank tag fields clear their
    /// corresponding entries instead of publishing empty strings.
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&MprisTrack>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };

        match (index, track) {
            (Some(i), Some(t)) => {
                s.title = Some(t.title.clone()).filter(|v| !v.is_empty());
                s.artist = if t.artist.is_empty() {
                    Vec::new()
                } else {
                    vec![t.artist.clone()]
                };
                s.album = Some(t.album.clone()).filter(|v| !v.is_empty());
                s.url = t.url.clone();
                s.length_micros = t.length.map(|d| d.as_micros() as u64);
                s.track_id = zvariant::ObjectPath::try_from(format!(
                    "/org/mpris/MediaPlayer2/track/{i}"
                ))
                .ok()
                .map(|p| p.into());
            }
            _ => {
                s.title = None;
                s.artist = Vec::new();
                s.album = None;
                s.url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "segue"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    fn seek(&self, offset: i64) {
        // MPRIS offsets are microseconds; the player seeks in seconds.
        let secs = offset / 1_000_000;
        if secs != 0 {
            let _ = self.tx.send(ControlCmd::SeekBy(secs));
        }
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        // NOTE: This returns a &'static str; we map state into static strings.
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        fn put(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        }

        if let Some(ref id) = s.track_id {
            put(&mut map, "mpris:trackid", Value::from(id.clone()));
        }
        if let Some(ref title) = s.title {
            put(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            put(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(ref album) = s.album {
            put(&mut map, "xesam:album", Value::from(album.clone()));
        }
        if let Some(ref url) = s.url {
            put(&mut map, "xesam:url", Value::from(url.clone()));
        }
        if let Some(len) = s.length_micros {
            put(&mut map, "mpris:length", Value::from(len as i64));
        }

        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name("org.mpris.MediaPlayer2.segue").await {
                eprintln!("MPRIS: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
                eprintln!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                eprintln!("MPRIS: failed to register player iface: {e}");
                return;
            }

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
