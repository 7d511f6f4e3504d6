use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use crate::library::{TagRecord, tags};

use super::sink::create_sink_at;
use super::types::{EngineCmd, EngineEvent, PlaybackHandle};

pub(super) fn spawn_engine_thread(
    rx: Receiver<EngineCmd>,
    events: Sender<EngineEvent>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        // At most one live sink; always disposed before a replacement is built.
        let mut sink: Option<Sink> = None;
        let mut generation: u64 = 0;
        let mut paused = true;
        let mut path: Option<PathBuf> = None;

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        // Spawn a ticker thread to advance the shared position periodically.
        let info_for_ticker = playback_info.clone();
        thread::spawn(move || loop {
            thread::sleep(Duration::from_millis(500));
            if let Ok(mut info) = info_for_ticker.lock() {
                if info.playing {
                    info.position += Duration::from_millis(500);
                }
            }
        });

        fn dispose(
            sink: &mut Option<Sink>,
            paused: &mut bool,
            started_at: &mut Option<Instant>,
            accumulated: &mut Duration,
            playback_info: &PlaybackHandle,
        ) {
            if let Some(s) = sink.as_ref() {
                s.stop();
            }
            *sink = None;
            *paused = true;
            *started_at = None;
            *accumulated = Duration::ZERO;
            if let Ok(mut info) = playback_info.lock() {
                info.position = Duration::ZERO;
                info.playing = false;
            }
        }

        fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
            if fade_out_ms == 0 {
                sink.set_volume(0.0);
                return;
            }
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            sink.set_volume(1.0);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(1.0 - t);
                thread::sleep(Duration::from_millis(step_ms));
            }
            sink.set_volume(0.0);
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    EngineCmd::Load {
                        generation: r#gen,
                        path: new_path,
                    } => {
                        // Old handle goes first, synchronously, so there is
                        // never a moment with two live sinks.
                        dispose(
                            &mut sink,
                            &mut paused,
                            &mut started_at,
                            &mut accumulated,
                            &playback_info,
                        );
                        generation = r#gen;
                        path = None;

                        match create_sink_at(&stream, &new_path, Duration::ZERO) {
                            Ok((new_sink, decoded_duration)) => {
                                // Tag trouble is recoverable: play with a
                                // blank record.
                                let (tag_record, container_duration) = match tags::read(&new_path) {
                                    Ok(v) => v,
                                    Err(_) => (TagRecord::default(), None),
                                };
                                let duration = container_duration.or(decoded_duration);

                                new_sink.set_volume(1.0);
                                sink = Some(new_sink);
                                path = Some(new_path);
                                paused = true;

                                // The sink exists and is paused: by the time
                                // the controller reacts with Play, loading is
                                // already over.
                                let _ = events.send(EngineEvent::Loaded {
                                    generation,
                                    duration,
                                    tags: tag_record,
                                });
                            }
                            Err(error) => {
                                let _ = events.send(EngineEvent::LoadFailed { generation, error });
                            }
                        }
                    }

                    EngineCmd::Unload => {
                        dispose(
                            &mut sink,
                            &mut paused,
                            &mut started_at,
                            &mut accumulated,
                            &playback_info,
                        );
                        path = None;
                    }

                    EngineCmd::Play => {
                        if let Some(ref s) = sink {
                            s.play();
                            if paused {
                                paused = false;
                                started_at = Some(Instant::now());
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = true;
                                }
                            }
                        }
                    }

                    EngineCmd::Pause => {
                        if let Some(ref s) = sink {
                            s.pause();
                            if !paused {
                                paused = true;
                                if let Some(st) = started_at {
                                    accumulated += Instant::now() - st;
                                }
                                started_at = None;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = false;
                                }
                            }
                        }
                    }

                    EngineCmd::SeekBy(secs) => {
                        // Scrubbing: rebuild the current sink and skip into the file.
                        // This uses `Source::skip_duration` (works for common formats).
                        if sink.is_none() {
                            continue;
                        }
                        let Some(current) = path.clone() else {
                            continue;
                        };

                        let elapsed =
                            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        let new_elapsed = seek_target(elapsed, secs);

                        // Stop old sink and replace with a fresh one.
                        if let Some(s) = sink.as_ref() {
                            s.stop();
                        }

                        match create_sink_at(&stream, &current, new_elapsed) {
                            Ok((new_sink, _)) => {
                                if paused {
                                    started_at = None;
                                } else {
                                    new_sink.play();
                                    started_at = Some(Instant::now());
                                }
                                sink = Some(new_sink);
                                accumulated = new_elapsed;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.position = new_elapsed;
                                }
                            }
                            Err(error) => {
                                // The file stopped being readable under us;
                                // report it like a failed load.
                                dispose(
                                    &mut sink,
                                    &mut paused,
                                    &mut started_at,
                                    &mut accumulated,
                                    &playback_info,
                                );
                                path = None;
                                let _ =
                                    events.send(EngineEvent::LoadFailed { generation, error });
                            }
                        }
                    }

                    EngineCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = sink {
                            // Fade out gently before stopping.
                            fade_out_sink(s, fade_out_ms);
                            s.stop();
                        }
                        if let Ok(mut info) = playback_info.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic end-of-track check. Report once, then hold the
                    // drained sink paused until the controller reacts.
                    if let Some(ref s) = sink {
                        if !paused && s.empty() {
                            paused = true;
                            if let Some(st) = started_at {
                                accumulated += Instant::now() - st;
                            }
                            started_at = None;
                            if let Ok(mut info) = playback_info.lock() {
                                info.playing = false;
                            }
                            let _ = events.send(EngineEvent::Finished { generation });
                        }
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Clamp a relative seek at the start of the track. The far end needs no
/// clamp: skipping past it drains the sink, which reads as end-of-track.
pub(crate) fn seek_target(elapsed: Duration, delta_secs: i64) -> Duration {
    let cur = elapsed.as_secs() as i64;
    let new = (cur + delta_secs).max(0) as u64;
    Duration::from_secs(new)
}
