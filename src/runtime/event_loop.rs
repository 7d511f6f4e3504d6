use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Action, App, Effect, NowPlaying, PlaybackState};
use crate::audio::{AudioEngine, EngineCmd, EngineEvent};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// When the progress poll last ran.
    last_tick: Instant,
    /// Last-known loaded index as emitted to MPRIS.
    last_mpris_index: Option<usize>,
    /// Last-known playback state as emitted to MPRIS.
    last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            last_tick: Instant::now(),
            last_mpris_index: None,
            last_mpris_playback: app.playback_state(),
        }
    }
}

/// Apply one action and forward the resulting effects onto the engine
/// channel. This is the only place controller effects touch the engine.
fn dispatch(app: &mut App, engine: &AudioEngine, action: Action) {
    for effect in app.apply(action) {
        let cmd = match effect {
            Effect::Load { generation, track } => EngineCmd::Load {
                generation,
                path: track.path,
            },
            Effect::Unload => EngineCmd::Unload,
            Effect::Play => EngineCmd::Play,
            Effect::Pause => EngineCmd::Pause,
            Effect::SeekBy(secs) => EngineCmd::SeekBy(secs),
        };
        let _ = engine.send(cmd);
    }
}

/// Translate an engine reply into a controller action.
fn apply_engine_event(app: &mut App, engine: &AudioEngine, ev: EngineEvent) {
    match ev {
        EngineEvent::Loaded {
            generation,
            duration,
            tags,
        } => {
            // The record's file name comes from the track the stamp refers
            // to; for a stale stamp the reducer drops the whole reply.
            let name = app
                .tracks
                .get(app.selected)
                .map(|t| t.name.clone())
                .unwrap_or_default();

            dispatch(
                app,
                engine,
                Action::Loaded {
                    generation,
                    duration,
                    meta: NowPlaying { name, tags },
                },
            );
        }
        EngineEvent::LoadFailed { generation, error } => {
            dispatch(
                app,
                engine,
                Action::LoadFailed {
                    generation,
                    error: error.to_string(),
                },
            );
        }
        EngineEvent::Finished { generation } => {
            dispatch(app, engine, Action::Finished { generation });
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, engine replies and
/// MPRIS sync. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    engine: &AudioEngine,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.playback.progress_tick_ms);

    loop {
        // Apply engine replies first so this frame reflects them.
        while let Some(ev) = engine.poll_event() {
            apply_engine_event(app, engine, ev);
        }

        // Progress poll, active only while playing.
        if app.playback_state() == PlaybackState::Playing && state.last_tick.elapsed() >= tick {
            state.last_tick = Instant::now();
            let position = engine.position();
            dispatch(app, engine, Action::Tick { position });
        }

        // Keep MPRIS in sync even when playback changes come from media keys
        // or auto-advance.
        let index_snapshot = app.now_playing.as_ref().map(|_| app.selected);
        if index_snapshot != state.last_mpris_index
            || app.playback_state() != state.last_mpris_playback
        {
            update_mpris(mpris, app);
            state.last_mpris_index = index_snapshot;
            state.last_mpris_playback = app.playback_state();
        }

        let elapsed = engine.position();
        terminal.draw(|f| ui::draw(f, app, elapsed, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, engine)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, engine, control_tx)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    engine: &AudioEngine,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            engine.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        ControlCmd::Play => {
            if app.playback_state() != PlaybackState::Playing {
                dispatch(app, engine, Action::TogglePlayPause);
            }
        }
        ControlCmd::Pause => {
            if app.playback_state() == PlaybackState::Playing {
                dispatch(app, engine, Action::TogglePlayPause);
            }
        }
        ControlCmd::PlayPause => {
            dispatch(app, engine, Action::TogglePlayPause);
        }
        ControlCmd::Stop => {
            dispatch(app, engine, Action::Stop);
        }
        ControlCmd::Next => {
            dispatch(app, engine, Action::Next);
        }
        ControlCmd::Prev => {
            dispatch(app, engine, Action::Prev);
        }
        ControlCmd::SeekBy(secs) => {
            dispatch(app, engine, Action::StepSeek(secs));
        }
    }

    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    engine: &AudioEngine,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> Result<bool, Box<dyn std::error::Error>> {
    match key.code {
        KeyCode::Char('q') => {
            engine.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.cursor_next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor_prev();
        }
        KeyCode::Enter => {
            // Activate the highlighted row: load it and play.
            dispatch(app, engine, Action::Select(app.cursor));
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            // Behave like MPRIS PlayPause.
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('x') => {
            let _ = control_tx.send(ControlCmd::Stop);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            let secs = settings.controls.step_seconds.min(i64::MAX as u64) as i64;
            dispatch(app, engine, Action::StepSeek(secs));
        }
        KeyCode::Char('H') => {
            let secs = settings.controls.step_seconds.min(i64::MAX as u64) as i64;
            dispatch(app, engine, Action::StepSeek(-secs));
        }
        _ => {}
    }

    Ok(false)
}
