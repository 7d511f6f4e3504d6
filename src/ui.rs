//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Gauge, Padding, Paragraph, Row, Table, Wrap},
};
use std::time::Duration;

use crate::app::{App, NowPlaying, Phase, PlaybackState};
use crate::config::{ControlsSettings, MetaField, TimeField, UiSettings};

/// Render the controls help text, incorporating the seek step.
fn controls_text(step_seconds: u64) -> String {
    [
        "[j/k] move".to_string(),
        "[enter] play selected".to_string(),
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] step -/+{}s", step_seconds),
        "[x] stop".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing metadata line according to `ui` settings.
///
/// Blank fields drop out instead of leaving empty slots, so a track with
/// no usable tags renders as just its file name (when configured).
fn now_playing_text(np: &NowPlaying, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in &ui.now_playing_fields {
        let v = match f {
            MetaField::Name => np.name.as_str(),
            MetaField::Title => np.tags.title.as_str(),
            MetaField::Artist => np.tags.artist.as_str(),
            MetaField::Album => np.tags.album.as_str(),
            MetaField::Year => np.tags.year.as_str(),
        };
        let v = v.trim();
        if !v.is_empty() {
            parts.push(v.to_string());
        }
    }

    parts.join(&ui.now_playing_separator)
}

/// Build the time text (elapsed/total/remaining) per `UiSettings`.
fn time_text(elapsed: Duration, total: Option<Duration>, ui: &UiSettings) -> Option<String> {
    if ui.time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.time_separator))
    }
}

fn state_text(app: &App) -> &'static str {
    match app.phase {
        Phase::Loading => "Loading",
        _ => match app.playback_state() {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        },
    }
}

/// Render the entire UI into the provided `frame` using `app` state and
/// the engine's current `elapsed` position.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    elapsed: Duration,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" segue ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now-playing box
    {
        let mut lines: Vec<String> = Vec::new();

        match &app.now_playing {
            Some(np) => {
                let meta_line = now_playing_text(np, ui_settings);
                if !meta_line.is_empty() {
                    lines.push(meta_line);
                }
                lines.push(np.name.clone());
                if app.phase == Phase::Ready {
                    if let Some(t) = time_text(elapsed, app.duration, ui_settings) {
                        lines.push(t);
                    }
                }
            }
            None => {
                if app.has_tracks() {
                    lines.push("Nothing loaded".to_string());
                } else {
                    lines.push("No tracks. Run with files or a directory.".to_string());
                }
            }
        }

        lines.push(state_text(app).to_string());
        if let Some(ref err) = app.status {
            lines.push(format!("! {err}"));
        }

        let now_playing = Paragraph::new(lines.join("\n"))
            .block(
                Block::bordered()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .title(" now playing "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(now_playing, chunks[1]);
    }

    // Progress gauge
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .percent(app.progress.min(100) as u16);
    frame.render_widget(gauge, chunks[2]);

    // Playlist table
    {
        let total = app.tracks.len();
        // Borders, the header row and the count row eat four lines.
        let body_height = (chunks[3].height as usize).saturating_sub(4);

        // Window the rows around the cursor so long lists stay visible.
        let (start, end) = if total <= body_height || body_height == 0 {
            (0, total)
        } else {
            let half = body_height / 2;
            let mut start = app.cursor.saturating_sub(half);
            if start + body_height > total {
                start = total - body_height;
            }
            (start, start + body_height)
        };

        let rows: Vec<Row> = app.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let i = start + offset;
                let marker = if i == app.selected && app.phase != Phase::Idle {
                    "> ".to_string()
                } else {
                    format!("{}", i + 1)
                };

                let row = Row::new(vec![
                    Cell::from(marker),
                    Cell::from(track.name.as_str()),
                ]);
                if i == app.cursor {
                    row.style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    row
                }
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(1)])
            .header(Row::new(vec![Cell::from("#"), Cell::from("Name")]).style(
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .footer(Row::new(vec![
                Cell::from("Total"),
                Cell::from(format!("{total}")),
            ]))
            .block(Block::default().borders(Borders::ALL).title(" tracks "));
        frame.render_widget(table, chunks[3]);
    }

    // Controls footer
    let footer_text = controls_text(controls_settings.step_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}
