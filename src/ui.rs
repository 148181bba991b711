//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. The
//! layout is computed by [`layout`] so the event loop can hit-test mouse
//! events against the same rectangles that were drawn.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("s", "shuffle");
    map.insert("r", "repeat mode");
    map.insert("+/-", "volume");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "h/l", "H/L", "enter", "space/p", "s", "r", "+/-", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Screen regions of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub now_playing: Rect,
    pub progress: Rect,
    pub queue: Rect,
    pub footer: Rect,
}

impl Areas {
    /// The clickable part of the progress bar (inside its border).
    pub fn progress_track(&self) -> Rect {
        Block::default().borders(Borders::ALL).inner(self.progress)
    }

    /// Map a mouse position to a progress ratio when it lands on the bar.
    pub fn progress_hit(&self, column: u16, row: u16) -> Option<f64> {
        let track = self.progress_track();
        let inside_rows = row >= track.y && row < track.y + track.height;
        let inside_cols = column >= track.x && column < track.x + track.width;
        (inside_rows && inside_cols).then(|| ratio_at(track, column))
    }
}

/// Column to ratio along `track`, clamped to [0, 1]. Used for both clicks
/// and drags; a drag may leave the bar and still scrub.
pub fn ratio_at(track: Rect, column: u16) -> f64 {
    if track.width <= 1 {
        return 0.0;
    }
    let offset = column.saturating_sub(track.x) as f64;
    (offset / (track.width - 1) as f64).clamp(0.0, 1.0)
}

pub fn layout(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(area);
    Areas {
        header: chunks[0],
        now_playing: chunks[1],
        progress: chunks[2],
        queue: chunks[3],
        footer: chunks[4],
    }
}

fn padded(title: &'static str) -> Block<'static> {
    Block::bordered()
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
        .title(title)
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let areas = layout(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" playdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, areas.header);

    // Now playing
    let mut lines: Vec<Line> = Vec::new();
    match &app.now_playing {
        Some(track) => {
            lines.push(Line::from(track.title.clone()).bold());
            lines.push(Line::from(track.artist.clone()));
            if ui_settings.show_art_url {
                lines.push(Line::from(format!("art: {}", track.image_url)).dim());
            }
        }
        None => lines.push(Line::from("Nothing playing").dim()),
    }
    let status = Line::from(app.status_line());
    lines.push(if app.status.is_some() {
        status.fg(Color::Red)
    } else {
        status
    });
    let now_playing = Paragraph::new(lines)
        .block(padded(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, areas.now_playing);

    // Progress bar
    let ratio = if app.ratio.is_finite() {
        app.ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(format!("{} / {}", app.elapsed, app.total));
    frame.render_widget(gauge, areas.progress);

    // Queue
    {
        let items: Vec<ListItem> = app
            .queue
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let marker = if app.current == Some(i) { "♪ " } else { "  " };
                let item = ListItem::new(format!("{marker}{}", track.display()));
                if app.current == Some(i) {
                    item.style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();

        let title = format!(" queue ({}) ", app.queue.len());
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if app.has_tracks() {
            state.select(Some(app.selected));
        }
        frame.render_stateful_widget(list, areas.queue, &mut state);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, areas.footer);
}
