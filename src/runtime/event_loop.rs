use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::player::{AudioSink, Player, PlayerEvent};
use crate::ui::{self, Areas};

/// Copy the engine's startup toggles into a fresh model; they were set
/// before anyone subscribed.
pub fn seed_app<S: AudioSink>(app: &mut App, player: &Player<S>) {
    app.shuffle = player.is_shuffled();
    app.repeat = player.repeat_mode();
    app.volume = player.volume();
    app.sync_queue(player.queue_snapshot(), player.current_index());
}

/// Fold pending engine events into `app`, refreshing the queue view when the
/// engine reported a change.
pub fn drain_events<S: AudioSink>(
    events: &Receiver<PlayerEvent>,
    app: &mut App,
    player: &Player<S>,
) {
    let mut track_changed = false;
    while let Ok(event) = events.try_recv() {
        track_changed |= matches!(event, PlayerEvent::NowPlaying(_));
        app.apply(&event);
    }
    if app.queue_dirty {
        app.sync_queue(player.queue_snapshot(), player.current_index());
    }
    if track_changed {
        app.follow_current();
    }
}

/// Main terminal event loop: pumps the engine, draws and handles input.
/// Returns `Ok(())` when shutdown is requested.
pub fn run<S: AudioSink>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    player: &mut Player<S>,
    events: &Receiver<PlayerEvent>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    seed_app(app, player);
    let poll_interval = Duration::from_millis(settings.audio.tick_interval_ms.clamp(10, 100));
    let mut dragging = false;

    while !app.should_quit {
        player.pump();
        drain_events(events, app, player);

        let mut areas = None;
        terminal.draw(|f| {
            areas = Some(ui::layout(f.area()));
            ui::draw(f, app, &settings.ui, &settings.controls);
        })?;

        if event::poll(poll_interval)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, settings, app, player);
                }
                Event::Mouse(mouse) => {
                    if let Some(areas) = areas {
                        handle_mouse_event(mouse, &areas, player, &mut dragging);
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Apply one key press. Failures are already logged and recorded by the
/// engine; they reach the screen through `PlaybackFailed` events.
pub fn handle_key_event<S: AudioSink>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player<S>,
) {
    let scrub = settings.controls.scrub_seconds as f64;
    let step = settings.audio.volume_step as f32;

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            let _ = player.toggle_play_pause();
        }
        KeyCode::Char('l') => {
            let _ = player.play_next();
        }
        KeyCode::Char('h') => {
            let _ = player.play_previous();
        }
        KeyCode::Char('L') => {
            let _ = player.seek_by(scrub);
        }
        KeyCode::Char('H') => {
            let _ = player.seek_by(-scrub);
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if app.has_tracks() {
                let _ = player.play_from_queue(app.selected);
            }
        }
        KeyCode::Char('s') => player.toggle_shuffle(),
        KeyCode::Char('r') => player.cycle_repeat_mode(),
        KeyCode::Char('+') | KeyCode::Char('=') => player.set_volume(player.volume() + step),
        KeyCode::Char('-') => player.set_volume(player.volume() - step),
        _ => {}
    }
}

/// Click or drag on the progress bar. A press captures the bar, motion
/// previews, release commits; dragging off the bar keeps scrubbing.
pub fn handle_mouse_event<S: AudioSink>(
    mouse: MouseEvent,
    areas: &Areas,
    player: &mut Player<S>,
    dragging: &mut bool,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(ratio) = areas.progress_hit(mouse.column, mouse.row) {
                player.begin_drag();
                player.drag_to(ratio);
                *dragging = true;
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if *dragging => {
            player.drag_to(ui::ratio_at(areas.progress_track(), mouse.column));
        }
        MouseEventKind::Up(MouseButton::Left) if *dragging => {
            *dragging = false;
            let _ = player.end_drag();
        }
        _ => {}
    }
}
