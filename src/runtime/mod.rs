use std::env;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{error, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::player::{Player, RodioSink};

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = startup::parse_args(env::args().skip(1));
    let (settings, settings_problem) = settings::load_settings();

    if args.print_default_config {
        print!("{}", crate::config::Settings::default().to_toml()?);
        return Ok(());
    }

    if let Err(e) = logging::init_logging(&settings.logging) {
        eprintln!("playdeck: logging disabled: {e}");
    }
    if let Some(problem) = &settings_problem {
        warn!("{problem}");
    }

    let library = startup::load_library(&args.paths, &settings)?;
    let sink = RodioSink::open(&settings.audio).inspect_err(|e| error!("{e}"))?;
    let mut player = Player::new(sink, settings.player_options());
    let events = player.subscribe();
    startup::apply_queue(&mut player, &library);

    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut player, &events, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    run_result
}
