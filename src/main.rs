use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use taskboard::{
    app::App,
    cli::{self, CliCommand},
    logging, ui, JsonFileStore, Session,
};
use tracing::{error, info};

fn main() -> Result<()> {
    let (config, command) = cli::parse_from(std::env::args_os()).unwrap_or_else(|err| err.exit());
    let _guard = logging::init_or_warn(&config, &mut io::stderr());
    info!(data = %config.data_file.display(), ?command, "starting");

    let mut store = JsonFileStore::new(&config.data_file);
    let mut stdout = io::stdout();

    if command == CliCommand::Init {
        return cli::init(&mut store, &mut stdout);
    }

    let mut session = Session::open(store)
        .with_context(|| format!("cannot open board {}", config.data_file.display()))?;

    if command != CliCommand::Board {
        return cli::run(command, &mut session, &mut stdout);
    }

    // Terminal setup
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let result = ui::run_app(&mut terminal, &mut app, &mut session);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "terminal loop failed");
    }
    result.context("terminal board failed")
}
