use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mini_games::config::AppConfig;
use mini_games::game::{ConnectFour, TicTacToe};
use mini_games::ui::{App, Playable};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Game {
    TicTacToe,
    ConnectFour,
}

/// Play tic-tac-toe or Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "mini-games", about = "Tic-tac-toe and Connect Four against a minimax bot")]
struct Cli {
    /// Which game to play
    #[arg(long, value_enum, default_value = "connect-four")]
    game: Game,

    /// Two players share the keyboard instead of playing the bot
    #[arg(long)]
    hotseat: bool,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; redirect it to keep them off the board
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    info!(game = ?cli.game, hotseat = cli.hotseat, "starting");

    match cli.game {
        Game::TicTacToe => play::<TicTacToe>(&config, cli.hotseat),
        Game::ConnectFour => play::<ConnectFour>(&config, cli.hotseat),
    }
}

fn play<B: Playable>(config: &AppConfig, hotseat: bool) -> Result<()> {
    let mut app: App<B> = App::new(config, hotseat).context("starting match")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("running terminal UI")
}
