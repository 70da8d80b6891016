use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use connect_four::config::AppConfig;
use connect_four::game::Player;
use connect_four::ui::App;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect_four", about = "Play Connect Four against a friend or the bot")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Seed the starting player and bot tie-breaks
    #[arg(long)]
    seed: Option<u64>,

    /// Two human players, no bot
    #[arg(long)]
    no_bot: bool,

    /// Which side the bot plays
    #[arg(long, value_parser = parse_player)]
    bot_player: Option<Player>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Where to write logs
    #[arg(long, default_value = "connect_four.log")]
    log_file: PathBuf,
}

fn parse_player(s: &str) -> Result<Player, String> {
    match s.to_ascii_lowercase().as_str() {
        "first" | "red" => Ok(Player::First),
        "second" | "yellow" => Ok(Player::Second),
        other => Err(format!("unknown player '{other}' (expected 'first' or 'second')")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    // Log to a file so output does not interfere with the TUI
    let log_file = std::fs::File::create(&cli.log_file)
        .with_context(|| format!("creating log file {}", cli.log_file.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(seed) = cli.seed {
        config.game.seed = Some(seed);
    }
    if cli.no_bot {
        config.bot.enabled = false;
    }
    if let Some(player) = cli.bot_player {
        config.bot.player = player;
    }
    config.validate().context("validating configuration")?;

    info!(?config, "starting Connect Four");
    let game = config.build_controller();
    let mut app = App::new(game, config.ui.clone(), config.bot.think_delay());

    run(&mut app).context("terminal UI failed")
}

fn run(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
