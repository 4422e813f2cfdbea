//! bugdesk - a terminal bug tracker.
//!
//! Without a subcommand this starts the TUI. `list` prints the bugs and
//! `theme` shows or stores the theme preference.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

use bugdesk::api::{BugRepository, InMemoryRepository, Latency};
use bugdesk::app::App;
use bugdesk::config::{Config, ThemePreference};
use bugdesk::events::EventHandler;
use bugdesk::form::Submission;
use bugdesk::logging;
use bugdesk::tasks::{create_task_channel, ApiMessage, TaskSpawner};
use bugdesk::ui::init_theme;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Parser)]
#[command(name = "bugdesk", version, about = "A terminal bug tracker")]
struct Cli {
    /// Respond immediately instead of simulating network latency
    #[arg(long)]
    no_latency: bool,

    /// User id attached as creator of new bugs
    #[arg(long, value_name = "ID")]
    user: Option<String>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print all bugs
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show or set the theme preference
    Theme {
        #[arg(value_enum)]
        value: Option<ThemePreference>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.debug)?;

    let config_path = Config::config_path().ok();
    let mut config = match &config_path {
        Some(path) => Config::load_from(path).context("Failed to load config")?,
        None => Config::default(),
    };
    if let Some(user) = cli.user {
        config.settings.current_user = user;
    }
    if cli.no_latency {
        config.settings.simulate_latency = false;
    }
    config.settings.validate()?;

    let latency = if config.settings.simulate_latency {
        Latency::default()
    } else {
        Latency::NONE
    };
    let repo: Arc<dyn BugRepository> =
        Arc::new(InMemoryRepository::seeded().with_latency(latency));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    let result = match cli.command {
        Some(Command::List { json }) => runtime.block_on(print_bugs(repo.as_ref(), json)),
        Some(Command::Theme { value }) => theme_command(config, config_path, value),
        None => {
            let _enter = runtime.enter();
            run_tui(config, config_path, repo)
        }
    };

    if let Err(e) = &result {
        error!(error = %e, "bugdesk exited with an error");
    }
    logging::shutdown();
    result
}

async fn print_bugs(repo: &dyn BugRepository, json: bool) -> Result<()> {
    let bugs = repo.fetch_bugs().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&bugs)?);
        return Ok(());
    }
    for bug in &bugs {
        println!(
            "{:<8} {:<8} {:<10} {}",
            bug.id, bug.status, bug.assignee, bug.title
        );
    }
    Ok(())
}

fn theme_command(
    mut config: Config,
    config_path: Option<PathBuf>,
    value: Option<ThemePreference>,
) -> Result<()> {
    let Some(preference) = value else {
        println!("{}", config.settings.theme.display_name());
        return Ok(());
    };
    let path = config_path.context("Could not determine the config directory")?;
    config.settings.theme = preference;
    config.save_to(&path)?;
    println!("Theme set to {}", preference.display_name());
    Ok(())
}

fn run_tui(config: Config, config_path: Option<PathBuf>, repo: Arc<dyn BugRepository>) -> Result<()> {
    init_theme(config.settings.theme);
    install_panic_hook();

    let mut terminal = setup_terminal()?;
    let app = App::new(config, config_path);
    let result = run_loop(&mut terminal, app, repo);
    restore_terminal(&mut terminal)?;
    result
}

fn run_loop(terminal: &mut Tui, mut app: App, repo: Arc<dyn BugRepository>) -> Result<()> {
    let events = EventHandler::new();
    let (mut rx, spawner) = create_task_channel();
    info!("Entering main loop");

    loop {
        spawn_pending(&mut app, &spawner, &repo);
        terminal.draw(|frame| app.view(frame))?;

        let event = events.next()?;
        app.update(event);
        drain_messages(&mut app, &mut rx);

        if app.should_quit() {
            info!("Leaving main loop");
            return Ok(());
        }
    }
}

/// Hand the app's queued operations to background tasks.
fn spawn_pending(app: &mut App, spawner: &TaskSpawner, repo: &Arc<dyn BugRepository>) {
    if app.take_pending_fetch() {
        spawner.spawn_fetch_bugs(repo);
    }
    for generation in app.take_pending_options() {
        spawner.spawn_load_options(repo, generation);
    }
    match app.take_pending_submission() {
        Some(Submission::Create(new_bug)) => spawner.spawn_create_bug(repo, new_bug),
        Some(Submission::Update(bug)) => spawner.spawn_update_bug(repo, bug),
        None => {}
    }
}

fn drain_messages(app: &mut App, rx: &mut UnboundedReceiver<ApiMessage>) {
    while let Ok(message) = rx.try_recv() {
        app.handle_api_message(message);
    }
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave the alternate screen before the default hook prints the panic.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags_and_subcommands() {
        let cli = Cli::parse_from(["bugdesk", "--no-latency", "--user", "user2", "list", "--json"]);
        assert!(cli.no_latency);
        assert_eq!(cli.user.as_deref(), Some("user2"));
        assert!(matches!(cli.command, Some(Command::List { json: true })));

        let cli = Cli::parse_from(["bugdesk", "theme", "dark"]);
        assert!(matches!(
            cli.command,
            Some(Command::Theme {
                value: Some(ThemePreference::Dark)
            })
        ));
    }

    #[test]
    fn test_theme_command_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        theme_command(Config::default(), Some(path.clone()), Some(ThemePreference::Light)).unwrap();
        assert_eq!(
            Config::load_from(&path).unwrap().settings.theme,
            ThemePreference::Light
        );
    }
}
