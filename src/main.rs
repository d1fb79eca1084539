//! # HygieAI CLI Entry Point
//!
//! This is the main entry point for the HygieAI terminal client.
//!
//! ## Overview
//!
//! HygieAI is a chat assistant for blood test analysis and symptom triage. The
//! client shows a landing screen with the available services, a chat
//! transcript, and an input field. Messages and PDF uploads are forwarded to
//! the HygieAI backend over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! # Connect to the default backend (http://localhost:5000)
//! hygieai
//!
//! # Use another backend
//! hygieai --api-url http://10.0.0.5:5000
//! HYGIEAI_API_URL=http://10.0.0.5:5000 hygieai
//!
//! # Start in Turkish, straight in the analysis service
//! hygieai --lang tr --module analysis
//!
//! # Print resolved configuration and exit
//! hygieai --debug
//! ```
//!
//! ## Key Bindings
//!
//! ### Everywhere
//! - `Ctrl+C` - Quit the application
//! - `Ctrl+T` - Switch between English and Turkish
//!
//! ### Landing screen
//! - `Enter` - Send the prompt, or open the highlighted service if empty
//! - `Up` / `Down` / `Tab` - Move the service highlight
//! - `Esc` - Quit
//!
//! ### Chat
//! - `Enter` - Send message
//! - `PageUp` / `PageDown` / `Up` / `Down` - Scroll the transcript
//! - `End` - Jump to the newest message
//! - `Ctrl+O` - Upload a PDF (blood test analysis only)
//! - `Esc` - Back to the landing screen

use hygieai::gateway::{Completion, Endpoint, Gateway, HttpGateway, Request};
use hygieai::i18n::Language;
use hygieai::logging;
use hygieai::session::Module;
use hygieai::ui::{self, config::Config, keys, App};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// HygieAI - chat with the blood analysis and triage assistant
#[derive(Parser, Debug)]
#[command(name = "hygieai")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for the HygieAI medical assistant", long_about = None)]
struct Args {
    /// Base URL of the HygieAI backend
    #[arg(long, value_name = "URL", env = "HYGIEAI_API_URL")]
    api_url: Option<String>,

    /// Interface language (en or tr)
    #[arg(long, value_name = "LANG")]
    lang: Option<Language>,

    /// Open a service directly (analysis or triage)
    #[arg(short, long, value_name = "MODULE")]
    module: Option<Module>,

    /// Write logs to this file instead of the data directory
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_application(args).await;

    // Restore panic hook
    let _ = panic::take_hook();

    result
}

async fn run_application(args: Args) -> Result<()> {
    let log_path = match args.log_file.clone() {
        Some(path) => Some(path),
        None => logging::default_log_path().ok(),
    };
    if let Some(path) = &log_path {
        if let Err(e) = logging::init(path) {
            eprintln!("Warning: logging disabled: {e:#}");
        }
    }

    let mut config = Config::load();
    let api_url = config.resolve_api_url(args.api_url.as_deref());
    let language = args.lang.unwrap_or(config.language);

    if args.debug {
        print_debug(&api_url, language, log_path.as_deref());
        return Ok(());
    }

    tracing::info!(%api_url, %language, "starting HygieAI client");
    let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(api_url));

    let mut app = App::new(language);
    if let Some(module) = args.module {
        app.select_module(module);
    }

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run the app and ensure cleanup happens even on error
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(
        &mut terminal,
        &mut app,
        &mut event_reader,
        gateway,
        &mut config,
        &Config::save,
    )
    .await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    // Return the first error that occurred, or Ok if both succeeded
    run_result?;
    cleanup_result?;

    Ok(())
}

fn print_debug(api_url: &str, language: Language, log_path: Option<&std::path::Path>) {
    println!("=== HygieAI Configuration ===");
    match Config::config_path() {
        Ok(path) => println!("  Config file: {}", path.display()),
        Err(e) => println!("  Config file: unavailable ({e})"),
    }
    match log_path {
        Some(path) => println!("  Log file:    {}", path.display()),
        None => println!("  Log file:    disabled"),
    }
    println!("  Language:    {language}");
    println!("  API base:    {api_url}");
    println!("\n=== Endpoints ===");
    for endpoint in [Endpoint::Chat, Endpoint::Analysis, Endpoint::Upload] {
        println!("  {:?}: {}{}", endpoint, api_url, endpoint.path());
    }
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

/// Run a request on the runtime and report back through `tx`.
fn dispatch(request: Request, gateway: Arc<dyn Gateway>, tx: UnboundedSender<Completion>) {
    tokio::spawn(async move {
        let completion = request.run(gateway.as_ref()).await;
        if tx.send(completion).is_err() {
            tracing::debug!("event loop gone; dropping completion");
        }
    });
}

/// Apply every completion that has arrived since the last tick.
fn drain_completions(app: &mut App, rx: &mut UnboundedReceiver<Completion>) {
    while let Ok(completion) = rx.try_recv() {
        app.complete(completion);
    }
}

/// Write the language to the config file when it changed.
fn persist_language(app: &App, config: &mut Config, save: impl FnOnce(&Config) -> Result<()>) {
    if app.session.language == config.language {
        return;
    }
    config.language = app.session.language;
    if let Err(e) = save(config) {
        tracing::warn!("Failed to save config: {e:#}");
    }
}

async fn run_app<B>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_reader: &mut dyn EventReader,
    gateway: Arc<dyn Gateway>,
    config: &mut Config,
    save_config: &dyn Fn(&Config) -> Result<()>,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    loop {
        // Event polling blocks; give spawned requests a turn first
        tokio::task::yield_now().await;
        drain_completions(app, &mut rx);

        let mut max_scroll = 0;
        terminal
            .draw(|f| max_scroll = ui::render(f, app))
            .context("Failed to draw terminal UI")?;
        app.transcript_scroll = app.transcript_scroll.min(max_scroll);

        // Poll faster while waiting on the backend so the reply shows promptly
        let poll_timeout = if app.is_pending() {
            Duration::from_millis(30)
        } else {
            Duration::from_millis(100)
        };

        let event = match event_reader.read_event(poll_timeout)? {
            Some(e) => e,
            None => continue,
        };

        if let Event::Key(key) = event {
            if let Some(request) = keys::handle_key(app, key) {
                dispatch(request, gateway.clone(), tx.clone());
            }
            persist_language(app, config, save_config);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
