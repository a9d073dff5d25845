use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;

use capex::{
    logging, App, AppConfig, AppEvent, Args, CacheManager, CompanyResolver, ConfigManager,
    Dataset, OpenOptions, Session, Theme, APP_NAME,
};

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(
    mut terminal: DefaultTerminal,
    args: &Args,
    config: AppConfig,
    path: PathBuf,
    dataset: Arc<Dataset>,
    session: Session,
) -> Result<()> {
    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);
    let theme = Theme::from_config(&config.theme)?;

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(tx.clone(), theme, config);
    if args.debug {
        app.enable_debug();
    }
    app.set_dataset(Some(path), dataset);
    app.set_session(session);
    if args.run {
        app.send_event(AppEvent::Run)?;
    }
    render(&mut terminal, &mut app)?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.clear_cache {
        match CacheManager::new(APP_NAME) {
            Ok(cache) => {
                if let Err(e) = cache.clear_all() {
                    eprintln!("Error clearing cache: {}", e);
                    std::process::exit(1);
                }
                println!("Cache cleared successfully");
                return Ok(Some(()));
            }
            Err(_e) => {
                println!("No cache to clear");
                return Ok(Some(()));
            }
        }
    }

    if args.generate_config {
        match ConfigManager::new(APP_NAME) {
            Ok(config_manager) => match config_manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Configuration file written to: {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing configuration file: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

fn init_logging(args: &Args, config: &AppConfig) -> Result<PathBuf> {
    let cache = CacheManager::new(APP_NAME).unwrap_or_else(|e| {
        eprintln!("Warning: Could not initialize cache manager: {}", e);
        CacheManager::with_dir(std::env::temp_dir().join(APP_NAME))
    });

    let level_name = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let level = logging::parse_level(level_name)
        .ok_or_else(|| eyre!("Invalid log level '{}'", level_name))?;

    logging::init_with(&cache, args.log_file.clone(), Some(level))
}

/// Starting selections: `--company` queries and `--count`, else the configured default count
fn initial_session(args: &Args, config: &AppConfig) -> Session {
    let mut session = Session::new().with_limit(args.count.unwrap_or(config.display.default_limit));
    for query in &args.companies {
        session.add_query(query);
    }
    session
}

fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install()?;

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    let config = AppConfig::load(APP_NAME, args.config.as_deref())?;
    let log_path = init_logging(&args, &config)?;
    tracing::debug!(log = %log_path.display(), "logging initialized");

    if let Some(c) = args.delimiter {
        if !c.is_ascii() {
            return Err(eyre!("Delimiter must be a single ASCII character, got '{}'", c));
        }
    }

    let opts = OpenOptions::from_args_and_config(&args, &config);
    let path = args
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.dataset.default_path));
    let dataset = Arc::new(Dataset::from_csv(&path, &opts)?);

    let session = initial_session(&args, &config);

    if args.print {
        let resolver = CompanyResolver::new().with_cutoff(config.matching.cutoff);
        let mut session = session;
        session.run();
        if let Some(table) = session.view(&dataset, &resolver) {
            if table.is_empty() {
                println!("No matching companies");
            } else {
                print!("{}", table.to_text());
            }
        }
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = run(terminal, &args, config, path, dataset, session);
    ratatui::restore();
    if let Err(e) = result {
        tracing::error!("{:#}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
