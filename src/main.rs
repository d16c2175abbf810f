mod app;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod ui;

use app::{App, Screen};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::GeocodingClient;
use db::Database;
use error::{AgriOpsError, Result};
use logic::spray_window::ADVISORY_HORIZON_HOURS;
use logic::{compute_spray_state, DataSyncService};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{DashboardScreen, FieldsScreen, PricesScreen, WeatherScreen};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let mut cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command.take() {
        Some(Commands::Init) => run_init(),
        Some(Commands::Check) => run_check(&cli).await,
        Some(Commands::Locate { query }) => run_locate(&query).await,
        Some(Commands::Advise) => run_advise(&cli).await,
        None => run_tui(cli).await,
    }
}

fn run_init() -> Result<()> {
    let (_, path) = Config::setup_interactive()?;
    println!("Run `agriops` to start, or `agriops check` to test connections.");
    tracing::info!(path = %path.display(), "Configuration written");
    Ok(())
}

async fn run_check(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.clone())?;
    println!("Config OK: farm '{}' at ({:.4}, {:.4})",
        config.farm.name, config.farm.latitude, config.farm.longitude);

    let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
    println!("Database OK: {}", db.path().display());

    let data_sync = DataSyncService::new(&config, db);
    let status = data_sync.check_connections().await;

    println!(
        "Weather (Open-Meteo): {}",
        if status.weather { "OK" } else { "OFFLINE" }
    );
    match status.prices {
        Some(true) => println!("Price feed: OK"),
        Some(false) => println!("Price feed: OFFLINE"),
        None => println!("Price feed: not configured"),
    }

    Ok(())
}

async fn run_locate(query: &str) -> Result<()> {
    let client = GeocodingClient::new();
    let matches = client.search(query, 5).await?;

    if matches.is_empty() {
        println!("No matches for '{}'", query);
        return Ok(());
    }

    for m in &matches {
        println!("{}", m.describe());
    }
    Ok(())
}

async fn run_advise(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.clone())?;
    let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
    let data_sync = DataSyncService::new(&config, db);

    let summary = data_sync.refresh().await?;
    let forecast = match summary.forecast {
        Some(f) => f,
        None => {
            println!("No forecast available (provider offline, nothing cached)");
            return Ok(());
        }
    };

    let horizon = forecast.next_hours(chrono::Utc::now(), ADVISORY_HORIZON_HOURS);
    let advisory = compute_spray_state(&horizon);

    println!(
        "{} - {}",
        advisory.state.as_str().to_uppercase(),
        advisory.reason_text()
    );
    println!(
        "Max rain probability: {:.0}%  Max wind: {:.0} km/h (next {}h)",
        advisory.max_rain_prob, advisory.max_wind_kmh, ADVISORY_HORIZON_HOURS
    );
    match advisory.next_window {
        Some(window) => println!(
            "Next safe window: {} - {} UTC",
            window.start.format("%Y-%m-%d %H:%M"),
            window.end.format("%H:%M")
        ),
        None => println!("No safe window in the next {}h", ADVISORY_HORIZON_HOURS),
    }

    Ok(())
}

async fn run_tui(cli: Cli) -> Result<()> {
    // First run: walk through setup instead of failing on a missing file
    let config = if Config::exists(cli.config.as_ref()) {
        Config::load(cli.config.clone())?
    } else {
        let (config, _) = Config::setup_interactive()?;
        config
    };

    let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
    let mut app = App::new(config.clone(), db)?;

    // Seed a field on first run so reminders have something to attach to
    if app.fields.is_empty() {
        app.create_default_field()?;
        app.set_status("Created default field - manage in Fields");
    }

    let data_sync = DataSyncService::new(&config, app.db.clone());

    match data_sync.refresh().await {
        Ok(summary) => {
            app.update_summary(summary);
            let status = data_sync.check_connections().await;
            let mut status_parts = vec![if status.weather {
                "Weather: OK"
            } else {
                "Weather: OFFLINE"
            }];
            match status.prices {
                Some(true) => status_parts.push("Prices: OK"),
                Some(false) => status_parts.push("Prices: OFFLINE"),
                None => {}
            }
            app.set_status(&status_parts.join(" | "));
        }
        Err(e) => {
            tracing::warn!("Initial data refresh failed: {}", e);
            app.set_status(&format!("Refresh failed: {}", e));
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &data_sync).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    data_sync: &DataSyncService,
) -> Result<()>
where
    AgriOpsError: From<<B as ratatui::backend::Backend>::Error>,
{
    loop {
        // Draw UI
        terminal.draw(|f| {
            let area = f.area();

            match app.screen {
                Screen::Dashboard => {
                    let screen = DashboardScreen::new(
                        &app.config.farm.name,
                        &app.config.farm.location_name,
                        app.advisory.as_ref(),
                        &app.reminders,
                        &app.summary.prices,
                    )
                    .with_last_updated(app.summary.last_updated)
                    .with_status(app.status_message.as_deref());
                    f.render_widget(screen, area);
                }
                Screen::Weather => {
                    let screen = WeatherScreen::new(app.summary.forecast.as_ref())
                        .with_scroll(app.weather_state.scroll);
                    f.render_widget(screen, area);
                }
                Screen::Fields => {
                    let screen = FieldsScreen::new(&app.fields)
                        .with_selection(app.fields_state.selected_index);
                    f.render_widget(screen, area);
                }
                Screen::Prices => {
                    let screen = PricesScreen::new(&app.summary.prices);
                    f.render_widget(screen, area);
                }
            }
        })?;

        // Handle input with timeout for async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => {
                        app.quit();
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    KeyCode::Esc => {
                        app.switch_screen(Screen::Dashboard);
                    }
                    KeyCode::Char(c) => {
                        if let Some(screen) = Screen::from_key(c) {
                            app.switch_screen(screen);
                        } else {
                            handle_screen_input(app, key.code);
                        }
                    }
                    _ => {
                        handle_screen_input(app, key.code);
                    }
                }
            }
        }

        // Handle refresh request
        if app.needs_refresh {
            app.needs_refresh = false;
            app.refreshing = true;
            match data_sync.refresh().await {
                Ok(summary) => {
                    app.update_summary(summary);
                    app.set_status("Data refreshed");
                }
                Err(e) => {
                    app.set_status(&format!("Refresh failed: {}", e));
                }
            }
            app.refreshing = false;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_screen_input(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::Dashboard => handle_dashboard_input(app, code),
        Screen::Weather => handle_weather_input(app, code),
        Screen::Fields => handle_fields_input(app, code),
        Screen::Prices => handle_prices_input(app, code),
    }
}

fn handle_dashboard_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('r') => {
            app.request_refresh();
        }
        KeyCode::Char('n') => {
            if let Err(e) = app.schedule_reminder(None) {
                app.set_status(&format!("Reminder failed: {}", e));
            }
        }
        _ => {}
    }
}

fn handle_weather_input(app: &mut App, code: KeyCode) {
    let hours = app
        .summary
        .forecast
        .as_ref()
        .map(|f| f.hourly.len())
        .unwrap_or(0);
    match code {
        KeyCode::Up => app.weather_state.scroll_up(),
        KeyCode::Down => app.weather_state.scroll_down(hours),
        KeyCode::Char('r') => app.request_refresh(),
        _ => {}
    }
}

fn handle_fields_input(app: &mut App, code: KeyCode) {
    let count = app.fields.len();
    match code {
        KeyCode::Up => app.fields_state.prev(),
        KeyCode::Down => app.fields_state.next(count),
        KeyCode::Char('d') => {
            if let Err(e) = app.delete_selected_field() {
                app.set_status(&format!("Delete failed: {}", e));
            }
        }
        KeyCode::Char('n') => {
            let field_id = app.selected_field().and_then(|f| f.id);
            if let Err(e) = app.schedule_reminder(field_id) {
                app.set_status(&format!("Reminder failed: {}", e));
            }
        }
        _ => {}
    }
}

fn handle_prices_input(app: &mut App, code: KeyCode) {
    if let KeyCode::Char('r') = code {
        app.request_refresh();
    }
}
