//! Terminal UI that walks a renter through the five-step veelo booking wizard.

mod app;
mod input;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use veelo_core::{
    service::RentalService,
    wizard::{Advance, FetchNeed},
};

use crate::app::App;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    // HTTP + service setup
    let client = Client::builder()
        .user_agent("veelo/0.1")
        .timeout(StdDuration::from_secs(10))
        .build()?;
    let service = Arc::new(RentalService::new(veelo_api::backend(client)));

    // App state
    let app = App::new(service, Local::now().date_naive());

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

// Log to a file when VEELO_LOG is set; stderr would fight the alternate screen.
fn init_logging() {
    let Ok(path) = std::env::var("VEELO_LOG") else {
        return;
    };
    let Ok(file) = std::fs::File::create(path) else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .ok();
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    // The category catalog is loaded once up front; later steps reuse the cache.
    app.is_loading = true;
    terminal.draw(|frame| ui::draw(frame, &app))?;
    let types = app.service.vehicle_types().await;
    app.wizard.apply_vehicle_types(types);
    app.is_loading = false;

    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Advance => advance(terminal, &mut app).await?,
            }
        }
    }

    Ok(())
}

async fn advance(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    match app.wizard.advance() {
        Advance::Invalid(message) => app.error_message = Some(message),
        Advance::Noop => {}
        Advance::Entered(step) => {
            app.error_message = None;
            app.on_entered(step);
            drain_fetches(terminal, app).await?;
        }
        Advance::Submit(request) => {
            app.error_message = None;
            app.is_loading = true;
            terminal.draw(|frame| ui::draw(frame, app))?;

            let result = app
                .service
                .submit(&request)
                .await
                .map_err(|error| error.to_string());

            app.is_loading = false;
            app.wizard.resolve_submission(result);
        }
    }
    Ok(())
}

// Load whatever remote data the step the wizard just entered depends on.
// Each apply is keyed, so a fetch that resolved empty is not retried.
async fn drain_fetches(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Some(need) = app.wizard.pending_fetch() {
        app.is_loading = true;
        terminal.draw(|frame| ui::draw(frame, app))?;

        match need {
            FetchNeed::VehicleTypes => {
                let types = app.service.vehicle_types().await;
                app.wizard.apply_vehicle_types(types);
            }
            FetchNeed::Models(type_id) => {
                let models = app.service.models(&type_id).await;
                app.wizard.apply_models(&type_id, models);
            }
            FetchNeed::ReservedIntervals(model) => {
                let intervals = app.service.reserved_intervals(&model).await;
                app.wizard.apply_reserved_intervals(&model, intervals);
            }
        }

        app.is_loading = false;
    }
    Ok(())
}
