//! Terminal UI for trashify that lets users find waste-disposal points around a location.

mod app;
mod input;
mod ui;

use std::{env, fs::File, io, sync::Arc, sync::Mutex, time::Duration as StdDuration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trashify_client::{ClientConfig, EnvTokenProvider, ProximitySearchClient, http_client};
use trashify_core::{
    controller::{ControllerConfig, NearbyItemsController},
    model::Coordinate,
};

use crate::app::App;
use crate::input::Action;

const DEVICE_LOCATION_VAR: &str = "TRASHIFY_DEVICE_LOCATION";
const LOG_FILE_VAR: &str = "TRASHIFY_LOG_FILE";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let device_location = env::var(DEVICE_LOCATION_VAR)
        .ok()
        .map(|raw| input::parse_coordinate_input(&raw))
        .transpose()
        .with_context(|| format!("{DEVICE_LOCATION_VAR} must look like \"52.52, 13.405\""))?;

    // HTTP + controller setup
    let config = ClientConfig::from_env();
    info!(base_url = %config.base_url, timeout = ?config.timeout, "Starting trashify");
    let client = http_client(&config)?;
    let search = Arc::new(ProximitySearchClient::new(client, &config));
    let nearby = NearbyItemsController::new(
        search,
        Arc::new(EnvTokenProvider::default()),
        ControllerConfig::default(),
    );

    // App state
    let mut app = App::new(nearby, device_location);
    if let Some(coordinate) = device_location {
        feed_device_location(&mut app, coordinate);
    }

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

/// Log to the file named by `TRASHIFY_LOG_FILE`; the terminal belongs to the UI.
fn init_tracing() -> Result<()> {
    let Ok(path) = env::var(LOG_FILE_VAR) else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("Cannot create log file {path}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trashify=info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Queries complete in the background; pick up whatever was published since the last frame
        app.refresh();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input off the runtime workers so spawned queries keep running
        let ready = tokio::task::spawn_blocking(|| event::poll(StdDuration::from_millis(100)))
            .await??;
        if ready && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::SelectLocation => {
                    let coordinate = match input::parse_coordinate_input(&app.coordinate_input) {
                        Ok(coordinate) => coordinate,
                        Err(err) => {
                            app.error_message = Some(err.to_string());
                            continue;
                        }
                    };

                    app.error_message = match app.nearby.on_location_selected(coordinate) {
                        Ok(_in_flight) => None,
                        Err(err) => Some(format!("Search failed: {err}")),
                    };
                    app.list_index = 0;
                }
                Action::UseDeviceLocation => {
                    let Some(coordinate) = app.device_location else {
                        app.error_message =
                            Some(format!("No device location ({DEVICE_LOCATION_VAR} is unset)"));
                        continue;
                    };
                    feed_device_location(&mut app, coordinate);
                }
                Action::ToggleRecenter => {
                    app.nearby.toggle_recenter_on_device();
                }
                Action::ClearPins => {
                    app.nearby.clear_annotations();
                    app.list_index = 0;
                }
            }
        }
    }

    Ok(())
}

fn feed_device_location(app: &mut App, coordinate: Coordinate) {
    app.error_message = match app.nearby.on_device_location(coordinate) {
        Ok(_in_flight) => None,
        Err(err) => Some(format!("Search failed: {err}")),
    };
}
