use anyhow::Result;
use foliobot_core::Config;
use std::time::Duration;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;

/// Animation tick; also paces the reaper for finished response timers.
const TICK_INTERVAL: Duration = Duration::from_millis(300);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|_| Config::new());

    let mut events = tui::EventHandler::new(TICK_INTERVAL);
    let mut app = App::new(&config, events.sender())?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut tui::EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}
