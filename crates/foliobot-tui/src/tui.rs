use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
    /// A submission's typing delay elapsed; insert the placeholder.
    TypingDue,
    /// A submission's response delay elapsed; produce the reply.
    ResponseDue,
}

/// Multiplexes terminal input, the animation tick, and the chat timers onto
/// one channel, so the event loop has a single thing to await.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let forward = tx.clone();
        tokio::spawn(async move {
            let mut input = event::EventStream::new();
            let mut ticker = tokio::time::interval(tick_interval);
            loop {
                let next = tokio::select! {
                    _ = ticker.tick() => Some(AppEvent::Tick),
                    maybe = input.next() => match maybe {
                        // Some platforms report key releases too; press only
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            Some(AppEvent::Key(key))
                        }
                        Some(Ok(Event::Mouse(mouse))) => Some(AppEvent::Mouse(mouse)),
                        Some(Ok(Event::Resize(w, h))) => Some(AppEvent::Resize(w, h)),
                        Some(_) => None,
                        None => break,
                    },
                };

                let Some(event) = next else { continue };
                if forward.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender clone for the delayed chat transitions, so their timers feed
    /// the same channel the terminal events arrive on.
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

pub fn init() -> Result<Tui> {
    execute!(io::stdout(), EnterAlternateScreen, event::EnableMouseCapture)?;
    enable_raw_mode()?;

    Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
}

pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), event::DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}

/// Hand the terminal back to the shell before the default panic output runs.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        previous(info);
    }));
}
