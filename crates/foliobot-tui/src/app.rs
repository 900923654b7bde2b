use anyhow::Result;
use foliobot_core::{Config, KnowledgeBase, Responder, Session};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::tui::AppEvent;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub session: Session,

    // Input line state
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Chat viewport state
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Response scheduling
    typing_delay: Duration,
    response_delay: Duration,
    events_tx: UnboundedSender<AppEvent>,
    response_tasks: Vec<JoinHandle<()>>,
}

impl App {
    pub fn new(config: &Config, events_tx: UnboundedSender<AppEvent>) -> Result<Self> {
        let knowledge = match &config.profile_path {
            Some(path) => KnowledgeBase::load(path)?,
            None => KnowledgeBase::builtin(),
        };
        let responder = Responder::new()?;
        let session = Session::new(knowledge, responder);

        Ok(Self {
            should_quit: false,
            session,
            input: String::new(),
            cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            typing_delay: Duration::from_millis(config.typing_delay_ms),
            response_delay: Duration::from_millis(config.response_delay_ms),
            events_tx,
            response_tasks: Vec::new(),
        })
    }

    /// Submit the input line. On success, one timer task walks the stacked
    /// delays and reports back through the event channel, so the transcript
    /// is only ever touched on the event loop.
    pub fn submit_input(&mut self) {
        let raw = self.input.clone();
        if !self.session.submit(&raw) {
            // Whitespace-only input: dropped silently, input line untouched
            return;
        }

        self.input.clear();
        self.cursor = 0;
        self.scroll_chat_to_bottom();

        let tx = self.events_tx.clone();
        let typing_delay = self.typing_delay;
        let response_delay = self.response_delay;
        self.response_tasks.push(tokio::spawn(async move {
            tokio::time::sleep(typing_delay).await;
            if tx.send(AppEvent::TypingDue).is_err() {
                return;
            }
            tokio::time::sleep(response_delay).await;
            let _ = tx.send(AppEvent::ResponseDue);
        }));
    }

    pub fn on_typing_due(&mut self) {
        self.session.show_typing();
        self.scroll_chat_to_bottom();
    }

    pub fn on_response_due(&mut self) {
        self.session.resolve_pending();
        self.scroll_chat_to_bottom();
    }

    /// Drop finished timer tasks. A task that died without delivering its
    /// events leaves the cycle dangling; surface that as a failed reply.
    pub async fn reap_response_tasks(&mut self) {
        let mut i = 0;
        while i < self.response_tasks.len() {
            if self.response_tasks[i].is_finished() {
                let task = self.response_tasks.remove(i);
                if task.await.is_err() {
                    self.session.fail_pending();
                    self.scroll_chat_to_bottom();
                }
            } else {
                i += 1;
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat scrolling
    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max_scroll = self.transcript_line_count().saturating_sub(self.chat_height);
        if self.chat_scroll < max_scroll {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
    }

    pub fn scroll_half_page_up(&mut self) {
        let half_page = self.chat_height / 2;
        self.chat_scroll = self.chat_scroll.saturating_sub(half_page);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = self.chat_height / 2;
        let max_scroll = self.transcript_line_count().saturating_sub(self.chat_height);
        self.chat_scroll = (self.chat_scroll + half_page).min(max_scroll);
    }

    /// Scroll so the newest entry (or the typing indicator) is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.transcript_line_count();

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }

    /// Rendered line count of the visible transcript, mirroring the wrap
    /// math in `ui::render_chat`.
    fn transcript_line_count(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.session.transcript().iter().filter(|m| m.visible) {
            total_lines += 1; // Speaker line ("You:" or the bot name)

            if msg.is_typing() {
                total_lines += 1;
            } else {
                for line in msg.text.lines() {
                    // Use character count, not byte length, for proper UTF-8 handling
                    let char_count = line.chars().count();
                    if char_count == 0 {
                        total_lines += 1; // Empty line still takes one line
                    } else {
                        total_lines += ((char_count / wrap_width) + 1) as u16;
                    }
                }
            }

            total_lines += 1; // Blank line after message
        }

        total_lines
    }
}
