//! Chat session state: the ordered transcript and its transitions.
//!
//! The session itself is synchronous and deterministic. The UX delays
//! between submission, the typing placeholder, and the reply belong to the
//! driver (the TUI event loop), which calls `show_typing` and
//! `resolve_pending` when its timers fire. Tests can drive the same
//! transitions with no timers at all.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::knowledge::KnowledgeBase;
use crate::responder::Responder;

/// Reserved text standing in for a reply that has not been computed yet.
/// The display layer renders entries carrying it as a typing animation.
pub const TYPING_SENTINEL: &str = "Typing...";

/// Shown when a response cycle fires with no user utterance left in the
/// transcript to answer. Out-of-order replay; not an error.
pub const ASK_PROMPT: &str = "I'm here to help! Please ask me a question.";

/// The role of a chat message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the transcript. Entries are never edited in place; the
/// typing placeholder is removed and replaced by a fresh entry when its
/// reply arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub visible: bool,
    pub is_error: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            visible: true,
            is_error: false,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            visible: true,
            is_error: false,
        }
    }

    /// Seed entry kept in the transcript but never rendered.
    pub fn hidden_seed(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            visible: false,
            is_error: false,
        }
    }

    fn typing() -> Self {
        Self::assistant(TYPING_SENTINEL)
    }

    fn failure(kb: &KnowledgeBase) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: format!(
                "I ran into a problem while answering. Please try again, or reach {} directly at {}.",
                kb.owner, kb.email
            ),
            visible: true,
            is_error: true,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.role == ChatRole::Assistant && self.text == TYPING_SENTINEL
    }
}

/// Owns the transcript and applies its transitions.
pub struct Session {
    transcript: Vec<ChatMessage>,
    in_flight: usize,
    responder: Responder,
    knowledge: KnowledgeBase,
}

impl Session {
    pub fn new(knowledge: KnowledgeBase, responder: Responder) -> Self {
        let seed = profile_digest(&knowledge);
        let welcome = format!(
            "\u{1F44B} Hi there! I'm {}. Ask me anything about {}'s skills, projects, or experience.",
            knowledge.bot_name, knowledge.owner
        );
        let transcript = vec![
            ChatMessage::hidden_seed(seed),
            ChatMessage::assistant(welcome),
        ];

        Self {
            transcript,
            in_flight: 0,
            responder,
            knowledge,
        }
    }

    /// Append a user message. Whitespace-only input is dropped silently and
    /// schedules nothing; the caller only starts a response cycle when this
    /// returns true.
    pub fn submit(&mut self, raw: &str) -> bool {
        let text = raw.trim();
        if text.is_empty() {
            return false;
        }

        self.transcript.push(ChatMessage::user(text));
        self.in_flight += 1;
        true
    }

    /// Insert the typing placeholder, replacing any placeholder already
    /// present. The transcript never holds more than one.
    pub fn show_typing(&mut self) {
        self.remove_typing();
        self.transcript.push(ChatMessage::typing());
    }

    /// Replace the placeholder with the reply to the most recent user
    /// utterance. Any internal fault is recovered here and surfaced as a
    /// visible error entry; it never propagates.
    pub fn resolve_pending(&mut self) {
        let entry = match self.compose_reply() {
            Ok(text) => ChatMessage::assistant(text),
            Err(_) => ChatMessage::failure(&self.knowledge),
        };
        self.finish(entry);
    }

    /// Failure arm for the driver: the scheduled response cycle died before
    /// it could resolve (e.g. its timer task panicked).
    pub fn fail_pending(&mut self) {
        let entry = ChatMessage::failure(&self.knowledge);
        self.finish(entry);
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// True while at least one submission has not resolved yet.
    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    fn finish(&mut self, entry: ChatMessage) {
        self.remove_typing();
        self.transcript.push(entry);
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn compose_reply(&self) -> Result<String> {
        let Some(utterance) = self.last_user_utterance() else {
            return Ok(ASK_PROMPT.to_string());
        };
        // submit() rejects blank input, so a blank utterance here means the
        // transcript was corrupted somewhere.
        ensure!(!utterance.trim().is_empty(), "blank utterance in transcript");
        Ok(self.responder.respond(&utterance, &self.knowledge))
    }

    fn last_user_utterance(&self) -> Option<String> {
        self.transcript
            .iter()
            .rev()
            .find(|msg| msg.visible && msg.role == ChatRole::User)
            .map(|msg| msg.text.clone())
    }

    fn remove_typing(&mut self) {
        self.transcript.retain(|msg| !msg.is_typing());
    }
}

/// Hidden seed summarizing the profile, mirroring the knowledge the
/// responder draws from.
fn profile_digest(kb: &KnowledgeBase) -> String {
    format!(
        "{} | {} | {} | skills: {} | projects: {}",
        kb.owner,
        kb.role,
        kb.location,
        kb.skills.join(", "),
        kb.projects.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(KnowledgeBase::builtin(), Responder::new().unwrap())
    }

    fn typing_count(session: &Session) -> usize {
        session
            .transcript()
            .iter()
            .filter(|msg| msg.is_typing())
            .count()
    }

    #[test]
    fn new_session_seeds_one_hidden_and_one_welcome_entry() {
        let session = session();
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(!transcript[0].visible);
        assert!(transcript[1].visible);
        assert_eq!(transcript[1].role, ChatRole::Assistant);
        assert!(!session.is_pending());
    }

    #[test]
    fn submit_then_typing_then_resolve() {
        let mut session = session();
        let before = session.transcript().len();

        assert!(session.submit("hi"));
        assert!(session.is_pending());
        let user = session.transcript().last().unwrap();
        assert_eq!(user.role, ChatRole::User);
        assert_eq!(user.text, "hi");

        session.show_typing();
        assert_eq!(typing_count(&session), 1);

        session.resolve_pending();
        assert_eq!(typing_count(&session), 0);
        assert!(!session.is_pending());

        let reply = session.transcript().last().unwrap();
        assert_eq!(reply.role, ChatRole::Assistant);
        assert!(!reply.is_error);
        assert_ne!(reply.text, TYPING_SENTINEL);
        // One new user entry and one new assistant entry.
        assert_eq!(session.transcript().len(), before + 2);
    }

    #[test]
    fn whitespace_submit_is_a_silent_no_op() {
        let mut session = session();
        let before = session.transcript().len();
        assert!(!session.submit("   "));
        assert!(!session.submit("\t\n"));
        assert_eq!(session.transcript().len(), before);
        assert!(!session.is_pending());
    }

    #[test]
    fn resolve_without_user_message_prompts_for_input() {
        let mut session = session();
        session.show_typing();
        session.resolve_pending();

        let reply = session.transcript().last().unwrap();
        assert_eq!(reply.text, ASK_PROMPT);
        assert!(!reply.is_error);
    }

    #[test]
    fn fail_pending_surfaces_an_error_entry_with_contact_guidance() {
        let mut session = session();
        session.submit("hello");
        session.show_typing();
        session.fail_pending();

        assert_eq!(typing_count(&session), 0);
        let reply = session.transcript().last().unwrap();
        assert!(reply.is_error);
        assert!(reply.text.contains(&session.knowledge().email));
    }

    #[test]
    fn concurrent_cycles_never_stack_placeholders() {
        let mut session = session();
        session.submit("first");
        session.submit("second");
        assert!(session.is_pending());

        session.show_typing();
        session.show_typing();
        assert_eq!(typing_count(&session), 1);

        session.resolve_pending();
        assert_eq!(typing_count(&session), 0);
        assert!(session.is_pending());

        session.show_typing();
        session.resolve_pending();
        assert!(!session.is_pending());
    }

    #[test]
    fn user_messages_survive_placeholder_replacement() {
        let mut session = session();
        session.submit("do you know python?");
        session.show_typing();
        session.resolve_pending();

        let users: Vec<_> = session
            .transcript()
            .iter()
            .filter(|msg| msg.role == ChatRole::User)
            .collect();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].text, "do you know python?");
    }

    #[test]
    fn replies_answer_the_most_recent_utterance() {
        let mut session = session();
        session.submit("where are you based?");
        session.show_typing();
        session.resolve_pending();

        let reply = session.transcript().last().unwrap();
        let location = session.knowledge().location.clone();
        assert!(reply.text.contains(&location));
    }
}
