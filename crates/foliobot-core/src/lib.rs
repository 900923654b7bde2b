//! UI-agnostic core of the foliobot portfolio assistant: the knowledge
//! base, the keyword rule chain, and the chat session state machine.

pub mod config;
pub mod knowledge;
pub mod responder;
pub mod session;

// Re-export main types for convenience
pub use config::Config;
pub use knowledge::{KnowledgeBase, SocialLink};
pub use responder::Responder;
pub use session::{ChatMessage, ChatRole, Session, ASK_PROMPT, TYPING_SENTINEL};
