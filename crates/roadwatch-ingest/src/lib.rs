pub mod events;
pub mod service;
pub mod telegram;

pub use events::{ChatEvent, ChatKind, ConversationStarted, MessageReceived};
pub use service::{ChatReplier, IngestionService, MessageDisposition, StartDisposition};
pub use telegram::{BotClient, BotError};
