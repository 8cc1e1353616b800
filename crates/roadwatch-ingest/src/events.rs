//! Platform-neutral chat events. The listener adapter translates raw platform
//! updates into these; the ingestion service never sees transport types.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    #[serde(other)]
    Unknown,
}

impl ChatKind {
    pub fn is_private(self) -> bool {
        matches!(self, ChatKind::Private)
    }

    /// Multi-party group variants only; channels are neither private nor
    /// group for ingestion purposes.
    pub fn is_group(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

/// A new conversation was opened with the bot. Display fields come from the
/// chat itself and may be absent.
#[derive(Debug, Clone)]
pub struct ConversationStarted {
    pub chat_id: i64,
    pub chat_kind: ChatKind,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// A message was posted in a chat the bot can see. Media messages carry their
/// text in `caption` instead of `text`.
#[derive(Debug, Clone)]
pub struct MessageReceived {
    pub chat_kind: ChatKind,
    pub text: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ChatEvent {
    ConversationStarted(ConversationStarted),
    MessageReceived(MessageReceived),
}
