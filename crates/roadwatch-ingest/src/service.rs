use async_trait::async_trait;
use tracing::{debug, error, warn};

use roadwatch_store::{MessageArchive, SubscriberStore};
use roadwatch_types::models::{NewRawMessageRecord, NewTelegramSubscriber};

use crate::events::{ConversationStarted, MessageReceived};
use crate::telegram::BotError;

/// Sends a message back into the chat that triggered an event. Implemented by
/// the bot client in production and by a fake in tests.
#[async_trait]
pub trait ChatReplier: Send + Sync {
    async fn reply(&self, chat_id: i64, text: &str) -> Result<(), BotError>;
}

/// What a conversation-start event amounted to. Store and reply failures are
/// logged inside the service; nothing propagates back to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDisposition {
    /// Not a private chat; this handler does not act on group contexts.
    Ignored,
    Created,
    Existing,
    /// The subscriber insert failed.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDisposition {
    /// Not a multi-party group chat.
    Ignored,
    /// No text and no caption; the event is discarded without error.
    Dropped,
    Archived,
    /// The archive insert failed.
    Failed,
}

/// Consumes chat events: idempotent subscriber creation for private starts,
/// append-only raw archival for group messages. Fire-and-forget per event.
pub struct IngestionService<S, R> {
    store: S,
    replier: R,
}

impl<S, R> IngestionService<S, R>
where
    S: SubscriberStore + MessageArchive,
    R: ChatReplier,
{
    pub fn new(store: S, replier: R) -> Self {
        Self { store, replier }
    }

    /// Create-if-absent, then greet. The greeting goes out on every private
    /// start event, not just first contact, and existing display fields are
    /// never refreshed, even when the platform reports new values.
    pub async fn on_chat_start(&self, event: &ConversationStarted) -> StartDisposition {
        if !event.chat_kind.is_private() {
            return StartDisposition::Ignored;
        }

        let username = event
            .username
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        let first_name = event.first_name.clone().unwrap_or_default();

        let disposition = match self.store.find_subscriber(event.chat_id).await {
            Ok(Some(_)) => StartDisposition::Existing,
            Ok(None) => self.create_subscriber(event.chat_id, username, &first_name).await,
            Err(err) => {
                // A failed lookup does not suppress the insert attempt; the
                // store's unique chat_id decides if one sneaks through.
                warn!(chat_id = event.chat_id, "subscriber lookup failed: {err}");
                self.create_subscriber(event.chat_id, username, &first_name).await
            }
        };

        let greeting = format!("👋 Welcome, {first_name}!");
        if let Err(err) = self.replier.reply(event.chat_id, &greeting).await {
            warn!(chat_id = event.chat_id, "greeting reply failed: {err}");
        }

        disposition
    }

    async fn create_subscriber(
        &self,
        chat_id: i64,
        username: String,
        first_name: &str,
    ) -> StartDisposition {
        let subscriber = NewTelegramSubscriber {
            chat_id,
            username,
            first_name: first_name.to_string(),
        };
        match self.store.insert_subscriber(&subscriber).await {
            Ok(()) => {
                debug!(chat_id, "subscriber created");
                StartDisposition::Created
            }
            Err(err) => {
                error!(chat_id, "subscriber insert failed: {err}");
                StartDisposition::Failed
            }
        }
    }

    /// Archive the body of a group message verbatim. No dedup: identical
    /// content across events produces one row per event.
    pub async fn on_group_message(&self, event: &MessageReceived) -> MessageDisposition {
        if !event.chat_kind.is_group() {
            return MessageDisposition::Ignored;
        }

        let body = event
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| event.caption.as_deref().filter(|c| !c.is_empty()));
        let Some(message) = body else {
            return MessageDisposition::Dropped;
        };

        match self
            .store
            .archive_message(&NewRawMessageRecord::telegram(message))
            .await
        {
            Ok(()) => {
                debug!("raw group message archived");
                MessageDisposition::Archived
            }
            Err(err) => {
                error!("raw message insert failed: {err}");
                MessageDisposition::Failed
            }
        }
    }
}
