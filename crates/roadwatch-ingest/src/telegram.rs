//! Long-poll adapter for the Telegram Bot API. Translates raw updates into
//! `ChatEvent`s and carries replies back into the triggering chat. Transport
//! details stay inside this module.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use roadwatch_store::{MessageArchive, SubscriberStore};

use crate::events::{ChatEvent, ChatKind, ConversationStarted, MessageReceived};
use crate::service::{ChatReplier, IngestionService};

const API_BASE: &str = "https://api.telegram.org";
const POLL_TIMEOUT_SECS: u64 = 30;
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum BotError {
    #[error("telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered `ok: false`; carries its description.
    #[error("telegram api error: {0}")]
    Api(String),
}

// -- Wire types (the subset of the Bot API this service consumes) --

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, BotError> {
        if !self.ok {
            return Err(BotError::Api(
                self.description
                    .unwrap_or_else(|| "no description".to_string()),
            ));
        }
        self.result
            .ok_or_else(|| BotError::Api("ok response without result".to_string()))
    }
}

/// Bot API client. Clones share the connection pool.
#[derive(Clone)]
pub struct BotClient {
    http: reqwest::Client,
    token: String,
}

impl BotClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.token)
    }

    /// One long-poll round. Blocks server-side up to the poll timeout; the
    /// request timeout is padded so a full-length poll is not cut short.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        let response = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", POLL_TIMEOUT_SECS.to_string()),
            ])
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .send()
            .await?;
        let payload: ApiResponse<Vec<Update>> = response.json().await?;
        payload.into_result()
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;
        let payload: ApiResponse<serde_json::Value> = response.json().await?;
        payload.into_result().map(|_| ())
    }
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The bot token stays out of debug output.
        f.debug_struct("BotClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatReplier for BotClient {
    async fn reply(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        self.send_message(chat_id, text).await
    }
}

/// Translate one update into at most one event. A `/start` command is
/// consumed as a conversation start and never doubles as a received message,
/// mirroring command-handler precedence on the platform side; updates without
/// a message payload (edits, member changes) yield nothing.
pub fn event_from_update(update: Update) -> Option<ChatEvent> {
    let message = update.message?;
    if is_start_command(message.text.as_deref()) {
        return Some(ChatEvent::ConversationStarted(ConversationStarted {
            chat_id: message.chat.id,
            chat_kind: message.chat.kind,
            username: message.chat.username,
            first_name: message.chat.first_name,
        }));
    }
    Some(ChatEvent::MessageReceived(MessageReceived {
        chat_kind: message.chat.kind,
        text: message.text,
        caption: message.caption,
    }))
}

/// Group chats address commands as `/start@BotName`.
fn is_start_command(text: Option<&str>) -> bool {
    let Some(text) = text else {
        return false;
    };
    let command = text.split_whitespace().next().unwrap_or("");
    command == "/start" || command.starts_with("/start@")
}

/// Long-poll loop: fetch, advance the offset, dispatch. Poll failures back
/// off and retry; handler outcomes are logged. Nothing here ever exits.
pub async fn run<S, R>(bot: BotClient, service: IngestionService<S, R>)
where
    S: SubscriberStore + MessageArchive,
    R: ChatReplier,
{
    info!("telegram listener running (long-poll mode)");
    let mut offset = 0i64;
    loop {
        let updates = match bot.get_updates(offset).await {
            Ok(updates) => updates,
            Err(err) => {
                warn!("getUpdates failed: {err}");
                tokio::time::sleep(ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(event) = event_from_update(update) else {
                continue;
            };
            match event {
                ChatEvent::ConversationStarted(ev) => {
                    let disposition = service.on_chat_start(&ev).await;
                    debug!(chat_id = ev.chat_id, ?disposition, "conversation start handled");
                }
                ChatEvent::MessageReceived(ev) => {
                    let disposition = service.on_group_message(&ev).await;
                    debug!(?disposition, "group message handled");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_update(json: &str) -> Update {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserializes_a_private_start_update() {
        let update = parse_update(
            r#"{
                "update_id": 1001,
                "message": {
                    "message_id": 7,
                    "chat": { "id": 42, "type": "private", "username": "alice", "first_name": "Alice" },
                    "text": "/start"
                }
            }"#,
        );

        assert_eq!(update.update_id, 1001);
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.chat.kind, ChatKind::Private);
        assert_eq!(message.text.as_deref(), Some("/start"));
    }

    #[test]
    fn unknown_chat_types_deserialize_to_the_catch_all() {
        let update = parse_update(
            r#"{
                "update_id": 1,
                "message": { "chat": { "id": 1, "type": "sender" }, "text": "hi" }
            }"#,
        );
        assert_eq!(update.message.unwrap().chat.kind, ChatKind::Unknown);
    }

    #[test]
    fn start_command_maps_to_conversation_started() {
        let update = parse_update(
            r#"{
                "update_id": 1,
                "message": {
                    "chat": { "id": 42, "type": "private", "first_name": "Alice" },
                    "text": "/start"
                }
            }"#,
        );

        match event_from_update(update) {
            Some(ChatEvent::ConversationStarted(ev)) => {
                assert_eq!(ev.chat_id, 42);
                assert!(ev.chat_kind.is_private());
                assert_eq!(ev.first_name.as_deref(), Some("Alice"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn addressed_start_command_also_maps_to_conversation_started() {
        let update = parse_update(
            r#"{
                "update_id": 1,
                "message": {
                    "chat": { "id": -100, "type": "supergroup" },
                    "text": "/start@RoadwatchBot"
                }
            }"#,
        );

        assert!(matches!(
            event_from_update(update),
            Some(ChatEvent::ConversationStarted(_))
        ));
    }

    #[test]
    fn group_text_maps_to_message_received() {
        let update = parse_update(
            r#"{
                "update_id": 1,
                "message": {
                    "chat": { "id": -100, "type": "supergroup" },
                    "text": "pileup on the ring road"
                }
            }"#,
        );

        match event_from_update(update) {
            Some(ChatEvent::MessageReceived(ev)) => {
                assert!(ev.chat_kind.is_group());
                assert_eq!(ev.text.as_deref(), Some("pileup on the ring road"));
                assert_eq!(ev.caption, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn caption_only_update_keeps_its_caption() {
        let update = parse_update(
            r#"{
                "update_id": 1,
                "message": {
                    "chat": { "id": -100, "type": "group" },
                    "caption": "photo of the crash site"
                }
            }"#,
        );

        match event_from_update(update) {
            Some(ChatEvent::MessageReceived(ev)) => {
                assert_eq!(ev.text, None);
                assert_eq!(ev.caption.as_deref(), Some("photo of the crash site"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn message_less_updates_yield_no_event() {
        let update = parse_update(r#"{ "update_id": 1 }"#);
        assert!(event_from_update(update).is_none());
    }

    #[test]
    fn start_with_arguments_is_still_a_start() {
        assert!(is_start_command(Some("/start ref-123")));
        assert!(is_start_command(Some("/start@RoadwatchBot now")));
        assert!(!is_start_command(Some("/stop")));
        assert!(!is_start_command(Some("starting over")));
        assert!(!is_start_command(None));
    }

    #[test]
    fn api_error_response_carries_the_description() {
        let payload: ApiResponse<Vec<Update>> = serde_json::from_str(
            r#"{ "ok": false, "error_code": 401, "description": "Unauthorized" }"#,
        )
        .unwrap();

        match payload.into_result() {
            Err(BotError::Api(description)) => assert_eq!(description, "Unauthorized"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
