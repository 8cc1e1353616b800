use async_trait::async_trait;

use roadwatch_types::models::{NewTelegramSubscriber, TelegramSubscriber};

use crate::query::Select;
use crate::{StoreClient, StoreError};

const SUBSCRIBERS_TABLE: &str = "telegram_users";

/// Subscriber reads/writes for the ingestion service. The only write is
/// create-if-absent; existing rows are never touched.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn find_subscriber(&self, chat_id: i64)
    -> Result<Option<TelegramSubscriber>, StoreError>;

    async fn insert_subscriber(
        &self,
        subscriber: &NewTelegramSubscriber,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl SubscriberStore for StoreClient {
    async fn find_subscriber(
        &self,
        chat_id: i64,
    ) -> Result<Option<TelegramSubscriber>, StoreError> {
        let rows: Vec<TelegramSubscriber> = self
            .select(
                SUBSCRIBERS_TABLE,
                Select::new().eq("chat_id", &chat_id.to_string()),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_subscriber(
        &self,
        subscriber: &NewTelegramSubscriber,
    ) -> Result<(), StoreError> {
        self.insert(SUBSCRIBERS_TABLE, std::slice::from_ref(subscriber))
            .await
    }
}
