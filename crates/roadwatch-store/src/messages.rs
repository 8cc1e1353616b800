use async_trait::async_trait;

use roadwatch_types::models::NewRawMessageRecord;

use crate::{StoreClient, StoreError};

const RAW_MESSAGES_TABLE: &str = "telegram_raw_messages";

/// Append-only archive of raw group messages. No uniqueness constraint;
/// duplicate payloads produce duplicate rows.
#[async_trait]
pub trait MessageArchive: Send + Sync {
    async fn archive_message(&self, record: &NewRawMessageRecord) -> Result<(), StoreError>;
}

#[async_trait]
impl MessageArchive for StoreClient {
    async fn archive_message(&self, record: &NewRawMessageRecord) -> Result<(), StoreError> {
        self.insert(RAW_MESSAGES_TABLE, std::slice::from_ref(record))
            .await
    }
}
