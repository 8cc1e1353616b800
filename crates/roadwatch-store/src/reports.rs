use async_trait::async_trait;

use roadwatch_types::models::TrafficReport;

use crate::query::Select;
use crate::{StoreClient, StoreError};

const REPORTS_TABLE: &str = "traffic_reports";
const PURGE_RPC: &str = "delete_old_reports";

/// Report gateway pass-throughs. Retention policy lives in the store's
/// `delete_old_reports` procedure, not here.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// All reports, newest first.
    async fn list_reports(&self) -> Result<Vec<TrafficReport>, StoreError>;

    async fn purge_old_reports(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl ReportStore for StoreClient {
    async fn list_reports(&self) -> Result<Vec<TrafficReport>, StoreError> {
        self.select(REPORTS_TABLE, Select::new().order_desc("timestamp"))
            .await
    }

    async fn purge_old_reports(&self) -> Result<(), StoreError> {
        self.rpc(PURGE_RPC).await
    }
}
