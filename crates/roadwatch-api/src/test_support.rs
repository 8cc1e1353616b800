//! In-memory store double for service and router tests. Mirrors the remote
//! store's observable behavior, including the unique constraints on
//! `users.username` / `users.phone_number`, and counts every call so tests
//! can assert that validation failures never reach the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use roadwatch_store::{ReportStore, StoreError, UserStore};
use roadwatch_types::models::{NewUserAccount, TrafficReport, UserAccount};

#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    accounts: Mutex<Vec<UserAccount>>,
    reports: Mutex<Vec<TrafficReport>>,
    calls: AtomicU64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_calls(&self) -> u64 {
        self.inner.calls.load(Ordering::Relaxed)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::Relaxed);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::Relaxed);
    }

    pub async fn accounts(&self) -> Vec<UserAccount> {
        self.inner.accounts.lock().await.clone()
    }

    pub async fn reports(&self) -> Vec<TrafficReport> {
        self.inner.reports.lock().await.clone()
    }

    pub async fn seed_report(&self, id: i64, timestamp: &str, description: &str) {
        let mut extra = serde_json::Map::new();
        extra.insert("description".to_string(), description.into());
        self.inner.reports.lock().await.push(TrafficReport {
            id,
            timestamp: timestamp.parse().unwrap(),
            extra,
        });
    }

    fn record_call(&self) {
        self.inner.calls.fetch_add(1, Ordering::Relaxed);
    }

    fn read_failure(&self) -> Option<StoreError> {
        self.inner.fail_reads.load(Ordering::Relaxed).then(|| StoreError::Api {
            status: 500,
            message: "fake store: read failure".to_string(),
        })
    }

    fn write_failure(&self) -> Option<StoreError> {
        self.inner.fail_writes.load(Ordering::Relaxed).then(|| StoreError::Api {
            status: 500,
            message: "fake store: write failure".to_string(),
        })
    }
}

#[async_trait]
impl UserStore for FakeStore {
    async fn find_credential_conflicts(
        &self,
        username: &str,
        phone_number: &str,
    ) -> Result<Vec<UserAccount>, StoreError> {
        self.record_call();
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        Ok(self
            .inner
            .accounts
            .lock()
            .await
            .iter()
            .filter(|a| a.username == username || a.phone_number == phone_number)
            .cloned()
            .collect())
    }

    async fn find_account(
        &self,
        identifier: &str,
        password_hash: &str,
    ) -> Result<Vec<UserAccount>, StoreError> {
        self.record_call();
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        Ok(self
            .inner
            .accounts
            .lock()
            .await
            .iter()
            .filter(|a| {
                (a.username == identifier || a.phone_number == identifier)
                    && a.password_hash == password_hash
            })
            .cloned()
            .collect())
    }

    async fn insert_account(&self, account: &NewUserAccount) -> Result<(), StoreError> {
        self.record_call();
        if let Some(err) = self.write_failure() {
            return Err(err);
        }
        let mut accounts = self.inner.accounts.lock().await;
        // The real table carries unique constraints on both columns.
        if accounts
            .iter()
            .any(|a| a.username == account.username || a.phone_number == account.phone_number)
        {
            return Err(StoreError::Api {
                status: 409,
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }
        let id = accounts.len() as i64 + 1;
        accounts.push(UserAccount {
            id,
            username: account.username.clone(),
            phone_number: account.phone_number.clone(),
            password_hash: account.password_hash.clone(),
            created_at: None,
        });
        Ok(())
    }
}

#[async_trait]
impl ReportStore for FakeStore {
    async fn list_reports(&self) -> Result<Vec<TrafficReport>, StoreError> {
        self.record_call();
        if let Some(err) = self.read_failure() {
            return Err(err);
        }
        let mut reports = self.inner.reports.lock().await.clone();
        reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(reports)
    }

    async fn purge_old_reports(&self) -> Result<(), StoreError> {
        self.record_call();
        if let Some(err) = self.write_failure() {
            return Err(err);
        }
        self.inner.reports.lock().await.clear();
        Ok(())
    }
}
