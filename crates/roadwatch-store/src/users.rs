use async_trait::async_trait;

use roadwatch_types::models::{NewUserAccount, UserAccount};

use crate::query::Select;
use crate::{StoreClient, StoreError};

const USERS_TABLE: &str = "users";

/// Credential reads/writes for the identity service. Implemented by
/// `StoreClient` in production and by in-memory fakes in tests.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Rows whose `username` OR `phone_number` equals the given values.
    async fn find_credential_conflicts(
        &self,
        username: &str,
        phone_number: &str,
    ) -> Result<Vec<UserAccount>, StoreError>;

    /// Rows where (`username` = identifier OR `phone_number` = identifier)
    /// AND `password_hash` = the supplied hash. The hash is compared as an
    /// opaque value; no derivation happens on this side.
    async fn find_account(
        &self,
        identifier: &str,
        password_hash: &str,
    ) -> Result<Vec<UserAccount>, StoreError>;

    async fn insert_account(&self, account: &NewUserAccount) -> Result<(), StoreError>;
}

#[async_trait]
impl UserStore for StoreClient {
    async fn find_credential_conflicts(
        &self,
        username: &str,
        phone_number: &str,
    ) -> Result<Vec<UserAccount>, StoreError> {
        self.select(
            USERS_TABLE,
            Select::new().any_of(&[("username", username), ("phone_number", phone_number)]),
        )
        .await
    }

    async fn find_account(
        &self,
        identifier: &str,
        password_hash: &str,
    ) -> Result<Vec<UserAccount>, StoreError> {
        self.select(
            USERS_TABLE,
            Select::new()
                .any_of(&[("username", identifier), ("phone_number", identifier)])
                .eq("password_hash", password_hash),
        )
        .await
    }

    async fn insert_account(&self, account: &NewUserAccount) -> Result<(), StoreError> {
        self.insert(USERS_TABLE, std::slice::from_ref(account)).await
    }
}
