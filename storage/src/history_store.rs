//! HistoryStore: the explicit context object handed to every caller.
//!
//! Owns the pool, runs migrations once on connect, and hands out the three
//! components. No global engine or session state anywhere.

use crate::audit_query::AuditQuery;
use crate::error::StorageError;
use crate::identity_store::{IdentityStore, IdentitySyncPolicy};
use crate::message_ledger::MessageLedger;
use crate::migrations;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct HistoryStore {
    pool_manager: SqlitePoolManager,
    sync_policy: IdentitySyncPolicy,
}

impl HistoryStore {
    /// Connects with the default (username-only) identity sync policy.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        Self::connect_with_policy(database_url, IdentitySyncPolicy::default()).await
    }

    /// Connects, runs pending schema migrations, and fixes the identity
    /// sync policy for everything handed out by this store.
    pub async fn connect_with_policy(
        database_url: &str,
        sync_policy: IdentitySyncPolicy,
    ) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        migrations::run(pool_manager.pool()).await?;
        Ok(Self {
            pool_manager,
            sync_policy,
        })
    }

    pub fn identity(&self) -> IdentityStore {
        IdentityStore::new(self.pool_manager.clone(), self.sync_policy)
    }

    pub fn ledger(&self) -> MessageLedger {
        MessageLedger::new(self.pool_manager.clone(), self.sync_policy)
    }

    pub fn audit(&self) -> AuditQuery {
        AuditQuery::new(self.pool_manager.clone())
    }

    pub fn pool_manager(&self) -> &SqlitePoolManager {
        &self.pool_manager
    }
}
