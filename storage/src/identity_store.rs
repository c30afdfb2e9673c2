//! Identity store: reconciles platform identity snapshots into stable user
//! records.
//!
//! One row per platform identifier, created on first sight and never
//! deleted. Under the default policy only the username is refreshed on
//! later events; the other name fields stay as first observed.

use sqlx::SqliteConnection;
use tracing::info;

use crate::error::{is_unique_violation, StorageError};
use crate::models::{IdentitySnapshot, UserRecord};
use crate::sqlite_pool::SqlitePoolManager;

/// Which snapshot fields later events may overwrite.
///
/// `UsernameOnly` is the reference behavior: full/first/last name are frozen
/// once set. `FullProfile` refreshes every name field from each snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentitySyncPolicy {
    #[default]
    UsernameOnly,
    FullProfile,
}

#[derive(Clone)]
pub struct IdentityStore {
    pool_manager: SqlitePoolManager,
    policy: IdentitySyncPolicy,
}

impl IdentityStore {
    pub fn new(pool_manager: SqlitePoolManager, policy: IdentitySyncPolicy) -> Self {
        Self {
            pool_manager,
            policy,
        }
    }

    /// Inserts the user on first sight, otherwise reconciles the snapshot
    /// into the stored record per the sync policy. Exactly one write
    /// transaction per call.
    ///
    /// Two concurrent first-inserts for the same identifier are resolved by
    /// detecting the uniqueness violation and retrying as an update; the
    /// caller never sees the race.
    pub async fn upsert(&self, snapshot: &IdentitySnapshot) -> Result<UserRecord, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;
        let user = upsert_on(&mut *tx, snapshot, self.policy).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Looks up a user by platform identifier.
    pub async fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(user)
    }
}

/// Upsert running on an already-open connection, so the ledger can
/// reconcile the author inside the same transaction as the message insert.
pub(crate) async fn upsert_on(
    conn: &mut SqliteConnection,
    snapshot: &IdentitySnapshot,
    policy: IdentitySyncPolicy,
) -> Result<UserRecord, StorageError> {
    let existing = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?")
        .bind(snapshot.user_id)
        .fetch_optional(&mut *conn)
        .await?;

    match existing {
        Some(user) => reconcile(conn, user, snapshot, policy).await,
        None => {
            let inserted = sqlx::query(
                r#"
                INSERT INTO users (user_id, username, full_name, first_name, last_name)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(snapshot.user_id)
            .bind(&snapshot.username)
            .bind(&snapshot.full_name)
            .bind(&snapshot.first_name)
            .bind(&snapshot.last_name)
            .execute(&mut *conn)
            .await;

            match inserted {
                Ok(done) => {
                    info!(user_id = snapshot.user_id, "Created user record");
                    Ok(UserRecord {
                        id: done.last_insert_rowid(),
                        user_id: snapshot.user_id,
                        username: snapshot.username.clone(),
                        full_name: snapshot.full_name.clone(),
                        first_name: snapshot.first_name.clone(),
                        last_name: snapshot.last_name.clone(),
                    })
                }
                // Lost a first-insert race; the row exists now, take the
                // update path instead.
                Err(e) if is_unique_violation(&e) => {
                    let user =
                        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?")
                            .bind(snapshot.user_id)
                            .fetch_one(&mut *conn)
                            .await?;
                    reconcile(conn, user, snapshot, policy).await
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

async fn reconcile(
    conn: &mut SqliteConnection,
    mut user: UserRecord,
    snapshot: &IdentitySnapshot,
    policy: IdentitySyncPolicy,
) -> Result<UserRecord, StorageError> {
    match policy {
        IdentitySyncPolicy::UsernameOnly => {
            if snapshot.has_username() && user.username != snapshot.username {
                sqlx::query("UPDATE users SET username = ? WHERE user_id = ?")
                    .bind(&snapshot.username)
                    .bind(user.user_id)
                    .execute(&mut *conn)
                    .await?;
                info!(
                    user_id = user.user_id,
                    username = snapshot.username.as_deref().unwrap_or(""),
                    "Updated username"
                );
                user.username = snapshot.username.clone();
            }
        }
        IdentitySyncPolicy::FullProfile => {
            let username = if snapshot.has_username() {
                snapshot.username.clone()
            } else {
                user.username.clone()
            };
            sqlx::query(
                r#"
                UPDATE users SET username = ?, full_name = ?, first_name = ?, last_name = ?
                WHERE user_id = ?
                "#,
            )
            .bind(&username)
            .bind(&snapshot.full_name)
            .bind(&snapshot.first_name)
            .bind(&snapshot.last_name)
            .bind(user.user_id)
            .execute(&mut *conn)
            .await?;
            user.username = username;
            user.full_name = snapshot.full_name.clone();
            user.first_name = snapshot.first_name.clone();
            user.last_name = snapshot.last_name.clone();
        }
    }
    Ok(user)
}
