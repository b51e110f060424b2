//! Postgres-backed user store implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{StagedOp, UnitOfWork, User, UserStore, UserStoreError, UserStoreResult};

const SELECT_USER: &str = "SELECT id, provider_id, username, first_name, last_name, email, \
     is_enabled, is_email_confirmed, confirmation_token FROM users";

/// Postgres user store.
///
/// Lookups go straight to the pool; mutations are staged in per-operation
/// `PgUnitOfWork` handles and flushed inside a single transaction on
/// `commit`. The uniqueness invariants are enforced by the schema.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Creates a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the users table if it does not exist yet.
    ///
    /// Schema management beyond this bootstrap is left to the operator.
    pub async fn init_schema(&self) -> UserStoreResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                provider_id TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                is_enabled BOOLEAN NOT NULL,
                is_email_confirmed BOOLEAN NOT NULL,
                confirmation_token TEXT UNIQUE
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Unit of work over a `PgUserStore`.
///
/// Owns its staging buffer; a failed `commit` rolls the transaction back and
/// discards the staged changes.
#[derive(Debug)]
pub struct PgUnitOfWork {
    pool: PgPool,
    staged: Vec<StagedOp>,
}

fn map_db_error(err: sqlx::Error) -> UserStoreError {
    // Unique-constraint violations surface as invariant conflicts, not
    // opaque database failures.
    if let Some(db_err) = err.as_database_error() {
        if db_err.code().as_deref() == Some("23505") {
            return UserStoreError::already_exists("unique constraint", db_err.to_string());
        }
    }
    UserStoreError::Database(err)
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn add(&mut self, user: User) -> UserStoreResult<User> {
        self.staged.push(StagedOp::Insert(user.clone()));
        Ok(user)
    }

    fn update(&mut self, user: User) -> UserStoreResult<User> {
        self.staged.push(StagedOp::Update(user.clone()));
        Ok(user)
    }

    fn delete(&mut self, user: &User) -> UserStoreResult<()> {
        self.staged.push(StagedOp::Delete(user.id));
        Ok(())
    }

    async fn commit(&mut self) -> UserStoreResult<()> {
        let ops: Vec<StagedOp> = self.staged.drain(..).collect();
        if ops.is_empty() {
            return Ok(());
        }

        tracing::debug!(ops = ops.len(), "flushing staged user changes");
        let mut tx = self.pool.begin().await?;
        for op in ops {
            match op {
                StagedOp::Insert(user) => {
                    sqlx::query(
                        "INSERT INTO users (id, provider_id, username, first_name, last_name, \
                         email, is_enabled, is_email_confirmed, confirmation_token) \
                         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                    )
                    .bind(user.id)
                    .bind(&user.provider_id)
                    .bind(&user.username)
                    .bind(&user.first_name)
                    .bind(&user.last_name)
                    .bind(&user.email)
                    .bind(user.is_enabled)
                    .bind(user.is_email_confirmed)
                    .bind(&user.confirmation_token)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
                }
                StagedOp::Update(user) => {
                    let result = sqlx::query(
                        "UPDATE users SET provider_id = $2, username = $3, first_name = $4, \
                         last_name = $5, email = $6, is_enabled = $7, is_email_confirmed = $8, \
                         confirmation_token = $9 WHERE id = $1",
                    )
                    .bind(user.id)
                    .bind(&user.provider_id)
                    .bind(&user.username)
                    .bind(&user.first_name)
                    .bind(&user.last_name)
                    .bind(&user.email)
                    .bind(user.is_enabled)
                    .bind(user.is_email_confirmed)
                    .bind(&user.confirmation_token)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
                    if result.rows_affected() == 0 {
                        return Err(UserStoreError::NotFound);
                    }
                }
                StagedOp::Delete(id) => {
                    let result = sqlx::query("DELETE FROM users WHERE id = $1")
                        .bind(id)
                        .execute(&mut *tx)
                        .await?;
                    if result.rows_affected() == 0 {
                        return Err(UserStoreError::NotFound);
                    }
                }
            }
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    type Uow = PgUnitOfWork;

    async fn get_by_id(&self, id: Uuid) -> UserStoreResult<User> {
        sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserStoreError::NotFound)
    }

    async fn get_by_provider_id(&self, provider_id: &str) -> UserStoreResult<User> {
        sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE provider_id = $1"))
            .bind(provider_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserStoreError::NotFound)
    }

    async fn get_by_confirmation_token(&self, token: &str) -> UserStoreResult<User> {
        sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE confirmation_token = $1"))
            .bind(token)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserStoreError::InvalidToken)
    }

    async fn list_all(&self) -> UserStoreResult<Vec<User>> {
        Ok(sqlx::query_as::<_, User>(SELECT_USER)
            .fetch_all(&self.pool)
            .await?)
    }

    fn begin(&self) -> PgUnitOfWork {
        PgUnitOfWork {
            pool: self.pool.clone(),
            staged: Vec::new(),
        }
    }
}
