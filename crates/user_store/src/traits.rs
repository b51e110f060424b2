//! User store trait definitions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{User, UserStoreResult};

/// A staged mutation awaiting `commit`.
#[derive(Debug, Clone)]
pub enum StagedOp {
    /// Insert a new user.
    Insert(User),
    /// Replace an existing user.
    Update(User),
    /// Remove a user by id.
    Delete(Uuid),
}

/// A unit of work scoped to one logical operation.
///
/// `add`, `update` and `delete` stage changes in this handle without
/// performing I/O; nothing is durable until `commit` returns success, and a
/// failed `commit` leaves no partial writes behind. Units of work from
/// different operations are independent transactions: changes staged here
/// are never visible to, nor committed by, any other unit.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Stages an insert and returns the user unchanged.
    fn add(&mut self, user: User) -> UserStoreResult<User>;

    /// Stages an update and returns the user unchanged.
    fn update(&mut self, user: User) -> UserStoreResult<User>;

    /// Stages a delete.
    fn delete(&mut self, user: &User) -> UserStoreResult<()>;

    /// Atomically applies every change staged in this unit.
    ///
    /// On failure the whole unit is rolled back and its staged changes are
    /// discarded; committed state is untouched.
    async fn commit(&mut self) -> UserStoreResult<()>;
}

/// Trait for user storage operations.
///
/// Lookups read committed state only. Mutations go through a unit of work
/// obtained from `begin`, so concurrent operations never share a staging
/// buffer.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// The unit-of-work handle for this store.
    type Uow: UnitOfWork;

    /// Gets a user by local id.
    async fn get_by_id(&self, id: Uuid) -> UserStoreResult<User>;

    /// Gets a user by the identifier assigned by the remote provider.
    async fn get_by_provider_id(&self, provider_id: &str) -> UserStoreResult<User>;

    /// Gets a user by confirmation token.
    async fn get_by_confirmation_token(&self, token: &str) -> UserStoreResult<User>;

    /// Lists all committed users.
    async fn list_all(&self) -> UserStoreResult<Vec<User>>;

    /// Opens a fresh unit of work for one logical operation.
    fn begin(&self) -> Self::Uow;
}
