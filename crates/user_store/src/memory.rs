//! In-memory user store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{StagedOp, UnitOfWork, User, UserStore, UserStoreError, UserStoreResult};

/// In-memory user store.
///
/// Committed state is shared; staging lives in per-operation
/// `MemoryUnitOfWork` handles. Used in tests and as the default store when no
/// database is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    committed: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Creates a new in-memory user store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Unit of work over a `MemoryUserStore`.
///
/// Owns its staging buffer; `commit` applies it all-or-nothing against the
/// shared committed state after checking the uniqueness invariants.
#[derive(Debug)]
pub struct MemoryUnitOfWork {
    committed: Arc<RwLock<HashMap<Uuid, User>>>,
    staged: Vec<StagedOp>,
}

fn apply(snapshot: &mut HashMap<Uuid, User>, op: StagedOp) -> UserStoreResult<()> {
    match op {
        StagedOp::Insert(user) => {
            if snapshot.contains_key(&user.id) {
                return Err(UserStoreError::already_exists("id", user.id.to_string()));
            }
            check_unique(snapshot, &user)?;
            snapshot.insert(user.id, user);
        }
        StagedOp::Update(user) => {
            if !snapshot.contains_key(&user.id) {
                return Err(UserStoreError::NotFound);
            }
            check_unique(snapshot, &user)?;
            snapshot.insert(user.id, user);
        }
        StagedOp::Delete(id) => {
            if snapshot.remove(&id).is_none() {
                return Err(UserStoreError::NotFound);
            }
        }
    }
    Ok(())
}

fn check_unique(snapshot: &HashMap<Uuid, User>, user: &User) -> UserStoreResult<()> {
    for other in snapshot.values().filter(|u| u.id != user.id) {
        if other.provider_id == user.provider_id {
            return Err(UserStoreError::already_exists(
                "provider_id",
                user.provider_id.clone(),
            ));
        }
        if let (Some(a), Some(b)) = (&other.confirmation_token, &user.confirmation_token) {
            if a == b {
                return Err(UserStoreError::already_exists(
                    "confirmation_token",
                    b.clone(),
                ));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
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

        let mut committed = self.committed.write().await;
        let mut snapshot = committed.clone();
        for op in ops {
            apply(&mut snapshot, op)?;
        }
        *committed = snapshot;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    type Uow = MemoryUnitOfWork;

    async fn get_by_id(&self, id: Uuid) -> UserStoreResult<User> {
        let users = self.committed.read().await;
        users.get(&id).cloned().ok_or(UserStoreError::NotFound)
    }

    async fn get_by_provider_id(&self, provider_id: &str) -> UserStoreResult<User> {
        let users = self.committed.read().await;
        users
            .values()
            .find(|u| u.provider_id == provider_id)
            .cloned()
            .ok_or(UserStoreError::NotFound)
    }

    async fn get_by_confirmation_token(&self, token: &str) -> UserStoreResult<User> {
        let users = self.committed.read().await;
        users
            .values()
            .find(|u| u.confirmation_token.as_deref() == Some(token))
            .cloned()
            .ok_or(UserStoreError::InvalidToken)
    }

    async fn list_all(&self) -> UserStoreResult<Vec<User>> {
        let users = self.committed.read().await;
        Ok(users.values().cloned().collect())
    }

    fn begin(&self) -> MemoryUnitOfWork {
        MemoryUnitOfWork {
            committed: Arc::clone(&self.committed),
            staged: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(provider_id: &str, token: &str) -> User {
        User::new(
            provider_id,
            format!("{provider_id}@example.com"),
            "Test",
            "User",
            token,
        )
    }

    #[tokio::test]
    async fn test_staged_add_invisible_until_commit() {
        let store = MemoryUserStore::new();
        let mut uow = store.begin();
        let user = uow.add(sample("abc", "tok-a")).unwrap();

        assert!(store.get_by_id(user.id).await.is_err());
        assert_eq!(uow.staged.len(), 1);

        uow.commit().await.unwrap();
        assert_eq!(store.get_by_id(user.id).await.unwrap().id, user.id);
        assert_eq!(uow.staged.len(), 0);
    }

    #[tokio::test]
    async fn test_lookup_by_provider_id_and_token() {
        let store = MemoryUserStore::new();
        let mut uow = store.begin();
        let user = uow.add(sample("abc", "tok-a")).unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.get_by_provider_id("abc").await.unwrap().id, user.id);
        assert_eq!(
            store.get_by_confirmation_token("tok-a").await.unwrap().id,
            user.id
        );
        assert!(matches!(
            store.get_by_confirmation_token("nope").await,
            Err(UserStoreError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_provider_id_rolls_back_whole_unit() {
        let store = MemoryUserStore::new();
        let mut uow = store.begin();
        uow.add(sample("abc", "tok-a")).unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin();
        let extra = uow.add(sample("xyz", "tok-b")).unwrap();
        uow.add(sample("abc", "tok-c")).unwrap();

        assert!(matches!(
            uow.commit().await,
            Err(UserStoreError::AlreadyExists { field: "provider_id", .. })
        ));
        // The valid insert in the same unit of work must not survive.
        assert!(store.get_by_id(extra.id).await.is_err());
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_units_of_work_are_independent_transactions() {
        let store = MemoryUserStore::new();
        let mut first = store.begin();
        let mut second = store.begin();

        // Two interleaved operations: a valid insert in one unit, a
        // conflicting insert in the other.
        let valid = first.add(sample("abc", "tok-a")).unwrap();
        second.add(sample("abc", "tok-b")).unwrap();

        // Committing the first unit must neither apply nor be aborted by
        // anything staged in the second.
        first.commit().await.unwrap();
        assert_eq!(store.get_by_id(valid.id).await.unwrap().id, valid.id);
        assert_eq!(store.list_all().await.unwrap().len(), 1);

        // The second unit fails on its own merits, leaving the first intact.
        assert!(matches!(
            second.commit().await,
            Err(UserStoreError::AlreadyExists { field: "provider_id", .. })
        ));
        assert_eq!(store.get_by_id(valid.id).await.unwrap().id, valid.id);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryUserStore::new();
        let mut uow = store.begin();
        let mut user = uow.add(sample("abc", "tok-a")).unwrap();
        uow.commit().await.unwrap();

        user.confirm_email();
        let mut uow = store.begin();
        uow.update(user.clone()).unwrap();
        uow.commit().await.unwrap();

        let fetched = store.get_by_id(user.id).await.unwrap();
        assert!(fetched.is_email_confirmed);
        assert!(fetched.confirmation_token.is_none());

        let mut uow = store.begin();
        uow.delete(&fetched).unwrap();
        uow.commit().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_user_fails_on_commit() {
        let store = MemoryUserStore::new();
        let mut uow = store.begin();
        uow.update(sample("ghost", "tok-g")).unwrap();

        assert!(matches!(uow.commit().await, Err(UserStoreError::NotFound)));
    }
}
