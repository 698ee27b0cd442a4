//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    /// Index for username -> user ID lookup
    username_index: HashMap<String, UserId>,
    last_id: i64,
}

/// In-memory implementation of UserRepository
///
/// Both tables live behind one lock so the uniqueness check and the insert
/// happen atomically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        Ok(tables
            .username_index
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;

        if tables.username_index.contains_key(user.username()) {
            return Err(DomainError::conflict(format!(
                "Username '{}' is already taken",
                user.username()
            )));
        }

        tables.last_id += 1;
        let user = user.into_user(UserId::new(tables.last_id));

        tables
            .username_index
            .insert(user.username().to_string(), user.id());
        tables.users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        let id = user.id();

        let old_username = match tables.users.get(&id) {
            Some(existing) => existing.username().to_string(),
            None => {
                return Err(DomainError::not_found(format!(
                    "User with ID {} was not found",
                    id
                )))
            }
        };

        // If username changed, check uniqueness and update index
        if old_username != user.username() {
            if tables.username_index.contains_key(user.username()) {
                return Err(DomainError::conflict(format!(
                    "Username '{}' is already taken",
                    user.username()
                )));
            }

            tables.username_index.remove(&old_username);
            tables
                .username_index
                .insert(user.username().to_string(), id);
        }

        tables.users.insert(id, user.clone());

        Ok(user.clone())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().cloned().collect())
    }
}
