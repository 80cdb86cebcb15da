use async_trait::async_trait;

use super::domain::User;
use crate::errors::StoreError;

/// Storage port for user records.
///
/// `name` uniqueness is the store's job: `insert` reports a duplicate as
/// [`StoreError::Conflict`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn get_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;
    async fn insert(&self, user: User) -> Result<(), StoreError>;
}

/// Simple in-memory mock store for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserStore {
        users: Mutex<HashMap<String, User>>, // key: id
        failing: AtomicBool,
    }

    impl MockUserStore {
        pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
            let map = users.into_iter().map(|u| (u.id().to_string(), u)).collect();
            Self { users: Mutex::new(map), failing: AtomicBool::new(false) }
        }

        /// Make every subsequent call fail with a backend error.
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserStore for MockUserStore {
        async fn get_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
            self.check()?;
            Ok(self.users.lock().unwrap().get(id).cloned())
        }

        async fn get_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
            self.check()?;
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.name() == name).cloned())
        }

        async fn insert(&self, user: User) -> Result<(), StoreError> {
            self.check()?;
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.name() == user.name()) {
                return Err(StoreError::Conflict(format!("user.name = {}", user.name())));
            }
            if users.contains_key(user.id()) {
                return Err(StoreError::Conflict(format!("user.id = {}", user.id())));
            }
            users.insert(user.id().to_string(), user);
            Ok(())
        }
    }
}
