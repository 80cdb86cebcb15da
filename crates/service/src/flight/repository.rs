use async_trait::async_trait;

use super::domain::{Flight, SearchFilter};
use crate::errors::StoreError;

/// Storage port for flight records.
#[async_trait]
pub trait FlightStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<Flight>, StoreError>;
    /// Total number of records, ignoring any filter.
    async fn count(&self) -> Result<u64, StoreError>;
    /// Records matching every predicate of `filter`, ascending by `id`.
    async fn query(&self, filter: &SearchFilter, offset: u64, limit: u64) -> Result<Vec<Flight>, StoreError>;
    async fn insert(&self, flight: &Flight) -> Result<(), StoreError>;
    async fn update(&self, flight: &Flight) -> Result<(), StoreError>;
    async fn delete(&self, flight: &Flight) -> Result<(), StoreError>;
}

/// Simple in-memory mock store for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockFlightStore {
        items: Mutex<BTreeMap<String, Flight>>, // ordered by id
        failing: AtomicBool,
    }

    impl MockFlightStore {
        /// Make every subsequent call fail with a backend error.
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("error crud".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl FlightStore for MockFlightStore {
        async fn get_by_id(&self, id: &str) -> Result<Option<Flight>, StoreError> {
            self.check()?;
            Ok(self.items.lock().unwrap().get(id).cloned())
        }

        async fn count(&self) -> Result<u64, StoreError> {
            self.check()?;
            Ok(self.items.lock().unwrap().len() as u64)
        }

        async fn query(&self, filter: &SearchFilter, offset: u64, limit: u64) -> Result<Vec<Flight>, StoreError> {
            self.check()?;
            let items = self.items.lock().unwrap();
            Ok(items
                .values()
                .filter(|f| filter.matches(f))
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn insert(&self, flight: &Flight) -> Result<(), StoreError> {
            self.check()?;
            let mut items = self.items.lock().unwrap();
            if items.contains_key(&flight.id) {
                return Err(StoreError::Conflict(format!("flight.id = {}", flight.id)));
            }
            items.insert(flight.id.clone(), flight.clone());
            Ok(())
        }

        async fn update(&self, flight: &Flight) -> Result<(), StoreError> {
            self.check()?;
            let mut items = self.items.lock().unwrap();
            match items.get_mut(&flight.id) {
                Some(slot) => {
                    *slot = flight.clone();
                    Ok(())
                }
                None => Err(StoreError::Backend(format!("no flight row with id {}", flight.id))),
            }
        }

        async fn delete(&self, flight: &Flight) -> Result<(), StoreError> {
            self.check()?;
            self.items.lock().unwrap().remove(&flight.id);
            Ok(())
        }
    }
}
