use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{Flight, FlightInput, SearchFilter};
use super::repository::FlightStore;
use crate::duration::flight_duration;
use crate::errors::ServiceError;

/// Application service encapsulating flight business rules: validation,
/// derived `duration`, timestamps, and CRUD orchestration over the store.
pub struct FlightService<R: FlightStore + ?Sized> {
    repo: Arc<R>,
}

impl<R: FlightStore + ?Sized> FlightService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Fetch one flight by id; `NotFound` when absent.
    pub async fn get(&self, id: &str) -> Result<Flight, ServiceError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| ServiceError::not_found("flight"))
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.repo.count().await?)
    }

    /// Flights matching `filter`, ascending by id. `offset` and `limit` are
    /// handed to the store as given.
    pub async fn query(&self, filter: SearchFilter, offset: u64, limit: u64) -> Result<Vec<Flight>, ServiceError> {
        let filter = filter.normalized();
        debug!(?filter, offset, limit, "query flights");
        Ok(self.repo.query(&filter, offset, limit).await?)
    }

    #[instrument(skip_all, fields(name = %input.name, number = %input.number))]
    pub async fn create(&self, input: FlightInput) -> Result<Flight, ServiceError> {
        let (departure_time, arrival_time) = input.check()?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let flight = Flight {
            id: id.clone(),
            name: input.name,
            number: input.number,
            departure: input.departure,
            departure_time,
            destination: input.destination,
            arrival_time,
            fare: input.fare,
            duration: flight_duration(departure_time, arrival_time),
            created_at: now,
            updated_at: now,
        };
        self.repo.insert(&flight).await?;
        info!(flight_id = %id, "flight_created");
        self.get(&id).await
    }

    /// Overwrite every mutable field of an existing flight. Returns the
    /// updated record as written, without re-reading it.
    #[instrument(skip(self, input), fields(flight_id = %id))]
    pub async fn update(&self, id: &str, input: FlightInput) -> Result<Flight, ServiceError> {
        let (departure_time, arrival_time) = input.check()?;
        let mut flight = self.get(id).await?;

        flight.name = input.name;
        flight.number = input.number;
        flight.departure = input.departure;
        flight.departure_time = departure_time;
        flight.destination = input.destination;
        flight.arrival_time = arrival_time;
        flight.fare = input.fare;
        flight.duration = flight_duration(departure_time, arrival_time);
        // never move updated_at backwards, even if the clock does
        flight.updated_at = Utc::now().max(flight.updated_at);

        self.repo.update(&flight).await?;
        info!("flight_updated");
        Ok(flight)
    }

    /// Remove a flight and hand back its last state.
    #[instrument(skip(self), fields(flight_id = %id))]
    pub async fn delete(&self, id: &str) -> Result<Flight, ServiceError> {
        let flight = self.get(id).await?;
        self.repo.delete(&flight).await?;
        info!("flight_deleted");
        Ok(flight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::flight::repository::mock::MockFlightStore;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn input(name: &str) -> FlightInput {
        FlightInput {
            name: name.into(),
            number: "test number".into(),
            departure: "MOSKOW".into(),
            departure_time: Some(t0()),
            destination: "MINSK".into(),
            arrival_time: Some(t0() + Duration::hours(3)),
            fare: "200 EUR".into(),
        }
    }

    fn svc() -> (Arc<MockFlightStore>, FlightService<MockFlightStore>) {
        let repo = Arc::new(MockFlightStore::default());
        (repo.clone(), FlightService::new(repo))
    }

    #[tokio::test]
    async fn crud_flow() {
        let (repo, s) = svc();
        assert_eq!(s.count().await.unwrap(), 0);

        // successful creation
        let flight = s.create(input("test")).await.unwrap();
        assert!(!flight.id.is_empty());
        assert_eq!(flight.name, "test");
        assert_eq!(flight.created_at, flight.updated_at);
        assert_eq!(s.count().await.unwrap(), 1);
        let id = flight.id.clone();

        // validation error in creation
        assert!(matches!(s.create(FlightInput::default()).await, Err(ServiceError::Validation(_))));
        assert_eq!(s.count().await.unwrap(), 1);

        // unexpected error in creation
        repo.set_failing(true);
        assert!(matches!(s.create(input("error")).await, Err(ServiceError::Storage(_))));
        repo.set_failing(false);
        assert_eq!(s.count().await.unwrap(), 1);

        s.create(input("test2")).await.unwrap();

        // update
        let updated = s.update(&id, input("test updated")).await.unwrap();
        assert_eq!(updated.name, "test updated");
        assert_eq!(updated.departure, "MOSKOW");
        assert_eq!(updated.destination, "MINSK");
        assert_eq!(updated.fare, "200 EUR");
        assert_eq!(updated.duration, "3 hours");

        assert!(matches!(s.update("none", input("x")).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(s.update(&id, FlightInput::default()).await, Err(ServiceError::Validation(_))));
        assert_eq!(s.count().await.unwrap(), 2);

        // get
        assert!(matches!(s.get("none").await, Err(ServiceError::NotFound(_))));
        let got = s.get(&id).await.unwrap();
        assert_eq!(got.name, "test updated");
        assert_eq!(got.id, id);

        // query full
        let all = s.query(SearchFilter::default(), 0, 100).await.unwrap();
        assert_eq!(all.len(), 2);

        // delete
        assert!(matches!(s.delete("none").await, Err(ServiceError::NotFound(_))));
        let deleted = s.delete(&id).await.unwrap();
        assert_eq!(deleted.id, id);
        assert_eq!(s.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn create_derives_duration_from_schedule() {
        let (_, s) = svc();
        let created = s
            .create(FlightInput {
                name: "BOEING 737-400".into(),
                number: "UR-CSV".into(),
                departure: "MALMÖ".into(),
                departure_time: Some(t0()),
                destination: "MERZIFON".into(),
                arrival_time: Some(t0() + Duration::hours(3)),
                fare: "100EUR".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.duration, "3 hours");
        assert!(!created.id.is_empty());

        let fetched = s.get(&created.id).await.unwrap();
        assert_eq!(fetched.duration, "3 hours");
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_advances_updated_at() {
        let (_, s) = svc();
        let created = s.create(input("a")).await.unwrap();
        let mut longer = input("a");
        longer.arrival_time = Some(t0() + Duration::hours(5) + Duration::minutes(20));

        let first = s.update(&created.id, longer.clone()).await.unwrap();
        assert_eq!(first.created_at, created.created_at);
        assert!(first.updated_at >= created.updated_at);
        assert_eq!(first.duration, "5 hours 20 minutes");

        let second = s.update(&created.id, longer).await.unwrap();
        assert_eq!(second.created_at, created.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(s.get(&created.id).await.unwrap(), second);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let (_, s) = svc();
        let created = s.create(input("a")).await.unwrap();
        s.delete(&created.id).await.unwrap();
        assert!(matches!(s.get(&created.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(s.delete(&created.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn query_by_name_returns_matches_in_id_order() {
        let (_, s) = svc();
        for name in ["X", "Y", "X", "Z", "X"] {
            s.create(input(name)).await.unwrap();
        }
        let filter = SearchFilter { name: Some("X".into()), ..Default::default() };
        let found = s.query(filter, 0, 100).await.unwrap();
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|f| f.name == "X"));
        let ids: Vec<&str> = found.iter().map(|f| f.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn query_paginates_and_filters_by_date() {
        let (_, s) = svc();
        for i in 0..5 {
            let mut inp = input(&format!("f{}", i));
            let dep = t0() + Duration::days(i);
            inp.departure_time = Some(dep);
            inp.arrival_time = Some(dep + Duration::hours(1));
            s.create(inp).await.unwrap();
        }
        let page = s.query(SearchFilter::default(), 1, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        let rest = s.query(SearchFilter::default(), 4, 10).await.unwrap();
        assert_eq!(rest.len(), 1);

        let by_day = SearchFilter { departure_date: NaiveDate::from_ymd_opt(2024, 3, 3), ..Default::default() };
        let found = s.query(by_day, 0, 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "f2");

        let none = SearchFilter { destination: Some("NOWHERE".into()), ..Default::default() };
        assert!(s.query(none, 0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_filter_values_do_not_constrain() {
        let (_, s) = svc();
        s.create(input("a")).await.unwrap();
        let filter = SearchFilter { name: Some(String::new()), ..Default::default() };
        assert_eq!(s.query(filter, 0, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn arrival_before_departure_is_validation_error() {
        let (_, s) = svc();
        let mut bad = input("a");
        bad.arrival_time = Some(t0() - Duration::minutes(1));
        match s.create(bad).await {
            Err(ServiceError::Validation(v)) => assert!(v.has_field("arrival_time")),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(s.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_failure_in_store_is_reported() {
        let (repo, s) = svc();
        let created = s.create(input("a")).await.unwrap();
        repo.set_failing(true);
        let err = s.update(&created.id, input("b")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(StoreError::Backend(_))));
        repo.set_failing(false);
        assert_eq!(s.get(&created.id).await.unwrap().name, "a");
    }
}
