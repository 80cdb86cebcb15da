use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::errors::StoreError;
use crate::flight::domain::{Flight, SearchFilter};
use crate::flight::repository::FlightStore;
use models::flight::{ActiveModel, Column, Entity, Model};

pub struct SeaOrmFlightStore {
    pub db: DatabaseConnection,
}

impl From<Model> for Flight {
    fn from(m: Model) -> Self {
        Flight {
            id: m.id,
            name: m.name,
            number: m.number,
            departure: m.departure,
            departure_time: m.departure_time,
            destination: m.destination,
            arrival_time: m.arrival_time,
            fare: m.fare,
            duration: m.duration,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn active(f: &Flight) -> ActiveModel {
    ActiveModel {
        id: Set(f.id.clone()),
        name: Set(f.name.clone()),
        number: Set(f.number.clone()),
        departure: Set(f.departure.clone()),
        departure_time: Set(f.departure_time),
        destination: Set(f.destination.clone()),
        arrival_time: Set(f.arrival_time),
        fare: Set(f.fare.clone()),
        duration: Set(f.duration.clone()),
        created_at: Set(f.created_at),
        updated_at: Set(f.updated_at),
    }
}

fn condition(filter: &SearchFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(name) = &filter.name {
        cond = cond.add(Column::Name.eq(name.as_str()));
    }
    if let Some(departure) = &filter.departure {
        cond = cond.add(Column::Departure.eq(departure.as_str()));
    }
    if let Some(destination) = &filter.destination {
        cond = cond.add(Column::Destination.eq(destination.as_str()));
    }
    if let Some((start, end)) = filter.departure_window() {
        cond = cond.add(Column::DepartureTime.gte(start)).add(Column::DepartureTime.lt(end));
    }
    cond
}

#[async_trait::async_trait]
impl FlightStore for SeaOrmFlightStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<Flight>, StoreError> {
        let res = Entity::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(res.map(Flight::from))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(Entity::find().count(&self.db).await?)
    }

    async fn query(&self, filter: &SearchFilter, offset: u64, limit: u64) -> Result<Vec<Flight>, StoreError> {
        let rows = Entity::find()
            .filter(condition(filter))
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Flight::from).collect())
    }

    async fn insert(&self, flight: &Flight) -> Result<(), StoreError> {
        active(flight).insert(&self.db).await?;
        Ok(())
    }

    async fn update(&self, flight: &Flight) -> Result<(), StoreError> {
        let mut am = active(flight);
        // creation time is immutable
        am.created_at = sea_orm::ActiveValue::NotSet;
        am.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, flight: &Flight) -> Result<(), StoreError> {
        Entity::delete_by_id(flight.id.clone()).exec(&self.db).await?;
        Ok(())
    }
}
