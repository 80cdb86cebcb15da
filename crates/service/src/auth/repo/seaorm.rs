use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::auth::domain::{Identity, User};
use crate::auth::repository::UserStore;
use crate::errors::StoreError;

pub struct SeaOrmUserStore {
    pub db: DatabaseConnection,
}

fn to_domain(m: models::user::Model) -> User {
    User { identity: Identity::new(m.id, m.name), email: m.email, password_hash: m.password }
}

#[async_trait::async_trait]
impl UserStore for SeaOrmUserStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let res = models::user::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(res.map(to_domain))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let res = models::user::Entity::find()
            .filter(models::user::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(res.map(to_domain))
    }

    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let am = models::user::ActiveModel {
            id: Set(user.id().to_string()),
            name: Set(user.name().to_string()),
            email: Set(user.email),
            password: Set(user.password_hash),
        };
        am.insert(&self.db).await?;
        Ok(())
    }
}
