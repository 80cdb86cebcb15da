#![cfg(test)]
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Schema};
use tokio::sync::OnceCell;

// Ensure tables are created only once across the entire test process
static SCHEMA_READY: OnceCell<bool> = OnceCell::const_new();

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), sea_orm::DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Connection for store tests, or `None` when `SKIP_DB_TESTS` is set or the
/// database at `DATABASE_URL` is unreachable.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let db = match models::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(None);
        }
    };

    let ready = *SCHEMA_READY
        .get_or_init(|| async {
            let res = async {
                create_table(&db, models::user::Entity).await?;
                create_table(&db, models::flight::Entity).await
            }
            .await;
            match res {
                Ok(()) => true,
                Err(e) => {
                    eprintln!("skip: cannot create tables: {}", e);
                    false
                }
            }
        })
        .await;

    Ok(if ready { Some(db) } else { None })
}
