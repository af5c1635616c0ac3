use crate::{config::Config, data_seeder, database::Database, error::AppResult};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub async fn new(config: &Config) -> AppResult<Self> {
        let db = Database::connect(&config.database).await?;
        db.init().await?;

        if config.seed_sample_data {
            data_seeder::seed_sample_data(&db).await?;
        }

        Ok(Self { db })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }
}
