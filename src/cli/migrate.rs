use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open_with_size(&config.database.path, config.database.pool_size)?;

    db.migrate()?;

    for (version, applied_at) in db.migration_status()? {
        match applied_at {
            Some(ts) => tracing::info!("Migration {:03} applied at {}", version, ts),
            None => tracing::warn!("Migration {:03} pending", version),
        }
    }
    tracing::info!("Migrations complete");

    Ok(())
}
