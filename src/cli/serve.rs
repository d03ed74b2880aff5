use crate::{web, Config, Database};
use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: &Path, host: Option<&str>, port: Option<u16>) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open_with_size(&config.database.path, config.database.pool_size)?;

    db.migrate()?;

    let host = host.unwrap_or(config.server.host.as_str()).to_string();
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server at http://{}", addr);

    web::serve(config, db, &addr).await?;

    Ok(())
}
