use anyhow::{bail, Result};
use std::path::PathBuf;

pub async fn run(path: PathBuf, name: Option<String>) -> Result<()> {
    let site_name = name.unwrap_or_else(|| "My Site".to_string());
    let config_path = path.join("folio.toml");

    if config_path.exists() {
        bail!("{} already exists", config_path.display());
    }

    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(path.join("data"))?;
    std::fs::create_dir_all(path.join("data/media/projects"))?;

    std::fs::write(&config_path, default_config(&site_name))?;

    tracing::info!("Created new site at {:?}", path);
    tracing::info!("Run 'folio migrate' to set up the database");
    tracing::info!("Run 'folio serve' to start the server");

    Ok(())
}

pub fn default_config(site_name: &str) -> String {
    format!(
        r#"[site]
title = {title}
description = "Notes and projects"
author = "Anonymous"
language = "en"

[server]
host = "127.0.0.1"
port = 3000

[database]
path = "./data/folio.db"

[media]
upload_dir = "./data/media"
"#,
        title = toml::Value::String(site_name.to_string())
    )
}
