use super::TagCommand;
use crate::services::tags;
use crate::{Config, Database};
use anyhow::{Context, Result};
use std::path::Path;

pub async fn run(config_path: &Path, command: TagCommand) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open_with_size(&config.database.path, config.database.pool_size)?;
    db.migrate()?;

    match command {
        TagCommand::Add { name, slug } => {
            tags::create_tag(&db, &name, slug.as_deref())?;
            tracing::info!("Tag '{}' created", name);
        }
        TagCommand::Edit {
            slug,
            name,
            new_slug,
        } => {
            let tag = tags::get_tag_by_slug(&db, &slug)?
                .with_context(|| format!("Tag '{}' not found", slug))?;
            let name = name.unwrap_or(tag.name);
            let new_slug = new_slug.unwrap_or(tag.slug);
            tags::update_tag(&db, tag.id, &name, Some(&new_slug))?;
            tracing::info!("Tag '{}' updated", new_slug);
        }
        TagCommand::List => {
            let list = tags::list_tags_with_counts(&db)?;

            println!("{:<30} {:<30} {:>6}", "NAME", "SLUG", "POSTS");
            println!("{}", "-".repeat(68));
            for item in list {
                println!(
                    "{:<30} {:<30} {:>6}",
                    item.tag.name, item.tag.slug, item.count
                );
            }
        }
        TagCommand::Remove { slug } => match tags::get_tag_by_slug(&db, &slug)? {
            Some(tag) => {
                tags::delete_tag(&db, tag.id)?;
                tracing::info!("Tag '{}' removed", slug);
            }
            None => tracing::warn!("Tag '{}' not found", slug),
        },
    }

    Ok(())
}
