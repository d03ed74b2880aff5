use super::{PostCommand, PostFields};
use crate::models::{CreatePost, PostFilter, PostStatus, UpdatePost};
use crate::services::{media, posts};
use crate::{Config, Database};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;

pub async fn run(config_path: &Path, command: PostCommand) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open_with_size(&config.database.path, config.database.pool_size)?;
    db.migrate()?;
    let upload_dir = Path::new(&config.media.upload_dir);

    match command {
        PostCommand::Add {
            title,
            slug,
            fields,
        } => {
            let status = fields
                .status
                .as_deref()
                .map(parse_status)
                .transpose()?
                .unwrap_or_default();
            let content = match &fields.file {
                Some(path) => read_markdown(path)?,
                None => String::new(),
            };
            let published_at = fields
                .published_at
                .as_deref()
                .map(parse_published_at)
                .transpose()?;
            let image = fields
                .image
                .as_deref()
                .map(|p| media::import_project_image(upload_dir, p))
                .transpose()?;

            let stored = image.clone();
            let id = posts::create_post(
                &db,
                CreatePost {
                    title,
                    slug,
                    content,
                    status,
                    published_at,
                    tags: fields.tag,
                    image,
                },
            )
            .map_err(|e| {
                discard_image(upload_dir, stored.as_deref());
                e
            })?;
            let post = posts::get_post_by_id(&db, id)?
                .context("post vanished right after insert")?;
            tracing::info!("Post '{}' created as {}", post.post.slug, post.post.status);
        }
        PostCommand::Edit {
            slug,
            title,
            new_slug,
            fields,
            clear_published_at,
            clear_tags,
            clear_image,
        } => {
            let existing = posts::get_post_by_slug(&db, &slug)?
                .with_context(|| format!("Post '{}' not found", slug))?;

            let status = fields.status.as_deref().map(parse_status).transpose()?;
            let content = fields.file.as_deref().map(read_markdown).transpose()?;

            let published_at = if clear_published_at {
                Some(None)
            } else {
                fields
                    .published_at
                    .as_deref()
                    .map(parse_published_at)
                    .transpose()?
                    .map(Some)
            };

            let tags = if clear_tags {
                Some(Vec::new())
            } else if fields.tag.is_empty() {
                None
            } else {
                Some(fields.tag)
            };

            let image = if clear_image {
                Some(None)
            } else {
                fields
                    .image
                    .as_deref()
                    .map(|p| media::import_project_image(upload_dir, p))
                    .transpose()?
                    .map(Some)
            };
            let replaces_image = image.is_some();
            let stored = image.clone().flatten();

            posts::update_post(
                &db,
                existing.post.id,
                UpdatePost {
                    title,
                    slug: new_slug,
                    content,
                    status,
                    published_at,
                    tags,
                    image,
                },
            )
            .map_err(|e| {
                discard_image(upload_dir, stored.as_deref());
                e
            })?;

            if replaces_image {
                if let Some(old) = &existing.post.image {
                    media::remove_project_image(upload_dir, old)?;
                }
            }

            tracing::info!("Post '{}' updated", slug);
        }
        PostCommand::List {
            status,
            projects,
            tag,
            search,
        } => {
            let filter = PostFilter {
                status: status.as_deref().map(parse_status).transpose()?,
                projects_only: projects,
                tag,
                search,
            };
            let list = posts::list_posts(&db, &filter)?;

            println!(
                "{:<40} {:<18} {:<12} {}",
                "SLUG", "STATUS", "PUBLISHED", "TITLE"
            );
            println!("{}", "-".repeat(90));
            for item in list {
                let post = &item.post;
                let published = post
                    .published_at
                    .as_deref()
                    .and_then(|s| s.get(..10))
                    .unwrap_or("-");
                println!(
                    "{:<40} {:<18} {:<12} {}",
                    post.slug, post.status, published, post.title
                );
            }
        }
        PostCommand::Remove { slug } => {
            let Some(existing) = posts::get_post_by_slug(&db, &slug)? else {
                tracing::warn!("Post '{}' not found", slug);
                return Ok(());
            };

            posts::delete_post(&db, existing.post.id)?;
            if let Some(image) = &existing.post.image {
                media::remove_project_image(upload_dir, image)?;
            }
            tracing::info!("Post '{}' removed", slug);
        }
    }

    Ok(())
}

pub fn parse_status(raw: &str) -> Result<PostStatus> {
    raw.parse().map_err(|_| {
        let options: Vec<&str> = PostStatus::ALL.iter().map(|s| s.as_str()).collect();
        anyhow::anyhow!("Invalid status '{}'. Expected one of: {}", raw, options.join(", "))
    })
}

/// Accepts an RFC 3339 timestamp or a bare date (midnight UTC).
pub fn parse_published_at(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    bail!(
        "Invalid published-at '{}': use RFC 3339 (2024-05-01T09:30:00Z) or YYYY-MM-DD",
        raw
    )
}

/// Drops an image stored for a write that did not go through.
fn discard_image(upload_dir: &Path, image: Option<&str>) {
    if let Some(path) = image {
        if let Err(e) = media::remove_project_image(upload_dir, path) {
            tracing::warn!("Could not remove unused image {}: {}", path, e);
        }
    }
}

fn read_markdown(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Could not read content file '{}'", path.display()))
}
