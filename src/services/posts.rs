use crate::models::{CreatePost, Post, PostFilter, PostStatus, PostWithTags, UpdatePost};
use crate::services::pagination::{Page, Paginator, PAGE_SIZE};
use crate::services::slug::{generate_slug, validate_slug};
use crate::services::tags::{set_post_tags, tags_for_posts};
use crate::Database;
use anyhow::{bail, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Params, Row};

const POST_COLUMNS: &str =
    "p.id, p.title, p.slug, p.content, p.status, p.published_at, p.edited_at, p.image, p.created_at";

// Newest first; unscheduled posts (NULL published_at) go last.
const DEFAULT_ORDER: &str = "ORDER BY p.published_at IS NULL, p.published_at DESC, p.id DESC";

const PROJECT_STATUSES: &str = "('published_project', 'pinned_project')";

/// Stored timestamps share one fixed-width UTC format so they sort as text.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn now() -> String {
    format_timestamp(Utc::now())
}

fn row_to_post(row: &Row) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        content: row.get(3)?,
        status: row.get::<_, String>(4)?.parse().unwrap_or_default(),
        published_at: row.get(5)?,
        edited_at: row.get(6)?,
        image: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn query_posts<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<PostWithTags>> {
    let mut stmt = conn.prepare(sql)?;
    let posts = stmt
        .query_map(params, row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    let mut tags_by_post = tags_for_posts(conn, &ids)?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let tags = tags_by_post.remove(&post.id).unwrap_or_default();
            PostWithTags { post, tags }
        })
        .collect())
}

fn query_one<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Option<PostWithTags>> {
    Ok(query_posts(conn, sql, params)?.into_iter().next())
}

fn resolve_slug(title: &str, slug: Option<String>) -> Result<String> {
    let slug = slug.unwrap_or_else(|| generate_slug(title));
    if !validate_slug(&slug) {
        bail!(
            "Invalid slug '{}': must be 1-200 characters, lowercase letters, numbers, and hyphens only",
            slug
        );
    }
    Ok(slug)
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Title must not be empty");
    }
    if title.chars().count() > 200 {
        bail!("Title must be 200 characters or less");
    }
    Ok(())
}

pub fn create_post(db: &Database, input: CreatePost) -> Result<i64> {
    validate_title(&input.title)?;
    let slug = resolve_slug(&input.title, input.slug)?;

    // Publishing without an explicit date stamps the current time.
    let published_at = match input.published_at {
        Some(dt) => Some(format_timestamp(dt)),
        None if input.status.is_published() => Some(now()),
        None => None,
    };

    let mut conn = db.get()?;
    let tx = conn.transaction()?;
    tx.execute(
        r#"
        INSERT INTO posts (title, slug, content, status, published_at, edited_at, image)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        (
            input.title.trim(),
            &slug,
            &input.content,
            input.status.as_str(),
            &published_at,
            now(),
            &input.image,
        ),
    )?;
    let post_id = tx.last_insert_rowid();
    set_post_tags(&tx, post_id, &input.tags)?;
    tx.commit()?;

    tracing::debug!("Created post {} ({})", post_id, slug);
    Ok(post_id)
}

pub fn update_post(db: &Database, id: i64, input: UpdatePost) -> Result<()> {
    let mut conn = db.get()?;
    let tx = conn.transaction()?;

    let current = tx
        .query_row(
            &format!("SELECT {} FROM posts p WHERE p.id = ?", POST_COLUMNS),
            [id],
            row_to_post,
        )
        .optional()?
        .ok_or_else(|| anyhow::anyhow!("Post {} not found", id))?;

    let title = input.title.unwrap_or(current.title);
    validate_title(&title)?;
    let slug = resolve_slug(&title, Some(input.slug.unwrap_or(current.slug)))?;
    let content = input.content.unwrap_or(current.content);
    let status = input.status.unwrap_or(current.status);
    let image = input.image.unwrap_or(current.image);

    let published_at = match input.published_at {
        Some(explicit) => explicit.map(format_timestamp),
        None if status.is_published() && current.published_at.is_none() => Some(now()),
        None => current.published_at,
    };

    tx.execute(
        r#"
        UPDATE posts
        SET title = ?, slug = ?, content = ?, status = ?, published_at = ?, edited_at = ?, image = ?
        WHERE id = ?
        "#,
        (
            title.trim(),
            &slug,
            &content,
            status.as_str(),
            &published_at,
            now(),
            &image,
            id,
        ),
    )?;

    if let Some(tags) = input.tags {
        set_post_tags(&tx, id, &tags)?;
    }

    tx.commit()?;
    Ok(())
}

/// Returns false when no post had that id.
pub fn delete_post(db: &Database, id: i64) -> Result<bool> {
    let conn = db.get()?;
    let affected = conn.execute("DELETE FROM posts WHERE id = ?", [id])?;
    Ok(affected > 0)
}

pub fn get_post_by_id(db: &Database, id: i64) -> Result<Option<PostWithTags>> {
    let conn = db.get()?;
    query_one(
        &conn,
        &format!("SELECT {} FROM posts p WHERE p.id = ?", POST_COLUMNS),
        [id],
    )
}

/// Operator lookup: matches any status.
pub fn get_post_by_slug(db: &Database, slug: &str) -> Result<Option<PostWithTags>> {
    let conn = db.get()?;
    query_one(
        &conn,
        &format!("SELECT {} FROM posts p WHERE p.slug = ?", POST_COLUMNS),
        [slug],
    )
}

/// Public detail lookup. A draft and a missing slug both yield `None`.
pub fn get_published_post(db: &Database, slug: &str) -> Result<Option<PostWithTags>> {
    let conn = db.get()?;
    query_one(
        &conn,
        &format!(
            "SELECT {} FROM posts p WHERE p.slug = ? AND p.status != 'draft'",
            POST_COLUMNS
        ),
        [slug],
    )
}

/// Published blog entries (not projects), newest first, `PAGE_SIZE` per page.
pub fn list_blog_posts(db: &Database, page: Option<&str>) -> Result<Page<PostWithTags>> {
    let conn = db.get()?;
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM posts WHERE status = 'published_post'",
        [],
        |row| row.get(0),
    )?;

    let paginator = Paginator::new(total as usize, PAGE_SIZE);
    let number = paginator.resolve(page);

    let items = query_posts(
        &conn,
        &format!(
            "SELECT {} FROM posts p WHERE p.status = 'published_post' {} LIMIT ? OFFSET ?",
            POST_COLUMNS, DEFAULT_ORDER
        ),
        (paginator.per_page() as i64, paginator.offset(number) as i64),
    )?;

    Ok(Page::new(items, number, &paginator))
}

/// Every published project, pinned or not, newest first.
pub fn list_projects(db: &Database) -> Result<Vec<PostWithTags>> {
    let conn = db.get()?;
    query_posts(
        &conn,
        &format!(
            "SELECT {} FROM posts p WHERE p.status IN {} {}",
            POST_COLUMNS, PROJECT_STATUSES, DEFAULT_ORDER
        ),
        [],
    )
}

/// Projects featured on the homepage, newest first.
pub fn list_pinned_projects(db: &Database) -> Result<Vec<PostWithTags>> {
    let conn = db.get()?;
    query_posts(
        &conn,
        &format!(
            "SELECT {} FROM posts p WHERE p.status = ? {}",
            POST_COLUMNS, DEFAULT_ORDER
        ),
        [PostStatus::PinnedProject.as_str()],
    )
}

/// Operator listing across all statuses with optional filters and a
/// case-insensitive search over title and content.
pub fn list_posts(db: &Database, filter: &PostFilter) -> Result<Vec<PostWithTags>> {
    let conn = db.get()?;
    let status = filter.status.map(|s| s.as_str());
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    query_posts(
        &conn,
        &format!(
            r#"
            SELECT {} FROM posts p
            WHERE (?1 IS NULL OR p.status = ?1)
              AND (?2 = 0 OR p.status IN {})
              AND (?3 IS NULL OR EXISTS (
                    SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id
                    WHERE pt.post_id = p.id AND t.slug = ?3))
              AND (?4 IS NULL
                   OR instr(lower(p.title), lower(?4)) > 0
                   OR instr(lower(p.content), lower(?4)) > 0)
            {}
            "#,
            POST_COLUMNS, PROJECT_STATUSES, DEFAULT_ORDER
        ),
        (status, filter.projects_only, filter.tag.as_deref(), search),
    )
}

pub fn count_posts(db: &Database, status: Option<PostStatus>) -> Result<i64> {
    let conn = db.get()?;
    let count = conn.query_row(
        "SELECT COUNT(*) FROM posts WHERE (?1 IS NULL OR status = ?1)",
        [status.map(|s| s.as_str())],
        |row| row.get(0),
    )?;
    Ok(count)
}
