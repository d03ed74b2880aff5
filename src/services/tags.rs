use crate::models::{Tag, TagWithCount};
use crate::services::slug::{generate_slug, validate_tag_slug, MAX_TAG_SLUG_LEN};
use crate::Database;
use anyhow::{bail, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use std::collections::HashMap;

fn row_to_tag(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn resolve_slug(name: &str, slug: Option<&str>) -> Result<String> {
    let slug = slug
        .map(String::from)
        .unwrap_or_else(|| generate_slug(name));
    if !validate_tag_slug(&slug) {
        bail!(
            "Invalid tag slug '{}': must be 1-50 characters, lowercase letters, numbers, and hyphens only",
            slug
        );
    }
    Ok(slug)
}

pub fn create_tag(db: &Database, name: &str, slug: Option<&str>) -> Result<i64> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Tag name must not be empty");
    }
    let slug = resolve_slug(name, slug)?;
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO tags (name, slug) VALUES (?, ?)",
        (name, &slug),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_tag_by_slug(db: &Database, slug: &str) -> Result<Option<Tag>> {
    let conn = db.get()?;
    let tag = conn
        .query_row(
            "SELECT id, name, slug, created_at FROM tags WHERE slug = ?",
            [slug],
            row_to_tag,
        )
        .optional()?;
    Ok(tag)
}

pub fn list_tags(db: &Database) -> Result<Vec<Tag>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare("SELECT id, name, slug, created_at FROM tags ORDER BY name")?;
    let tags = stmt
        .query_map([], row_to_tag)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

/// Tags with the number of published posts and projects carrying them.
pub fn list_tags_with_counts(db: &Database) -> Result<Vec<TagWithCount>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        r#"
        SELECT t.id, t.name, t.slug, t.created_at, COUNT(p.id) as count
        FROM tags t
        LEFT JOIN post_tags pt ON t.id = pt.tag_id
        LEFT JOIN posts p ON pt.post_id = p.id AND p.status != 'draft'
        GROUP BY t.id
        ORDER BY count DESC, t.name
        "#,
    )?;
    let tags = stmt
        .query_map([], |row| {
            Ok(TagWithCount {
                tag: row_to_tag(row)?,
                count: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub fn update_tag(db: &Database, id: i64, name: &str, slug: Option<&str>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Tag name must not be empty");
    }
    let slug = resolve_slug(name, slug)?;
    let conn = db.get()?;
    let affected = conn.execute(
        "UPDATE tags SET name = ?, slug = ? WHERE id = ?",
        (name, &slug, id),
    )?;
    if affected == 0 {
        bail!("Tag {} not found", id);
    }
    Ok(())
}

/// Deletes the tag. Its post associations go with it; posts are untouched.
pub fn delete_tag(db: &Database, id: i64) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM tags WHERE id = ?", [id])?;
    Ok(())
}

/// Replaces the tag set of a post. Each entry is matched against tag names
/// first, then slugs; anything unmatched becomes a new tag.
pub(crate) fn set_post_tags(conn: &Connection, post_id: i64, names: &[String]) -> Result<()> {
    conn.execute("DELETE FROM post_tags WHERE post_id = ?", [post_id])?;

    let mut tag_ids: Vec<i64> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let tag_id = match find_tag_id(conn, name)? {
            Some(id) => id,
            None => insert_tag(conn, name)?,
        };
        if !tag_ids.contains(&tag_id) {
            tag_ids.push(tag_id);
        }
    }

    for tag_id in tag_ids {
        conn.execute(
            "INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)",
            (post_id, tag_id),
        )?;
    }

    Ok(())
}

fn find_tag_id(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let by_name = conn
        .query_row("SELECT id FROM tags WHERE name = ?", [name], |row| row.get(0))
        .optional()?;
    if by_name.is_some() {
        return Ok(by_name);
    }
    let by_slug = conn
        .query_row("SELECT id FROM tags WHERE slug = ?", [name], |row| row.get(0))
        .optional()?;
    Ok(by_slug)
}

/// Creates a tag for an unmatched name. A generated slug already held by
/// another tag gets a numeric suffix, so "C" and "C++" stay distinct.
fn insert_tag(conn: &Connection, name: &str) -> Result<i64> {
    let base = resolve_slug(name, None)?;
    let mut slug = base.clone();
    let mut n = 2;
    while slug_taken(conn, &slug)? {
        let suffix = format!("-{}", n);
        let keep = base.len().min(MAX_TAG_SLUG_LEN - suffix.len());
        slug = format!("{}{}", base[..keep].trim_end_matches('-'), suffix);
        n += 1;
    }

    conn.execute("INSERT INTO tags (name, slug) VALUES (?, ?)", (name, &slug))?;
    Ok(conn.last_insert_rowid())
}

fn slug_taken(conn: &Connection, slug: &str) -> Result<bool> {
    let taken = conn
        .query_row("SELECT 1 FROM tags WHERE slug = ?", [slug], |_| Ok(()))
        .optional()?
        .is_some();
    Ok(taken)
}

/// Loads tags for a batch of posts with a single query.
pub(crate) fn tags_for_posts(conn: &Connection, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>> {
    let mut tags_by_post: HashMap<i64, Vec<Tag>> = HashMap::new();
    if post_ids.is_empty() {
        return Ok(tags_by_post);
    }

    let placeholders: String = post_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!(
        "SELECT pt.post_id, t.id, t.name, t.slug, t.created_at
         FROM tags t
         JOIN post_tags pt ON t.id = pt.tag_id
         WHERE pt.post_id IN ({})
         ORDER BY t.name",
        placeholders
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(post_ids.iter()), |row| {
        Ok((
            row.get::<_, i64>(0)?,
            Tag {
                id: row.get(1)?,
                name: row.get(2)?,
                slug: row.get(3)?,
                created_at: row.get(4)?,
            },
        ))
    })?;

    for row in rows {
        let (post_id, tag) = row?;
        tags_by_post.entry(post_id).or_default().push(tag);
    }

    Ok(tags_by_post)
}
