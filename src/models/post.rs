use super::Tag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Publication state of a post. Replaces independent published/project/pinned
/// flags so that a pinned draft cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    PublishedPost,
    PublishedProject,
    PinnedProject,
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        Self::Draft,
        Self::PublishedPost,
        Self::PublishedProject,
        Self::PinnedProject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PublishedPost => "published_post",
            Self::PublishedProject => "published_project",
            Self::PinnedProject => "pinned_project",
        }
    }

    pub fn is_published(&self) -> bool {
        !matches!(self, Self::Draft)
    }

    pub fn is_project(&self) -> bool {
        matches!(self, Self::PublishedProject | Self::PinnedProject)
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, Self::PinnedProject)
    }
}

impl FromStr for PostStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "draft" => Ok(Self::Draft),
            "published_post" | "published" | "post" => Ok(Self::PublishedPost),
            "published_project" | "project" => Ok(Self::PublishedProject),
            "pinned_project" | "pinned" => Ok(Self::PinnedProject),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    /// Markdown source. HTML is rendered on read and never stored.
    pub content: String,
    pub status: PostStatus,
    pub published_at: Option<String>,
    pub edited_at: String,
    pub image: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostWithTags {
    #[serde(flatten)]
    pub post: Post,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Default)]
pub struct CreatePost {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub image: Option<String>,
}

/// Partial update. `None` leaves a field unchanged; the nested options on
/// `published_at` and `image` distinguish "keep" from "clear".
#[derive(Debug, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub status: Option<PostStatus>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
    pub image: Option<Option<String>>,
}

/// Operator-side listing filter.
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub projects_only: bool,
    pub tag: Option<String>,
    pub search: Option<String>,
}
