pub mod init;
pub mod migrate;
pub mod post;
pub mod serve;
pub mod tag;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A small personal blog and project portfolio", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "folio.toml", env = "FOLIO_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new site directory with a default config
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Apply pending migrations and start the web server
    Serve {
        /// Overrides server.host from the config
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Overrides server.port from the config
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Manage posts and projects
    Post {
        #[command(subcommand)]
        command: PostCommand,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
}

#[derive(Subcommand)]
pub enum PostCommand {
    /// Create a post. Content is read from --file, or left empty.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: Option<String>,
        #[command(flatten)]
        fields: PostFields,
    },
    /// Change an existing post; unspecified fields keep their values
    Edit {
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        new_slug: Option<String>,
        #[command(flatten)]
        fields: PostFields,
        /// Unschedule the post (published_at becomes empty)
        #[arg(long, conflicts_with = "published_at")]
        clear_published_at: bool,
        /// Remove all tags
        #[arg(long, conflicts_with = "tag")]
        clear_tags: bool,
        /// Remove the project image
        #[arg(long, conflicts_with = "image")]
        clear_image: bool,
    },
    /// List posts across all statuses
    List {
        /// draft, published-post, published-project or pinned-project
        #[arg(long)]
        status: Option<String>,
        /// Only published projects
        #[arg(long)]
        projects: bool,
        /// Only posts carrying this tag slug
        #[arg(long)]
        tag: Option<String>,
        /// Case-insensitive match on title or content
        #[arg(long)]
        search: Option<String>,
    },
    /// Delete a post and its project image
    Remove { slug: String },
}

#[derive(Args)]
pub struct PostFields {
    /// Markdown file holding the post body
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// draft, published-post, published-project or pinned-project
    #[arg(long)]
    pub status: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD
    #[arg(long)]
    pub published_at: Option<String>,
    /// Tag name; repeat for several. Replaces the existing set on edit.
    #[arg(long)]
    pub tag: Vec<String>,
    /// Image file for a project card
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum TagCommand {
    Add {
        name: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Rename a tag or change its slug
    Edit {
        slug: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        new_slug: Option<String>,
    },
    /// List tags with their published post counts
    List,
    Remove {
        slug: String,
    },
}
