use slug::slugify;

pub const MAX_POST_SLUG_LEN: usize = 200;
pub const MAX_TAG_SLUG_LEN: usize = 50;

pub fn generate_slug(title: &str) -> String {
    slugify(title)
}

/// Post slugs: 1-200 characters of lowercase ASCII letters, digits and hyphens.
pub fn validate_slug(slug: &str) -> bool {
    is_valid(slug, MAX_POST_SLUG_LEN)
}

pub fn validate_tag_slug(slug: &str) -> bool {
    is_valid(slug, MAX_TAG_SLUG_LEN)
}

fn is_valid(slug: &str, max_len: usize) -> bool {
    if slug.is_empty() || slug.len() > max_len {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
