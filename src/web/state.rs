use crate::services::markdown::MarkdownRenderer;
use crate::{Config, Database};
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use tera::{Tera, Value};

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub templates: Tera,
    pub markdown: MarkdownRenderer,
    pub media_dir: PathBuf,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let mut templates = Tera::default();

        templates.register_filter("format_date", format_date_filter);
        templates.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html")),
            ("404.html", include_str!("../../templates/404.html")),
            ("core/home.html", include_str!("../../templates/core/home.html")),
            ("blog/index.html", include_str!("../../templates/blog/index.html")),
            ("blog/post.html", include_str!("../../templates/blog/post.html")),
            ("blog/projects.html", include_str!("../../templates/blog/projects.html")),
            (
                "partials/blog/_post_list.html",
                include_str!("../../templates/partials/blog/_post_list.html"),
            ),
            (
                "partials/blog/_project_card.html",
                include_str!("../../templates/partials/blog/_project_card.html"),
            ),
        ])?;

        let media_dir = PathBuf::from(&config.media.upload_dir);

        Ok(Self {
            config,
            db,
            templates,
            markdown: MarkdownRenderer::new(),
            media_dir,
        })
    }
}

fn format_date_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let date_str = match value {
        Value::Null => return Ok(Value::String(String::new())),
        Value::String(s) => s,
        _ => return Err(tera::Error::msg("format_date requires a string")),
    };

    let format = args
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("%B %d, %Y");

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(Value::String(dt.format(format).to_string()));
    }

    Ok(Value::String(date_str.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_rfc3339() {
        let out = format_date_filter(
            &Value::String("2024-03-05T10:00:00.000Z".into()),
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(out, Value::String("March 05, 2024".into()));
    }

    #[test]
    fn test_format_date_custom_format() {
        let mut args = HashMap::new();
        args.insert("format".to_string(), Value::String("%Y-%m-%d".into()));
        let out = format_date_filter(&Value::String("2024-03-05T10:00:00Z".into()), &args).unwrap();
        assert_eq!(out, Value::String("2024-03-05".into()));
    }

    #[test]
    fn test_format_date_null_is_empty() {
        let out = format_date_filter(&Value::Null, &HashMap::new()).unwrap();
        assert_eq!(out, Value::String(String::new()));
    }
}
