#[cfg(test)]
mod tests {

    mod slug_tests {
        use crate::services::slug::{generate_slug, validate_slug, validate_tag_slug};

        #[test]
        fn test_generate_slug_basic() {
            assert_eq!(generate_slug("Hello World"), "hello-world");
        }

        #[test]
        fn test_generate_slug_special_characters() {
            assert_eq!(generate_slug("Hello, World!"), "hello-world");
        }

        #[test]
        fn test_generate_slug_unicode() {
            assert_eq!(generate_slug("Café au lait"), "cafe-au-lait");
        }

        #[test]
        fn test_generate_slug_leading_trailing_spaces() {
            assert_eq!(generate_slug("  Hello World  "), "hello-world");
        }

        #[test]
        fn test_validate_slug_valid() {
            assert!(validate_slug("hello-world"));
            assert!(validate_slug("my-blog-post-2024"));
            assert!(validate_slug("a"));
        }

        #[test]
        fn test_validate_slug_invalid() {
            assert!(!validate_slug(""));
            assert!(!validate_slug("Hello-World"));
            assert!(!validate_slug("hello_world"));
            assert!(!validate_slug("hello world"));
        }

        #[test]
        fn test_validate_slug_length_limits() {
            assert!(validate_slug(&"a".repeat(200)));
            assert!(!validate_slug(&"a".repeat(201)));
            assert!(validate_tag_slug(&"a".repeat(50)));
            assert!(!validate_tag_slug(&"a".repeat(51)));
        }
    }

    mod markdown_tests {
        use crate::services::markdown::MarkdownRenderer;

        #[test]
        fn test_render_heading_and_highlighted_python() {
            let renderer = MarkdownRenderer::new();
            let html = renderer.render("# Title\n\n```python\nprint(1)\n```");
            assert!(html.contains("<h1>Title</h1>"), "{}", html);
            assert!(html.contains(r#"<pre class="code-block">"#), "{}", html);
            assert!(html.contains("language-python"), "{}", html);
            assert!(html.contains("<span style="), "{}", html);
            assert!(html.contains("print"), "{}", html);
        }

        #[test]
        fn test_render_paragraph() {
            let renderer = MarkdownRenderer::new();
            let html = renderer.render("This is a paragraph.");
            assert!(html.contains("<p>This is a paragraph.</p>"));
        }

        #[test]
        fn test_render_links_get_rel() {
            let renderer = MarkdownRenderer::new();
            let html = renderer.render("[Link](https://example.com)");
            assert!(html.contains("href=\"https://example.com\""));
            assert!(html.contains("noopener noreferrer"));
        }

        #[test]
        fn test_render_table() {
            let renderer = MarkdownRenderer::new();
            let html = renderer.render("| A | B |\n|---|---|\n| 1 | 2 |");
            assert!(html.contains("<table>"));
            assert!(html.contains("<th>"));
            assert!(html.contains("<td>"));
        }

        #[test]
        fn test_render_unknown_language_still_in_code_block() {
            let renderer = MarkdownRenderer::new();
            let html = renderer.render("```nosuchlang\na < b\n```");
            assert!(html.contains(r#"<pre class="code-block">"#), "{}", html);
            assert!(html.contains("a &lt; b"), "{}", html);
        }

        #[test]
        fn test_render_strips_script() {
            let renderer = MarkdownRenderer::new();
            let html = renderer.render("Hi <script>alert(1)</script>");
            assert!(!html.contains("<script>"));
        }

        #[test]
        fn test_render_malformed_is_best_effort() {
            let renderer = MarkdownRenderer::new();
            let html = renderer.render("```rust\nfn unterminated() {\n\n| broken | table\n**bold");
            assert!(html.contains("code-block"), "{}", html);
        }

        #[test]
        fn test_render_is_repeatable() {
            let renderer = MarkdownRenderer::new();
            let source = "## Notes\n\n```rust\nlet x = 5;\n```\n";
            assert_eq!(renderer.render(source), renderer.render(source));
        }

        #[test]
        fn test_excerpt_short_text() {
            let renderer = MarkdownRenderer::new();
            assert_eq!(renderer.excerpt("Short text", 100), "Short text");
        }

        #[test]
        fn test_excerpt_truncation() {
            let renderer = MarkdownRenderer::new();
            let long_text = "This is a very long text that needs to be truncated because it exceeds the maximum length allowed for an excerpt.";
            let excerpt = renderer.excerpt(long_text, 30);
            assert!(excerpt.len() < long_text.len());
            assert!(excerpt.ends_with("..."));
        }

        #[test]
        fn test_excerpt_skips_headings_and_code() {
            let renderer = MarkdownRenderer::new();
            let text = "# Header\n```python\nsecret_code()\n```\nActual **content**";
            let excerpt = renderer.excerpt(text, 100);
            assert_eq!(excerpt, "Actual content");
        }

        #[test]
        fn test_reading_time() {
            let renderer = MarkdownRenderer::new();
            assert_eq!(renderer.reading_time("Hello world"), 1);
            assert_eq!(renderer.reading_time(&"word ".repeat(400)), 2);
        }
    }

    mod status_tests {
        use crate::models::PostStatus;
        use std::str::FromStr;

        #[test]
        fn test_status_predicates() {
            assert!(!PostStatus::Draft.is_published());
            assert!(!PostStatus::Draft.is_project());

            assert!(PostStatus::PublishedPost.is_published());
            assert!(!PostStatus::PublishedPost.is_project());

            assert!(PostStatus::PublishedProject.is_published());
            assert!(PostStatus::PublishedProject.is_project());
            assert!(!PostStatus::PublishedProject.is_pinned());

            assert!(PostStatus::PinnedProject.is_published());
            assert!(PostStatus::PinnedProject.is_project());
            assert!(PostStatus::PinnedProject.is_pinned());
        }

        #[test]
        fn test_pinned_implies_published_project() {
            for status in PostStatus::ALL {
                if status.is_pinned() {
                    assert!(status.is_project() && status.is_published());
                }
            }
        }

        #[test]
        fn test_status_from_str() {
            assert_eq!(PostStatus::from_str("draft").unwrap(), PostStatus::Draft);
            assert_eq!(PostStatus::from_str("Published-Post").unwrap(), PostStatus::PublishedPost);
            assert_eq!(PostStatus::from_str("project").unwrap(), PostStatus::PublishedProject);
            assert_eq!(PostStatus::from_str("pinned").unwrap(), PostStatus::PinnedProject);
            assert!(PostStatus::from_str("").is_err());
        }

        #[test]
        fn test_status_display_matches_storage() {
            for status in PostStatus::ALL {
                assert_eq!(PostStatus::from_str(&status.to_string()).unwrap(), status);
            }
            assert_eq!(PostStatus::PinnedProject.to_string(), "pinned_project");
        }

        #[test]
        fn test_status_default_is_draft() {
            assert_eq!(PostStatus::default(), PostStatus::Draft);
        }
    }
}
