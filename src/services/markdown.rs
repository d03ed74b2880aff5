use ammonia::Builder;
use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

const HIGHLIGHT_THEME: &str = "base16-ocean.dark";

/// Markdown to sanitized HTML with fenced, syntax-highlighted code blocks and
/// tables. Rendering is pure; output is never stored.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    /// `language-*` classes for every token syntect resolves.
    language_classes: Vec<String>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();

        let mut language_classes: Vec<String> = syntax_set
            .syntaxes()
            .iter()
            .flat_map(|syntax| {
                syntax
                    .file_extensions
                    .iter()
                    .map(|ext| ext.to_lowercase())
                    .chain(std::iter::once(syntax.name.to_lowercase()))
            })
            .filter(|token| !token.is_empty() && !token.contains(char::is_whitespace))
            .map(|token| format!("language-{}", token))
            .collect();
        language_classes.sort();
        language_classes.dedup();

        Self {
            syntax_set,
            theme_set: ThemeSet::load_defaults(),
            language_classes,
        }
    }

    fn sanitizer(&self) -> Builder<'_> {
        let mut tags = Builder::default().clone_tags();
        tags.insert("pre");
        tags.insert("code");
        tags.insert("span");
        tags.insert("table");
        tags.insert("thead");
        tags.insert("tbody");
        tags.insert("tr");
        tags.insert("th");
        tags.insert("td");
        tags.insert("del");

        let mut attrs = Builder::default().clone_tag_attributes();
        attrs.insert("span", ["style"].iter().cloned().collect());
        attrs.insert("th", ["style"].iter().cloned().collect());
        attrs.insert("td", ["style"].iter().cloned().collect());

        let mut sanitizer = Builder::default();
        sanitizer
            .tags(tags)
            .tag_attributes(attrs)
            .add_allowed_classes("code", self.language_classes.iter().map(String::as_str))
            .add_allowed_classes("pre", ["code-block"])
            .link_rel(Some("noopener noreferrer"));
        sanitizer
    }

    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;

        let parser = Parser::new_ext(markdown, options);
        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split(|c: char| c.is_whitespace() || c == ',')
                            .next()
                            .unwrap_or("")
                            .to_lowercase(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let highlighted = self.highlight_code(&code_content, &code_lang);
                    events.push(Event::Html(highlighted.into()));
                }
                Event::Text(text) if in_code_block => {
                    code_content.push_str(&text);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        self.sanitizer().clean(&html_output).to_string()
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let resolved = if lang.is_empty() {
            None
        } else {
            self.syntax_set.find_syntax_by_token(lang)
        };
        let syntax = resolved.unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let code_open = match resolved {
            Some(_) => format!(r#"<code class="language-{}">"#, html_escape(lang)),
            None => "<code>".to_string(),
        };

        match self.theme_set.themes.get(HIGHLIGHT_THEME).map(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
        }) {
            Some(Ok(html)) => format!(
                r#"<pre class="code-block">{}{}</code></pre>"#,
                code_open,
                strip_pre_wrapper(&html)
            ),
            _ => format!(
                r#"<pre class="code-block">{}{}</code></pre>"#,
                code_open,
                html_escape(code)
            ),
        }
    }

    /// Plain-text summary for list pages, cut at a word boundary.
    pub fn excerpt(&self, markdown: &str, max_len: usize) -> String {
        let mut in_fence = false;
        let text: String = markdown
            .lines()
            .filter(|line| {
                let trimmed = line.trim_start();
                if trimmed.starts_with("```") {
                    in_fence = !in_fence;
                    return false;
                }
                !in_fence && !trimmed.starts_with('#') && !trimmed.is_empty()
            })
            .collect::<Vec<_>>()
            .join(" ");

        let text = strip_markdown(&text);

        let char_count = text.chars().count();
        if char_count <= max_len {
            text
        } else {
            let truncated: String = text.chars().take(max_len).collect();
            let last_space_pos = truncated
                .char_indices()
                .rev()
                .find(|(_, c)| *c == ' ')
                .map(|(i, _)| i);

            if let Some(pos) = last_space_pos {
                format!("{}...", &truncated[..pos])
            } else {
                format!("{}...", truncated)
            }
        }
    }

    /// Estimated reading time in minutes at 200 words per minute, minimum 1.
    pub fn reading_time(&self, markdown: &str) -> u32 {
        let word_count = markdown
            .split_whitespace()
            .filter(|word| !word.starts_with('#') && !word.starts_with("```"))
            .count();

        ((word_count as f64 / 200.0).ceil() as u32).max(1)
    }
}

/// syntect wraps its output in `<pre style="...">`; the caller supplies its own.
fn strip_pre_wrapper(html: &str) -> &str {
    let trimmed = html.trim();
    let Some(rest) = trimmed.strip_prefix("<pre") else {
        return trimmed;
    };
    let Some(open_end) = rest.find('>') else {
        return trimmed;
    };
    let inner = &rest[open_end + 1..];
    inner
        .strip_suffix("</pre>")
        .unwrap_or(inner)
        .trim_matches('\n')
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn strip_markdown(text: &str) -> String {
    let mut result = text.to_string();

    // Images ![alt](url) go entirely; must run before link stripping.
    while let Some(img_start) = result.find("![") {
        let Some(bracket_end) = result[img_start + 2..].find("](") else {
            break;
        };
        let abs_bracket_end = img_start + 2 + bracket_end;
        let Some(paren_end) = result[abs_bracket_end + 2..].find(')') else {
            break;
        };
        result = format!(
            "{}{}",
            &result[..img_start],
            &result[abs_bracket_end + 3 + paren_end..]
        );
    }

    // [text](url) -> text
    while let Some(bracket_start) = result.find('[') {
        let Some(bracket_end) = result[bracket_start..].find("](") else {
            break;
        };
        let abs_bracket_end = bracket_start + bracket_end;
        let Some(paren_end) = result[abs_bracket_end + 2..].find(')') else {
            break;
        };
        let link_text = result[bracket_start + 1..abs_bracket_end].to_string();
        result = format!(
            "{}{}{}",
            &result[..bracket_start],
            link_text,
            &result[abs_bracket_end + 3 + paren_end..]
        );
    }

    result = result.replace('`', "");
    result = result.replace("***", "");
    result = result.replace("**", "");
    result = result.replace("__", "");
    result = result.replace('*', "");
    result = result.replace("~~", "");

    while result.contains("  ") {
        result = result.replace("  ", " ");
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_pre_wrapper() {
        let html = "<pre style=\"background-color:#2b303b;\">\n<span>x</span>\n</pre>\n";
        assert_eq!(strip_pre_wrapper(html), "<span>x</span>");
    }

    #[test]
    fn test_strip_markdown_links_and_images() {
        assert_eq!(
            strip_markdown("See [the docs](https://example.com) ![logo](logo.png) now"),
            "See the docs now"
        );
    }

    #[test]
    fn test_indented_code_block_has_no_language_class() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("    let x = 1;\n");
        assert!(html.contains(r#"<pre class="code-block"><code>"#), "{}", html);
    }

    #[test]
    fn test_language_class_kept_for_any_known_syntax() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```py\nx = 1\n```\n\n```haskell\nmain = pure ()\n```");
        assert!(html.contains(r#"<code class="language-py">"#), "{}", html);
        assert!(html.contains(r#"<code class="language-haskell">"#), "{}", html);
        assert!(!html.contains(r#"class="""#), "{}", html);
    }

    #[test]
    fn test_unknown_language_gets_bare_code_tag() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```nosuchlang\nx\n```");
        assert!(html.contains(r#"<pre class="code-block"><code>"#), "{}", html);
    }

    #[test]
    fn test_fence_info_string_takes_first_word() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust,ignore\nfn main() {}\n```");
        assert!(html.contains("language-rust"), "{}", html);
    }
}
