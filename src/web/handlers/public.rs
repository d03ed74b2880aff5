use crate::models::PostWithTags;
use crate::services::posts;
use crate::web::error::AppResult;
use crate::web::extractors::{RenderMode, FRAGMENT_HEADER};
use crate::web::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;

const EXCERPT_LENGTH: usize = 200;

pub const POST_LIST_TEMPLATE: &str = "blog/index.html";
pub const POST_LIST_FRAGMENT_TEMPLATE: &str = "partials/blog/_post_list.html";

fn make_context(state: &AppState) -> Context {
    let mut ctx = Context::new();
    ctx.insert("site", &state.config.site);
    ctx
}

fn not_found(state: &AppState) -> AppResult<Response> {
    let ctx = make_context(state);
    let html = state.templates.render("404.html", &ctx)?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

/// Kept as a raw string so a malformed value falls back to page 1 instead of
/// rejecting the request.
#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

#[derive(Serialize)]
struct PostCard {
    #[serde(flatten)]
    post: PostWithTags,
    excerpt: String,
}

pub async fn home(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let pinned_projects = posts::list_pinned_projects(&state.db)?;

    let mut ctx = make_context(&state);
    ctx.insert("pinned_projects", &pinned_projects);

    let html = state.templates.render("core/home.html", &ctx)?;
    Ok(Html(html))
}

pub async fn post_list(
    State(state): State<Arc<AppState>>,
    mode: RenderMode,
    Query(query): Query<PageQuery>,
) -> AppResult<Response> {
    let page = posts::list_blog_posts(&state.db, query.page.as_deref())?.map(|post| {
        let excerpt = state.markdown.excerpt(&post.post.content, EXCERPT_LENGTH);
        PostCard { post, excerpt }
    });

    let template = match mode {
        RenderMode::Fragment => POST_LIST_FRAGMENT_TEMPLATE,
        RenderMode::Full => POST_LIST_TEMPLATE,
    };

    let mut ctx = make_context(&state);
    ctx.insert("page", &page);

    let html = state.templates.render(template, &ctx)?;
    let mut response = Html(html).into_response();
    // Same URL, two representations.
    response
        .headers_mut()
        .insert(header::VARY, HeaderValue::from_static(FRAGMENT_HEADER));
    Ok(response)
}

pub async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let Some(post) = posts::get_published_post(&state.db, &slug)? else {
        return not_found(&state);
    };

    let content_html = state.markdown.render(&post.post.content);
    let reading_time = state.markdown.reading_time(&post.post.content);

    let mut ctx = make_context(&state);
    ctx.insert("post", &post);
    ctx.insert("content_html", &content_html);
    ctx.insert("reading_time", &reading_time);

    let html = state.templates.render("blog/post.html", &ctx)?;
    Ok(Html(html).into_response())
}

pub async fn project_index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let projects = posts::list_projects(&state.db)?;

    let mut ctx = make_context(&state);
    ctx.insert("projects", &projects);

    let html = state.templates.render("blog/projects.html", &ctx)?;
    Ok(Html(html))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn fallback(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    not_found(&state)
}
