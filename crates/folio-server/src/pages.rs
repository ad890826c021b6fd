//! HTML page handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use folio_content::{categories, posts_in_category};
use folio_static::{CategoryLink, PostCard};

use crate::api::AppError;
use crate::server::AppState;

/// Home page listing every post.
pub(crate) async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let posts = state.repository.list_posts()?;
    let cards: Vec<PostCard> = posts
        .iter()
        .map(|p| PostCard::new(p, &state.site))
        .collect();
    let links = category_links(&state, &categories(&posts));

    let html = state.templates.render_index(&state.site, None, &cards, &links)?;
    Ok(Html(html))
}

/// A single post, or the not-found page.
pub(crate) async fn post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let Some(post) = state.repository.get_post(&slug)? else {
        return not_found_page(&state);
    };

    let rendered = state.renderer.render(&post.content);
    let html = state.templates.render_post(&state.site, &post, &rendered)?;

    Ok(Html(html).into_response())
}

/// Posts in one category, matched by slug.
pub(crate) async fn category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Response, AppError> {
    let posts = state.repository.list_posts()?;
    let matching = posts_in_category(&posts, &category);

    // Show the category as written in the posts rather than the URL slug
    let Some(name) = matching.first().and_then(|p| p.category.clone()) else {
        return not_found_page(&state);
    };

    let cards: Vec<PostCard> = matching
        .into_iter()
        .map(|p| PostCard::new(p, &state.site))
        .collect();
    let links = category_links(&state, &categories(&posts));

    let html = state
        .templates
        .render_index(&state.site, Some(&name), &cards, &links)?;

    Ok(Html(html).into_response())
}

/// Fallback for unmatched routes.
pub(crate) async fn not_found(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    not_found_page(&state)
}

fn not_found_page(state: &AppState) -> Result<Response, AppError> {
    let html = state.templates.render_not_found(&state.site)?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

fn category_links(state: &AppState, names: &[String]) -> Vec<CategoryLink> {
    names
        .iter()
        .map(|name| CategoryLink::new(name, &state.site))
        .collect()
}
