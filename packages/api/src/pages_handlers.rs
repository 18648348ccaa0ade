// ABOUTME: HTTP request handlers for chapter pages
// ABOUTME: Serves known pages as HTML and answers `404!` for anything else

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::ApiResult;
use crate::pages::INDEX_PAGE;
use crate::state::AppState;

pub async fn route_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<Response> {
    render(&state, &page).await
}

pub async fn route_index(State(state): State<AppState>) -> ApiResult<Response> {
    render(&state, INDEX_PAGE).await
}

async fn render(state: &AppState, page: &str) -> ApiResult<Response> {
    match state.pages.render(page).await? {
        Some(html) => Ok(Html(html).into_response()),
        None => Ok((StatusCode::NOT_FOUND, "404!").into_response()),
    }
}
