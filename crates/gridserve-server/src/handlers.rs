//! Request handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use gridserve_core::{Error, GridQuery, PageData, Result};

use crate::server::AppState;

/// `GET /grid`: resolves the query into a layout and renders the page.
pub async fn grid(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let layout = GridQuery::from_pairs(params).resolve(&state.config.layout);

    tracing::debug!(
        kind = layout.kind(),
        rows = layout.rows(),
        cols = layout.cols(),
        "Grid request"
    );

    let page = PageData::new(layout.build());
    match render_page(&state, &page).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_response(&state, &e),
    }
}

async fn render_page(state: &AppState, page: &PageData) -> Result<String> {
    let template = state.template.resolve().await?;
    template.render(page)
}

fn error_response(state: &AppState, err: &Error) -> Response {
    tracing::error!(
        error = %err,
        template = %state.template.path().display(),
        template_error = err.is_template_error(),
        "Failed to render grid page"
    );
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}
