//! Survey export and deletion endpoints.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use pollcast_common::AppResult;

use crate::state::AppState;

/// Export a survey's responses as a tab-separated table.
pub async fn export_responses(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tsv = state.survey_service.export_tsv(&name).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        tsv,
    ))
}

/// Delete a survey; blocks, questions, and responses cascade.
pub async fn delete_survey(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<()> {
    state.survey_service.delete(&name).await
}
