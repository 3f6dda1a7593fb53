//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::{
    api::types::{DocumentRequest, HealthDto, SummarizeRequest},
    nlp::{Analysis, Clause, Entity, Summary},
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

pub async fn healthz(State(state): State<AppState>) -> Json<HealthDto> {
    let models = state.pipeline.models();
    Json(HealthDto {
        status: "ok".into(),
        ner: models.ner.name().into(),
        segmenter: models.segmenter.name().into(),
        summarizer: models.summarizer.name().into(),
    })
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> ApiResult<Analysis> {
    require_non_empty(&request.html, "html")?;
    state
        .pipeline
        .analyze(&request.html)
        .await
        .map(Json)
        .map_err(internal)
}

pub async fn entities(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> ApiResult<Vec<Entity>> {
    require_non_empty(&request.html, "html")?;
    blocking(move || {
        let text = state.pipeline.extract_text(&request.html);
        state.pipeline.extract_entities(&text)
    })
    .await
}

pub async fn clauses(
    State(state): State<AppState>,
    Json(request): Json<DocumentRequest>,
) -> ApiResult<Vec<Clause>> {
    require_non_empty(&request.html, "html")?;
    blocking(move || {
        let text = state.pipeline.extract_text(&request.html);
        state.pipeline.extract_clauses(&text)
    })
    .await
}

pub async fn summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> ApiResult<Summary> {
    let text = request.clause.trim().to_string();
    require_non_empty(&text, "clause")?;
    blocking(move || {
        let clause = Clause {
            index: 0,
            end: text.len(),
            text,
            start: 0,
        };
        state.pipeline.summarize_clause(&clause)
    })
    .await
}

fn require_non_empty(value: &str, field: &str) -> Result<(), (StatusCode, String)> {
    if value.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("`{field}` must not be empty"),
        ));
    }
    Ok(())
}

async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map(Json).map_err(internal),
        Err(err) => Err(internal(anyhow::anyhow!("worker task failed: {err}"))),
    }
}

fn internal(err: anyhow::Error) -> (StatusCode, String) {
    warn!(error = %format!("{err:#}"), "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
}
