use std::convert::Infallible;

use axum::{
    extract::{Multipart, State},
    response::sse::{Event as SseEvent, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use serde::Serialize;

use crate::domain::{AppError, SearchCandidate};

use super::form::{save_upload, SubmittedForm};
use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchCandidate>,
}

/// Start an sldl download and stream its output as Server-Sent Events.
pub async fn run_download(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, AppError> {
    let form = SubmittedForm::from_multipart(multipart).await?;
    let mut options = form.download_options();

    if let Some(upload) = form.upload() {
        let path = save_upload(upload, &state.config).await?;
        options.input_file_path = Some(path.to_string_lossy().into_owned());
    }

    let events = state
        .downloads
        .run(&options)
        .map(|event| Ok(SseEvent::default().data(event.to_json())));

    Ok(Sse::new(events))
}

/// Search via sldl and return ranked album candidates with artwork.
pub async fn search(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SearchResponse>, AppError> {
    let form = SubmittedForm::from_multipart(multipart).await?;
    let results = state.search.search(&form.search_options()).await?;
    Ok(Json(SearchResponse { results }))
}
