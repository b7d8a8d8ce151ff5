use std::sync::Arc;

use axum::{extract::State, Json};
use raptor_core::prelude::{search, Journey, SearchContext, TuningParams};
use tracing::debug;

use crate::api::ApiError;
use crate::dto::SearchRequest;
use crate::state::AppState;

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<Vec<Journey>>, ApiError> {
    let tuning = TuningParams::try_from(body.tuning)?;
    let context = SearchContext::new(&state.timetable, body.request, tuning)?;
    let journeys = search(&context)?;
    debug!(count = journeys.len(), "search produced journeys");
    Ok(Json(journeys))
}
