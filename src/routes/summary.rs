use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::state::AppState;
use crate::store::{self, RecordCounts};

/// Row counts for every HR table.
pub async fn record_summary(State(state): State<AppState>) -> AppResult<Json<RecordCounts>> {
    let mut conn = state.db()?;
    let counts = store::count_records(&mut conn)?;
    Ok(Json(counts))
}
