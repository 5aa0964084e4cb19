use axum::extract::State;
use axum::Json;

use crate::api::extract::ViewQuery;
use crate::api::state::AppState;
use crate::models::{Report, WinRateGrid};
use crate::views::{self, CompositionsView};

/// Top lineups with their map list. `top` overrides the configured count.
pub async fn compositions(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Json<CompositionsView> {
    Json(views::compositions(&state.tables, &params, &state.settings))
}

pub async fn grid(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Json<Report<WinRateGrid>> {
    Json(views::grid(&state.tables, &params))
}
