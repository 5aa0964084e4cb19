use axum::extract::State;
use axum::Json;

use crate::api::extract::ViewQuery;
use crate::api::state::AppState;
use crate::models::{ConversionBreakdown, PistolSummary, PostPlantSummary, Report, SideSummary};
use crate::views::{self, OverviewView};

pub async fn overview(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Json<Report<OverviewView>> {
    Json(views::overview(&state.tables, &params))
}

pub async fn sides(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Json<Report<Vec<SideSummary>>> {
    Json(views::sides(&state.tables, &params, &state.settings))
}

pub async fn post_plant(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Json<Report<Vec<PostPlantSummary>>> {
    Json(views::post_plant(&state.tables, &params))
}

pub async fn pistol(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Json<Report<Vec<PistolSummary>>> {
    Json(views::pistol(&state.tables, &params))
}

pub async fn conversions(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Json<Report<Vec<ConversionBreakdown>>> {
    Json(views::conversions(&state.tables, &params))
}
