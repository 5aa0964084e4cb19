use axum::extract::State;
use axum::Json;

use crate::api::extract::ViewQuery;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{AcsSpread, AgentPerformance, BenchmarkComparison, Report};
use crate::views;

/// Agent performance table; requires `player`.
pub async fn player_stats(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Result<Json<Report<Vec<AgentPerformance>>>, ApiError> {
    Ok(Json(views::player_stats(&state.tables, &params)?))
}

/// Benchmark comparison; requires `player` and `role`.
pub async fn compare(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Result<Json<Report<BenchmarkComparison>>, ApiError> {
    Ok(Json(views::compare(&state.tables, &params)?))
}

pub async fn acs(
    State(state): State<AppState>,
    ViewQuery(params): ViewQuery,
) -> Result<Json<Report<AcsSpread>>, ApiError> {
    Ok(Json(views::acs(&state.tables, &params)?))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::testing::{get_json, setup_test_state};
    use axum::http::StatusCode;
    use serde_json::Value;

    fn delta<'a>(json: &'a Value, metric: &str) -> &'a Value {
        json["data"]["deltas"]
            .as_array()
            .unwrap()
            .iter()
            .find(|d| d["metric"] == metric)
            .unwrap()
    }

    #[tokio::test]
    async fn test_player_stats() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(state, "/api/player?player=alpha").await;

        assert_eq!(status, StatusCode::OK);
        let jett = &json["data"][0];
        assert_eq!(jett["agent"], "Jett");
        assert_eq!(jett["games"], 1);
        assert_eq!(jett["kills"], 20.0);
        assert_eq!(jett["first_kill_diff"], 2.0);
        assert!((jett["kd_ratio"].as_f64().unwrap() - 20.0 / 15.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_player_stats_requires_player() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(state, "/api/player").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_player_stats_unknown_player() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(state, "/api/player?player=nobody").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "no_data");
    }

    #[tokio::test]
    async fn test_compare() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(state, "/api/compare?player=alpha&role=duelist").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["role"], "Duelist");
        assert_eq!(json["data"]["agents"][0], "Jett");
        assert_eq!(delta(&json, "Acs")["display"], "+10.00");
        assert_eq!(delta(&json, "Fbsr")["display"], "+5.0%");
    }

    #[tokio::test]
    async fn test_compare_bad_role() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(state, "/api/compare?player=alpha&role=support").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("support"));
    }

    #[tokio::test]
    async fn test_compare_role_not_played() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(state, "/api/compare?player=alpha&role=Sentinel").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "no_data");
    }

    #[tokio::test]
    async fn test_acs() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(state.clone(), "/api/acs?player=alpha").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["mean"], 215.0);
        assert_eq!(json["data"]["points"].as_array().unwrap().len(), 2);

        let (_, json) = get_json(state, "/api/acs?player=alpha&agents=Raze").await;
        assert_eq!(json["data"]["mean"], 180.0);
    }
}
