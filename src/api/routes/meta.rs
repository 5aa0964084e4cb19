use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::storage::Diagnostic;
use crate::views::{self, Selectors};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub form_rows: usize,
    pub score_rows: usize,
    pub acs_rows: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        form_rows: state.tables.form.len(),
        score_rows: state.tables.scores.len(),
        acs_rows: state.tables.acs.len(),
    })
}

/// Maps, players, agents, roles and date bounds for populating filters.
pub async fn selectors(State(state): State<AppState>) -> Json<Selectors> {
    Json(views::selectors(&state.tables))
}

/// Everything the loader worked around at startup.
pub async fn diagnostics(State(state): State<AppState>) -> Json<Vec<Diagnostic>> {
    Json(state.tables.diagnostics().cloned().collect())
}

#[cfg(test)]
mod tests {
    use crate::api::routes::testing::{empty_state, get_json, setup_test_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(state, "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["form_rows"], 5);
        assert_eq!(json["score_rows"], 3);
        assert_eq!(json["acs_rows"], 3);
    }

    #[tokio::test]
    async fn test_selectors() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = get_json(state, "/api/selectors").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["maps"], serde_json::json!(["Ascent", "Bind"]));
        assert_eq!(json["composition_maps"], serde_json::json!(["Ascent"]));
        assert_eq!(json["roles"].as_array().unwrap().len(), 4);
        assert_eq!(json["score_dates"]["from"], "2025-06-01");
        assert_eq!(json["score_dates"]["to"], "2025-06-03");
    }

    #[tokio::test]
    async fn test_diagnostics_for_missing_inputs() {
        let tmp = tempfile::tempdir().unwrap();
        let state = empty_state(tmp.path());

        let (status, json) = get_json(state, "/api/diagnostics").await;

        assert_eq!(status, StatusCode::OK);
        let diagnostics = json.as_array().unwrap();
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.iter().all(|d| d["kind"] == "missing_input"));
    }

    #[tokio::test]
    async fn test_diagnostics_clean_load() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (_, json) = get_json(state, "/api/diagnostics").await;
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let tmp = tempfile::tempdir().unwrap();
        let state = empty_state(tmp.path());

        let (status, json) = get_json(state, "/api/standings").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
