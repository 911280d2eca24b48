use axum::{extract::State, Json};
use serde_json::json;

use crate::error::ApiError;
use crate::SharedState;

pub async fn livez() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readyz(State(state): State<SharedState>) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.readiness.load(std::sync::atomic::Ordering::SeqCst) {
        return Err(ApiError::ServiceUnavailable("shutting_down".into()));
    }

    if state.table.is_empty() {
        return Err(ApiError::ServiceUnavailable("tables_empty".into()));
    }

    Ok(Json(json!({
        "status": "ok",
        "general_records": state.table.general.len(),
        "large_account_records": state.table.large_account.len(),
        "application": env!("CARGO_PKG_NAME"),
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::AtomicBool, Arc};

    use yubin_common::table::PostalTable;
    use yubin_common::GeneralRecord;

    use super::*;
    use crate::{AppConfig, AppState};

    fn state_with(readiness: bool, table: PostalTable) -> SharedState {
        Arc::new(AppState {
            table: Arc::new(table),
            config: AppConfig::for_tests(),
            readiness: Arc::new(AtomicBool::new(readiness)),
        })
    }

    fn nonempty_table() -> PostalTable {
        PostalTable {
            general: vec![GeneralRecord {
                lpb_code: "13111".into(),
                code5: "144".into(),
                code7: "1440041".into(),
                pref_kanji: "東京都".into(),
                city_kanji: "大田区".into(),
                town_kanji: "羽田空港".into(),
                ..GeneralRecord::default()
            }],
            large_account: Vec::new(),
        }
    }

    #[tokio::test]
    async fn readyz_rejects_when_shutting_down() {
        let result = readyz(State(state_with(false, nonempty_table()))).await;

        match result {
            Err(ApiError::ServiceUnavailable(code)) => assert!(code.contains("shutting_down")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn readyz_rejects_empty_snapshot() {
        let result = readyz(State(state_with(true, PostalTable::default()))).await;

        match result {
            Err(ApiError::ServiceUnavailable(code)) => assert!(code.contains("tables_empty")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn readyz_reports_record_counts() {
        let result = readyz(State(state_with(true, nonempty_table()))).await.unwrap();
        assert_eq!(result.0["general_records"], 1);
        assert_eq!(result.0["large_account_records"], 0);
    }
}
