pub mod auth;
pub mod health;
pub mod manpower;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::report::handlers::handle_export_pdf;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Records
        .route("/api/manpower", get(manpower::handle_list))
        .route(
            "/api/manpower/:id",
            put(manpower::handle_update).delete(manpower::handle_delete),
        )
        .route("/api/reset-data", post(manpower::handle_reset))
        // Mock auth
        .route("/api/login", post(auth::handle_login))
        .route("/api/verify-otp", post(auth::handle_verify_otp))
        // Report
        .route("/api/export-pdf", post(handle_export_pdf))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::store::test_support::{record, ReadOnlyStore};
    use crate::store::{JsonFileStore, Records, RecordStore, WarehouseStore};

    async fn json_app(dir: &tempfile::TempDir) -> (Router, Arc<JsonFileStore>) {
        let store = Arc::new(JsonFileStore::new(dir.path().join("mock_db.json")));
        store
            .overwrite(vec![
                record(1, "Band 1A", "Technical", 3),
                record(2, "Band 2A", "Behavioral", 4),
            ])
            .await
            .unwrap();
        let state = AppState {
            records: Records::new(store.clone(), None),
        };
        (build_router(state), store)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn record_json(id: i64, skill: &str) -> Value {
        let mut value = serde_json::to_value(record(id, "Band 3", "Technical", 2)).unwrap();
        value["Skill_Name"] = json!(skill);
        value
    }

    #[tokio::test]
    async fn test_root_banner_names_backend() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            json!("Manpower & Skills Matrix API is running (JSON Mode)")
        );
    }

    #[tokio::test]
    async fn test_list_returns_column_named_records() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;
        let response = app
            .oneshot(Request::get("/api/manpower").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["Band"], json!("Band 1A"));
        assert_eq!(body[1]["Proficiency_Level"], json!(4));
    }

    #[tokio::test]
    async fn test_update_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store) = json_app(&dir).await;
        let response = app
            .oneshot(json_request(Method::PUT, "/api/manpower/2", record_json(2, "Mentoring")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["Skill_Name"], json!("Mentoring"));
        assert_eq!(store.list().await.unwrap()[1].skill_name, "Mentoring");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_404_and_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store) = json_app(&dir).await;
        let before = store.list().await.unwrap();

        let response = app
            .oneshot(json_request(Method::PUT, "/api/manpower/77", record_json(77, "Ghost")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], json!("NOT_FOUND"));
        assert_eq!(store.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_malformed_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;
        let response = app
            .oneshot(json_request(Method::PUT, "/api/manpower/1", json!({"id": 1, "Skill_Name": 5})))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store) = json_app(&dir).await;

        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/manpower/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], json!("Record deleted"));
        assert_eq!(store.list().await.unwrap().len(), 1);

        let response = app
            .oneshot(
                Request::delete("/api/manpower/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_warehouse_mode_update_lands_in_local_copy() {
        let dir = tempfile::tempdir().unwrap();
        let warehouse = Arc::new(ReadOnlyStore::new(vec![record(5, "Band 4", "Technical", 1)]));
        let copy = Arc::new(JsonFileStore::new(dir.path().join("copy.json")));
        let app = build_router(AppState {
            records: Records::new(warehouse, Some(copy.clone())),
        });

        let response = app
            .oneshot(json_request(Method::PUT, "/api/manpower/5", record_json(5, "Lathe Setup")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(copy.list().await.unwrap()[0].skill_name, "Lathe Setup");
    }

    #[tokio::test]
    async fn test_login_accepts_known_pair_rejects_other() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;

        let ok = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/login",
                json!({"email": "demo@example.com", "password": "password"}),
            ))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(
            body_json(ok).await["message"],
            json!("OTP sent to demo@example.com")
        );

        let denied = app
            .oneshot(json_request(
                Method::POST,
                "/api/login",
                json!({"email": "demo@example.com", "password": "nope"}),
            ))
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_verify_otp_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;

        let ok = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/verify-otp",
                json!({"email": "demo@example.com", "otp": "123456"}),
            ))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(
            body_json(ok).await,
            json!({"access_token": "mock-jwt-token-xyz-123", "token_type": "bearer"})
        );

        let bad = app
            .oneshot(json_request(
                Method::POST,
                "/api/verify-otp",
                json!({"email": "demo@example.com", "otp": "111111"}),
            ))
            .await
            .unwrap();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_empty_data_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/export-pdf",
                json!({"data": [], "filters": {}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_ne!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            body_json(response).await["error"]["message"],
            json!("No data provided")
        );
    }

    #[tokio::test]
    async fn test_export_missing_data_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;
        let response = app
            .oneshot(json_request(Method::POST, "/api/export-pdf", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_null_data_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/export-pdf",
                json!({"data": null, "filters": null}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["message"],
            json!("No data provided")
        );
    }

    #[tokio::test]
    async fn test_export_null_filters_renders_without_caption() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/export-pdf",
                json!({
                    "data": [{"id": 1, "Band": "Band 3", "Skill_Name": "Welding"}],
                    "filters": null
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let texts = crate::report::pdf::test_support::page_texts(&bytes).concat();
        assert!(texts.contains(&"Welding".to_string()));
        assert!(!texts.iter().any(|t| t.starts_with("Filters Applied")));
    }

    #[tokio::test]
    async fn test_root_banner_in_warehouse_mode() {
        let dir = tempfile::tempdir().unwrap();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/skills")
            .unwrap();
        let warehouse = WarehouseStore::new(pool, "manpower_skills_matrix").unwrap();
        let copy = Arc::new(JsonFileStore::new(dir.path().join("copy.json")));
        let app = build_router(AppState {
            records: Records::new(Arc::new(warehouse), Some(copy)),
        });

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await["message"],
            json!("Manpower & Skills Matrix API is running (Warehouse Mode)")
        );
    }

    #[tokio::test]
    async fn test_export_returns_pdf_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = json_app(&dir).await;

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/export-pdf",
                json!({
                    "data": [{
                        "id": 1,
                        "Band": "Band 1A",
                        "Competency_Type": "Technical",
                        "Proficiency_Level": 3,
                        "Skill_Name": "Loom Calibration"
                    }],
                    "filters": {"Band": ["Band 1A"]}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=skills_matrix_visual_"));
        assert!(disposition.ends_with(".pdf"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let texts = crate::report::pdf::test_support::page_texts(&bytes).concat();
        assert!(texts.contains(&"Loom Calibration".to_string()));
        assert!(texts.contains(&"Filters Applied: Band: Band 1A".to_string()));
    }

    #[tokio::test]
    async fn test_reset_regenerates_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let (app, store) = json_app(&dir).await;
        let response = app
            .oneshot(Request::post("/api/reset-data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.list().await.unwrap().len(), 60);
    }
}
