use axum::{routing::get, Json, Router};

use crate::models::rule::{RuleRow, RULES};

pub fn routes() -> Router {
    Router::new().route("/rules", get(get_rules))
}

async fn get_rules() -> Json<Vec<RuleRow>> {
    Json(RULES.rows().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn rules_endpoint_returns_all_six_rows() {
        let app = routes();
        let request = Request::builder()
            .uri("/rules")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["nb_player"], 5);
    }
}
