use std::time::Duration;

use api_client::{ApiBase, ApiClient, ClientError};
use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use models::{AuditionQuery, ContributionPayload};
use serde_json::{json, Value};
use std::collections::HashMap;

async fn serve(app: Router) -> ApiBase {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ApiBase::parse(&format!("http://{addr}/api")).unwrap()
}

fn client(base: ApiBase) -> ApiClient {
    ApiClient::http(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_query_parameters_reach_the_server() {
    let app = Router::new().route(
        "/api/auditions",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            Json(json!([{
                "id": "1",
                "name": params.get("token").cloned().unwrap_or_default(),
                "country": params.get("country").cloned().unwrap_or_default(),
                "videoUrl": "http://x",
                "createdAt": "2024-01-01T00:00:00Z"
            }]))
        }),
    );
    let api = client(serve(app).await);

    let query = AuditionQuery {
        token: "s3cret & more".into(),
        country: Some("NG".into()),
        limit: None,
    };
    let items = api.list_auditions(&query).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "s3cret & more");
    assert_eq!(items[0].country, "NG");
}

#[tokio::test]
async fn test_post_sends_json_content_type() {
    let app = Router::new().route(
        "/api/signal-bank/contributions",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let content_type = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if content_type.starts_with("application/json") && body["amount"] == json!(12.5) {
                StatusCode::CREATED
            } else {
                StatusCode::BAD_REQUEST
            }
        }),
    );
    let api = client(serve(app).await);

    let payload = ContributionPayload {
        name: "Ada".into(),
        amount: 12.5,
        message: String::new(),
    };
    api.record_contribution(&payload).await.unwrap();
}

#[tokio::test]
async fn test_non_ok_body_becomes_the_error_text() {
    let app = Router::new().route(
        "/api/auditions",
        post(|| async { (StatusCode::BAD_REQUEST, "name, country, and videoUrl are required") }),
    );
    let api = client(serve(app).await);

    let err = api.submit_audition(&serde_json::Map::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "name, country, and videoUrl are required");
}

#[tokio::test]
async fn test_null_list_reads_as_empty() {
    let app = Router::new().route("/api/requests", get(|| async { Json(Value::Null) }));
    let api = client(serve(app).await);

    assert!(api.list_help_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(ApiBase::parse(&format!("http://{addr}/api")).unwrap());
    let err = api.fetch_stats().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}
