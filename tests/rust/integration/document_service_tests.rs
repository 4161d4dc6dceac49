//! HTTP routes of the document service over the in-memory document store.

#[cfg(test)]
mod document_service_tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use flightgraph::config::ServerConfig;
    use flightgraph::server::{router, AppState, InMemoryDocumentStore};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(
            Arc::new(InMemoryDocumentStore::new()),
            ServerConfig::default(),
        ))
    }

    fn flight(airline: &str, to: &str, month: i32, connection: bool) -> Value {
        let (transit, wait) = if connection { ("Airport cab", 95) } else { ("", 0) };
        json!({
            "id": "FLQW12ER34",
            "airline": airline,
            "from": "PDX",
            "to": to,
            "day": 21,
            "month": month,
            "year": 2021,
            "age": 35,
            "gender": "female",
            "reason": "Business/Work",
            "stay": "Hotel",
            "transit": transit,
            "connection": connection,
            "wait": wait,
            "passenger_id": "PASSQW12ER"
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        let payload = body.to_string();
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("content-length", payload.len())
            .body(Body::from(payload))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_post_returns_created_with_id() {
        let app = app();
        let (status, body) = send(&app, post("/", &flight("Alaska", "JFK", 3, false))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["_id"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(body["airline"], "Alaska");
        assert_eq!(body["connection"], false);
    }

    #[tokio::test]
    async fn test_monthly_travel_for_one_airline() {
        let app = app();
        let (status, _) = send(&app, post("/flight", &flight("Delta Airlines", "LAX", 6, true))).await;
        assert_eq!(status, StatusCode::CREATED);
        send(&app, post("/flight", &flight("Alaska", "LAX", 6, true))).await;

        let (status, body) = send(
            &app,
            get("/flight?option=airline&option_chosen=Delta%20Airlines"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{ "_id": 6, "total_times": 1 }]));
    }

    #[tokio::test]
    async fn test_airport_statistics_skip_connections_and_sort_by_count() {
        let app = app();
        for (month, connection) in [(2, false), (9, false), (9, false), (4, true)] {
            send(&app, post("/", &flight("Volaris", "GDL", month, connection))).await;
        }

        let (status, body) = send(&app, get("/?option=airport&option_chosen=GDL")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                { "_id": 9, "total_times": 2 },
                { "_id": 2, "total_times": 1 }
            ])
        );
    }

    #[tokio::test]
    async fn test_unknown_option_is_bad_request() {
        let app = app();
        let (status, body) = send(&app, get("/flight?option=gate&option_chosen=B12")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("gate"));
    }

    #[tokio::test]
    async fn test_missing_query_parameter_is_bad_request() {
        let app = app();
        let (status, _) = send(&app, get("/?option=airline")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_result() {
        let app = app();
        let (status, body) = send(&app, get("/?option=airline&option_chosen=Nobody")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let config = ServerConfig {
            max_body_bytes: 1024,
            ..ServerConfig::default()
        };
        let app = router(AppState::new(Arc::new(InMemoryDocumentStore::new()), config));
        let mut big = flight("Alaska", "JFK", 1, false);
        big["gender"] = Value::String("x".repeat(4096));
        let (status, _) = send(&app, post("/", &big)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
