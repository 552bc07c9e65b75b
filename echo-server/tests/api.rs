use axum::http::{self, Request, StatusCode};
use echo_server::{app, Echo};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_get_request() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/echo?x=1&y=2")
                .header(http::header::USER_AGENT, "probe/1.0")
                .header(http::header::COOKIE, "a=1; b=2")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/echo");
    assert_eq!(echo.query.as_deref(), Some("x=1&y=2"));
    assert_eq!(echo.headers["user-agent"], "probe/1.0");
    assert_eq!(echo.headers["cookie"], "a=1; b=2");
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn echo_reflects_post_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo")
                .header(
                    http::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body("a=1&b=2".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.body, "a=1&b=2");
    assert_eq!(echo.body_bytes, b"a=1&b=2".to_vec());
    assert_eq!(
        echo.headers["content-type"],
        "application/x-www-form-urlencoded"
    );
}

#[tokio::test]
async fn echo_joins_repeated_headers() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/echo")
                .header("x-tag", "one")
                .header("x-tag", "two")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.headers["x-tag"], "one, two");
}

#[tokio::test]
async fn echo_rejects_put() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/echo")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- delay ---

#[tokio::test]
async fn delay_responds_after_sleeping() {
    let started = std::time::Instant::now();
    let resp = app().oneshot(get("/delay/30")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(started.elapsed() >= std::time::Duration::from_millis(30));
    assert_eq!(&body_bytes(resp).await[..], b"done");
}

#[tokio::test]
async fn delay_bad_duration_returns_400() {
    let resp = app().oneshot(get("/delay/soon")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code() {
    let resp = app().oneshot(get("/status/503")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body_bytes(resp).await[..], b"503");
}

#[tokio::test]
async fn status_out_of_range_returns_400() {
    let resp = app().oneshot(get("/status/42")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(get("/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
