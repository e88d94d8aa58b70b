use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

// Smoke tests del router: verifican el cableado de rutas y el layer de
// CORS con una app mínima, sin base de datos.

#[tokio::test]
async fn test_health_endpoint_responds() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::get("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::get("/api/job/not-a-route/extra")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_only_route_rejects_get() {
    let app = create_test_app();

    let response = app
        .oneshot(Request::get("/api/drive/start").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_preflight_allows_origin() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/drive/start")
                .header("origin", "http://localhost:5173")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

// Función helper para crear la app de test
fn create_test_app() -> axum::Router {
    axum::Router::new()
        .route("/test", axum::routing::get(|| async { "OK" }))
        .route("/api/drive/start", axum::routing::post(|| async { "OK" }))
        .layer(CorsLayer::very_permissive())
}
