// Router wiring for the presentation layer
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, health_check, reset_chart, set_axis_mode, set_scope, stream_dashboard,
    toggle_axis_mode, zoom_chart,
};
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/controls/scope", put(set_scope))
        .route("/controls/axis-mode", put(set_axis_mode))
        .route("/controls/axis-mode/toggle", post(toggle_axis_mode))
        .route("/charts/:channel/zoom", post(zoom_chart))
        .route("/charts/:channel/reset", post(reset_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::monitor_service::MonitorService;
    use crate::application::streaming_service::StreamingDashboardService;
    use crate::application::telemetry_source::fake::FakeSource;
    use crate::domain::monitor::MonitorSettings;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    async fn app_with_reading() -> Router {
        let source = Arc::new(FakeSource::default());
        source.push_stats(Ok(FakeSource::reading(225.0, 100.0)));
        let monitor_service = MonitorService::new(source, MonitorSettings::default());
        monitor_service.poll_once().await.unwrap();

        let streaming_service =
            StreamingDashboardService::new(monitor_service.clone(), Duration::from_secs(2));
        router(Arc::new(AppState {
            monitor_service,
            streaming_service,
        }))
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = app_with_reading().await;
        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_dashboard() {
        let app = app_with_reading().await;
        let response = app
            .oneshot(Request::builder().uri("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["sample_count"], 1);
        assert_eq!(json["mode"], "live");
        assert_eq!(json["scope"]["selected"], "10");
        assert_eq!(json["scope"]["options"][3]["label"], "All Time");
        assert_eq!(json["charts"][0]["x_ticks"]["mode"], "array");
        assert_eq!(json["charts"][1]["y_dtick"], 15.0);
    }

    #[tokio::test]
    async fn test_scope_control() {
        let app = app_with_reading().await;

        let response = app
            .clone()
            .oneshot(json_request(Method::PUT, "/controls/scope", r#"{"scope":"all"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["scope"]["selected"], "all");

        let response = app
            .oneshot(json_request(Method::PUT, "/controls/scope", r#"{"scope":"15"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert!(error["error"].as_str().unwrap().contains("not one of the offered options"));
    }

    #[tokio::test]
    async fn test_zoom_and_reset() {
        let app = app_with_reading().await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/charts/probe/zoom",
                r#"{"x_range":[0,60],"y_range":[70,85]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["charts"][1]["phase"], "zoomed");
        assert_eq!(json["charts"][1]["y_dtick"], 2.0);
        assert_eq!(json["charts"][1]["x_ticks"]["mode"], "auto");
        assert_eq!(json["charts"][0]["phase"], "auto");

        let response = app
            .oneshot(json_request(Method::POST, "/charts/probe/reset", ""))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["charts"][1]["phase"], "auto");
        assert!(json["charts"][1]["x_range"].is_null());
        assert_eq!(json["charts"][1]["y_dtick"], 2.0);
    }

    #[tokio::test]
    async fn test_unknown_channel_and_bad_range() {
        let app = app_with_reading().await;

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/charts/ambient/reset", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/charts/grill/zoom",
                r#"{"y_range":[260,200]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/charts/grill/zoom", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(Request::builder().uri("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["charts"][0]["phase"], "auto");
    }

    #[tokio::test]
    async fn test_axis_mode_controls() {
        let app = app_with_reading().await;

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/controls/axis-mode/toggle", ""))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["axis_mode"], "clock");

        let response = app
            .clone()
            .oneshot(json_request(Method::PUT, "/controls/axis-mode", r#"{"mode":"elapsed"}"#))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["axis_mode"], "elapsed");
        assert_eq!(json["charts"][0]["x_title"], "Time Since Start (MM:SS)");

        let response = app
            .oneshot(json_request(Method::PUT, "/controls/axis-mode", r#"{"mode":"sundial"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_brotli_dashboard() {
        let app = app_with_reading().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .header(header::ACCEPT_ENCODING, "br")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");
    }
}
