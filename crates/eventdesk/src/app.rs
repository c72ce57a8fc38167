use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        events::{
            create_events, delete_event, get_event, list_all_events, list_events_by_email,
            patch_event, put_event,
        },
        health::{banner, livez},
        token::issue_token,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // Credentialed CORS needs explicit origins
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(banner))
        .route("/livez", get(livez))
        .route("/jwt", post(issue_token))
        .route("/events", get(list_events_by_email).post(create_events))
        .route("/all/events", get(list_all_events))
        .route(
            "/events/{id}",
            get(get_event)
                .patch(patch_event)
                .put(put_event)
                .delete(delete_event),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Sends a request and returns the status and parsed JSON body (Null if not JSON).
    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Obtains a token cookie ("token=...") through POST /jwt.
    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/jwt",
                json!({"email": "ada@example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.contains("HttpOnly"));

        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn create(app: &Router, cookie: &str, body: Value) -> (StatusCode, Value) {
        let mut request = json_request("POST", "/events", body);
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        send(app, request).await
    }

    fn future_event() -> Value {
        json!({
            "start": "2999-01-01T10:00:00.000Z",
            "end": "2999-01-01T11:00:00.000Z",
            "email": "ada@example.com",
            "title": "Planning",
        })
    }

    #[tokio::test]
    async fn test_banner_and_livez() {
        let app = create_app(AppState::default());

        let response = app.clone().oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8(body.to_vec()).unwrap().contains("eventdesk"));

        let response = app.oneshot(get_request("/livez")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_requires_email() {
        let app = create_app(AppState::default());

        let (status, body) = send(&app, get_request("/events")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Email query param is required"}));
    }

    #[tokio::test]
    async fn test_create_without_token_is_unauthorized() {
        let app = create_app(AppState::default());

        let (status, body) = send(&app, json_request("POST", "/events", future_event())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "unauthorized access"}));
    }

    #[tokio::test]
    async fn test_create_with_forged_token_is_unauthorized() {
        let app = create_app(AppState::default());

        let (status, _) = create(&app, "token=not.a.jwt", future_event()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_single_event_and_get_it() {
        let app = create_app(AppState::default());
        let cookie = login(&app).await;

        let (status, body) = create(&app, &cookie, future_event()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["insertedCount"], 1);
        let id = body["insertedIds"][0].as_str().unwrap().to_string();

        let (status, event) = send(&app, get_request(&format!("/events/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(event["_id"], id.as_str());
        assert_eq!(event["title"], "Planning");
        assert_eq!(event["start"], "2999-01-01T10:00:00.000Z");
        assert!(event.get("recurrence").is_none());
    }

    #[tokio::test]
    async fn test_create_weekly_daily_expands_to_seven() {
        let app = create_app(AppState::default());
        let cookie = login(&app).await;

        let mut body = future_event();
        body["recurrence"] = json!("week");
        body["recurrencePattern"] = json!("daily");

        let (status, created) = create(&app, &cookie, body).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["insertedCount"], 7);
        assert_eq!(created["insertedIds"].as_array().unwrap().len(), 7);

        let (status, events) = send(&app, get_request("/events?email=ada@example.com")).await;
        assert_eq!(status, StatusCode::OK);
        let events = events.as_array().unwrap();
        assert_eq!(events.len(), 7);
        assert_eq!(events[6]["start"], "2999-01-07T10:00:00.000Z");
        assert_eq!(events[6]["end"], "2999-01-07T11:00:00.000Z");
    }

    #[tokio::test]
    async fn test_create_past_recurrence_writes_nothing() {
        let app = create_app(AppState::default());
        let cookie = login(&app).await;

        let (status, body) = create(
            &app,
            &cookie,
            json!({
                "start": "2000-01-01T10:00",
                "end": "2000-01-01T11:00",
                "email": "ada@example.com",
                "recurrence": "week",
                "recurrencePattern": "sameDay",
                "recurrenceCount": "3",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "No events to insert"}));

        let (_, all) = send(&app, get_request("/all/events")).await;
        assert_eq!(all, json!([]));
    }

    #[tokio::test]
    async fn test_create_rejects_excessive_count() {
        let app = create_app(AppState::default());
        let cookie = login(&app).await;

        let mut body = future_event();
        body["recurrence"] = json!("month");
        body["recurrencePattern"] = json!("sameDay");
        body["recurrenceCount"] = json!(1_000);

        let (status, _) = create(&app, &cookie, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_email() {
        let app = create_app(AppState::default());
        let cookie = login(&app).await;

        let (status, _) = create(
            &app,
            &cookie,
            json!({"start": "2999-01-01T10:00", "end": "2999-01-01T11:00"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_with_malformed_or_unknown_id() {
        let app = create_app(AppState::default());

        let (status, _) = send(&app, get_request("/events/42")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            get_request("/events/00000000-0000-0000-0000-000000000000"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Event not found"}));
    }

    #[tokio::test]
    async fn test_patch_put_and_delete() {
        let app = create_app(AppState::default());
        let cookie = login(&app).await;
        let (_, created) = create(&app, &cookie, future_event()).await;
        let id = created["insertedIds"][0].as_str().unwrap().to_string();
        let uri = format!("/events/{id}");

        // PATCH with nothing to set
        let (status, body) = send(&app, json_request("PATCH", &uri, json!({"_id": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "No fields provided to update"}));

        let (status, body) = send(
            &app,
            json_request("PATCH", &uri, json!({"title": "Retro", "room": 4})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Event updated successfully"}));

        // PUT accepts an empty body
        let (status, _) = send(&app, json_request("PUT", &uri, json!({}))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, event) = send(&app, get_request(&uri)).await;
        assert_eq!(event["title"], "Retro");
        assert_eq!(event["room"], 4);
        assert_eq!(event["email"], "ada@example.com");

        let request = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Event deleted successfully"}));

        let (status, _) = send(&app, json_request("PUT", &uri, json!({"title": "Gone"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_ignores_malformed_unused_count() {
        let app = create_app(AppState::default());
        let cookie = login(&app).await;

        let mut single = future_event();
        single["recurrenceCount"] = json!(null);
        let (status, body) = create(&app, &cookie, single).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["insertedCount"], 1);

        let mut weekly = future_event();
        weekly["recurrence"] = json!("week");
        weekly["recurrencePattern"] = json!("daily");
        weekly["recurrenceCount"] = json!("");
        let (status, body) = create(&app, &cookie, weekly).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["insertedCount"], 7);

        let mut numeric_rule = future_event();
        numeric_rule["recurrence"] = json!(7);
        let (status, body) = create(&app, &cookie, numeric_rule).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["insertedCount"], 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_patches_keep_every_field() {
        let app = create_app(AppState::default());
        let cookie = login(&app).await;
        let (_, created) = create(&app, &cookie, future_event()).await;
        let uri = format!("/events/{}", created["insertedIds"][0].as_str().unwrap());

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let app = app.clone();
                let update = serde_json::Map::from_iter([(format!("f{i}"), json!(i))]);
                let request = json_request("PATCH", &uri, Value::Object(update));
                tokio::spawn(async move { send(&app, request).await.0 })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap(), StatusCode::OK);
        }

        let (_, event) = send(&app, get_request(&uri)).await;
        for i in 0..64 {
            assert_eq!(event[format!("f{i}")], i);
        }
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_with_credentials() {
        let app = create_app(AppState::default());

        let request = Request::builder()
            .uri("/livez")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_allows_deployed_frontend_and_rejects_others() {
        let app = create_app(AppState::default());

        let request = Request::builder()
            .uri("/livez")
            .header(header::ORIGIN, "https://irenity0-control-panel.vercel.app")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://irenity0-control-panel.vercel.app"
        );

        let request = Request::builder()
            .uri("/livez")
            .header(header::ORIGIN, "https://evil.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
