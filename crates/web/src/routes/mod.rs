use axum::{Router, middleware};

use crate::features::{account, comments, fields, suggestions, traffic};
use crate::middleware::auth::{AdminPolicy, require_admin};
use crate::state::AppState;

pub fn api_routes(state: AppState) -> Router {
    let admin = Router::new()
        .nest("/fields", admin_only(fields::routes::admin_routes(), &state.admins))
        .nest(
            "/suggestions",
            admin_only(suggestions::routes::admin_routes(), &state.admins),
        );

    let api = Router::new()
        .nest(
            "/fields",
            fields::routes::routes()
                .merge(traffic::routes::routes())
                .merge(comments::routes::routes()),
        )
        .nest("/suggestions", suggestions::routes::routes())
        .nest("/me", account::routes::routes())
        .nest("/admin", admin);

    Router::new().nest("/api", api).with_state(state)
}

fn admin_only(router: Router<AppState>, admins: &AdminPolicy) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(admins.clone(), require_admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use storage::Database;
    use storage::services::consensus::TrafficWindow;
    use tower::ServiceExt;

    use crate::middleware::auth::{USER_EMAIL_HEADER, USER_ID_HEADER};
    use crate::state::TrafficSettings;

    const FIELD_ID: &str = "8a6e0804-2bd0-4672-b79d-d97027f9071a";

    /// Router over a pool that never connects; every request here must be
    /// answered before any query runs.
    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/pitchside_test")
            .unwrap();

        api_routes(AppState {
            db: Database::from_pool(pool),
            admins: AdminPolicy::from_comma_separated("admin@example.com"),
            traffic: TrafficSettings {
                window: TrafficWindow::default(),
                recent_reports_limit: 5,
                nearby_limit: 10,
            },
        })
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_admin_routes_require_identity() {
        let response = app().oneshot(get("/api/admin/suggestions")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_reject_regular_users() {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/admin/fields/{}", FIELD_ID))
            .header(USER_ID_HEADER, "u2")
            .header(USER_EMAIL_HEADER, "player@example.com")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_report_submission_requires_identity() {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/fields/{}/reports", FIELD_ID))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"level":"low"}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_zero_window_is_a_bad_request() {
        let response = app()
            .oneshot(get(&format!("/api/fields/{}/traffic?window=0", FIELD_ID)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearby_rejects_out_of_range_latitude() {
        let response = app()
            .oneshot(get("/api/fields/nearby?lat=91&lng=-74.3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_comment_category_is_a_bad_request() {
        let response = app()
            .oneshot(get(&format!(
                "/api/fields/{}/comments?category=weather",
                FIELD_ID
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_without_identity_is_unauthorized() {
        let response = app().oneshot(get("/api/me")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
