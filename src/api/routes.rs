//! API Routes
//!
//! Configures the Axum router with all study cache endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    class_view_handler, create_deck_handler, create_domain_handler, create_flashcard_handler,
    deck_flashcards_handler, domain_flashcards_handler, get_progress_handler, health_handler,
    list_domains_handler, metrics_json_handler, metrics_reset_handler, metrics_text_handler,
    record_progress_handler, rename_deck_handler, reset_progress_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// Read path (read-through cached):
/// - `GET /domains` - List study domains
/// - `GET /classes/:id/user/:user_id` - Per-user class view
/// - `GET /domains/:id/flashcards` - All flashcards in a domain
/// - `GET /decks/:id/flashcards` - A deck's flashcards
/// - `GET /progress/:user_id/card/:card_id` - Per-card study progress
///
/// Write path (invalidating):
/// - `POST /domains` - Create a domain
/// - `POST /domains/:id/decks` - Create a deck
/// - `PUT /decks/:id` - Rename a deck
/// - `POST /decks/:id/flashcards` - Add a flashcard
/// - `PUT /progress/:user_id/card/:card_id` - Record a study attempt
/// - `DELETE /progress/:user_id` - Reset a user's progress
///
/// Operational:
/// - `GET /metrics` - Counters in text exposition format
/// - `GET /metrics/json` - Counters as JSON
/// - `POST /metrics/reset` - Zero the counters
/// - `GET /health` - Cache backend reachability and latency
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route(
            "/domains",
            get(list_domains_handler).post(create_domain_handler),
        )
        .route("/domains/:id/decks", post(create_deck_handler))
        .route("/domains/:id/flashcards", get(domain_flashcards_handler))
        .route("/classes/:id/user/:user_id", get(class_view_handler))
        .route("/decks/:id", put(rename_deck_handler))
        .route(
            "/decks/:id/flashcards",
            get(deck_flashcards_handler).post(create_flashcard_handler),
        )
        .route("/progress/:user_id", delete(reset_progress_handler))
        .route(
            "/progress/:user_id/card/:card_id",
            get(get_progress_handler).put(record_progress_handler),
        )
        .route("/metrics", get(metrics_text_handler))
        .route("/metrics/json", get(metrics_json_handler))
        .route("/metrics/reset", post(metrics_reset_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_is_text() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_domains_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/domains")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_deck_returns_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/decks/nope/flashcards")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
