use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{self, applications, auth, events, stats, tickets, uploads};
use crate::mailer::Mailer;
use crate::state::AppState;
use crate::store::{AuthStore, EntityStore};

pub fn create_routes<E, A, M>(state: Arc<AppState<E, A, M>>) -> Router
where
    E: EntityStore + 'static,
    A: AuthStore + 'static,
    M: Mailer + 'static,
{
    let security_headers = create_security_headers_layer(&state.config);
    let cors = create_cors_layer(&state.config);
    let uploads_dir = state.config.upload_dir.clone();

    Router::new()
        .route("/health", get(handlers::health_check))
        // Auth provider
        .route("/api/auth/sign-up", post(auth::sign_up))
        .route("/api/auth/confirm", post(auth::confirm))
        .route("/api/auth/sign-in", post(auth::sign_in))
        .route("/api/auth/sign-out", post(auth::sign_out))
        .route("/api/auth/session", get(auth::session_context))
        .route("/api/auth/reset", post(auth::stage_reset))
        .route("/api/auth/complete-reset", post(auth::complete_reset))
        // Public event catalog
        .route("/api/events", get(events::list_public).post(events::submit_event))
        .route("/api/events/:id", get(events::event_detail))
        // Seller surface
        .route("/api/seller/apply", post(applications::submit_application))
        .route("/api/seller/applications", get(applications::my_applications))
        .route("/api/seller/events", get(events::my_events))
        // Admin queues and decisions
        .route("/api/admin/applications", get(applications::list_applications))
        .route(
            "/api/admin/applications/:id/decision",
            post(applications::decide_application),
        )
        .route(
            "/api/admin/applications/:id/complete",
            post(applications::complete_application),
        )
        .route("/api/admin/events", get(events::list_admin_events))
        .route("/api/admin/events/:id/decision", post(events::decide_event))
        // Tickets
        .route("/api/tickets", get(tickets::my_tickets).post(tickets::purchase))
        // Dashboard stats
        .route("/api/stats/admin", get(stats::admin_stats))
        .route("/api/stats/seller", get(stats::seller_stats))
        .route("/api/stats/user", get(stats::user_stats))
        // Image upload and static serving
        .route("/api/uploads/event-image", post(uploads::upload_event_image))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(security_headers)
        .layer(cors)
        .with_state(state)
}
