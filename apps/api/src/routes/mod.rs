pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::analysis::handlers as analysis;
use crate::rooms::handlers as rooms;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/v1/auth/signup", post(accounts::handle_signup))
        .route("/api/v1/auth/login", post(accounts::handle_login))
        .route("/api/v1/auth/logout", post(accounts::handle_logout))
        .route("/api/v1/auth/me", get(accounts::handle_me))
        .route("/api/v1/profile", patch(accounts::handle_update_profile))
        .route(
            "/api/v1/profile/complete",
            post(accounts::handle_complete_profile),
        )
        .route(
            "/api/v1/profile/resume",
            post(accounts::handle_upload_resume),
        )
        // Rooms
        .route(
            "/api/v1/rooms",
            get(rooms::handle_list_rooms).post(rooms::handle_create_room),
        )
        .route("/api/v1/rooms/start", post(rooms::handle_start_interview))
        .route(
            "/api/v1/rooms/:id",
            get(rooms::handle_get_room)
                .patch(rooms::handle_update_room)
                .delete(rooms::handle_delete_room),
        )
        .route(
            "/api/v1/rooms/:id/analysis",
            post(analysis::handle_room_analysis),
        )
        // Analysis
        .route("/api/v1/analysis", post(analysis::handle_analyze))
        .layer(body_limit)
        .with_state(state)
}
