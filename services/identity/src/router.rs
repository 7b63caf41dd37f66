use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use biovault_core::health::healthz;
use biovault_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    face::enroll_face,
    health::readyz,
    login::{login, request_otp},
    register::register,
    unlock::unlock,
    users::{delete_user, get_user},
    voice::{enroll_voice, unlock_voice},
};
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(state.cors_allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(request_id_layer())
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(cors_layer(&state));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration / login
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/request-otp", post(request_otp))
        // Unlock
        .route("/api/auth/unlock", post(unlock))
        // Biometric enrollment
        .route("/api/biometrics/face/enroll", post(enroll_face))
        .route("/api/auth/voice/enroll", post(enroll_voice))
        .route("/api/auth/voice/unlock", post(unlock_voice))
        // Users
        .route("/api/users/{id}", get(get_user).delete(delete_user))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(middleware)
        .with_state(state)
}
